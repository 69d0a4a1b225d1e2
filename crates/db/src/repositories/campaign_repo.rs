//! Repository for the `campaigns` table.

use sponnect_core::campaign::VISIBILITY_PUBLIC;
use sponnect_core::types::DbId;
use sqlx::PgPool;

use crate::models::campaign::{Campaign, CreateCampaign, UpdateCampaign};

/// Column list for campaigns queries.
const COLUMNS: &str = "id, sponsor_id, name, description, goals, budget, start_date, end_date, \
    visibility, is_flagged, created_at, updated_at";

/// Provides CRUD operations for campaigns plus the public search.
pub struct CampaignRepo;

impl CampaignRepo {
    pub async fn create(pool: &PgPool, input: &CreateCampaign) -> Result<Campaign, sqlx::Error> {
        let query = format!(
            "INSERT INTO campaigns (sponsor_id, name, description, goals, budget, \
                 start_date, end_date, visibility)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Campaign>(&query)
            .bind(input.sponsor_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.goals)
            .bind(input.budget)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.visibility.as_str())
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Campaign>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM campaigns WHERE id = $1");
        sqlx::query_as::<_, Campaign>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a campaign only if `sponsor_id` owns it.
    pub async fn find_owned(
        pool: &PgPool,
        id: DbId,
        sponsor_id: DbId,
    ) -> Result<Option<Campaign>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM campaigns WHERE id = $1 AND sponsor_id = $2");
        sqlx::query_as::<_, Campaign>(&query)
            .bind(id)
            .bind(sponsor_id)
            .fetch_optional(pool)
            .await
    }

    /// All campaigns of a sponsor, newest first.
    pub async fn list_for_sponsor(
        pool: &PgPool,
        sponsor_id: DbId,
    ) -> Result<Vec<Campaign>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM campaigns WHERE sponsor_id = $1
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Campaign>(&query)
            .bind(sponsor_id)
            .fetch_all(pool)
            .await
    }

    /// Update an owned campaign. Returns `None` if it does not exist or is
    /// not owned by `sponsor_id`.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        sponsor_id: DbId,
        input: &UpdateCampaign,
    ) -> Result<Option<Campaign>, sqlx::Error> {
        let query = format!(
            "UPDATE campaigns SET
                name = COALESCE($3, name),
                description = COALESCE($4, description),
                goals = COALESCE($5, goals),
                budget = COALESCE($6, budget),
                start_date = COALESCE($7, start_date),
                end_date = COALESCE($8, end_date),
                visibility = COALESCE($9, visibility),
                updated_at = NOW()
             WHERE id = $1 AND sponsor_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Campaign>(&query)
            .bind(id)
            .bind(sponsor_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.goals)
            .bind(input.budget)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.visibility.map(|v| v.as_str()))
            .fetch_optional(pool)
            .await
    }

    /// Delete an owned campaign; its ad requests and their history cascade.
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId, sponsor_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM campaigns WHERE id = $1 AND sponsor_id = $2")
            .bind(id)
            .bind(sponsor_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn set_flagged(
        pool: &PgPool,
        id: DbId,
        is_flagged: bool,
    ) -> Result<Option<Campaign>, sqlx::Error> {
        let query = format!(
            "UPDATE campaigns SET is_flagged = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Campaign>(&query)
            .bind(id)
            .bind(is_flagged)
            .fetch_optional(pool)
            .await
    }

    /// Public, unflagged campaigns, newest first.
    pub async fn search_public(
        pool: &PgPool,
        budget_min: Option<f64>,
        limit: i64,
    ) -> Result<Vec<Campaign>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM campaigns
             WHERE visibility = '{VISIBILITY_PUBLIC}' AND NOT is_flagged
               AND ($1::DOUBLE PRECISION IS NULL OR budget >= $1)
             ORDER BY created_at DESC, id DESC
             LIMIT $2"
        );
        sqlx::query_as::<_, Campaign>(&query)
            .bind(budget_min)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}

//! Repository for the `users` table.

use std::collections::BTreeMap;

use sponnect_core::roles::{ROLE_ADMIN, ROLE_INFLUENCER, ROLE_SPONSOR};
use sponnect_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::{
    AdminStats, CreateUser, InfluencerCard, UpdateProfile, User, UserListFilter,
};

/// Column list for users queries.
const COLUMNS: &str = "id, username, email, password_hash, role, is_active, is_flagged, \
    sponsor_approved, company_name, industry, influencer_name, category, niche, reach, \
    created_at, updated_at";

/// Column list for the public influencer card.
const CARD_COLUMNS: &str = "id, username, influencer_name, category, niche, reach";

/// Shared WHERE clause for the admin listing and its count.
const LIST_FILTER: &str = "role <> 'admin' \
    AND ($1::TEXT IS NULL OR role = $1) \
    AND ($2::BOOL IS NULL OR is_flagged = $2) \
    AND ($3::BOOL IS NULL OR is_active = $3) \
    AND ($4::BOOL IS NULL OR (role = 'sponsor' AND sponsor_approved = $4)) \
    AND ($5::TEXT IS NULL OR username ILIKE $5 \
         OR company_name ILIKE $5 OR influencer_name ILIKE $5)";

/// Provides account storage, moderation writes, and influencer search.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    ///
    /// Duplicate usernames or emails surface as unique violations on
    /// `uq_users_username` / `uq_users_email`.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (username, email, password_hash, role, sponsor_approved, \
                 company_name, industry, influencer_name, category, niche, reach)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.username)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(input.role.as_str())
            .bind(input.sponsor_approved)
            .bind(&input.company_name)
            .bind(&input.industry)
            .bind(&input.influencer_name)
            .bind(&input.category)
            .bind(&input.niche)
            .bind(input.reach)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE username = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// Find a user whose username or email equals `identifier`.
    pub async fn find_by_login(
        pool: &PgPool,
        identifier: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM users WHERE username = $1 OR email = $1 \
             ORDER BY (username = $1) DESC LIMIT 1"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(identifier)
            .fetch_optional(pool)
            .await
    }

    /// Find an active influencer. Flagging only hides them from search.
    pub async fn find_active_influencer(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<InfluencerCard>, sqlx::Error> {
        let query = format!(
            "SELECT {CARD_COLUMNS} FROM users
             WHERE id = $1 AND role = '{ROLE_INFLUENCER}' AND is_active"
        );
        sqlx::query_as::<_, InfluencerCard>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Update profile fields, returning the updated row.
    pub async fn update_profile(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProfile,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                company_name = COALESCE($2, company_name),
                industry = COALESCE($3, industry),
                influencer_name = COALESCE($4, influencer_name),
                category = COALESCE($5, category),
                niche = COALESCE($6, niche),
                reach = COALESCE($7, reach),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&input.company_name)
            .bind(&input.industry)
            .bind(&input.influencer_name)
            .bind(&input.category)
            .bind(&input.niche)
            .bind(input.reach)
            .fetch_optional(pool)
            .await
    }

    /// Mark a sponsor approved and active.
    pub async fn approve_sponsor(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET sponsor_approved = true, is_active = true, updated_at = NOW()
             WHERE id = $1 AND role = '{ROLE_SPONSOR}'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Deactivate a rejected sponsor. The approval flag is left false.
    pub async fn reject_sponsor(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET is_active = false, sponsor_approved = false, updated_at = NOW()
             WHERE id = $1 AND role = '{ROLE_SPONSOR}'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn set_active(
        pool: &PgPool,
        id: DbId,
        is_active: bool,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET is_active = $2, updated_at = NOW()
             WHERE id = $1 AND role <> '{ROLE_ADMIN}'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(is_active)
            .fetch_optional(pool)
            .await
    }

    pub async fn set_flagged(
        pool: &PgPool,
        id: DbId,
        is_flagged: bool,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET is_flagged = $2, updated_at = NOW()
             WHERE id = $1 AND role <> '{ROLE_ADMIN}'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(is_flagged)
            .fetch_optional(pool)
            .await
    }

    /// Active sponsors still waiting for approval, oldest first.
    pub async fn list_pending_sponsors(pool: &PgPool) -> Result<Vec<User>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM users
             WHERE role = '{ROLE_SPONSOR}' AND NOT sponsor_approved AND is_active
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, User>(&query).fetch_all(pool).await
    }

    /// One page of non-admin users matching `filter`, newest first, with the
    /// total number of matches.
    pub async fn list_filtered(
        pool: &PgPool,
        filter: &UserListFilter,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<User>, i64), sqlx::Error> {
        let role = filter.role.map(|r| r.as_str());
        let search = filter.search.as_deref().map(|s| format!("%{s}%"));

        let query = format!(
            "SELECT {COLUMNS} FROM users WHERE {LIST_FILTER}
             ORDER BY created_at DESC, id DESC
             LIMIT $6 OFFSET $7"
        );
        let items = sqlx::query_as::<_, User>(&query)
            .bind(role)
            .bind(filter.flagged)
            .bind(filter.is_active)
            .bind(filter.sponsor_approved)
            .bind(&search)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        let count_query = format!("SELECT COUNT(*) FROM users WHERE {LIST_FILTER}");
        let total: i64 = sqlx::query_scalar(&count_query)
            .bind(role)
            .bind(filter.flagged)
            .bind(filter.is_active)
            .bind(filter.sponsor_approved)
            .bind(&search)
            .fetch_one(pool)
            .await?;

        Ok((items, total))
    }

    /// Active, unflagged influencers ordered by reach (largest first).
    pub async fn search_influencers(
        pool: &PgPool,
        niche: Option<&str>,
        category: Option<&str>,
        reach_min: Option<i64>,
        limit: i64,
    ) -> Result<Vec<InfluencerCard>, sqlx::Error> {
        let niche = niche.map(|n| format!("%{n}%"));
        let query = format!(
            "SELECT {CARD_COLUMNS} FROM users
             WHERE role = '{ROLE_INFLUENCER}' AND is_active AND NOT is_flagged
               AND ($1::TEXT IS NULL OR niche ILIKE $1)
               AND ($2::TEXT IS NULL OR category = $2)
               AND ($3::BIGINT IS NULL OR COALESCE(reach, 0) >= $3)
             ORDER BY reach DESC NULLS LAST, id ASC
             LIMIT $4"
        );
        sqlx::query_as::<_, InfluencerCard>(&query)
            .bind(&niche)
            .bind(category)
            .bind(reach_min)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Platform counters for the admin dashboard.
    pub async fn stats(pool: &PgPool) -> Result<AdminStats, sqlx::Error> {
        let (total_users, sponsors, influencers, pending_sponsors, flagged_users): (
            i64,
            i64,
            i64,
            i64,
            i64,
        ) = sqlx::query_as(&format!(
            "SELECT
                COUNT(*) FILTER (WHERE role <> '{ROLE_ADMIN}'),
                COUNT(*) FILTER (WHERE role = '{ROLE_SPONSOR}'),
                COUNT(*) FILTER (WHERE role = '{ROLE_INFLUENCER}'),
                COUNT(*) FILTER (WHERE role = '{ROLE_SPONSOR}' AND NOT sponsor_approved AND is_active),
                COUNT(*) FILTER (WHERE is_flagged)
             FROM users"
        ))
        .fetch_one(pool)
        .await?;

        let (total_campaigns, public_campaigns, flagged_campaigns): (i64, i64, i64) =
            sqlx::query_as(
                "SELECT
                    COUNT(*),
                    COUNT(*) FILTER (WHERE visibility = 'public'),
                    COUNT(*) FILTER (WHERE is_flagged)
                 FROM campaigns",
            )
            .fetch_one(pool)
            .await?;

        let by_status: Vec<(String, i64)> =
            sqlx::query_as("SELECT status, COUNT(*) FROM ad_requests GROUP BY status")
                .fetch_all(pool)
                .await?;
        let ad_requests_by_status: BTreeMap<String, i64> = by_status.into_iter().collect();
        let total_ad_requests = ad_requests_by_status.values().sum();

        Ok(AdminStats {
            total_users,
            sponsors,
            influencers,
            pending_sponsors,
            flagged_users,
            total_campaigns,
            public_campaigns,
            flagged_campaigns,
            total_ad_requests,
            ad_requests_by_status,
        })
    }
}

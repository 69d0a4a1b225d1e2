//! Repository for the `ad_requests` table.
//!
//! Every state change goes through a transaction: the caller locks the row
//! with [`AdRequestRepo::lock_owned`], decides, appends to the ledger, then
//! calls [`AdRequestRepo::apply_transition`] before committing.

use sponnect_core::negotiation::{AdRequestStatus, Transition, STATUS_PENDING};
use sponnect_core::types::DbId;
use sqlx::PgPool;

use crate::models::ad_request::{
    AdRequest, AdRequestDetail, AdRequestFilter, CreateAdRequest, OwnedAdRequest,
};

/// Column list for ad_requests queries.
const COLUMNS: &str = "id, campaign_id, influencer_id, initiator_id, message, requirements, \
    payment_amount, status, last_offer_by, created_at, updated_at";

/// Same columns qualified with the `ar` alias, for joins.
const AR_COLUMNS: &str = "ar.id, ar.campaign_id, ar.influencer_id, ar.initiator_id, ar.message, \
    ar.requirements, ar.payment_amount, ar.status, ar.last_offer_by, ar.created_at, ar.updated_at";

/// Select list and joins producing an [`AdRequestDetail`].
pub(crate) const DETAIL_SELECT: &str = "ar.id, ar.campaign_id, ar.influencer_id, \
    ar.initiator_id, ar.message, ar.requirements, ar.payment_amount, ar.status, \
    ar.last_offer_by, ar.created_at, ar.updated_at, \
    c.name AS campaign_name, u.influencer_name, u.username AS influencer_username";

pub(crate) const DETAIL_FROM: &str = "FROM ad_requests ar \
    JOIN campaigns c ON c.id = ar.campaign_id \
    JOIN users u ON u.id = ar.influencer_id";

/// Provides storage for negotiation threads.
pub struct AdRequestRepo;

impl AdRequestRepo {
    // -----------------------------------------------------------------------
    // Transaction-scoped writes
    // -----------------------------------------------------------------------

    /// Whether a Pending request already exists for the pair.
    ///
    /// The partial unique index `uq_ad_requests_pending_pair` is the final
    /// arbiter; this check only gives the common case a clear message.
    pub async fn pending_exists(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        campaign_id: DbId,
        influencer_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(&format!(
            "SELECT EXISTS (
                SELECT 1 FROM ad_requests
                WHERE campaign_id = $1 AND influencer_id = $2 AND status = '{STATUS_PENDING}'
             )"
        ))
        .bind(campaign_id)
        .bind(influencer_id)
        .fetch_one(&mut **tx)
        .await
    }

    /// Insert the opening proposal of a thread.
    pub async fn create(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        input: &CreateAdRequest,
    ) -> Result<AdRequest, sqlx::Error> {
        let query = format!(
            "INSERT INTO ad_requests (campaign_id, influencer_id, initiator_id, message, \
                 requirements, payment_amount, status, last_offer_by)
             VALUES ($1, $2, $3, $4, $5, $6, '{STATUS_PENDING}', $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AdRequest>(&query)
            .bind(input.campaign_id)
            .bind(input.influencer_id)
            .bind(input.initiator_id)
            .bind(&input.message)
            .bind(&input.requirements)
            .bind(input.payment_amount)
            .bind(input.last_offer_by.as_str())
            .fetch_one(&mut **tx)
            .await
    }

    /// Lock an ad request row for the rest of the transaction and return it
    /// with the owning sponsor. Concurrent actors on the same row block here.
    pub async fn lock_owned(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        id: DbId,
    ) -> Result<Option<OwnedAdRequest>, sqlx::Error> {
        let query = format!(
            "SELECT {AR_COLUMNS}, c.sponsor_id
             FROM ad_requests ar
             JOIN campaigns c ON c.id = ar.campaign_id
             WHERE ar.id = $1
             FOR UPDATE OF ar"
        );
        sqlx::query_as::<_, OwnedAdRequest>(&query)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Write a planned transition to the row and refresh `updated_at`.
    pub async fn apply_transition(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        id: DbId,
        transition: &Transition,
    ) -> Result<AdRequest, sqlx::Error> {
        let query = format!(
            "UPDATE ad_requests SET
                status = $2,
                last_offer_by = $3,
                payment_amount = $4,
                message = $5,
                requirements = $6,
                updated_at = clock_timestamp()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AdRequest>(&query)
            .bind(id)
            .bind(transition.status.as_str())
            .bind(transition.last_offer_by.as_str())
            .bind(transition.terms.payment_amount)
            .bind(&transition.terms.message)
            .bind(&transition.terms.requirements)
            .fetch_one(&mut **tx)
            .await
    }

    /// Delete a locked row. Its ledger entries cascade.
    pub async fn delete(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM ad_requests WHERE id = $1")
            .bind(id)
            .execute(&mut **tx)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Fetch an ad request with its owning sponsor, without locking.
    pub async fn find_owned(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<OwnedAdRequest>, sqlx::Error> {
        let query = format!(
            "SELECT {AR_COLUMNS}, c.sponsor_id
             FROM ad_requests ar
             JOIN campaigns c ON c.id = ar.campaign_id
             WHERE ar.id = $1"
        );
        sqlx::query_as::<_, OwnedAdRequest>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_detail(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<AdRequestDetail>, sqlx::Error> {
        let query = format!("SELECT {DETAIL_SELECT} {DETAIL_FROM} WHERE ar.id = $1");
        sqlx::query_as::<_, AdRequestDetail>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Requests across all of a sponsor's campaigns, newest first.
    pub async fn list_for_sponsor(
        pool: &PgPool,
        sponsor_id: DbId,
        filter: AdRequestFilter,
    ) -> Result<Vec<AdRequestDetail>, sqlx::Error> {
        let query = format!(
            "SELECT {DETAIL_SELECT} {DETAIL_FROM}
             WHERE c.sponsor_id = $1
               AND ($2::TEXT IS NULL OR ar.status = $2)
               AND ($3::BIGINT IS NULL OR ar.campaign_id = $3)
             ORDER BY ar.created_at DESC, ar.id DESC"
        );
        sqlx::query_as::<_, AdRequestDetail>(&query)
            .bind(sponsor_id)
            .bind(filter.status.map(|s| s.as_str()))
            .bind(filter.campaign_id)
            .fetch_all(pool)
            .await
    }

    /// Requests addressed to or opened by an influencer, newest first.
    pub async fn list_for_influencer(
        pool: &PgPool,
        influencer_id: DbId,
        status: Option<AdRequestStatus>,
    ) -> Result<Vec<AdRequestDetail>, sqlx::Error> {
        let query = format!(
            "SELECT {DETAIL_SELECT} {DETAIL_FROM}
             WHERE ar.influencer_id = $1
               AND ($2::TEXT IS NULL OR ar.status = $2)
             ORDER BY ar.created_at DESC, ar.id DESC"
        );
        sqlx::query_as::<_, AdRequestDetail>(&query)
            .bind(influencer_id)
            .bind(status.map(|s| s.as_str()))
            .fetch_all(pool)
            .await
    }

    /// One page of influencer-initiated requests on a campaign in `status`,
    /// newest first, with the total number of matches.
    pub async fn list_applications(
        pool: &PgPool,
        campaign_id: DbId,
        status: AdRequestStatus,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<AdRequestDetail>, i64), sqlx::Error> {
        let query = format!(
            "SELECT {DETAIL_SELECT} {DETAIL_FROM}
             WHERE ar.campaign_id = $1
               AND ar.initiator_id = ar.influencer_id
               AND ar.status = $2
             ORDER BY ar.created_at DESC, ar.id DESC
             LIMIT $3 OFFSET $4"
        );
        let items = sqlx::query_as::<_, AdRequestDetail>(&query)
            .bind(campaign_id)
            .bind(status.as_str())
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM ad_requests
             WHERE campaign_id = $1 AND initiator_id = influencer_id AND status = $2",
        )
        .bind(campaign_id)
        .bind(status.as_str())
        .fetch_one(pool)
        .await?;

        Ok((items, total))
    }
}

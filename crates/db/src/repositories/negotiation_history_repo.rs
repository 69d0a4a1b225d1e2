//! Repository for the `negotiation_history` ledger.
//!
//! Append-only: there is no update or delete. Entries disappear only when
//! their ad request is deleted (`ON DELETE CASCADE`).

use sponnect_core::types::DbId;
use sqlx::PgPool;

use crate::models::negotiation_history::{
    CreateNegotiationEntry, NegotiationEntry, NegotiationEntryView, NegotiationSummary,
    NegotiationSummaryRow,
};
use crate::repositories::ad_request_repo::{DETAIL_FROM, DETAIL_SELECT};

/// Column list for negotiation_history queries.
const COLUMNS: &str = "id, ad_request_id, user_id, user_role, action, message, payment_amount, \
    requirements, created_at";

/// Latest ledger entry per ad request, for the summary joins.
const LATEST_PER_REQUEST: &str = "SELECT DISTINCT ON (ad_request_id) \
        ad_request_id, user_role, action, message, payment_amount, created_at \
    FROM negotiation_history \
    ORDER BY ad_request_id, created_at DESC, id DESC";

/// Provides append and read access to the negotiation ledger.
pub struct NegotiationHistoryRepo;

impl NegotiationHistoryRepo {
    /// Append one entry inside the transaction that applies the transition.
    pub async fn append(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        input: &CreateNegotiationEntry,
    ) -> Result<NegotiationEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO negotiation_history (ad_request_id, user_id, user_role, action, \
                 message, payment_amount, requirements)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, NegotiationEntry>(&query)
            .bind(input.ad_request_id)
            .bind(input.user_id)
            .bind(input.user_role.as_str())
            .bind(input.action.as_str())
            .bind(&input.message)
            .bind(input.payment_amount)
            .bind(&input.requirements)
            .fetch_one(&mut **tx)
            .await
    }

    /// The full history of an ad request, oldest first.
    pub async fn list_for_ad_request(
        pool: &PgPool,
        ad_request_id: DbId,
    ) -> Result<Vec<NegotiationEntryView>, sqlx::Error> {
        sqlx::query_as::<_, NegotiationEntryView>(
            "SELECT h.id, h.ad_request_id, h.user_id, h.user_role, h.action, h.message, \
                    h.payment_amount, h.requirements, h.created_at, u.username
             FROM negotiation_history h
             JOIN users u ON u.id = h.user_id
             WHERE h.ad_request_id = $1
             ORDER BY h.created_at ASC, h.id ASC",
        )
        .bind(ad_request_id)
        .fetch_all(pool)
        .await
    }

    pub async fn count_for_ad_request(
        pool: &PgPool,
        ad_request_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM negotiation_history WHERE ad_request_id = $1")
            .bind(ad_request_id)
            .fetch_one(pool)
            .await
    }

    /// Each thread on a campaign with its most recent ledger entry, most
    /// recently active first.
    pub async fn latest_for_campaign(
        pool: &PgPool,
        campaign_id: DbId,
    ) -> Result<Vec<NegotiationSummary>, sqlx::Error> {
        Self::latest_where(pool, "ar.campaign_id = $1", campaign_id).await
    }

    /// Each thread of an influencer with its most recent ledger entry, most
    /// recently active first.
    pub async fn latest_for_influencer(
        pool: &PgPool,
        influencer_id: DbId,
    ) -> Result<Vec<NegotiationSummary>, sqlx::Error> {
        Self::latest_where(pool, "ar.influencer_id = $1", influencer_id).await
    }

    async fn latest_where(
        pool: &PgPool,
        predicate: &str,
        id: DbId,
    ) -> Result<Vec<NegotiationSummary>, sqlx::Error> {
        let query = format!(
            "SELECT {DETAIL_SELECT},
                    l.user_role AS latest_user_role,
                    l.action AS latest_action,
                    l.message AS latest_message,
                    l.payment_amount AS latest_payment_amount,
                    l.created_at AS latest_created_at
             {DETAIL_FROM}
             JOIN ({LATEST_PER_REQUEST}) l ON l.ad_request_id = ar.id
             WHERE {predicate}
             ORDER BY l.created_at DESC, ar.id DESC"
        );
        let rows = sqlx::query_as::<_, NegotiationSummaryRow>(&query)
            .bind(id)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(NegotiationSummary::from).collect())
    }
}

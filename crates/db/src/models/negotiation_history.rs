//! Negotiation history (ledger) model and DTOs.
//!
//! Rows are append-only: there is no update DTO.

use serde::Serialize;
use sponnect_core::negotiation::{LedgerAction, Party};
use sponnect_core::types::{DbId, Timestamp};
use sqlx::FromRow;

use crate::models::ad_request::AdRequestDetail;

/// A row from the `negotiation_history` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct NegotiationEntry {
    pub id: DbId,
    pub ad_request_id: DbId,
    pub user_id: DbId,
    pub user_role: String,
    pub action: String,
    pub message: Option<String>,
    pub payment_amount: Option<f64>,
    pub requirements: Option<String>,
    pub created_at: Timestamp,
}

/// A ledger entry with the acting user's username, as shown in history views.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct NegotiationEntryView {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub entry: NegotiationEntry,
    pub username: String,
}

/// DTO for appending a ledger entry. The action and role are typed so only
/// recognised values reach the table.
#[derive(Debug)]
pub struct CreateNegotiationEntry {
    pub ad_request_id: DbId,
    pub user_id: DbId,
    pub user_role: Party,
    pub action: LedgerAction,
    pub message: Option<String>,
    pub payment_amount: Option<f64>,
    pub requirements: Option<String>,
}

/// The most recent ledger entry of a thread.
#[derive(Debug, Clone, Serialize)]
pub struct LatestAction {
    pub user_role: String,
    pub action: String,
    pub message: Option<String>,
    pub payment_amount: Option<f64>,
    pub created_at: Timestamp,
}

/// One thread in a negotiation summary: the request and its latest step.
#[derive(Debug, Clone, Serialize)]
pub struct NegotiationSummary {
    pub ad_request: AdRequestDetail,
    pub latest_action: LatestAction,
}

/// Flat row produced by the summary queries.
#[derive(Debug, FromRow)]
pub struct NegotiationSummaryRow {
    #[sqlx(flatten)]
    pub ad_request: AdRequestDetail,
    pub latest_user_role: String,
    pub latest_action: String,
    pub latest_message: Option<String>,
    pub latest_payment_amount: Option<f64>,
    pub latest_created_at: Timestamp,
}

impl From<NegotiationSummaryRow> for NegotiationSummary {
    fn from(row: NegotiationSummaryRow) -> Self {
        Self {
            ad_request: row.ad_request,
            latest_action: LatestAction {
                user_role: row.latest_user_role,
                action: row.latest_action,
                message: row.latest_message,
                payment_amount: row.latest_payment_amount,
                created_at: row.latest_created_at,
            },
        }
    }
}

//! Read surfaces over the negotiation ledger.

use axum::extract::{Path, State};
use axum::Json;
use sponnect_core::error::CoreError;
use sponnect_core::roles::Role;
use sponnect_core::types::DbId;
use sponnect_db::models::negotiation_history::{NegotiationEntryView, NegotiationSummary};
use sponnect_db::repositories::{AdRequestRepo, NegotiationHistoryRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::campaigns::find_owned_campaign;
use crate::middleware::rbac::{RequireAuth, RequireInfluencer, RequireSponsor};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/ad_requests/{id}/history
///
/// Full ledger of one thread, oldest first. Visible to the two participants
/// and to admins; everyone else gets not-found.
pub async fn get_history(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(ad_request_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<NegotiationEntryView>>>> {
    let visible = AdRequestRepo::find_owned(&state.pool, ad_request_id)
        .await?
        .is_some_and(|owned| user.role == Role::Admin || owned.party_of(user.user_id).is_some());
    if !visible {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "AdRequest",
            id: ad_request_id,
        }));
    }

    let history = NegotiationHistoryRepo::list_for_ad_request(&state.pool, ad_request_id).await?;
    Ok(Json(DataResponse { data: history }))
}

/// GET /api/v1/sponsor/campaigns/{id}/negotiation_summary
///
/// Every thread on the campaign with its latest ledger entry.
pub async fn campaign_negotiation_summary(
    RequireSponsor(sponsor): RequireSponsor,
    State(state): State<AppState>,
    Path(campaign_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<NegotiationSummary>>>> {
    find_owned_campaign(&state, campaign_id, sponsor.user_id).await?;

    let summary = NegotiationHistoryRepo::latest_for_campaign(&state.pool, campaign_id).await?;
    Ok(Json(DataResponse { data: summary }))
}

/// GET /api/v1/influencer/negotiations
///
/// Every thread of the influencer with its latest ledger entry.
pub async fn influencer_negotiations(
    RequireInfluencer(influencer): RequireInfluencer,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<NegotiationSummary>>>> {
    let summary =
        NegotiationHistoryRepo::latest_for_influencer(&state.pool, influencer.user_id).await?;
    Ok(Json(DataResponse { data: summary }))
}

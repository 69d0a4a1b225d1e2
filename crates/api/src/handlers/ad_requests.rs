//! Handlers for ad request threads from both sides.
//!
//! Sponsor endpoints live under `/sponsor`, influencer endpoints under
//! `/influencer`. Every state change goes through [`crate::engine::negotiation`].

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use sponnect_core::negotiation::{parse_status_filter, OfferInput};
use sponnect_core::types::DbId;
use sponnect_db::models::ad_request::{AdRequest, AdRequestDetail, AdRequestFilter};
use sponnect_db::repositories::AdRequestRepo;

use crate::engine::negotiation::{self, Actor};
use crate::error::AppResult;
use crate::middleware::rbac::{RequireInfluencer, RequireSponsor};
use crate::query::StatusFilterParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /sponsor/campaigns/{id}/ad_requests`.
#[derive(Debug, Deserialize)]
pub struct CreateOfferRequest {
    pub influencer_id: DbId,
    #[serde(flatten)]
    pub offer: OfferInput,
}

/// Request body for responding to an offer (either side).
#[derive(Debug, Deserialize)]
pub struct RespondRequest {
    /// `accept`, `reject` or `negotiate`.
    #[serde(default)]
    pub action: String,
    #[serde(flatten)]
    pub offer: OfferInput,
}

/// Query parameters for `GET /sponsor/ad_requests`.
#[derive(Debug, Default, Deserialize)]
pub struct SponsorAdRequestParams {
    pub status: Option<String>,
    pub campaign_id: Option<DbId>,
}

// ---------------------------------------------------------------------------
// Sponsor side
// ---------------------------------------------------------------------------

/// POST /api/v1/sponsor/campaigns/{id}/ad_requests
///
/// Send a direct offer to an influencer for one of the sponsor's campaigns.
pub async fn create_offer(
    RequireSponsor(sponsor): RequireSponsor,
    State(state): State<AppState>,
    Path(campaign_id): Path<DbId>,
    Json(input): Json<CreateOfferRequest>,
) -> AppResult<impl IntoResponse> {
    let ad_request = negotiation::create_offer(
        &state.pool,
        sponsor.user_id,
        campaign_id,
        input.influencer_id,
        input.offer,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: ad_request })))
}

/// GET /api/v1/sponsor/ad_requests?status=&campaign_id=
pub async fn list_sponsor_ad_requests(
    RequireSponsor(sponsor): RequireSponsor,
    State(state): State<AppState>,
    Query(params): Query<SponsorAdRequestParams>,
) -> AppResult<Json<DataResponse<Vec<AdRequestDetail>>>> {
    let filter = AdRequestFilter {
        status: parse_status_filter(params.status.as_deref())?,
        campaign_id: params.campaign_id,
    };
    let items = AdRequestRepo::list_for_sponsor(&state.pool, sponsor.user_id, filter).await?;
    Ok(Json(DataResponse { data: items }))
}

/// PUT /api/v1/sponsor/ad_requests/{id}
///
/// Accept, reject, or counter the influencer's latest offer.
pub async fn sponsor_respond(
    RequireSponsor(sponsor): RequireSponsor,
    State(state): State<AppState>,
    Path(ad_request_id): Path<DbId>,
    Json(input): Json<RespondRequest>,
) -> AppResult<Json<DataResponse<AdRequest>>> {
    let ad_request = negotiation::respond(
        &state.pool,
        Actor::sponsor(sponsor.user_id),
        ad_request_id,
        &input.action,
        input.offer,
    )
    .await?;

    Ok(Json(DataResponse { data: ad_request }))
}

/// DELETE /api/v1/sponsor/ad_requests/{id}
///
/// Only Pending or Rejected requests may be deleted.
pub async fn delete_ad_request(
    RequireSponsor(sponsor): RequireSponsor,
    State(state): State<AppState>,
    Path(ad_request_id): Path<DbId>,
) -> AppResult<StatusCode> {
    negotiation::delete_ad_request(&state.pool, sponsor.user_id, ad_request_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Influencer side
// ---------------------------------------------------------------------------

/// GET /api/v1/influencer/ad_requests?status=
pub async fn list_influencer_ad_requests(
    RequireInfluencer(influencer): RequireInfluencer,
    State(state): State<AppState>,
    Query(params): Query<StatusFilterParams>,
) -> AppResult<Json<DataResponse<Vec<AdRequestDetail>>>> {
    let status = parse_status_filter(params.status.as_deref())?;
    let items = AdRequestRepo::list_for_influencer(&state.pool, influencer.user_id, status).await?;
    Ok(Json(DataResponse { data: items }))
}

/// PATCH /api/v1/influencer/ad_requests/{id}
///
/// Accept, reject, or counter the sponsor's latest offer. Influencer
/// counter-offers may change payment and message but not requirements.
pub async fn influencer_respond(
    RequireInfluencer(influencer): RequireInfluencer,
    State(state): State<AppState>,
    Path(ad_request_id): Path<DbId>,
    Json(input): Json<RespondRequest>,
) -> AppResult<Json<DataResponse<AdRequest>>> {
    let ad_request = negotiation::respond(
        &state.pool,
        Actor::influencer(influencer.user_id),
        ad_request_id,
        &input.action,
        input.offer,
    )
    .await?;

    Ok(Json(DataResponse { data: ad_request }))
}

/// POST /api/v1/influencer/campaigns/{id}/apply
///
/// Apply to a public campaign. Message and requirements fall back to
/// generic text when omitted.
pub async fn apply_to_campaign(
    RequireInfluencer(influencer): RequireInfluencer,
    State(state): State<AppState>,
    Path(campaign_id): Path<DbId>,
    Json(input): Json<OfferInput>,
) -> AppResult<impl IntoResponse> {
    let ad_request =
        negotiation::apply_to_campaign(&state.pool, influencer.user_id, campaign_id, input)
            .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: ad_request })))
}

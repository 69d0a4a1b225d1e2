//! Handlers for influencer applications as seen by the campaign's sponsor.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use sponnect_core::negotiation::{parse_status_filter, AdRequestStatus, ApplicationDecision};
use sponnect_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use sponnect_core::types::DbId;
use sponnect_db::models::ad_request::{AdRequest, AdRequestDetail};
use sponnect_db::repositories::AdRequestRepo;

use crate::engine::negotiation;
use crate::error::AppResult;
use crate::handlers::campaigns::find_owned_campaign;
use crate::middleware::rbac::RequireSponsor;
use crate::response::{DataResponse, Page};
use crate::state::AppState;

/// Query parameters for `GET /sponsor/campaigns/{id}/applications`.
#[derive(Debug, Default, Deserialize)]
pub struct ApplicationListParams {
    /// Defaults to `Pending`.
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// GET /api/v1/sponsor/campaigns/{id}/applications?status=&limit=&offset=
///
/// Influencer-initiated requests on one of the sponsor's campaigns.
pub async fn list_applications(
    RequireSponsor(sponsor): RequireSponsor,
    State(state): State<AppState>,
    Path(campaign_id): Path<DbId>,
    Query(params): Query<ApplicationListParams>,
) -> AppResult<Json<DataResponse<Page<AdRequestDetail>>>> {
    find_owned_campaign(&state, campaign_id, sponsor.user_id).await?;

    let status =
        parse_status_filter(params.status.as_deref())?.unwrap_or(AdRequestStatus::Pending);
    let limit = clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT);
    let offset = clamp_offset(params.offset);

    let (items, total) =
        AdRequestRepo::list_applications(&state.pool, campaign_id, status, limit, offset).await?;

    Ok(Json(DataResponse {
        data: Page {
            items,
            total,
            limit,
            offset,
        },
    }))
}

/// PATCH /api/v1/sponsor/applications/{id}/accept
pub async fn accept_application(
    RequireSponsor(sponsor): RequireSponsor,
    State(state): State<AppState>,
    Path(ad_request_id): Path<DbId>,
) -> AppResult<Json<DataResponse<AdRequest>>> {
    let ad_request = negotiation::decide_application(
        &state.pool,
        sponsor.user_id,
        ad_request_id,
        ApplicationDecision::Accept,
    )
    .await?;
    Ok(Json(DataResponse { data: ad_request }))
}

/// PATCH /api/v1/sponsor/applications/{id}/reject
pub async fn reject_application(
    RequireSponsor(sponsor): RequireSponsor,
    State(state): State<AppState>,
    Path(ad_request_id): Path<DbId>,
) -> AppResult<Json<DataResponse<AdRequest>>> {
    let ad_request = negotiation::decide_application(
        &state.pool,
        sponsor.user_id,
        ad_request_id,
        ApplicationDecision::Reject,
    )
    .await?;
    Ok(Json(DataResponse { data: ad_request }))
}

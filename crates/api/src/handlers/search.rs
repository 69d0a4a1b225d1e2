//! Discovery endpoints available to any authenticated user.

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use sponnect_core::campaign::validate_budget;
use sponnect_core::directory::validate_reach;
use sponnect_core::pagination::{clamp_limit, SEARCH_RESULT_CAP};
use sponnect_db::models::campaign::Campaign;
use sponnect_db::models::user::InfluencerCard;
use sponnect_db::repositories::{CampaignRepo, UserRepo};

use crate::error::AppResult;
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct InfluencerSearchParams {
    /// Case-insensitive substring.
    pub niche: Option<String>,
    /// Exact match.
    pub category: Option<String>,
    pub reach_min: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CampaignSearchParams {
    pub budget_min: Option<f64>,
    pub limit: Option<i64>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// GET /api/v1/search/influencers?niche=&category=&reach_min=
///
/// Active, unflagged influencers ordered by reach.
pub async fn search_influencers(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Query(params): Query<InfluencerSearchParams>,
) -> AppResult<Json<DataResponse<Vec<InfluencerCard>>>> {
    if let Some(reach_min) = params.reach_min {
        validate_reach(reach_min)?;
    }
    let niche = non_empty(params.niche);
    let category = non_empty(params.category);
    let limit = clamp_limit(params.limit, SEARCH_RESULT_CAP, SEARCH_RESULT_CAP);

    let results = UserRepo::search_influencers(
        &state.pool,
        niche.as_deref(),
        category.as_deref(),
        params.reach_min,
        limit,
    )
    .await?;

    Ok(Json(DataResponse { data: results }))
}

/// GET /api/v1/search/campaigns?budget_min=
///
/// Public, unflagged campaigns, newest first.
pub async fn search_campaigns(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Query(params): Query<CampaignSearchParams>,
) -> AppResult<Json<DataResponse<Vec<Campaign>>>> {
    if let Some(budget_min) = params.budget_min {
        validate_budget(budget_min)?;
    }
    let limit = clamp_limit(params.limit, SEARCH_RESULT_CAP, SEARCH_RESULT_CAP);

    let results = CampaignRepo::search_public(&state.pool, params.budget_min, limit).await?;
    Ok(Json(DataResponse { data: results }))
}

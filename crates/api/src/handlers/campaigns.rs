//! Handlers for sponsor-owned campaigns (`/sponsor/campaigns`).
//!
//! All endpoints require the sponsor role. A campaign owned by someone else
//! is reported as not found.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use sponnect_core::campaign::{validate_budget, validate_dates, validate_name, Visibility};
use sponnect_core::error::CoreError;
use sponnect_core::types::{DbId, Timestamp};
use sponnect_db::models::campaign::{Campaign, CreateCampaign, UpdateCampaign};
use sponnect_db::repositories::CampaignRepo;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireSponsor;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /sponsor/campaigns`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCampaignRequest {
    #[validate(length(min = 1, max = 200, message = "must be 1 to 200 characters"))]
    pub name: String,
    pub description: Option<String>,
    pub goals: Option<String>,
    #[validate(range(min = 0.0, message = "must not be negative"))]
    pub budget: f64,
    pub start_date: Timestamp,
    pub end_date: Option<Timestamp>,
    /// `public` or `private`.
    pub visibility: String,
}

/// Request body for `PUT /sponsor/campaigns/{id}`. All fields optional.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCampaignRequest {
    #[validate(length(min = 1, max = 200, message = "must be 1 to 200 characters"))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub goals: Option<String>,
    #[validate(range(min = 0.0, message = "must not be negative"))]
    pub budget: Option<f64>,
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
    pub visibility: Option<String>,
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Campaign",
        id,
    })
}

/// Load a campaign only if the sponsor owns it.
pub(crate) async fn find_owned_campaign(
    state: &AppState,
    campaign_id: DbId,
    sponsor_id: DbId,
) -> AppResult<Campaign> {
    CampaignRepo::find_owned(&state.pool, campaign_id, sponsor_id)
        .await?
        .ok_or_else(|| not_found(campaign_id))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/sponsor/campaigns
pub async fn create_campaign(
    RequireSponsor(sponsor): RequireSponsor,
    State(state): State<AppState>,
    Json(input): Json<CreateCampaignRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    validate_name(&input.name)?;
    validate_budget(input.budget)?;
    validate_dates(input.start_date, input.end_date)?;
    let visibility = Visibility::from_str_db(&input.visibility)?;

    let campaign = CampaignRepo::create(
        &state.pool,
        &CreateCampaign {
            sponsor_id: sponsor.user_id,
            name: input.name.trim().to_string(),
            description: input.description,
            goals: input.goals,
            budget: input.budget,
            start_date: input.start_date,
            end_date: input.end_date,
            visibility,
        },
    )
    .await?;

    tracing::info!(
        campaign_id = campaign.id,
        sponsor_id = sponsor.user_id,
        visibility = visibility.as_str(),
        "Campaign created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: campaign })))
}

/// GET /api/v1/sponsor/campaigns
pub async fn list_campaigns(
    RequireSponsor(sponsor): RequireSponsor,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Campaign>>>> {
    let campaigns = CampaignRepo::list_for_sponsor(&state.pool, sponsor.user_id).await?;
    Ok(Json(DataResponse { data: campaigns }))
}

/// GET /api/v1/sponsor/campaigns/{id}
pub async fn get_campaign(
    RequireSponsor(sponsor): RequireSponsor,
    State(state): State<AppState>,
    Path(campaign_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Campaign>>> {
    let campaign = find_owned_campaign(&state, campaign_id, sponsor.user_id).await?;
    Ok(Json(DataResponse { data: campaign }))
}

/// PUT /api/v1/sponsor/campaigns/{id}
///
/// Partial update. Dates are validated against the merged result.
pub async fn update_campaign(
    RequireSponsor(sponsor): RequireSponsor,
    State(state): State<AppState>,
    Path(campaign_id): Path<DbId>,
    Json(input): Json<UpdateCampaignRequest>,
) -> AppResult<Json<DataResponse<Campaign>>> {
    input.validate()?;
    let current = find_owned_campaign(&state, campaign_id, sponsor.user_id).await?;

    if let Some(name) = &input.name {
        validate_name(name)?;
    }
    if let Some(budget) = input.budget {
        validate_budget(budget)?;
    }
    validate_dates(
        input.start_date.unwrap_or(current.start_date),
        input.end_date.or(current.end_date),
    )?;
    let visibility = input
        .visibility
        .as_deref()
        .map(Visibility::from_str_db)
        .transpose()?;

    let update = UpdateCampaign {
        name: input.name.map(|n| n.trim().to_string()),
        description: input.description,
        goals: input.goals,
        budget: input.budget,
        start_date: input.start_date,
        end_date: input.end_date,
        visibility,
    };

    let campaign = CampaignRepo::update(&state.pool, campaign_id, sponsor.user_id, &update)
        .await?
        .ok_or_else(|| not_found(campaign_id))?;

    tracing::info!(campaign_id, sponsor_id = sponsor.user_id, "Campaign updated");

    Ok(Json(DataResponse { data: campaign }))
}

/// DELETE /api/v1/sponsor/campaigns/{id}
///
/// Deletes the campaign together with its ad requests and their history.
pub async fn delete_campaign(
    RequireSponsor(sponsor): RequireSponsor,
    State(state): State<AppState>,
    Path(campaign_id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = CampaignRepo::delete(&state.pool, campaign_id, sponsor.user_id).await?;
    if !deleted {
        return Err(not_found(campaign_id));
    }

    tracing::info!(campaign_id, sponsor_id = sponsor.user_id, "Campaign deleted");

    Ok(StatusCode::NO_CONTENT)
}

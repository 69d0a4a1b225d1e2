//! Handlers for the caller's own profile and public influencer profiles.

use axum::extract::{Path, State};
use axum::Json;
use sponnect_core::directory::validate_reach;
use sponnect_core::error::CoreError;
use sponnect_core::roles::Role;
use sponnect_core::types::DbId;
use sponnect_db::models::user::{InfluencerCard, UpdateProfile, UserProfile};
use sponnect_db::repositories::UserRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/profile
pub async fn get_profile(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<UserProfile>>> {
    let row = UserRepo::find_by_id(&state.pool, user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user.user_id,
        }))?;

    Ok(Json(DataResponse {
        data: UserProfile::from(&row),
    }))
}

/// PUT /api/v1/profile
///
/// Update role-specific profile fields. Fields that belong to another role
/// are dropped; admins have no editable profile fields.
pub async fn update_profile(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(input): Json<UpdateProfile>,
) -> AppResult<Json<DataResponse<UserProfile>>> {
    let update = match user.role {
        Role::Sponsor => UpdateProfile {
            company_name: input.company_name,
            industry: input.industry,
            ..Default::default()
        },
        Role::Influencer => {
            if let Some(reach) = input.reach {
                validate_reach(reach)?;
            }
            UpdateProfile {
                influencer_name: input.influencer_name,
                category: input.category,
                niche: input.niche,
                reach: input.reach,
                ..Default::default()
            }
        }
        Role::Admin => UpdateProfile::default(),
    };

    let row = UserRepo::update_profile(&state.pool, user.user_id, &update)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user.user_id,
        }))?;

    tracing::info!(user_id = user.user_id, "Profile updated");

    Ok(Json(DataResponse {
        data: UserProfile::from(&row),
    }))
}

/// GET /api/v1/influencers/{id}/profile
///
/// Public card of an active influencer.
pub async fn get_influencer_profile(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(influencer_id): Path<DbId>,
) -> AppResult<Json<DataResponse<InfluencerCard>>> {
    let card = UserRepo::find_active_influencer(&state.pool, influencer_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Influencer",
            id: influencer_id,
        }))?;

    Ok(Json(DataResponse { data: card }))
}

//! Handlers for platform moderation (`/admin`).
//!
//! All endpoints require the admin role. Admin accounts themselves are never
//! listed, flagged, or (de)activated.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use sponnect_core::directory::{
    ensure_can_activate, ensure_can_approve_sponsor, ensure_can_deactivate,
    ensure_can_reject_sponsor, ensure_moderatable, AccountStatusFilter,
};
use sponnect_core::error::CoreError;
use sponnect_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use sponnect_core::roles::Role;
use sponnect_core::types::DbId;
use sponnect_db::models::campaign::Campaign;
use sponnect_db::models::user::{AdminStats, User, UserListFilter, UserProfile};
use sponnect_db::repositories::{CampaignRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::{DataResponse, Page};
use crate::state::AppState;

/// Query parameters for `GET /admin/users`.
#[derive(Debug, Default, Deserialize)]
pub struct UserListParams {
    /// `sponsor` or `influencer`.
    pub role: Option<String>,
    pub flagged: Option<bool>,
    /// `active`, `inactive`, `pending_approval` or `approved`.
    pub status: Option<String>,
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

fn user_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "User", id })
}

async fn load_user(state: &AppState, user_id: DbId) -> AppResult<User> {
    UserRepo::find_by_id(&state.pool, user_id)
        .await?
        .ok_or_else(|| user_not_found(user_id))
}

/// Translate query parameters into a repository filter.
fn build_user_filter(params: UserListParams) -> AppResult<UserListFilter> {
    let role = match params.role.as_deref().filter(|r| !r.is_empty()) {
        Some(raw) => {
            let role = Role::from_str_db(raw)?;
            if role == Role::Admin {
                return Err(AppError::Core(CoreError::Validation(
                    "role filter must be sponsor or influencer".into(),
                )));
            }
            Some(role)
        }
        None => None,
    };

    let (is_active, sponsor_approved) = match params.status.as_deref().filter(|s| !s.is_empty()) {
        None => (None, None),
        Some(raw) => match AccountStatusFilter::from_str_db(raw)? {
            AccountStatusFilter::Active => (Some(true), None),
            AccountStatusFilter::Inactive => (Some(false), None),
            AccountStatusFilter::PendingApproval => (Some(true), Some(false)),
            AccountStatusFilter::Approved => (Some(true), Some(true)),
        },
    };

    Ok(UserListFilter {
        role,
        flagged: params.flagged,
        is_active,
        sponsor_approved,
        search: params
            .search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()),
    })
}

// ---------------------------------------------------------------------------
// Overview
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/stats
pub async fn get_stats(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<AdminStats>>> {
    let stats = UserRepo::stats(&state.pool).await?;
    Ok(Json(DataResponse { data: stats }))
}

/// GET /api/v1/admin/users?role=&flagged=&status=&search=&limit=&offset=
pub async fn list_users(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<UserListParams>,
) -> AppResult<Json<DataResponse<Page<UserProfile>>>> {
    let limit = clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT);
    let offset = clamp_offset(params.offset);
    let filter = build_user_filter(params)?;

    let (users, total) = UserRepo::list_filtered(&state.pool, &filter, limit, offset).await?;

    Ok(Json(DataResponse {
        data: Page {
            items: users.iter().map(UserProfile::from).collect(),
            total,
            limit,
            offset,
        },
    }))
}

// ---------------------------------------------------------------------------
// Sponsor approval
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/sponsors/pending
pub async fn list_pending_sponsors(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<UserProfile>>>> {
    let sponsors = UserRepo::list_pending_sponsors(&state.pool).await?;
    Ok(Json(DataResponse {
        data: sponsors.iter().map(UserProfile::from).collect(),
    }))
}

/// PATCH /api/v1/admin/sponsors/{id}/approve
pub async fn approve_sponsor(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<Json<DataResponse<UserProfile>>> {
    let user = load_user(&state, user_id).await?;
    ensure_can_approve_sponsor(user.flags()?)?;

    let updated = UserRepo::approve_sponsor(&state.pool, user_id)
        .await?
        .ok_or_else(|| user_not_found(user_id))?;

    tracing::info!(user_id, admin_id = admin.user_id, "Sponsor approved");

    Ok(Json(DataResponse {
        data: UserProfile::from(&updated),
    }))
}

/// PATCH /api/v1/admin/sponsors/{id}/reject
///
/// Deactivates the sponsor; the approval flag stays false.
pub async fn reject_sponsor(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<Json<DataResponse<UserProfile>>> {
    let user = load_user(&state, user_id).await?;
    ensure_can_reject_sponsor(user.flags()?)?;

    let updated = UserRepo::reject_sponsor(&state.pool, user_id)
        .await?
        .ok_or_else(|| user_not_found(user_id))?;

    tracing::info!(user_id, admin_id = admin.user_id, "Sponsor rejected");

    Ok(Json(DataResponse {
        data: UserProfile::from(&updated),
    }))
}

// ---------------------------------------------------------------------------
// User moderation
// ---------------------------------------------------------------------------

async fn set_user_flag(
    state: &AppState,
    admin_id: DbId,
    user_id: DbId,
    flagged: bool,
) -> AppResult<UserProfile> {
    let user = load_user(state, user_id).await?;
    ensure_moderatable(user.flags()?)?;

    let updated = UserRepo::set_flagged(&state.pool, user_id, flagged)
        .await?
        .ok_or_else(|| user_not_found(user_id))?;

    tracing::info!(user_id, admin_id, flagged, "User flag changed");
    Ok(UserProfile::from(&updated))
}

/// PATCH /api/v1/admin/users/{id}/flag
pub async fn flag_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<Json<DataResponse<UserProfile>>> {
    let data = set_user_flag(&state, admin.user_id, user_id, true).await?;
    Ok(Json(DataResponse { data }))
}

/// PATCH /api/v1/admin/users/{id}/unflag
pub async fn unflag_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<Json<DataResponse<UserProfile>>> {
    let data = set_user_flag(&state, admin.user_id, user_id, false).await?;
    Ok(Json(DataResponse { data }))
}

/// PATCH /api/v1/admin/users/{id}/activate
pub async fn activate_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<Json<DataResponse<UserProfile>>> {
    let user = load_user(&state, user_id).await?;
    ensure_can_activate(user.flags()?)?;

    let updated = UserRepo::set_active(&state.pool, user_id, true)
        .await?
        .ok_or_else(|| user_not_found(user_id))?;

    tracing::info!(user_id, admin_id = admin.user_id, "User activated");

    Ok(Json(DataResponse {
        data: UserProfile::from(&updated),
    }))
}

/// PATCH /api/v1/admin/users/{id}/deactivate
pub async fn deactivate_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<Json<DataResponse<UserProfile>>> {
    let user = load_user(&state, user_id).await?;
    ensure_can_deactivate(user.flags()?)?;

    let updated = UserRepo::set_active(&state.pool, user_id, false)
        .await?
        .ok_or_else(|| user_not_found(user_id))?;

    tracing::info!(user_id, admin_id = admin.user_id, "User deactivated");

    Ok(Json(DataResponse {
        data: UserProfile::from(&updated),
    }))
}

// ---------------------------------------------------------------------------
// Campaign moderation
// ---------------------------------------------------------------------------

async fn set_campaign_flag(
    state: &AppState,
    admin_id: DbId,
    campaign_id: DbId,
    flagged: bool,
) -> AppResult<Campaign> {
    let campaign = CampaignRepo::set_flagged(&state.pool, campaign_id, flagged)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Campaign",
            id: campaign_id,
        }))?;

    tracing::info!(campaign_id, admin_id, flagged, "Campaign flag changed");
    Ok(campaign)
}

/// PATCH /api/v1/admin/campaigns/{id}/flag
pub async fn flag_campaign(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(campaign_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Campaign>>> {
    let data = set_campaign_flag(&state, admin.user_id, campaign_id, true).await?;
    Ok(Json(DataResponse { data }))
}

/// PATCH /api/v1/admin/campaigns/{id}/unflag
pub async fn unflag_campaign(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(campaign_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Campaign>>> {
    let data = set_campaign_flag(&state, admin.user_id, campaign_id, false).await?;
    Ok(Json(DataResponse { data }))
}

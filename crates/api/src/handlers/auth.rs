//! Handlers for the `/auth` resource (register, login).

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use sponnect_core::directory::{
    ensure_can_login, initial_approval, validate_password, validate_reach,
    validate_registration_role,
};
use sponnect_core::error::CoreError;
use sponnect_core::roles::Role;
use sponnect_core::types::DbId;
use sponnect_db::models::user::{CreateUser, UserProfile};
use sponnect_db::repositories::UserRepo;
use validator::Validate;

use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Role assumed when registration omits one.
const DEFAULT_REGISTRATION_ROLE: Role = Role::Influencer;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 50, message = "must be 3 to 50 characters"))]
    pub username: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    pub password: String,
    /// `sponsor` or `influencer`; defaults to `influencer`.
    pub role: Option<String>,
    pub company_name: Option<String>,
    pub industry: Option<String>,
    pub influencer_name: Option<String>,
    pub category: Option<String>,
    pub niche: Option<String>,
    pub reach: Option<i64>,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Username or email address.
    pub username: String,
    pub password: String,
}

/// Successful login response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user_role: String,
    pub user_id: DbId,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/register
///
/// Create a sponsor or influencer account. Sponsors start unapproved and
/// cannot log in until an admin approves them.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    validate_password(&input.password)?;

    let role = match input.role.as_deref() {
        Some(raw) => Role::from_str_db(raw)?,
        None => DEFAULT_REGISTRATION_ROLE,
    };
    validate_registration_role(role)?;
    if let Some(reach) = input.reach {
        validate_reach(reach)?;
    }

    let password_hash = hash_password(&input.password)?;

    let is_sponsor = role == Role::Sponsor;
    let is_influencer = role == Role::Influencer;
    let create = CreateUser {
        username: input.username.trim().to_string(),
        email: input.email.trim().to_lowercase(),
        password_hash,
        role,
        sponsor_approved: initial_approval(role),
        company_name: input.company_name.filter(|_| is_sponsor),
        industry: input.industry.filter(|_| is_sponsor),
        influencer_name: input.influencer_name.filter(|_| is_influencer),
        category: input.category.filter(|_| is_influencer),
        niche: input.niche.filter(|_| is_influencer),
        reach: input.reach.filter(|_| is_influencer),
    };

    let user = UserRepo::create(&state.pool, &create).await?;

    tracing::info!(user_id = user.id, role = role.as_str(), "User registered");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: UserProfile::from(&user),
        }),
    ))
}

/// POST /api/v1/auth/login
///
/// Authenticate with username (or email) and password. Returns an access token.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let invalid = || AppError::Core(CoreError::Unauthorized("Invalid credentials".into()));

    let user = UserRepo::find_by_login(&state.pool, input.username.trim())
        .await?
        .ok_or_else(invalid)?;

    if !verify_password(&input.password, &user.password_hash)? {
        tracing::debug!(user_id = user.id, "Login rejected: wrong password");
        return Err(invalid());
    }

    let flags = user.flags()?;
    ensure_can_login(flags)?;

    let issued = state.config.jwt.issue(user.id, flags.role)?;

    tracing::info!(
        user_id = user.id,
        role = flags.role.as_str(),
        jti = %issued.jti,
        "User logged in",
    );

    Ok(Json(LoginResponse {
        access_token: issued.token,
        expires_in: issued.expires_in,
        user_role: flags.role.as_str().to_string(),
        user_id: user.id,
    }))
}

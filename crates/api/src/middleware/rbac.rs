//! Role-gated extractors.
//!
//! Each wraps [`AuthUser`] and answers 403 when the token's role differs.
//! Admins do not pass the sponsor or influencer gates: they moderate, they
//! never negotiate.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use sponnect_core::error::CoreError;
use sponnect_core::roles::Role;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticate, then insist on `role`.
async fn require_role(parts: &mut Parts, state: &AppState, role: Role) -> Result<AuthUser, AppError> {
    let user = AuthUser::from_request_parts(parts, state).await?;
    if user.role != role {
        tracing::debug!(
            user_id = user.user_id,
            role = user.role.as_str(),
            required = role.as_str(),
            "Role gate refused request",
        );
        return Err(AppError::Core(CoreError::Forbidden(format!(
            "{} role required",
            role.as_str()
        ))));
    }
    Ok(user)
}

macro_rules! role_gate {
    ($(#[$meta:meta])* $name:ident => $role:expr) => {
        $(#[$meta])*
        pub struct $name(pub AuthUser);

        impl FromRequestParts<AppState> for $name {
            type Rejection = AppError;

            async fn from_request_parts(
                parts: &mut Parts,
                state: &AppState,
            ) -> Result<Self, AppError> {
                require_role(parts, state, $role).await.map($name)
            }
        }
    };
}

role_gate! {
    /// `/admin/*` handlers.
    RequireAdmin => Role::Admin
}

role_gate! {
    /// `/sponsor/*` handlers.
    RequireSponsor => Role::Sponsor
}

role_gate! {
    /// `/influencer/*` handlers.
    RequireInfluencer => Role::Influencer
}

/// Any valid token, whatever its role. Reads better than a bare
/// [`AuthUser`] in handler signatures.
pub struct RequireAuth(pub AuthUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        AuthUser::from_request_parts(parts, state).await.map(RequireAuth)
    }
}

use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Admin routes mounted at `/admin`. Every handler requires the admin role.
///
/// ```text
/// GET    /stats                        -> get_stats
/// GET    /users                        -> list_users
/// PATCH  /users/{id}/flag              -> flag_user
/// PATCH  /users/{id}/unflag            -> unflag_user
/// PATCH  /users/{id}/activate          -> activate_user
/// PATCH  /users/{id}/deactivate        -> deactivate_user
/// GET    /sponsors/pending             -> list_pending_sponsors
/// PATCH  /sponsors/{id}/approve        -> approve_sponsor
/// PATCH  /sponsors/{id}/reject         -> reject_sponsor
/// PATCH  /campaigns/{id}/flag          -> flag_campaign
/// PATCH  /campaigns/{id}/unflag        -> unflag_campaign
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/stats", get(admin::get_stats))
        .route("/users", get(admin::list_users))
        .route("/users/{id}/flag", patch(admin::flag_user))
        .route("/users/{id}/unflag", patch(admin::unflag_user))
        .route("/users/{id}/activate", patch(admin::activate_user))
        .route("/users/{id}/deactivate", patch(admin::deactivate_user))
        .route("/sponsors/pending", get(admin::list_pending_sponsors))
        .route("/sponsors/{id}/approve", patch(admin::approve_sponsor))
        .route("/sponsors/{id}/reject", patch(admin::reject_sponsor))
        .route("/campaigns/{id}/flag", patch(admin::flag_campaign))
        .route("/campaigns/{id}/unflag", patch(admin::unflag_campaign))
}

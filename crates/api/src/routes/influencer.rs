//! Influencer routes mounted at `/influencer`. Every handler requires the
//! influencer role.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::{ad_requests, history};
use crate::state::AppState;

/// ```text
/// GET    /ad_requests              -> list_influencer_ad_requests
/// PATCH  /ad_requests/{id}         -> influencer_respond
/// POST   /campaigns/{id}/apply     -> apply_to_campaign
/// GET    /negotiations             -> influencer_negotiations
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/ad_requests", get(ad_requests::list_influencer_ad_requests))
        .route("/ad_requests/{id}", patch(ad_requests::influencer_respond))
        .route("/campaigns/{id}/apply", post(ad_requests::apply_to_campaign))
        .route("/negotiations", get(history::influencer_negotiations))
}

use axum::routing::get;
use axum::Router;

use crate::handlers::profile;
use crate::state::AppState;

/// Profile routes, merged at the `/api/v1` root.
///
/// ```text
/// GET  /profile                     -> get_profile
/// PUT  /profile                     -> update_profile
/// GET  /influencers/{id}/profile    -> get_influencer_profile
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/profile",
            get(profile::get_profile).put(profile::update_profile),
        )
        .route(
            "/influencers/{id}/profile",
            get(profile::get_influencer_profile),
        )
}

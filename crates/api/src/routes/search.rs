use axum::routing::get;
use axum::Router;

use crate::handlers::search;
use crate::state::AppState;

/// Search routes mounted at `/search`.
///
/// ```text
/// GET /influencers   -> search_influencers
/// GET /campaigns     -> search_campaigns
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/influencers", get(search::search_influencers))
        .route("/campaigns", get(search::search_campaigns))
}

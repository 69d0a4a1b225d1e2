use axum::routing::get;
use axum::Router;

use crate::handlers::history;
use crate::state::AppState;

/// Role-neutral ad request routes mounted at `/ad_requests`.
///
/// ```text
/// GET /{id}/history   -> get_history (participants and admins)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}/history", get(history::get_history))
}

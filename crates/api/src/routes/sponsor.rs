//! Sponsor routes mounted at `/sponsor`. Every handler requires the sponsor role.

use axum::routing::{get, patch, post, put};
use axum::Router;

use crate::handlers::{ad_requests, applications, campaigns, history};
use crate::state::AppState;

/// ```text
/// GET    /campaigns                              -> list_campaigns
/// POST   /campaigns                              -> create_campaign
/// GET    /campaigns/{id}                         -> get_campaign
/// PUT    /campaigns/{id}                         -> update_campaign
/// DELETE /campaigns/{id}                         -> delete_campaign
/// POST   /campaigns/{id}/ad_requests             -> create_offer
/// GET    /campaigns/{id}/applications            -> list_applications
/// GET    /campaigns/{id}/negotiation_summary     -> campaign_negotiation_summary
/// GET    /ad_requests                            -> list_sponsor_ad_requests
/// PUT    /ad_requests/{id}                       -> sponsor_respond
/// DELETE /ad_requests/{id}                       -> delete_ad_request
/// PATCH  /applications/{id}/accept               -> accept_application
/// PATCH  /applications/{id}/reject               -> reject_application
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/campaigns",
            get(campaigns::list_campaigns).post(campaigns::create_campaign),
        )
        .route(
            "/campaigns/{id}",
            get(campaigns::get_campaign)
                .put(campaigns::update_campaign)
                .delete(campaigns::delete_campaign),
        )
        .route("/campaigns/{id}/ad_requests", post(ad_requests::create_offer))
        .route(
            "/campaigns/{id}/applications",
            get(applications::list_applications),
        )
        .route(
            "/campaigns/{id}/negotiation_summary",
            get(history::campaign_negotiation_summary),
        )
        .route("/ad_requests", get(ad_requests::list_sponsor_ad_requests))
        .route(
            "/ad_requests/{id}",
            put(ad_requests::sponsor_respond).delete(ad_requests::delete_ad_request),
        )
        .route(
            "/applications/{id}/accept",
            patch(applications::accept_application),
        )
        .route(
            "/applications/{id}/reject",
            patch(applications::reject_application),
        )
}

pub mod admin;
pub mod ad_requests;
pub mod auth;
pub mod health;
pub mod influencer;
pub mod profile;
pub mod search;
pub mod sponsor;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                                    register (public)
/// /auth/login                                       login (public)
///
/// /profile                                          get, update own profile
/// /influencers/{id}/profile                         public influencer card
///
/// /sponsor/campaigns                                list, create
/// /sponsor/campaigns/{id}                           get, update, delete
/// /sponsor/campaigns/{id}/ad_requests               send offer (POST)
/// /sponsor/campaigns/{id}/applications              influencer applications
/// /sponsor/campaigns/{id}/negotiation_summary       latest action per thread
/// /sponsor/ad_requests                              list (?status, ?campaign_id)
/// /sponsor/ad_requests/{id}                         respond (PUT), delete
/// /sponsor/applications/{id}/accept                 accept application (PATCH)
/// /sponsor/applications/{id}/reject                 reject application (PATCH)
///
/// /influencer/ad_requests                           list (?status)
/// /influencer/ad_requests/{id}                      respond (PATCH)
/// /influencer/campaigns/{id}/apply                  apply (POST)
/// /influencer/negotiations                          latest action per thread
///
/// /ad_requests/{id}/history                         full ledger
///
/// /search/influencers                               influencer discovery
/// /search/campaigns                                 campaign discovery
///
/// /admin/stats                                      platform counters
/// /admin/users                                      paginated user listing
/// /admin/users/{id}/flag|unflag|activate|deactivate moderation (PATCH)
/// /admin/sponsors/pending                           sponsors awaiting approval
/// /admin/sponsors/{id}/approve|reject               approval decision (PATCH)
/// /admin/campaigns/{id}/flag|unflag                 campaign moderation (PATCH)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .merge(profile::router())
        .nest("/sponsor", sponsor::router())
        .nest("/influencer", influencer::router())
        .nest("/ad_requests", ad_requests::router())
        .nest("/search", search::router())
        .nest("/admin", admin::router())
}

//! Repository layer: one zero-sized struct per table.
//!
//! Pool-scoped methods take `&PgPool`. Methods that must run inside a
//! negotiation unit of work take `&mut sqlx::Transaction<'_, sqlx::Postgres>`.

pub mod ad_request_repo;
pub mod campaign_repo;
pub mod negotiation_history_repo;
pub mod user_repo;

pub use ad_request_repo::AdRequestRepo;
pub use campaign_repo::CampaignRepo;
pub use negotiation_history_repo::NegotiationHistoryRepo;
pub use user_repo::UserRepo;

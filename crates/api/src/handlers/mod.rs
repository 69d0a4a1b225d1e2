pub mod admin;
pub mod ad_requests;
pub mod applications;
pub mod auth;
pub mod campaigns;
pub mod history;
pub mod profile;
pub mod search;

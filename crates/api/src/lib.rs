//! Sponnect API server library.
//!
//! Exposes the building blocks (config, state, error handling, the
//! negotiation engine, routes) so integration tests and the binaries can
//! both access them.

pub mod app;
pub mod auth;
pub mod config;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod query;
pub mod response;
pub mod routes;
pub mod state;
pub mod telemetry;

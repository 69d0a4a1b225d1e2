//! Request extractors for identity and role checks.
//!
//! [`auth::AuthUser`] decodes the bearer token; the [`rbac`] gates add a
//! role requirement on top.

pub mod auth;
pub mod rbac;

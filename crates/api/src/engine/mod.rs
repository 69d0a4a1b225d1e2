//! Stateful services that sit between handlers and repositories.
//!
//! - [`negotiation`] -- the transactional unit of work for every ad request
//!   state change.

pub mod negotiation;

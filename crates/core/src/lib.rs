//! Domain layer for the Sponnect marketplace backend.
//!
//! Holds no I/O: closed enumerations, validation helpers, and the pure
//! negotiation planner live here so that the repository layer and the HTTP
//! layer agree on one definition of every rule.

pub mod campaign;
pub mod directory;
pub mod error;
pub mod negotiation;
pub mod pagination;
pub mod roles;
pub mod types;

//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A create DTO for inserts
//! - Where the entity is editable, an update DTO (all `Option` fields)

pub mod ad_request;
pub mod campaign;
pub mod negotiation_history;
pub mod user;

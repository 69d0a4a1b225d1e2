use crate::types::DbId;

/// Domain error taxonomy shared by the repository and HTTP layers.
///
/// Every variant is local to a single operation: returning one of these
/// means nothing was committed.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The entity does not exist, or exists but is not visible to the caller.
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// Malformed input: bad enum value, missing or non-numeric payment, etc.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The request is well-formed but the current state forbids it
    /// (wrong turn, terminal status, duplicate pending request).
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

//! Domain error taxonomy.
//!
//! Persistence-layer and framework errors are normalized into these variants
//! at the API boundary; backend-internal error text is never surfaced to
//! callers verbatim.

use crate::types::DbId;

/// Domain-level error shared by every layer of the application.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Malformed or missing input the client must correct.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A referenced entity does not exist (lookup by id).
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// A referenced entity does not exist (lookup by name).
    #[error("{entity} named '{name}' not found")]
    NotFoundNamed { entity: &'static str, name: String },

    /// Duplicate value where uniqueness is required (e.g. username, email).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Missing or invalid credential.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Valid identity, but not permitted for this resource or field.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Unexpected internal failure. Message is logged, not returned.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience alias for domain-level results.
pub type CoreResult<T> = Result<T, CoreError>;

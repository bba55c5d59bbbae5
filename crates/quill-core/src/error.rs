//! Domain-level error types.

use thiserror::Error;

/// Content-store errors - failures talking to the backing store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store connection failed: {0}")]
    Connection(String),

    #[error("Store request failed: {0}")]
    Request(String),

    #[error("Record not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

impl StoreError {
    /// Whether this error is a uniqueness-constraint violation
    /// (duplicate slug, duplicate waitlist email).
    pub fn is_constraint(&self) -> bool {
        matches!(self, StoreError::Constraint(_))
    }
}

//! Error types shared across the layers.
//!
//! ```text
//! ValidationErrors ──┐
//!                    ├──► ServiceError ──► HTTP status + code (transport::http)
//! StoreError ────────┘                            │
//!                                                 ▼
//!                                   ClientError (client) ──► one user-facing message
//! ```

use crate::domain::validate::ValidationErrors;
use thiserror::Error;

/// Failures of the backing store and the row adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Backing store unreachable, unauthenticated or misconfigured.
    #[error("Backing store unreachable: {0}")]
    Unavailable(String),

    /// The position does not address an existing data row (out of range or stale).
    #[error("Row {row_index} not found")]
    NotFound { row_index: u32 },

    /// The store answered with something the adapter cannot interpret.
    #[error("Backing store error: {0}")]
    Protocol(String),
}

/// Result of an entity service operation.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::validate::FieldError;

    #[test]
    fn messages() {
        assert_eq!(
            StoreError::NotFound { row_index: 7 }.to_string(),
            "Row 7 not found"
        );
        let err: ServiceError =
            ValidationErrors(vec![FieldError::new("price", "Price must be a non-negative number")]).into();
        assert_eq!(
            err.to_string(),
            "Validation failed: Price must be a non-negative number"
        );
    }
}

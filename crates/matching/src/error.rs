//! Matching error types.

use blood_store::StoreError;
use thiserror::Error;

/// Errors returned by request and donation operations.
///
/// Eligibility verdicts are not errors; see
/// [`Eligibility`](crate::Eligibility).
#[derive(Debug, Error)]
pub enum MatchingError {
    /// Input rejected before anything was written.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Entity not found.
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// The request was fulfilled before this donation could be recorded.
    #[error("Blood request {id} is no longer open")]
    RequestClosed { id: String },

    /// The store failed; nothing was written.
    #[error("Failed to save changes. Please try again.")]
    Persistence(#[from] StoreError),
}

impl MatchingError {
    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a not found error.
    pub fn not_found(entity_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }
}

/// Result type for matching operations.
pub type MatchingResult<T> = Result<T, MatchingError>;

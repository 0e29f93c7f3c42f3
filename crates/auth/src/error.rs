//! Account error types.

use blood_store::StoreError;
use thiserror::Error;

use crate::ValidationErrors;

/// Errors that can occur during account operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// One or more signup fields were rejected.
    #[error("Invalid signup: {0}")]
    Validation(ValidationErrors),

    /// Another account already uses this email.
    #[error("Email already registered")]
    EmailTaken,

    /// Unknown email or wrong password.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// The store failed; nothing was written.
    #[error("An error occurred while saving the account")]
    Persistence(#[from] StoreError),
}

/// Result type for account operations.
pub type AuthResult<T> = Result<T, AuthError>;

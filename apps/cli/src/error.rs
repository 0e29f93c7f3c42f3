//! CLI error type.

use auth::AuthError;
use blood_store::StoreError;
use matching::MatchingError;
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Matching(#[from] MatchingError),

    #[error("Failed to access the store: {0}")]
    Store(#[from] StoreError),

    #[error("Not logged in. Run `bloodbank login` first")]
    NotLoggedIn,

    #[error("Only {0}s can use this command")]
    WrongRole(&'static str),
}

pub type CliResult<T> = Result<T, CliError>;

//! Contract-specific error types
//!
//! Top-level error for registry operations. Domain rejections come from the
//! frozen `MatchError` taxonomy; a failed fee transfer surfaces unchanged.

use thiserror::Error;
use types::errors::{MatchError, TransferError};

/// Registry operation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegistryError {
    #[error("Match error: {0}")]
    Match(#[from] MatchError),

    #[error("Fee transfer failed: {0}")]
    Transfer(#[from] TransferError),

    #[error("Invalid match ceiling {requested}: {created} matches already created")]
    InvalidCeiling { requested: u64, created: u64 },
}

impl RegistryError {
    /// The domain error, if this is one
    pub fn as_match_error(&self) -> Option<&MatchError> {
        match self {
            RegistryError::Match(err) => Some(err),
            RegistryError::Transfer(_) | RegistryError::InvalidCeiling { .. } => None,
        }
    }
}

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Malformed config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

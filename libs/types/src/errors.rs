//! Error types for match admission and bookkeeping
//!
//! Every kind carries a stable numeric code so callers across a host
//! boundary can branch on the exact failure.

use thiserror::Error;

use crate::ids::MatchId;

/// Match registry errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatchError {
    #[error("Match not found: {id}")]
    NotFound { id: MatchId },

    #[error("Invalid blood type: {0:?}")]
    InvalidBloodType(String),

    #[error("Invalid location: length {len} outside 1..={max}")]
    InvalidLocation { len: usize, max: usize },

    #[error("Invalid radius: {0}")]
    InvalidRadius(i64),

    #[error("Match {id} already indexed")]
    AlreadyMatched { id: MatchId },

    #[error("Invalid urgency: {0}")]
    InvalidUrgency(u64),

    #[error("Unauthorized: caller may not perform this operation")]
    NotAuthorized,

    #[error("Max matches exceeded: limit {limit}")]
    MaxMatchesExceeded { limit: u64 },

    #[error("Invalid priority: {0}")]
    InvalidPriority(u64),

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    #[error("Incompatible blood types: donor {donor} cannot serve {needed}")]
    InvalidCompatibility { donor: String, needed: String },

    #[error("Authority not set")]
    AuthorityNotSet,

    #[error("Authority already set")]
    AlreadySet,

    #[error("Invalid authority: burn address")]
    InvalidAuthority,
}

impl MatchError {
    /// Stable numeric error code
    pub fn code(&self) -> u32 {
        match self {
            MatchError::NotFound { .. } => 100,
            MatchError::InvalidBloodType(_) => 101,
            MatchError::InvalidLocation { .. } => 102,
            MatchError::InvalidRadius(_) => 103,
            MatchError::AlreadyMatched { .. } => 106,
            MatchError::InvalidUrgency(_) => 107,
            MatchError::NotAuthorized => 109,
            MatchError::MaxMatchesExceeded { .. } => 111,
            MatchError::InvalidPriority(_) => 114,
            MatchError::InvalidQuantity(_) => 115,
            MatchError::InvalidCompatibility { .. } => 116,
            MatchError::AuthorityNotSet => 117,
            // 119 is reserved for malformed match ids
            MatchError::AlreadySet => 120,
            MatchError::InvalidAuthority => 121,
        }
    }
}

/// Failure reported by the fee-transfer collaborator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransferError {
    #[error("Insufficient funds: required {required}, available {available}")]
    InsufficientFunds { required: u64, available: u64 },

    #[error("Arithmetic overflow in balance calculation")]
    Overflow,

    #[error("Transfer rejected: {reason}")]
    Rejected { reason: String },
}

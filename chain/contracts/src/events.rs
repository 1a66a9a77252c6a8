//! Registry events
//!
//! Events are immutable records emitted by successful state changes.
//! A rejected operation emits nothing.

use serde::{Deserialize, Serialize};
use types::blood::BloodType;
use types::ids::{AccountId, MatchId, NeedId};

/// Authority bootstrapped
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthoritySet {
    pub authority: AccountId,
}

/// Match fee changed by the authority
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchFeeUpdated {
    pub old_fee: u64,
    pub new_fee: u64,
    pub updated_by: AccountId,
}

/// Match ceiling changed by the authority
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaxMatchesUpdated {
    pub old_max: u64,
    pub new_max: u64,
}

/// Match admitted and fee charged
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchCreated {
    pub match_id: MatchId,
    pub donor: AccountId,
    pub need_id: NeedId,
    pub blood_type: BloodType,
    pub fee_paid: u64,
    pub payer: AccountId,
    pub block_height: u64,
}

/// Donor toggled a match's status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchStatusUpdated {
    pub match_id: MatchId,
    pub active: bool,
    pub block_height: u64,
}

/// Enum wrapper for all registry events, enabling uniform handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistryEvent {
    AuthoritySet(AuthoritySet),
    MatchFeeUpdated(MatchFeeUpdated),
    MaxMatchesUpdated(MaxMatchesUpdated),
    MatchCreated(MatchCreated),
    MatchStatusUpdated(MatchStatusUpdated),
}

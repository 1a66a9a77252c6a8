//! Identifier types for registry entities
//!
//! Accounts are opaque UUID-backed identities compared by equality only.
//! Match and need identifiers are plain integers: match ids are allocated
//! densely by the registry, need ids are assigned upstream.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque account identity (donor, caller, authority)
///
/// Fresh identities use UUID v7. The nil UUID is the reserved burn
/// address and can never be accepted as the registry authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(Uuid);

impl AccountId {
    /// Create a new AccountId with current timestamp
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Create from existing UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// The reserved null address
    pub const fn burn() -> Self {
        Self(Uuid::nil())
    }

    pub fn is_burn(&self) -> bool {
        self.0.is_nil()
    }

    /// Get inner UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a match record
///
/// Dense and monotonically increasing from 0; never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchId(u64);

impl MatchId {
    pub const FIRST: MatchId = MatchId(0);

    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn value(&self) -> u64 {
        self.0
    }

    /// The id allocated after this one, `None` on overflow
    pub fn next(&self) -> Option<MatchId> {
        self.0.checked_add(1).map(MatchId)
    }
}

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for MatchId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Identifier of a blood-need request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NeedId(u64);

impl NeedId {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for NeedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for NeedId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

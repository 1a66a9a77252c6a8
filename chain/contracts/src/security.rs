//! Access control for registry configuration
//!
//! The registry has a single privileged authority that receives match fees
//! and configures the fee. It starts unset and is bootstrapped exactly once.

use serde::{Deserialize, Serialize};
use types::errors::MatchError;
use types::ids::AccountId;

/// One-time authority slot.
///
/// Transitions `None -> Some(account)` once; the set state is terminal.
/// The burn address is never accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorityGate {
    authority: Option<AccountId>,
}

impl AuthorityGate {
    /// Create an unset gate.
    pub fn new() -> Self {
        Self { authority: None }
    }

    /// Bootstrap the authority.
    ///
    /// Fails with `InvalidAuthority` for the burn address (checked first),
    /// then `AlreadySet` if an authority exists.
    pub fn set(&mut self, candidate: AccountId) -> Result<(), MatchError> {
        if candidate.is_burn() {
            return Err(MatchError::InvalidAuthority);
        }
        if self.authority.is_some() {
            return Err(MatchError::AlreadySet);
        }
        self.authority = Some(candidate);
        Ok(())
    }

    /// The authority, or `AuthorityNotSet`.
    pub fn require(&self) -> Result<AccountId, MatchError> {
        self.authority.ok_or(MatchError::AuthorityNotSet)
    }

    /// Require that an authority exists and that `caller` is it.
    pub fn require_caller(&self, caller: &AccountId) -> Result<AccountId, MatchError> {
        let authority = self.require()?;
        if authority != *caller {
            return Err(MatchError::NotAuthorized);
        }
        Ok(authority)
    }

    pub fn is_authority(&self, caller: &AccountId) -> bool {
        self.authority.as_ref() == Some(caller)
    }

    pub fn get(&self) -> Option<AccountId> {
        self.authority
    }
}

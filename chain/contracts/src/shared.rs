//! Serialized registry handle for concurrent hosts
//!
//! Index insertion and the id counter must never interleave between
//! callers, so every operation holds one registry-wide lock for its whole
//! duration, the fee transfer included.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use types::errors::MatchError;
use types::ids::{AccountId, MatchId};

use crate::errors::RegistryError;
use crate::registry::{CallContext, Match, MatchRegistry, MatchRequest};
use crate::transfer::FeeTransfer;

/// Cloneable, thread-safe handle to a single [`MatchRegistry`].
#[derive(Debug, Clone)]
pub struct SharedRegistry {
    inner: Arc<Mutex<MatchRegistry>>,
}

impl SharedRegistry {
    pub fn new(registry: MatchRegistry) -> Self {
        Self {
            inner: Arc::new(Mutex::new(registry)),
        }
    }

    /// Operations never leave the registry half-mutated, so a poisoned
    /// lock still guards consistent state.
    fn lock(&self) -> MutexGuard<'_, MatchRegistry> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_authority(&self, candidate: AccountId) -> Result<(), MatchError> {
        self.lock().set_authority(candidate)
    }

    pub fn set_match_fee(&self, new_fee: u64, ctx: &CallContext) -> Result<(), MatchError> {
        self.lock().set_match_fee(new_fee, ctx)
    }

    pub fn set_max_matches(
        &self,
        new_max: u64,
        ctx: &CallContext,
    ) -> Result<(), RegistryError> {
        self.lock().set_max_matches(new_max, ctx)
    }

    pub fn create_match<T>(
        &self,
        request: MatchRequest,
        ctx: &CallContext,
        transfer: &mut T,
    ) -> Result<MatchId, RegistryError>
    where
        T: FeeTransfer + ?Sized,
    {
        self.lock().create_match(request, ctx, transfer)
    }

    pub fn update_match_status(
        &self,
        id: MatchId,
        status: bool,
        ctx: &CallContext,
    ) -> Result<(), MatchError> {
        self.lock().update_match_status(id, status, ctx)
    }

    /// Snapshot of a match record.
    pub fn get_match(&self, id: MatchId) -> Option<Match> {
        self.lock().get_match(id).cloned()
    }

    pub fn get_match_count(&self) -> u64 {
        self.lock().get_match_count()
    }

    /// Run a read-only closure under the lock.
    pub fn read<R>(&self, f: impl FnOnce(&MatchRegistry) -> R) -> R {
        f(&self.lock())
    }
}

//! Fee transfer port and in-memory ledger
//!
//! The registry charges its match fee through [`FeeTransfer`]. A transfer
//! is atomic: it either debits the payer and credits the payee, or fails
//! with no effect. The registry never retries.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;
use types::errors::TransferError;
use types::ids::AccountId;

/// Value-transfer collaborator invoked once per admitted match.
pub trait FeeTransfer {
    fn transfer(
        &mut self,
        amount: u64,
        from: &AccountId,
        to: &AccountId,
    ) -> Result<(), TransferError>;
}

/// A completed transfer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRecord {
    pub amount: u64,
    pub from: AccountId,
    pub to: AccountId,
}

/// In-memory native-currency ledger.
///
/// Balances are checked before any mutation so a failing transfer leaves
/// every balance untouched. Zero-amount transfers always succeed.
#[derive(Debug, Default)]
pub struct FeeLedger {
    balances: HashMap<AccountId, u64>,
    /// Completed transfers (append-only)
    history: Vec<TransferRecord>,
}

impl FeeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint `amount` into `account`.
    pub fn fund(&mut self, account: AccountId, amount: u64) -> Result<(), TransferError> {
        let balance = self.balances.entry(account).or_insert(0);
        *balance = balance.checked_add(amount).ok_or(TransferError::Overflow)?;
        Ok(())
    }

    pub fn balance(&self, account: &AccountId) -> u64 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    /// Completed transfers in order.
    pub fn transfers(&self) -> &[TransferRecord] {
        &self.history
    }
}

impl FeeTransfer for FeeLedger {
    fn transfer(
        &mut self,
        amount: u64,
        from: &AccountId,
        to: &AccountId,
    ) -> Result<(), TransferError> {
        let available = self.balance(from);
        if available < amount {
            return Err(TransferError::InsufficientFunds {
                required: amount,
                available,
            });
        }

        if from != to {
            let credited = self
                .balance(to)
                .checked_add(amount)
                .ok_or(TransferError::Overflow)?;
            self.balances.insert(*from, available - amount);
            self.balances.insert(*to, credited);
        }

        debug!(amount, from = %from, to = %to, "Fee transferred");
        self.history.push(TransferRecord {
            amount,
            from: *from,
            to: *to,
        });
        Ok(())
    }
}

//! Value transfer capability.
//!
//! The kernel decides when value moves and between which accounts; moving it
//! is delegated to a [`ValueTransfer`] implementation supplied by the host
//! (a bank module, a payment rail). The kernel awaits the transfer before
//! recording a transition, so a failed transfer leaves the beam untouched.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use beam_kernel_core::{Actor, Amount};
use thiserror::Error;

/// A party to a transfer.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Account {
    /// The module-owned account holding beam value.
    Escrow,
    /// An actor's own account.
    Actor(Actor),
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Account::Escrow => f.write_str("escrow"),
            Account::Actor(actor) => write!(f, "{}", actor),
        }
    }
}

/// Errors reported by a transfer capability.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransferError {
    #[error("insufficient funds in {account}: needed {needed}, available {available}")]
    InsufficientFunds {
        account: Account,
        needed: Amount,
        available: Amount,
    },

    #[error("transfer rejected: {0}")]
    Rejected(String),

    #[error("transfer capability unavailable: {0}")]
    Unavailable(String),
}

/// Moves value between accounts.
#[async_trait]
pub trait ValueTransfer: Send + Sync {
    /// Move `amount` from `from` to `to`, atomically or not at all.
    async fn transfer(
        &self,
        from: &Account,
        to: &Account,
        amount: Amount,
    ) -> Result<(), TransferError>;
}

#[async_trait]
impl<T: ValueTransfer + ?Sized> ValueTransfer for Arc<T> {
    async fn transfer(
        &self,
        from: &Account,
        to: &Account,
        amount: Amount,
    ) -> Result<(), TransferError> {
        (**self).transfer(from, to, amount).await
    }
}

/// In-memory ledger for tests and demos.
pub mod memory {
    use super::*;
    use std::collections::{BTreeMap, VecDeque};
    use tokio::sync::Mutex;

    /// A completed transfer.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct TransferRecord {
        pub from: Account,
        pub to: Account,
        pub amount: Amount,
    }

    #[derive(Default)]
    struct LedgerState {
        /// Net balances. Negative balances are allowed unless `strict`.
        balances: BTreeMap<Account, i128>,
        log: Vec<TransferRecord>,
        injected: VecDeque<TransferError>,
    }

    /// Ledger that records every transfer and can be told to fail.
    ///
    /// By default accounts may go negative, which models value sourced
    /// from outside the ledger. A strict ledger refuses overdrafts.
    #[derive(Default)]
    pub struct InMemoryLedger {
        state: Mutex<LedgerState>,
        strict: bool,
    }

    impl InMemoryLedger {
        /// Create a permissive ledger.
        pub fn new() -> Self {
            Self::default()
        }

        /// Create a ledger that rejects overdrafts.
        pub fn strict() -> Self {
            Self {
                state: Mutex::new(LedgerState::default()),
                strict: true,
            }
        }

        /// Add `amount` to `account` without a counterparty.
        pub async fn credit(&self, account: Account, amount: Amount) {
            let mut state = self.state.lock().await;
            *state.balances.entry(account).or_default() += i128::from(amount.value());
        }

        /// Net balance of `account`.
        pub async fn balance(&self, account: &Account) -> i128 {
            let state = self.state.lock().await;
            state.balances.get(account).copied().unwrap_or_default()
        }

        /// Every completed transfer, oldest first.
        pub async fn transfers(&self) -> Vec<TransferRecord> {
            self.state.lock().await.log.clone()
        }

        /// Make the next transfer fail with `error`. Calls queue up.
        pub async fn fail_next(&self, error: TransferError) {
            self.state.lock().await.injected.push_back(error);
        }
    }

    #[async_trait]
    impl ValueTransfer for InMemoryLedger {
        async fn transfer(
            &self,
            from: &Account,
            to: &Account,
            amount: Amount,
        ) -> Result<(), TransferError> {
            let mut state = self.state.lock().await;

            if let Some(error) = state.injected.pop_front() {
                return Err(error);
            }

            let value = i128::from(amount.value());
            let available = state.balances.get(from).copied().unwrap_or_default();
            if self.strict && available < value {
                return Err(TransferError::InsufficientFunds {
                    account: from.clone(),
                    needed: amount,
                    available: Amount(u64::try_from(available.max(0)).unwrap_or(u64::MAX)),
                });
            }

            *state.balances.entry(from.clone()).or_default() -= value;
            *state.balances.entry(to.clone()).or_default() += value;
            state.log.push(TransferRecord {
                from: from.clone(),
                to: to.clone(),
                amount,
            });
            Ok(())
        }
    }
}

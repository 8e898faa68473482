//! Cloneable ledger handle for hosts that run tasks in parallel

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::ledger::{IntegrityReport, Ledger};
use crate::traits::*;
use crate::types::*;

/// Shared handle that serialises every operation on one ledger
///
/// All calls, reads included, go through a single async mutex, so each
/// operation runs to completion before the next one starts.
pub struct SharedLedger<S: LedgerStorage> {
    inner: Arc<Mutex<Ledger<S>>>,
}

impl<S: LedgerStorage> Clone for SharedLedger<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: LedgerStorage> From<Ledger<S>> for SharedLedger<S> {
    fn from(ledger: Ledger<S>) -> Self {
        Self::new(ledger)
    }
}

impl<S: LedgerStorage> SharedLedger<S> {
    pub fn new(ledger: Ledger<S>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ledger)),
        }
    }

    pub async fn token_info(&self) -> TokenInfo {
        self.inner.lock().await.token_info()
    }

    pub async fn total_supply(&self) -> Amount {
        self.inner.lock().await.total_supply()
    }

    pub async fn balance_of(&self, account: &Address) -> LedgerResult<Amount> {
        self.inner.lock().await.balance_of(account).await
    }

    pub async fn allowance(&self, owner: &Address, spender: &Address) -> LedgerResult<Amount> {
        self.inner.lock().await.allowance(owner, spender).await
    }

    pub async fn transfer(
        &self,
        sender: Address,
        recipient: Address,
        amount: Amount,
    ) -> LedgerResult<()> {
        self.inner
            .lock()
            .await
            .transfer(sender, recipient, amount)
            .await
    }

    pub async fn approve(
        &self,
        owner: Address,
        spender: Address,
        amount: Amount,
    ) -> LedgerResult<()> {
        self.inner.lock().await.approve(owner, spender, amount).await
    }

    pub async fn transfer_from(
        &self,
        spender: Address,
        owner: Address,
        recipient: Address,
        amount: Amount,
    ) -> LedgerResult<()> {
        self.inner
            .lock()
            .await
            .transfer_from(spender, owner, recipient, amount)
            .await
    }

    pub async fn events(&self) -> LedgerResult<Vec<EventRecord>> {
        self.inner.lock().await.events().await
    }

    pub async fn validate_integrity(&self) -> LedgerResult<IntegrityReport> {
        self.inner.lock().await.validate_integrity().await
    }

    /// Run a synchronous read against the ledger while holding the lock
    ///
    /// Storage reads are async and mutations need `&mut`, so use the
    /// dedicated methods for those.
    pub async fn with_ledger<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Ledger<S>) -> R,
    {
        let guard = self.inner.lock().await;
        f(&*guard)
    }
}

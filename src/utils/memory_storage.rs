//! In-memory storage implementation for testing

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::ledger::ChangeSet;
use crate::traits::*;
use crate::types::*;

type Balances = BTreeMap<Address, Amount>;
type Allowances = BTreeMap<(Address, Address), Amount>;

/// In-memory storage implementation for testing and development
///
/// Clones share the same tables, so a test can keep a handle for inspection
/// after moving a clone into a ledger.
#[derive(Debug, Clone)]
pub struct MemoryStorage {
    balances: Arc<RwLock<Balances>>,
    allowances: Arc<RwLock<Allowances>>,
    events: Arc<RwLock<Vec<EventRecord>>>,
}

impl MemoryStorage {
    /// Create a new memory storage instance
    pub fn new() -> Self {
        Self {
            balances: Arc::new(RwLock::new(BTreeMap::new())),
            allowances: Arc::new(RwLock::new(BTreeMap::new())),
            events: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Clear all data (useful for testing)
    pub fn clear(&self) -> LedgerResult<()> {
        let (mut balances, mut allowances, mut events) = self.write_all()?;
        balances.clear();
        allowances.clear();
        events.clear();
        Ok(())
    }

    /// Number of recorded events
    pub fn event_count(&self) -> LedgerResult<usize> {
        Ok(read(&self.events)?.len())
    }

    // Lock order: balances, allowances, events.
    #[allow(clippy::type_complexity)]
    fn write_all(
        &self,
    ) -> LedgerResult<(
        RwLockWriteGuard<'_, Balances>,
        RwLockWriteGuard<'_, Allowances>,
        RwLockWriteGuard<'_, Vec<EventRecord>>,
    )> {
        let balances = write(&self.balances)?;
        let allowances = write(&self.allowances)?;
        let events = write(&self.events)?;
        Ok((balances, allowances, events))
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

fn read<T>(lock: &RwLock<T>) -> LedgerResult<RwLockReadGuard<'_, T>> {
    lock.read()
        .map_err(|e| LedgerError::Storage(format!("lock poisoned: {}", e)))
}

fn write<T>(lock: &RwLock<T>) -> LedgerResult<RwLockWriteGuard<'_, T>> {
    lock.write()
        .map_err(|e| LedgerError::Storage(format!("lock poisoned: {}", e)))
}

#[async_trait]
impl LedgerStorage for MemoryStorage {
    async fn get_balance(&self, account: &Address) -> LedgerResult<Amount> {
        Ok(read(&self.balances)?.get(account).copied().unwrap_or(0))
    }

    async fn get_allowance(&self, owner: &Address, spender: &Address) -> LedgerResult<Amount> {
        Ok(read(&self.allowances)?
            .get(&(*owner, *spender))
            .copied()
            .unwrap_or(0))
    }

    async fn list_balances(&self) -> LedgerResult<Vec<(Address, Amount)>> {
        Ok(read(&self.balances)?
            .iter()
            .map(|(account, amount)| (*account, *amount))
            .collect())
    }

    async fn get_events(&self, account: Option<&Address>) -> LedgerResult<Vec<EventRecord>> {
        let events = read(&self.events)?;
        let filtered: Vec<EventRecord> = events
            .iter()
            .filter(|record| account.is_none_or(|a| record.event.involves(a)))
            .cloned()
            .collect();
        Ok(filtered)
    }

    async fn commit(&mut self, changes: &ChangeSet) -> LedgerResult<()> {
        // Every lock is held before the first write, so a poisoned lock
        // rejects the whole change set.
        let (mut balances, mut allowances, mut events) = self.write_all()?;

        for (account, amount) in changes.balances() {
            balances.insert(*account, *amount);
        }

        for (pair, amount) in changes.allowances() {
            allowances.insert(*pair, *amount);
        }

        let mut sequence = events.len() as u64;
        for event in changes.events() {
            events.push(EventRecord::new(sequence, event.clone()));
            sequence += 1;
        }

        Ok(())
    }
}

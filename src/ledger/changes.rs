//! Staged writes of a single ledger operation

use std::collections::BTreeMap;

use crate::types::*;

/// Write set produced by one ledger operation
///
/// Operations stage every balance and allowance they intend to write, plus
/// the events they emit, and hand the whole set to
/// [`LedgerStorage::commit`](crate::traits::LedgerStorage::commit). Later
/// writes to the same key replace earlier ones, so a debit followed by a
/// credit of the same account nets out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    balances: BTreeMap<Address, Amount>,
    allowances: BTreeMap<(Address, Address), Amount>,
    events: Vec<LedgerEvent>,
}

impl ChangeSet {
    /// Create an empty change set
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage the new balance of an account
    pub fn set_balance(&mut self, account: Address, amount: Amount) {
        self.balances.insert(account, amount);
    }

    /// Staged balance of an account, if any
    pub fn balance(&self, account: &Address) -> Option<Amount> {
        self.balances.get(account).copied()
    }

    /// Stage the new allowance of an (owner, spender) pair
    pub fn set_allowance(&mut self, owner: Address, spender: Address, amount: Amount) {
        self.allowances.insert((owner, spender), amount);
    }

    /// Staged allowance of an (owner, spender) pair, if any
    pub fn allowance(&self, owner: &Address, spender: &Address) -> Option<Amount> {
        self.allowances.get(&(*owner, *spender)).copied()
    }

    /// Append an event
    pub fn emit(&mut self, event: LedgerEvent) {
        self.events.push(event);
    }

    /// Staged balances, ordered by address
    pub fn balances(&self) -> impl Iterator<Item = (&Address, &Amount)> {
        self.balances.iter()
    }

    /// Staged allowances, ordered by (owner, spender)
    pub fn allowances(&self) -> impl Iterator<Item = (&(Address, Address), &Amount)> {
        self.allowances.iter()
    }

    /// Staged events in emission order
    pub fn events(&self) -> &[LedgerEvent] {
        &self.events
    }

    /// Whether nothing has been staged
    pub fn is_empty(&self) -> bool {
        self.balances.is_empty() && self.allowances.is_empty() && self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_later_writes_replace_earlier_ones() {
        let account = Address::repeat_byte(1);
        let mut changes = ChangeSet::new();
        assert!(changes.is_empty());

        changes.set_balance(account, 60);
        changes.set_balance(account, 100);

        assert_eq!(changes.balance(&account), Some(100));
        assert_eq!(changes.balances().count(), 1);
        assert!(!changes.is_empty());
    }

    #[test]
    fn test_allowances_are_keyed_by_pair() {
        let owner = Address::repeat_byte(1);
        let spender = Address::repeat_byte(2);
        let mut changes = ChangeSet::new();

        changes.set_allowance(owner, spender, 30);

        assert_eq!(changes.allowance(&owner, &spender), Some(30));
        assert_eq!(changes.allowance(&spender, &owner), None);
    }

    #[test]
    fn test_events_keep_emission_order() {
        let a = Address::repeat_byte(1);
        let b = Address::repeat_byte(2);
        let mut changes = ChangeSet::new();

        changes.emit(LedgerEvent::Approval {
            owner: a,
            spender: b,
            amount: 0,
        });
        changes.emit(LedgerEvent::Transfer {
            from: a,
            to: b,
            amount: 1,
        });

        assert!(matches!(changes.events()[0], LedgerEvent::Approval { .. }));
        assert!(matches!(changes.events()[1], LedgerEvent::Transfer { .. }));
    }
}

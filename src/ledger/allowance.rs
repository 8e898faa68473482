//! Allowance spending rules

use serde::{Deserialize, Serialize};

use crate::types::*;

/// Allowance value treated as unlimited under
/// [`AllowancePolicy::UnlimitedSentinel`]
pub const UNLIMITED_ALLOWANCE: Amount = Amount::MAX;

/// How a delegated transfer consumes the spender's allowance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllowancePolicy {
    /// An allowance of [`UNLIMITED_ALLOWANCE`] is never decremented
    #[default]
    UnlimitedSentinel,
    /// Every spend decrements the allowance, whatever its value
    AlwaysDecrement,
}

impl AllowancePolicy {
    /// Allowance remaining after spending `amount` out of `current`
    ///
    /// Returns `Ok(None)` when the allowance is left untouched, and
    /// `Ok(Some(remaining))` when it must be rewritten.
    pub fn spend(
        &self,
        owner: Address,
        spender: Address,
        current: Amount,
        amount: Amount,
    ) -> LedgerResult<Option<Amount>> {
        if current < amount {
            return Err(LedgerError::InsufficientAllowance {
                owner,
                spender,
                available: current,
                required: amount,
            });
        }

        match self {
            AllowancePolicy::UnlimitedSentinel if current == UNLIMITED_ALLOWANCE => Ok(None),
            _ => Ok(Some(current - amount)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parties() -> (Address, Address) {
        (Address::repeat_byte(1), Address::repeat_byte(2))
    }

    #[test]
    fn test_spend_decrements_finite_allowance() {
        let (owner, spender) = parties();
        for policy in [AllowancePolicy::UnlimitedSentinel, AllowancePolicy::AlwaysDecrement] {
            assert_eq!(policy.spend(owner, spender, 30, 30).unwrap(), Some(0));
            assert_eq!(policy.spend(owner, spender, 30, 12).unwrap(), Some(18));
        }
    }

    #[test]
    fn test_spend_rejects_overdraw() {
        let (owner, spender) = parties();
        let err = AllowancePolicy::default()
            .spend(owner, spender, 0, 1)
            .unwrap_err();
        assert_eq!(
            err,
            LedgerError::InsufficientAllowance {
                owner,
                spender,
                available: 0,
                required: 1,
            }
        );
    }

    #[test]
    fn test_unlimited_sentinel() {
        let (owner, spender) = parties();
        assert_eq!(
            AllowancePolicy::UnlimitedSentinel
                .spend(owner, spender, UNLIMITED_ALLOWANCE, 500)
                .unwrap(),
            None
        );
        assert_eq!(
            AllowancePolicy::AlwaysDecrement
                .spend(owner, spender, UNLIMITED_ALLOWANCE, 500)
                .unwrap(),
            Some(UNLIMITED_ALLOWANCE - 500)
        );
    }

    #[test]
    fn test_policy_serde_names() {
        let json = serde_json::to_string(&AllowancePolicy::AlwaysDecrement).unwrap();
        assert_eq!(json, "\"always_decrement\"");
        assert_eq!(AllowancePolicy::default(), AllowancePolicy::UnlimitedSentinel);
    }
}

//! Ledger creation parameters

use serde::{Deserialize, Serialize};

use crate::ledger::AllowancePolicy;
use crate::types::*;

/// Parameters for creating a ledger
///
/// ```rust
/// use token_ledger::{Address, LedgerConfig};
///
/// let config = LedgerConfig::from_json_str(
///     r#"{
///         "name": "Example Token",
///         "symbol": "EXT",
///         "decimals": 18,
///         "initial_supply_units": 1000,
///         "creator": "0x1111111111111111111111111111111111111111"
///     }"#,
/// )
/// .unwrap();
///
/// assert_eq!(config.creator, Address::repeat_byte(0x11));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    /// Initial supply in whole token units, scaled by `10^decimals` at creation
    pub initial_supply_units: Amount,
    /// Account receiving the entire initial supply
    pub creator: Address,
    #[serde(default)]
    pub allowance_policy: AllowancePolicy,
}

impl LedgerConfig {
    /// Create a configuration with the default allowance policy
    pub fn new(
        name: impl Into<String>,
        symbol: impl Into<String>,
        decimals: u8,
        initial_supply_units: Amount,
        creator: Address,
    ) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            decimals,
            initial_supply_units,
            creator,
            allowance_policy: AllowancePolicy::default(),
        }
    }

    /// Set the allowance policy
    pub fn with_allowance_policy(mut self, policy: AllowancePolicy) -> Self {
        self.allowance_policy = policy;
        self
    }

    /// Load a configuration from JSON
    pub fn from_json_str(json: &str) -> LedgerResult<Self> {
        serde_json::from_str(json).map_err(|e| LedgerError::Config(e.to_string()))
    }

    /// Display metadata described by this configuration
    pub fn metadata(&self) -> TokenMetadata {
        TokenMetadata::new(self.name.clone(), self.symbol.clone(), self.decimals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_defaults_policy() {
        let config = LedgerConfig::from_json_str(
            r#"{
                "name": "Test",
                "symbol": "T",
                "decimals": 6,
                "initial_supply_units": 500,
                "creator": "0x0101010101010101010101010101010101010101"
            }"#,
        )
        .unwrap();

        assert_eq!(config.allowance_policy, AllowancePolicy::UnlimitedSentinel);
        assert_eq!(config.creator, Address::repeat_byte(1));
        assert_eq!(config.metadata(), TokenMetadata::new("Test", "T", 6));
    }

    #[test]
    fn test_from_json_with_policy() {
        let config = LedgerConfig::from_json_str(
            r#"{
                "name": "Test",
                "symbol": "T",
                "decimals": 0,
                "initial_supply_units": 1,
                "creator": "0x0101010101010101010101010101010101010101",
                "allowance_policy": "always_decrement"
            }"#,
        )
        .unwrap();

        assert_eq!(config.allowance_policy, AllowancePolicy::AlwaysDecrement);
    }

    #[test]
    fn test_from_json_errors() {
        let missing_creator =
            r#"{"name": "Test", "symbol": "T", "decimals": 0, "initial_supply_units": 1}"#;
        assert!(matches!(
            LedgerConfig::from_json_str(missing_creator),
            Err(LedgerError::Config(_))
        ));

        let bad_address = r#"{
            "name": "Test", "symbol": "T", "decimals": 0,
            "initial_supply_units": 1, "creator": "0x12"
        }"#;
        assert!(matches!(
            LedgerConfig::from_json_str(bad_address),
            Err(LedgerError::Config(_))
        ));
    }

    #[test]
    fn test_builder_style_policy() {
        let config = LedgerConfig::new("Test", "T", 2, 10, Address::repeat_byte(9))
            .with_allowance_policy(AllowancePolicy::AlwaysDecrement);
        assert_eq!(config.allowance_policy, AllowancePolicy::AlwaysDecrement);
    }
}

//! Core types and data structures for the token ledger

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Raw token amount in the smallest unit (balances, allowances, supply)
pub type Amount = u128;

/// Width of an account identity in bytes
pub const ADDRESS_LEN: usize = 20;

/// Opaque account identity
///
/// The ledger only compares addresses for equality. The ordering is used for
/// deterministic iteration of staged writes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address([u8; ADDRESS_LEN]);

impl Address {
    /// The reserved null identity. It never holds a balance and cannot be a
    /// transfer recipient or an approved spender.
    pub const ZERO: Address = Address([0u8; ADDRESS_LEN]);

    /// Create an address from raw bytes
    pub const fn new(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    /// Address with every byte set to `byte`
    pub const fn repeat_byte(byte: u8) -> Self {
        Self([byte; ADDRESS_LEN])
    }

    /// Raw bytes of the address
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    /// Whether this is the null identity
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// Mixed-case checksum text form (EIP-55)
    ///
    /// A hex letter is upper-cased when the matching nibble of the Keccak-256
    /// hash of the lowercase hex digits is 8 or more.
    pub fn to_checksum(&self) -> String {
        let lower = hex::encode(self.0);
        let hash = Keccak256::digest(lower.as_bytes());

        let mut out = String::with_capacity(2 + lower.len());
        out.push_str("0x");
        for (i, c) in lower.chars().enumerate() {
            let byte = hash[i / 2];
            let nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0x0f };
            if nibble >= 8 {
                out.push(c.to_ascii_uppercase());
            } else {
                out.push(c);
            }
        }
        out
    }
}

impl FromStr for Address {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        if digits.len() != ADDRESS_LEN * 2 {
            return Err(LedgerError::InvalidAddress(format!(
                "expected {} hex digits, got {} in '{}'",
                ADDRESS_LEN * 2,
                digits.len(),
                s
            )));
        }

        let mut bytes = [0u8; ADDRESS_LEN];
        hex::decode_to_slice(digits, &mut bytes)
            .map_err(|e| LedgerError::InvalidAddress(format!("'{}': {}", s, e)))?;
        Ok(Self(bytes))
    }
}

impl TryFrom<String> for Address {
    type Error = LedgerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.to_string()
    }
}

impl From<[u8; ADDRESS_LEN]> for Address {
    fn from(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

/// Immutable display metadata of a token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    /// Human-readable token name
    pub name: String,
    /// Short ticker symbol
    pub symbol: String,
    /// Number of decimal places used when displaying amounts
    pub decimals: u8,
}

impl TokenMetadata {
    /// Create token metadata
    pub fn new(name: impl Into<String>, symbol: impl Into<String>, decimals: u8) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            decimals,
        }
    }
}

/// Snapshot of a token's metadata and supply for display collaborators
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfo {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub total_supply: Amount,
}

/// Externally observable value movements and approvals
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerEvent {
    /// Value moved between two accounts. Minting is reported with
    /// `from == Address::ZERO`.
    Transfer {
        from: Address,
        to: Address,
        amount: Amount,
    },
    /// An allowance was set to `amount`
    Approval {
        owner: Address,
        spender: Address,
        amount: Amount,
    },
}

impl LedgerEvent {
    /// Whether the given account takes part in this event
    pub fn involves(&self, account: &Address) -> bool {
        match self {
            LedgerEvent::Transfer { from, to, .. } => from == account || to == account,
            LedgerEvent::Approval { owner, spender, .. } => {
                owner == account || spender == account
            }
        }
    }
}

/// An event as recorded by a storage backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Unique identifier of the record
    pub id: Uuid,
    /// Position in the append-only log, starting at 0
    pub sequence: u64,
    /// When the event was committed
    pub recorded_at: NaiveDateTime,
    /// The event itself
    pub event: LedgerEvent,
}

impl EventRecord {
    /// Create a record for an event at the given log position
    pub fn new(sequence: u64, event: LedgerEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            sequence,
            recorded_at: chrono::Utc::now().naive_utc(),
            event,
        }
    }
}

/// Errors that can occur in the ledger system
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("Arithmetic overflow: {0}")]
    Overflow(String),
    #[error("Insufficient balance for {account}: available {available}, required {required}")]
    InsufficientBalance {
        account: Address,
        available: Amount,
        required: Amount,
    },
    #[error(
        "Insufficient allowance for spender {spender} on owner {owner}: available {available}, required {required}"
    )]
    InsufficientAllowance {
        owner: Address,
        spender: Address,
        available: Amount,
        required: Amount,
    },
    #[error("Invalid recipient: {0}")]
    InvalidRecipient(Address),
    #[error("Invalid spender: {0}")]
    InvalidSpender(Address),
    #[error("Invalid address: {0}")]
    InvalidAddress(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_parse_and_display() {
        let text = "0x00000000000000000000000000000000000000aB";
        let address: Address = text.parse().unwrap();
        assert_eq!(address.as_bytes()[19], 0xab);
        assert_eq!(
            address.to_string(),
            "0x00000000000000000000000000000000000000ab"
        );

        let unprefixed: Address = "00000000000000000000000000000000000000ab".parse().unwrap();
        assert_eq!(unprefixed, address);
    }

    #[test]
    fn test_address_checksum_form() {
        for text in [
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
            "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359",
            "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB",
            "0xD1220A0cf47c7B9Be7A2E6BA89F429762e7b9aDb",
        ] {
            let address: Address = text.to_lowercase().parse().unwrap();
            assert_eq!(address.to_checksum(), text);
        }
        assert_eq!(
            Address::ZERO.to_checksum(),
            "0x0000000000000000000000000000000000000000"
        );
    }

    #[test]
    fn test_address_rejects_bad_input() {
        assert!(matches!(
            "0x1234".parse::<Address>(),
            Err(LedgerError::InvalidAddress(_))
        ));
        assert!(matches!(
            "0xzz000000000000000000000000000000000000ab".parse::<Address>(),
            Err(LedgerError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_zero_address() {
        assert!(Address::ZERO.is_zero());
        assert!(!Address::repeat_byte(1).is_zero());
        assert_eq!(Address::default(), Address::ZERO);
    }

    #[test]
    fn test_address_serde_uses_hex_text() {
        let address = Address::repeat_byte(0x11);
        let json = serde_json::to_string(&address).unwrap();
        assert_eq!(json, format!("\"{}\"", address));

        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, address);

        assert!(serde_json::from_str::<Address>("\"0xabc\"").is_err());
    }

    #[test]
    fn test_event_involves() {
        let a = Address::repeat_byte(1);
        let b = Address::repeat_byte(2);
        let c = Address::repeat_byte(3);

        let transfer = LedgerEvent::Transfer {
            from: a,
            to: b,
            amount: 5,
        };
        assert!(transfer.involves(&a));
        assert!(transfer.involves(&b));
        assert!(!transfer.involves(&c));

        let approval = LedgerEvent::Approval {
            owner: a,
            spender: c,
            amount: 5,
        };
        assert!(approval.involves(&c));
        assert!(!approval.involves(&b));
    }

    #[test]
    fn test_event_serializes_with_variant_name() {
        let event = LedgerEvent::Approval {
            owner: Address::repeat_byte(1),
            spender: Address::repeat_byte(2),
            amount: 7,
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["approval"]["amount"], 7);

        let back: LedgerEvent = serde_json::from_value(value).unwrap();
        assert_eq!(back, event);
    }
}

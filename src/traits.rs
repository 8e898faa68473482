//! Traits for storage abstraction and extensibility

use async_trait::async_trait;

use crate::ledger::ChangeSet;
use crate::types::*;

/// Storage abstraction for the ledger tables and its event log
///
/// A backend holds the state of exactly one ledger. The ledger never writes
/// through anything but [`LedgerStorage::commit`], which receives a fully
/// validated change set and must apply all of it or none of it.
#[async_trait]
pub trait LedgerStorage: Send + Sync {
    /// Balance of an account, zero if the account was never credited
    async fn get_balance(&self, account: &Address) -> LedgerResult<Amount>;

    /// Allowance granted by `owner` to `spender`, zero if never approved
    async fn get_allowance(&self, owner: &Address, spender: &Address) -> LedgerResult<Amount>;

    /// Every stored balance entry, ordered by address
    async fn list_balances(&self) -> LedgerResult<Vec<(Address, Amount)>>;

    /// Recorded events in sequence order, optionally restricted to those
    /// involving `account`
    async fn get_events(&self, account: Option<&Address>) -> LedgerResult<Vec<EventRecord>>;

    /// Atomically apply balance writes, allowance writes and append events
    async fn commit(&mut self, changes: &ChangeSet) -> LedgerResult<()>;
}

/// Trait for implementing custom token metadata validation rules
pub trait MetadataValidator: Send + Sync {
    /// Validate metadata before the ledger is created
    fn validate_metadata(&self, metadata: &TokenMetadata) -> LedgerResult<()>;
}

/// Default metadata validator with basic rules
pub struct DefaultMetadataValidator;

impl MetadataValidator for DefaultMetadataValidator {
    fn validate_metadata(&self, metadata: &TokenMetadata) -> LedgerResult<()> {
        if metadata.name.trim().is_empty() {
            return Err(LedgerError::Validation(
                "Token name cannot be empty".to_string(),
            ));
        }

        if metadata.symbol.trim().is_empty() {
            return Err(LedgerError::Validation(
                "Token symbol cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

//! Main ledger that owns the token supply and enforces transfer rules

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::config::LedgerConfig;
use crate::ledger::{AllowancePolicy, ChangeSet};
use crate::traits::*;
use crate::types::*;
use crate::units;

/// Fixed-supply fungible token ledger
///
/// The whole supply is minted to the creator when the ledger is created;
/// afterwards value only moves between accounts. Every mutating operation
/// validates while staging a [`ChangeSet`] and then commits it in one step,
/// so a failed operation leaves balances, allowances and the event log
/// untouched.
pub struct Ledger<S: LedgerStorage> {
    storage: S,
    metadata: TokenMetadata,
    total_supply: Amount,
    allowance_policy: AllowancePolicy,
}

impl<S: LedgerStorage> Ledger<S> {
    /// Create a ledger and mint `initial_supply_units × 10^decimals` to `creator`
    pub async fn create(
        storage: S,
        name: impl Into<String>,
        symbol: impl Into<String>,
        decimals: u8,
        initial_supply_units: Amount,
        creator: Address,
    ) -> LedgerResult<Self> {
        let config = LedgerConfig::new(name, symbol, decimals, initial_supply_units, creator);
        Self::from_config(storage, &config).await
    }

    /// Create a ledger from a configuration
    pub async fn from_config(storage: S, config: &LedgerConfig) -> LedgerResult<Self> {
        Self::with_validator(storage, config, &DefaultMetadataValidator).await
    }

    /// Create a ledger with a custom metadata validator
    pub async fn with_validator(
        mut storage: S,
        config: &LedgerConfig,
        validator: &dyn MetadataValidator,
    ) -> LedgerResult<Self> {
        let metadata = config.metadata();
        validator.validate_metadata(&metadata)?;

        if config.creator.is_zero() {
            return Err(LedgerError::InvalidRecipient(config.creator));
        }

        let initial_supply =
            units::whole_units_to_raw(config.initial_supply_units, config.decimals)?;

        if !storage.list_balances().await?.is_empty()
            || !storage.get_events(None).await?.is_empty()
        {
            return Err(LedgerError::Validation(
                "Storage already holds ledger state".to_string(),
            ));
        }

        let mut changes = ChangeSet::new();
        changes.set_balance(config.creator, initial_supply);
        changes.emit(LedgerEvent::Transfer {
            from: Address::ZERO,
            to: config.creator,
            amount: initial_supply,
        });
        storage.commit(&changes).await?;

        info!(
            name = %metadata.name,
            symbol = %metadata.symbol,
            decimals = metadata.decimals,
            total_supply = %initial_supply,
            creator = %config.creator,
            "ledger created"
        );

        Ok(Self {
            storage,
            metadata,
            total_supply: initial_supply,
            allowance_policy: config.allowance_policy,
        })
    }

    // Metadata
    /// Token name
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// Token symbol
    pub fn symbol(&self) -> &str {
        &self.metadata.symbol
    }

    /// Decimal places used for display
    pub fn decimals(&self) -> u8 {
        self.metadata.decimals
    }

    pub fn metadata(&self) -> &TokenMetadata {
        &self.metadata
    }

    pub fn allowance_policy(&self) -> AllowancePolicy {
        self.allowance_policy
    }

    /// Metadata and supply snapshot
    pub fn token_info(&self) -> TokenInfo {
        TokenInfo {
            name: self.metadata.name.clone(),
            symbol: self.metadata.symbol.clone(),
            decimals: self.metadata.decimals,
            total_supply: self.total_supply,
        }
    }

    // Reads
    /// Total supply, fixed at creation
    pub fn total_supply(&self) -> Amount {
        self.total_supply
    }

    /// Balance of an account, zero if never credited
    pub async fn balance_of(&self, account: &Address) -> LedgerResult<Amount> {
        self.storage.get_balance(account).await
    }

    /// Balance of an account scaled down by the token decimals
    pub async fn balance_of_formatted(&self, account: &Address) -> LedgerResult<BigDecimal> {
        let balance = self.balance_of(account).await?;
        Ok(units::format_units(balance, self.metadata.decimals))
    }

    /// Amount `spender` may still move out of `owner`'s balance
    pub async fn allowance(&self, owner: &Address, spender: &Address) -> LedgerResult<Amount> {
        self.storage.get_allowance(owner, spender).await
    }

    /// Convert a human decimal amount such as `"12.5"` into raw units
    pub fn parse_amount(&self, value: &str) -> LedgerResult<Amount> {
        units::parse_units_str(value, self.metadata.decimals)
    }

    /// Every recorded event in sequence order
    pub async fn events(&self) -> LedgerResult<Vec<EventRecord>> {
        self.storage.get_events(None).await
    }

    /// Recorded events in which `account` takes part
    pub async fn account_events(&self, account: &Address) -> LedgerResult<Vec<EventRecord>> {
        self.storage.get_events(Some(account)).await
    }

    // Mutations
    /// Move `amount` from `sender` to `recipient`
    pub async fn transfer(
        &mut self,
        sender: Address,
        recipient: Address,
        amount: Amount,
    ) -> LedgerResult<()> {
        let mut changes = ChangeSet::new();
        self.stage_transfer(&mut changes, sender, recipient, amount)
            .await
            .inspect_err(|e| warn!(%sender, %recipient, %amount, "transfer rejected: {}", e))?;
        self.storage.commit(&changes).await?;

        debug!(%sender, %recipient, %amount, "transfer committed");
        Ok(())
    }

    /// Set the allowance of `spender` over `owner`'s balance, replacing any
    /// previous value
    pub async fn approve(
        &mut self,
        owner: Address,
        spender: Address,
        amount: Amount,
    ) -> LedgerResult<()> {
        if spender.is_zero() {
            warn!(%owner, "approval rejected: null spender");
            return Err(LedgerError::InvalidSpender(spender));
        }

        let mut changes = ChangeSet::new();
        changes.set_allowance(owner, spender, amount);
        changes.emit(LedgerEvent::Approval {
            owner,
            spender,
            amount,
        });
        self.storage.commit(&changes).await?;

        debug!(%owner, %spender, %amount, "approval committed");
        Ok(())
    }

    /// Move `amount` from `owner` to `recipient` on behalf of `spender`,
    /// consuming the allowance `owner` granted to `spender`
    pub async fn transfer_from(
        &mut self,
        spender: Address,
        owner: Address,
        recipient: Address,
        amount: Amount,
    ) -> LedgerResult<()> {
        let mut changes = ChangeSet::new();
        self.stage_transfer_from(&mut changes, spender, owner, recipient, amount)
            .await
            .inspect_err(|e| {
                warn!(%spender, %owner, %recipient, %amount, "delegated transfer rejected: {}", e)
            })?;
        self.storage.commit(&changes).await?;

        debug!(%spender, %owner, %recipient, %amount, "delegated transfer committed");
        Ok(())
    }

    async fn stage_transfer_from(
        &self,
        changes: &mut ChangeSet,
        spender: Address,
        owner: Address,
        recipient: Address,
        amount: Amount,
    ) -> LedgerResult<()> {
        if recipient.is_zero() {
            return Err(LedgerError::InvalidRecipient(recipient));
        }

        let current = self.staged_allowance(changes, &owner, &spender).await?;
        if let Some(remaining) = self
            .allowance_policy
            .spend(owner, spender, current, amount)?
        {
            changes.set_allowance(owner, spender, remaining);
            changes.emit(LedgerEvent::Approval {
                owner,
                spender,
                amount: remaining,
            });
        }

        self.stage_transfer(changes, owner, recipient, amount).await
    }

    async fn stage_transfer(
        &self,
        changes: &mut ChangeSet,
        sender: Address,
        recipient: Address,
        amount: Amount,
    ) -> LedgerResult<()> {
        if recipient.is_zero() {
            return Err(LedgerError::InvalidRecipient(recipient));
        }

        let sender_balance = self.staged_balance(changes, &sender).await?;
        if sender_balance < amount {
            return Err(LedgerError::InsufficientBalance {
                account: sender,
                available: sender_balance,
                required: amount,
            });
        }
        changes.set_balance(sender, sender_balance - amount);

        // Read after the debit so a self-transfer nets out.
        let recipient_balance = self.staged_balance(changes, &recipient).await?;
        let credited = recipient_balance.checked_add(amount).ok_or_else(|| {
            LedgerError::Overflow(format!("crediting {} to {}", amount, recipient))
        })?;
        changes.set_balance(recipient, credited);

        changes.emit(LedgerEvent::Transfer {
            from: sender,
            to: recipient,
            amount,
        });
        Ok(())
    }

    async fn staged_balance(&self, changes: &ChangeSet, account: &Address) -> LedgerResult<Amount> {
        match changes.balance(account) {
            Some(balance) => Ok(balance),
            None => self.storage.get_balance(account).await,
        }
    }

    async fn staged_allowance(
        &self,
        changes: &ChangeSet,
        owner: &Address,
        spender: &Address,
    ) -> LedgerResult<Amount> {
        match changes.allowance(owner, spender) {
            Some(allowance) => Ok(allowance),
            None => self.storage.get_allowance(owner, spender).await,
        }
    }

    // Integrity
    /// Check that the balances add up to the total supply
    pub async fn validate_integrity(&self) -> LedgerResult<IntegrityReport> {
        let balances = self.storage.list_balances().await?;
        let mut issues = Vec::new();

        let sum_of_balances = balances
            .iter()
            .try_fold(0 as Amount, |sum, (_, amount)| sum.checked_add(*amount));
        let holder_count = balances.iter().filter(|(_, amount)| *amount > 0).count();

        match sum_of_balances {
            Some(sum) if sum != self.total_supply => issues.push(format!(
                "Sum of balances {} does not match total supply {}",
                sum, self.total_supply
            )),
            Some(_) => {}
            None => issues.push("Sum of balances overflows the amount width".to_string()),
        }

        if let Some((_, amount)) = balances
            .iter()
            .find(|(account, amount)| account.is_zero() && *amount > 0)
        {
            issues.push(format!("Null identity holds a balance of {}", amount));
        }

        if !issues.is_empty() {
            error!(issues = ?issues, "ledger integrity check failed");
        }

        Ok(IntegrityReport {
            total_supply: self.total_supply,
            sum_of_balances,
            holder_count,
            is_valid: issues.is_empty(),
            issues,
        })
    }
}

/// Report on ledger integrity and validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrityReport {
    pub total_supply: Amount,
    /// `None` when the sum does not fit the amount width
    pub sum_of_balances: Option<Amount>,
    /// Accounts with a non-zero balance
    pub holder_count: usize,
    pub is_valid: bool,
    pub issues: Vec<String>,
}

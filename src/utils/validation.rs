//! Validation utilities

use crate::traits::*;
use crate::types::*;
use crate::units::unit_scale;

/// Largest number of decimals whose unit scale fits the amount width
pub const MAX_DECIMALS: u8 = 38;

/// Validate that a token name is valid
pub fn validate_token_name(name: &str) -> LedgerResult<()> {
    if name.trim().is_empty() {
        return Err(LedgerError::Validation(
            "Token name cannot be empty".to_string(),
        ));
    }

    if name.len() > 64 {
        return Err(LedgerError::Validation(
            "Token name cannot exceed 64 characters".to_string(),
        ));
    }

    Ok(())
}

/// Validate that a token symbol is valid
pub fn validate_token_symbol(symbol: &str) -> LedgerResult<()> {
    if symbol.is_empty() {
        return Err(LedgerError::Validation(
            "Token symbol cannot be empty".to_string(),
        ));
    }

    if symbol.len() > 11 {
        return Err(LedgerError::Validation(
            "Token symbol cannot exceed 11 characters".to_string(),
        ));
    }

    if !symbol
        .chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
    {
        return Err(LedgerError::Validation(
            "Token symbol can only contain uppercase letters and digits".to_string(),
        ));
    }

    Ok(())
}

/// Validate that amounts with this many decimals can be represented
pub fn validate_decimals(decimals: u8) -> LedgerResult<()> {
    if decimals > MAX_DECIMALS {
        return Err(LedgerError::Validation(format!(
            "Decimals cannot exceed {}",
            MAX_DECIMALS
        )));
    }
    unit_scale(decimals).map(|_| ())
}

/// Strict metadata validator for tokens shown to end users
pub struct StrictMetadataValidator;

impl MetadataValidator for StrictMetadataValidator {
    fn validate_metadata(&self, metadata: &TokenMetadata) -> LedgerResult<()> {
        validate_token_name(&metadata.name)?;
        validate_token_symbol(&metadata.symbol)?;
        validate_decimals(metadata.decimals)?;
        Ok(())
    }
}

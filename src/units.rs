//! Conversion between raw amounts and human-readable decimal amounts

use bigdecimal::num_bigint::BigInt;
use bigdecimal::num_traits::{ToPrimitive, Zero};
use bigdecimal::BigDecimal;
use std::str::FromStr;

use crate::types::*;

const MAX_SCALE_EXPONENT: u64 = 4096;

/// `10^decimals` as a raw amount
pub fn unit_scale(decimals: u8) -> LedgerResult<Amount> {
    Amount::from(10u8)
        .checked_pow(u32::from(decimals))
        .ok_or_else(|| LedgerError::Overflow(format!("10^{} exceeds the amount width", decimals)))
}

/// Convert whole token units into raw amount (`units × 10^decimals`)
pub fn whole_units_to_raw(units: Amount, decimals: u8) -> LedgerResult<Amount> {
    let scale = unit_scale(decimals)?;
    units.checked_mul(scale).ok_or_else(|| {
        LedgerError::Overflow(format!(
            "{} units with {} decimals exceeds the amount width",
            units, decimals
        ))
    })
}

/// Scale a raw amount down for display
pub fn format_units(amount: Amount, decimals: u8) -> BigDecimal {
    BigDecimal::new(BigInt::from(amount), i64::from(decimals))
}

/// Convert a human decimal amount into raw units
///
/// Rejects negative values, values with more fractional digits than
/// `decimals`, and values that do not fit the amount width.
pub fn parse_units(value: &BigDecimal, decimals: u8) -> LedgerResult<Amount> {
    if *value < BigDecimal::from(0) {
        return Err(LedgerError::Validation(format!(
            "Amount cannot be negative: {}",
            value
        )));
    }

    // value == digits * 10^-exponent
    let (digits, exponent) = value.as_bigint_and_exponent();
    if digits.is_zero() {
        return Ok(0);
    }

    let shift = i64::from(decimals).checked_sub(exponent).ok_or_else(|| {
        LedgerError::Overflow(format!("Amount {} exceeds the amount width", value))
    })?;

    let raw = if shift >= 0 {
        if shift.unsigned_abs() > MAX_SCALE_EXPONENT {
            return Err(LedgerError::Overflow(format!(
                "Amount {} exceeds the amount width",
                value
            )));
        }
        digits * pow10(shift.unsigned_abs())
    } else {
        let dropped = shift.unsigned_abs();
        // A non-zero value cannot be a multiple of a power of ten wider than itself
        let digit_count = digits.magnitude().to_string().len() as u64;
        if dropped > digit_count {
            return Err(too_precise(value, decimals));
        }
        let divisor = pow10(dropped);
        if !(&digits % &divisor).is_zero() {
            return Err(too_precise(value, decimals));
        }
        digits / divisor
    };

    raw.to_u128().ok_or_else(|| {
        LedgerError::Overflow(format!("Amount {} exceeds the amount width", value))
    })
}

/// Parse a human decimal string such as `"12.5"` into raw units
pub fn parse_units_str(value: &str, decimals: u8) -> LedgerResult<Amount> {
    let parsed = BigDecimal::from_str(value.trim())
        .map_err(|e| LedgerError::Validation(format!("Invalid amount '{}': {}", value, e)))?;
    parse_units(&parsed, decimals)
}

fn too_precise(value: &BigDecimal, decimals: u8) -> LedgerError {
    LedgerError::Validation(format!(
        "Amount {} has more than {} fractional digits",
        value, decimals
    ))
}

fn pow10(exp: u64) -> BigInt {
    BigInt::from(10u8).pow(exp as u32)
}

//! Conversion between base units and display units.
//!
//! All arithmetic that can feed back into a transaction stays in base units
//! ([`U256`]). Display strings are produced only for presentation.
//!
//! # Precision
//! Amounts with more than [`BASE_UNITS_DECIMALS`] fractional digits are
//! truncated toward zero when converted to base units.

use alloy::primitives::U256;

use crate::chain::types::{ChainError, ChainResult};

/// Number of fractional digits between display units and base units.
pub const BASE_UNITS_DECIMALS: usize = 18;

/// Base units per display unit (10^18).
pub const BASE_UNITS_PER_DISPLAY_UNIT: u64 = 1_000_000_000_000_000_000;

/// Parse a plain decimal string (e.g. `"1.25"`) into base units.
///
/// Fractional digits past the 18th are dropped. Signs and exponents are rejected.
pub fn parse_base_units(text: &str) -> ChainResult<U256> {
    let text = text.trim();
    let (whole, frac) = text.split_once('.').unwrap_or((text, ""));

    if whole.is_empty() && frac.is_empty() {
        return Err(ChainError::Conversion(format!(
            "'{}' is not a decimal amount",
            text
        )));
    }
    let is_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if !is_digits(whole) || !is_digits(frac) {
        return Err(ChainError::Conversion(format!(
            "'{}' is not a decimal amount",
            text
        )));
    }

    let frac = &frac[..frac.len().min(BASE_UNITS_DECIMALS)];
    let digits = format!("{whole}{frac:0<width$}", width = BASE_UNITS_DECIMALS);

    U256::from_str_radix(&digits, 10)
        .map_err(|e| ChainError::Conversion(format!("'{}' is out of range: {}", text, e)))
}

/// Convert a display-unit float to base units (multiply by 10^18, truncate).
///
/// The float is taken at its shortest round-trip decimal representation, so
/// `0.1` becomes exactly 10^17 base units.
pub fn to_base_units(amount: f64) -> ChainResult<U256> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(ChainError::Conversion(format!(
            "{} cannot be converted to base units",
            amount
        )));
    }
    // -0.0 would otherwise render with a sign
    if amount == 0.0 {
        return Ok(U256::ZERO);
    }
    parse_base_units(&amount.to_string())
}

/// Exact decimal rendering of a base-unit amount in display units.
///
/// Trailing zeros are trimmed, keeping at least one fractional digit.
pub fn to_display_units(value: U256) -> String {
    let scale = U256::from(BASE_UNITS_PER_DISPLAY_UNIT);
    let whole = value / scale;
    let frac = (value % scale).to_string();
    let padded = format!("{frac:0>width$}", width = BASE_UNITS_DECIMALS);
    let trimmed = padded.trim_end_matches('0');

    if trimmed.is_empty() {
        format!("{whole}.0")
    } else {
        format!("{whole}.{trimmed}")
    }
}

/// Validate a caller-supplied amount before it reaches the core.
///
/// Rejects anything that is not a finite number greater than zero.
pub fn parse_amount(text: &str) -> ChainResult<f64> {
    let amount: f64 = text.trim().parse().map_err(|e| {
        ChainError::Conversion(format!("failed to parse '{}' as a number: {}", text, e))
    })?;

    if !amount.is_finite() {
        return Err(ChainError::Conversion(format!("'{}' is not a finite amount", text)));
    }
    if amount <= 0.0 {
        return Err(ChainError::Conversion(
            "amount should be greater than zero".to_string(),
        ));
    }
    Ok(amount)
}

//! Decimal money helpers.
//!
//! Amounts are kept as `BigDecimal` in major units. The provider wants the
//! outbound amount as an integer count of minor units.

use bigdecimal::{BigDecimal, RoundingMode};
use std::str::FromStr;

use super::ValidationError;

/// Number of decimal places carried by every supported currency.
pub const MINOR_UNIT_SCALE: i64 = 2;

/// Formats an amount as an integer string of minor units.
///
/// The amount is first quantized to two decimals with half-to-even rounding,
/// so `12.3456` becomes `"1235"` and `12.345` becomes `"1234"`.
pub fn to_minor_units(amount: &BigDecimal) -> String {
    let quantized = amount.with_scale_round(MINOR_UNIT_SCALE, RoundingMode::HalfEven);
    let (digits, scale) = quantized.as_bigint_and_exponent();
    debug_assert_eq!(scale, MINOR_UNIT_SCALE);
    digits.to_string()
}

/// Parses a decimal amount in major units as sent by the provider.
pub fn parse_amount(raw: &str) -> Result<BigDecimal, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::empty_field("amount"));
    }
    BigDecimal::from_str(trimmed)
        .map_err(|e| ValidationError::invalid_format("amount", e.to_string()))
}

//! Parsing and rounding helpers shared by every calculator.

use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places kept for monetary and percentage values.
pub const MONEY_SCALE: u32 = 2;

/// Parses a raw form value into a decimal.
///
/// Accepts plain (`"150"`, `"-3.5"`) and scientific (`"1e3"`) notation after
/// trimming whitespace. Empty or non-numeric input yields zero.
pub fn parse_decimal(raw: &str) -> Decimal {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Decimal::ZERO;
    }

    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .unwrap_or(Decimal::ZERO)
}

/// Parses a checkbox-style value. Only `true`, `1`, `yes` and `on` count as set.
pub fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}

/// Rounds to cents, half away from zero.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds to a whole count, half away from zero, floored at zero.
pub fn round_count(value: Decimal) -> u32 {
    if value <= Decimal::ZERO {
        return 0;
    }

    value
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u32()
        .unwrap_or(u32::MAX)
}

/// Maps non-positive derived values to the unset state.
pub fn positive_or_unset(value: Decimal) -> Option<Decimal> {
    (value > Decimal::ZERO).then_some(value)
}

/// Reads an optional derived value, treating unset as zero.
pub fn or_zero(value: Option<Decimal>) -> Decimal {
    value.unwrap_or(Decimal::ZERO)
}

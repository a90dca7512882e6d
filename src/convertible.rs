//! Quantities that can be entered either as an absolute amount or as a
//! percentage of some anchor value (discount, maintenance, reservation,
//! down payment).

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::numeric::round_money;

/// How a convertible quantity is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValueKind {
    #[default]
    Amount,
    Percentage,
}

impl FromStr for ValueKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "amount" | "fixed" => Ok(ValueKind::Amount),
            "percentage" | "percent" | "%" => Ok(ValueKind::Percentage),
            _ => Err(()),
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Amount => write!(f, "amount"),
            ValueKind::Percentage => write!(f, "percentage"),
        }
    }
}

/// Converts `value` from one representation to the other against `anchor`.
///
/// A non-positive anchor or value makes this a no-op, so nothing is divided by
/// zero and no value is manufactured from nothing. A result too large for a
/// `Decimal` is a no-op as well. The result is rounded to cents.
pub fn convert(value: Decimal, from: ValueKind, to: ValueKind, anchor: Decimal) -> Decimal {
    if from == to || anchor <= Decimal::ZERO || value <= Decimal::ZERO {
        return value;
    }

    let converted = match to {
        ValueKind::Percentage => value
            .checked_div(anchor)
            .and_then(|ratio| ratio.checked_mul(dec!(100))),
        ValueKind::Amount => (value / dec!(100)).checked_mul(anchor),
    };

    converted.map(round_money).unwrap_or(value)
}

/// A value tagged with its representation.
///
/// Percentages are resolved against the anchor each time they are read, so
/// they follow the anchor live. Amounts ignore the anchor and stay frozen until
/// edited. Re-tagging goes through [`Convertible::convert_to`], the only place
/// where the two representations are translated into each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum Convertible {
    Amount(Decimal),
    Percentage(Decimal),
}

impl Default for Convertible {
    fn default() -> Self {
        Convertible::Amount(Decimal::ZERO)
    }
}

impl Convertible {
    /// Builds a value of the given kind.
    pub fn new(kind: ValueKind, value: Decimal) -> Self {
        match kind {
            ValueKind::Amount => Convertible::Amount(value),
            ValueKind::Percentage => Convertible::Percentage(value),
        }
    }

    /// Whether the number is an amount or a percentage.
    pub fn kind(&self) -> ValueKind {
        match self {
            Convertible::Amount(_) => ValueKind::Amount,
            Convertible::Percentage(_) => ValueKind::Percentage,
        }
    }

    /// The raw number as entered, without interpreting it.
    pub fn value(&self) -> Decimal {
        match self {
            Convertible::Amount(v) | Convertible::Percentage(v) => *v,
        }
    }

    /// Replaces the number while keeping the representation.
    pub fn with_value(self, value: Decimal) -> Self {
        Convertible::new(self.kind(), value)
    }

    /// Re-tags the number without converting it.
    pub fn with_kind(self, kind: ValueKind) -> Self {
        Convertible::new(kind, self.value())
    }

    /// Switches representation, converting the number against `anchor`.
    pub fn convert_to(self, kind: ValueKind, anchor: Decimal) -> Self {
        Convertible::new(kind, convert(self.value(), self.kind(), kind, anchor))
    }

    /// The absolute amount this value stands for, or `None` if it does not
    /// fit in a `Decimal`.
    pub fn resolve(&self, anchor: Decimal) -> Option<Decimal> {
        match self {
            Convertible::Amount(v) => Some(*v),
            Convertible::Percentage(p) => (*p / dec!(100)).checked_mul(anchor),
        }
    }
}

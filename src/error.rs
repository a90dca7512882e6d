//! Errors raised at the edit and schedule boundaries.
//!
//! The numeric core itself is total: bad numbers parse as zero and degenerate
//! anchors turn conversions into no-ops. Only malformed edits (unknown fields,
//! unknown selector values, unparseable dates), calendar overflow and schedule
//! amounts too large for a `Decimal` surface here.

use thiserror::Error;

/// Errors that can occur while editing a pricing session or generating a schedule.
#[derive(Debug, Error)]
pub enum PricingError {
    /// The form sent a field name this engine does not know.
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// The form tried to write a value the engine derives itself.
    #[error("Field is derived and cannot be edited: {0}")]
    ReadOnlyField(String),

    /// A selector field received a value that names none of its options.
    #[error("Invalid value {value:?} for selector {field}")]
    InvalidSelection {
        field: &'static str,
        value: String,
    },

    /// A date field could not be parsed as `YYYY-MM-DD`.
    #[error("Invalid date: {0:?}")]
    InvalidDate(String),

    /// No installment plan exists at the given position.
    #[error("Installment plan not found at index {0}")]
    PlanNotFound(usize),

    /// A schedule asked for more installments than the engine allows.
    #[error("Too many installments: requested {requested}, maximum is {max}")]
    TooManyInstallments {
        requested: u32,
        max: u32,
    },

    /// A due date fell outside the supported calendar range.
    #[error("Due date out of range: {months} months after {start}")]
    DateOutOfRange {
        start: chrono::NaiveDate,
        months: u32,
    },

    /// A schedule amount does not fit in a `Decimal`.
    #[error("Schedule amount out of range for base price {base_price}")]
    AmountOutOfRange {
        base_price: rust_decimal::Decimal,
    },

    /// Snapshot (de)serialization failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PricingError>;

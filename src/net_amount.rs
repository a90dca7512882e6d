//! Price after discount and the net amount the buyer owes.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::convertible::Convertible;
use crate::numeric::positive_or_unset;

/// Inputs of the net amount calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetAmountInput {
    /// Total price of the unit; anchor for percentage discount and maintenance.
    pub total_price: Decimal,
    pub discount: Convertible,
    pub garage_amount: Decimal,
    pub maintenance: Convertible,
}

/// Derived amounts. Non-positive or unrepresentable results are unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetAmount {
    pub total_after_discount: Option<Decimal>,
    pub net_amount: Option<Decimal>,
}

/// Combines price, discount, garage fee and maintenance fee.
pub fn calculate_net_amount(input: &NetAmountInput) -> NetAmount {
    let total_after_discount = input
        .discount
        .resolve(input.total_price)
        .and_then(|discount| input.total_price.checked_sub(discount));
    let net_amount = total_after_discount
        .and_then(|total| total.checked_add(input.garage_amount))
        .zip(input.maintenance.resolve(input.total_price))
        .and_then(|(total, maintenance)| total.checked_add(maintenance));

    NetAmount {
        total_after_discount: total_after_discount.and_then(positive_or_unset),
        net_amount: net_amount.and_then(positive_or_unset),
    }
}

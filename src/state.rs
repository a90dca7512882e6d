//! The pricing record of one unit.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::area::{AreaInput, calculate_area_price};
use crate::convertible::Convertible;
use crate::net_amount::{NetAmountInput, calculate_net_amount};
use crate::numeric::or_zero;

/// Prices of a unit as entered, together with the totals derived from them.
///
/// Both area layouts are kept so toggling `has_split_area` does not lose input.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitPricingState {
    pub has_split_area: bool,
    /// Built-up area in square meters.
    pub bua: Decimal,
    pub internal_area: Decimal,
    pub external_area: Decimal,
    pub meter_price: Decimal,
    pub internal_meter_price: Decimal,
    pub external_meter_price: Decimal,
    /// Percentages are taken from the total price.
    pub discount: Convertible,
    pub garage_amount: Decimal,
    /// Percentages are taken from the total price.
    pub maintenance: Convertible,
    /// Percentages are taken from the net amount.
    pub reservation: Convertible,

    /// Derived.
    #[serde(default)]
    pub total_area: Option<Decimal>,
    /// Derived.
    #[serde(default)]
    pub total_price: Option<Decimal>,
    /// Derived.
    #[serde(default)]
    pub total_after_discount: Option<Decimal>,
    /// Derived.
    #[serde(default)]
    pub net_amount: Option<Decimal>,
}

impl UnitPricingState {
    pub fn area_input(&self) -> AreaInput {
        if self.has_split_area {
            AreaInput::Split {
                internal_area: self.internal_area,
                external_area: self.external_area,
                internal_meter_price: self.internal_meter_price,
                external_meter_price: self.external_meter_price,
            }
        } else {
            AreaInput::Single {
                bua: self.bua,
                meter_price: self.meter_price,
            }
        }
    }

    /// Anchor for discount and maintenance percentages.
    pub fn price_anchor(&self) -> Decimal {
        or_zero(self.total_price)
    }

    /// Anchor for reservation and down payment percentages.
    pub fn net_anchor(&self) -> Decimal {
        or_zero(self.net_amount)
    }

    /// The reservation expressed as an absolute amount, `None` if it does not
    /// fit in a `Decimal`.
    pub fn effective_reservation(&self) -> Option<Decimal> {
        self.reservation.resolve(self.net_anchor())
    }

    /// Returns the record with area, price and net amount recomputed in
    /// dependency order.
    pub fn recomputed(mut self) -> Self {
        let area_price = calculate_area_price(&self.area_input());
        self.total_area = area_price.total_area;
        self.total_price = area_price.total_price;

        let net = calculate_net_amount(&NetAmountInput {
            total_price: self.price_anchor(),
            discount: self.discount,
            garage_amount: self.garage_amount,
            maintenance: self.maintenance,
        });
        self.total_after_discount = net.total_after_discount;
        self.net_amount = net.net_amount;

        tracing::trace!(
            total_area = ?self.total_area,
            total_price = ?self.total_price,
            total_after_discount = ?self.total_after_discount,
            net_amount = ?self.net_amount,
            "recomputed unit totals"
        );

        self
    }
}

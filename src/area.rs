//! Total area and total price of a unit.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::numeric::positive_or_unset;

/// Area inputs of a unit, either a single built-up area or split zones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AreaInput {
    /// Built-up area priced at one meter price.
    Single { bua: Decimal, meter_price: Decimal },
    /// Internal and external zones, each with its own meter price.
    Split {
        internal_area: Decimal,
        external_area: Decimal,
        internal_meter_price: Decimal,
        external_meter_price: Decimal,
    },
}

/// Derived totals. Non-positive or unrepresentable results are unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaPrice {
    /// Total area in square meters.
    pub total_area: Option<Decimal>,
    /// Area multiplied by meter price, summed over zones.
    pub total_price: Option<Decimal>,
}

/// Computes total area and total price.
pub fn calculate_area_price(input: &AreaInput) -> AreaPrice {
    let (total_area, total_price) = match *input {
        AreaInput::Single { bua, meter_price } => (Some(bua), bua.checked_mul(meter_price)),
        AreaInput::Split {
            internal_area,
            external_area,
            internal_meter_price,
            external_meter_price,
        } => {
            let internal_price = internal_area.checked_mul(internal_meter_price);
            let external_price = external_area.checked_mul(external_meter_price);
            (
                internal_area.checked_add(external_area),
                internal_price
                    .zip(external_price)
                    .and_then(|(internal, external)| internal.checked_add(external)),
            )
        }
    };

    AreaPrice {
        total_area: total_area.and_then(positive_or_unset),
        total_price: total_price.and_then(positive_or_unset),
    }
}

//! Effective down payment of an installment plan.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::convertible::Convertible;

/// Where the down payment of a plan comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DownPaymentSource {
    /// The unit's reservation amount doubles as the down payment.
    #[default]
    FromReservation,
    /// The plan carries its own down payment.
    Custom,
}

impl FromStr for DownPaymentSource {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', '_', ' '], "").as_str() {
            "fromreservation" | "reservation" => Ok(DownPaymentSource::FromReservation),
            "custom" => Ok(DownPaymentSource::Custom),
            _ => Err(()),
        }
    }
}

impl fmt::Display for DownPaymentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DownPaymentSource::FromReservation => write!(f, "fromReservation"),
            DownPaymentSource::Custom => write!(f, "custom"),
        }
    }
}

/// Resolves the down payment used by the balancer.
///
/// Both branches keep their own value; picking one never copies or converts
/// the other. `None` means the percentage does not fit in a `Decimal`.
pub fn resolve_down_payment(
    source: DownPaymentSource,
    reservation: Convertible,
    custom: Convertible,
    net_amount: Decimal,
) -> Option<Decimal> {
    match source {
        DownPaymentSource::FromReservation => reservation.resolve(net_amount),
        DownPaymentSource::Custom => custom.resolve(net_amount),
    }
}

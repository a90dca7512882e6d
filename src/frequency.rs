//! Payment cadences.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The periodic interval of a recurring payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Frequency {
    #[default]
    Monthly,
    Quarterly,
    SemiAnnual,
    Annual,
}

impl Frequency {
    /// How many payments of this cadence fall in one year.
    pub fn periods_per_year(&self) -> u32 {
        match self {
            Frequency::Monthly => 12,
            Frequency::Quarterly => 4,
            Frequency::SemiAnnual => 2,
            Frequency::Annual => 1,
        }
    }

    /// Number of periods in `years`, rounded to the nearest whole period.
    ///
    /// Saturates at `u32::MAX` for durations too long to count, and is zero
    /// for non-positive durations.
    pub fn periods_in(&self, years: Decimal) -> u32 {
        match years.checked_mul(Decimal::from(self.periods_per_year())) {
            Some(periods) => crate::numeric::round_count(periods),
            None if years > Decimal::ZERO => u32::MAX,
            None => 0,
        }
    }

    /// Months between two rows of a generated schedule.
    ///
    /// The schedule generator only distinguishes quarterly from monthly rows;
    /// every other cadence steps one month at a time.
    pub fn schedule_step_months(&self) -> u32 {
        match self {
            Frequency::Quarterly => 3,
            _ => 1,
        }
    }
}

impl FromStr for Frequency {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', '_', ' '], "").as_str() {
            "monthly" => Ok(Frequency::Monthly),
            "quarterly" => Ok(Frequency::Quarterly),
            "semiannual" | "semiannually" => Ok(Frequency::SemiAnnual),
            "annual" | "annually" | "yearly" => Ok(Frequency::Annual),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Frequency::Monthly => "monthly",
            Frequency::Quarterly => "quarterly",
            Frequency::SemiAnnual => "semiAnnual",
            Frequency::Annual => "annual",
        };
        write!(f, "{}", name)
    }
}

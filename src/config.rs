//! Engine configuration.

use anyhow::Context;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::down_payment::DownPaymentSource;
use crate::frequency::Frequency;
use crate::schedule::DEFAULT_DRIFT_TOLERANCE;

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Smallest schedule drift that gets absorbed by the last row.
    pub drift_tolerance: Decimal,
    /// Upper bound on installments per generated schedule.
    pub max_installments: u32,
    /// Installment cadence of newly added plans.
    pub default_installment_frequency: Frequency,
    /// Extra payment cadence of newly added plans.
    pub default_extra_payment_frequency: Frequency,
    /// Down payment source of newly added plans.
    pub default_down_payment_source: DownPaymentSource,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            drift_tolerance: DEFAULT_DRIFT_TOLERANCE,
            max_installments: 1200,
            default_installment_frequency: Frequency::Monthly,
            default_extra_payment_frequency: Frequency::Annual,
            default_down_payment_source: DownPaymentSource::FromReservation,
        }
    }
}

impl EngineConfig {
    /// Loads configuration from `UNIT_FINANCING_*` environment variables.
    ///
    /// Keys that are not set keep their default value.
    pub fn from_env() -> anyhow::Result<Self> {
        ::config::Config::builder()
            .add_source(::config::Environment::with_prefix("UNIT_FINANCING").try_parsing(true))
            .build()
            .context("failed to read engine configuration from environment")?
            .try_deserialize()
            .context("invalid engine configuration")
    }
}

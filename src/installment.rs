//! Installment plans and the balancer that spreads the leftover balance as
//! periodic extra payments.
//!
//! A plan pays the net amount of a unit through a down payment, an optional
//! receipt, a fixed installment repeated at its cadence for the plan's
//! duration and, if that is not enough, an extra payment at a second cadence.
//! The extra payment is derived so the plan amortizes the whole principal:
//!
//! ```text
//! leftover      = net - down payment - receipt - installment × installments
//! extra payment = round(leftover / extra payment count, 2)
//! ```

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::convertible::Convertible;
use crate::down_payment::{DownPaymentSource, resolve_down_payment};
use crate::frequency::Frequency;
use crate::numeric::round_money;

/// Inputs of the balancer, already resolved to plain numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceInput {
    pub net_amount: Decimal,
    /// `None` when the down payment could not be resolved.
    pub effective_down_payment: Option<Decimal>,
    pub receipt_amount: Decimal,
    pub installment_amount: Decimal,
    pub installment_frequency: Frequency,
    pub years: Decimal,
    pub extra_payment_frequency: Frequency,
}

/// Result of balancing a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Balance {
    /// Number of fixed installments that fit the plan duration.
    pub installments_count: u32,
    /// Amount not covered by down payment, receipt and fixed installments;
    /// `None` if it does not fit in a `Decimal`.
    pub leftover: Option<Decimal>,
    /// Number of extra payments over the plan duration.
    pub extra_payment_count: u32,
    /// Amount of each extra payment; zero when nothing is left over.
    pub extra_payment: Decimal,
}

/// Computes installment and extra payment counts and the extra payment amount.
///
/// Only rounds the final division, so feeding the same input twice always
/// yields the same balance. An undetermined leftover yields no extra payment.
pub fn balance_installments(input: &BalanceInput) -> Balance {
    let installments_count = input.installment_frequency.periods_in(input.years);

    let base = input
        .effective_down_payment
        .and_then(|down| input.net_amount.checked_sub(down))
        .and_then(|base| base.checked_sub(input.receipt_amount));
    let paid_by_fixed_installments = input
        .installment_amount
        .checked_mul(Decimal::from(installments_count));
    let leftover = base
        .zip(paid_by_fixed_installments)
        .and_then(|(base, paid)| base.checked_sub(paid));

    let extra_payment_count = if input.years > Decimal::ZERO {
        input.extra_payment_frequency.periods_in(input.years)
    } else {
        0
    };

    let extra_payment = match leftover {
        Some(leftover) if extra_payment_count > 0 && leftover > Decimal::ZERO => {
            round_money(leftover / Decimal::from(extra_payment_count))
        }
        _ => Decimal::ZERO,
    };

    Balance {
        installments_count,
        leftover,
        extra_payment_count,
        extra_payment,
    }
}

/// One way of paying for a unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallmentPlan {
    /// Down payment used when the source is [`DownPaymentSource::Custom`].
    pub down_payment: Convertible,
    pub down_payment_source: DownPaymentSource,
    /// Amount paid on contract signature.
    pub receipt_amount: Decimal,
    /// Fixed amount of each regular installment.
    pub installment_amount: Decimal,
    pub installment_frequency: Frequency,
    /// Plan duration.
    pub years: Decimal,
    pub delivery_date: Option<NaiveDate>,
    /// Cadence of the derived extra payment.
    pub extra_payment_frequency: Frequency,
    /// Derived: number of regular installments.
    #[serde(default)]
    pub installments_count: u32,
    /// Derived: amount of each extra payment.
    #[serde(default)]
    pub extra_payment: Decimal,
    /// Derived: number of extra payments.
    #[serde(default)]
    pub extra_payment_count: u32,
}

impl InstallmentPlan {
    /// Creates an empty plan with the given cadences and down payment source.
    pub fn new(
        installment_frequency: Frequency,
        extra_payment_frequency: Frequency,
        down_payment_source: DownPaymentSource,
    ) -> Self {
        Self {
            down_payment: Convertible::default(),
            down_payment_source,
            receipt_amount: Decimal::ZERO,
            installment_amount: Decimal::ZERO,
            installment_frequency,
            years: Decimal::ZERO,
            delivery_date: None,
            extra_payment_frequency,
            installments_count: 0,
            extra_payment: Decimal::ZERO,
            extra_payment_count: 0,
        }
    }

    /// The down payment this plan uses, given the unit's reservation and net amount.
    pub fn effective_down_payment(
        &self,
        reservation: Convertible,
        net_amount: Decimal,
    ) -> Option<Decimal> {
        resolve_down_payment(self.down_payment_source, reservation, self.down_payment, net_amount)
    }

    /// Returns the plan with its derived fields recomputed.
    ///
    /// User-entered fields are left untouched.
    pub fn rebalanced(mut self, reservation: Convertible, net_amount: Decimal) -> Self {
        let balance = balance_installments(&BalanceInput {
            net_amount,
            effective_down_payment: self.effective_down_payment(reservation, net_amount),
            receipt_amount: self.receipt_amount,
            installment_amount: self.installment_amount,
            installment_frequency: self.installment_frequency,
            years: self.years,
            extra_payment_frequency: self.extra_payment_frequency,
        });

        tracing::trace!(
            installments = balance.installments_count,
            leftover = ?balance.leftover,
            extra_payment = %balance.extra_payment,
            extra_payment_count = balance.extra_payment_count,
            "rebalanced installment plan"
        );

        self.installments_count = balance.installments_count;
        self.extra_payment = balance.extra_payment;
        self.extra_payment_count = balance.extra_payment_count;
        self
    }
}

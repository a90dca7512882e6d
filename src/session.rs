//! A pricing session: one unit being priced, its installment plans, and the
//! edits that move them from one consistent state to the next.
//!
//! Every accepted edit is applied to a copy of the record, the derived fields
//! are recomputed once in dependency order (area, net amount, then each plan's
//! down payment and balance), and only then does the copy replace the record.

use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::convertible::ValueKind;
use crate::down_payment::DownPaymentSource;
use crate::error::{PricingError, Result};
use crate::fields::{PlanField, UnitField};
use crate::frequency::Frequency;
use crate::installment::InstallmentPlan;
use crate::numeric::{parse_decimal, parse_flag};
use crate::schedule::{AmortizationSchedule, ScheduleRequest, generate_schedule_with_tolerance};
use crate::state::UnitPricingState;

/// Everything the save collaborator persists for a unit.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingSnapshot {
    pub unit: UnitPricingState,
    pub plans: Vec<InstallmentPlan>,
}

impl PricingSnapshot {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

fn parse_selection<T: FromStr>(field: &'static str, raw: &str) -> Result<T> {
    raw.parse::<T>().map_err(|_| PricingError::InvalidSelection {
        field,
        value: raw.to_string(),
    })
}

fn parse_date(raw: &str) -> Result<Option<NaiveDate>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| PricingError::InvalidDate(raw.to_string()))
}

#[derive(Debug, Clone)]
pub struct PricingSession {
    config: EngineConfig,
    unit: UnitPricingState,
    plans: Vec<InstallmentPlan>,
}

impl Default for PricingSession {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl PricingSession {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            unit: UnitPricingState::default(),
            plans: Vec::new(),
        }
    }

    /// Rebuilds a session from a stored snapshot, recomputing every derived field.
    pub fn restore(snapshot: PricingSnapshot, config: EngineConfig) -> Self {
        let mut session = Self::new(config);
        session.commit(snapshot.unit, snapshot.plans);
        session
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn unit(&self) -> &UnitPricingState {
        &self.unit
    }

    pub fn plans(&self) -> &[InstallmentPlan] {
        &self.plans
    }

    pub fn plan(&self, index: usize) -> Result<&InstallmentPlan> {
        self.plans.get(index).ok_or(PricingError::PlanNotFound(index))
    }

    pub fn snapshot(&self) -> PricingSnapshot {
        PricingSnapshot {
            unit: self.unit.clone(),
            plans: self.plans.clone(),
        }
    }

    /// Appends a plan seeded from the configured defaults and returns its index.
    pub fn add_plan(&mut self) -> usize {
        let plan = InstallmentPlan::new(
            self.config.default_installment_frequency,
            self.config.default_extra_payment_frequency,
            self.config.default_down_payment_source,
        );
        let mut plans = self.plans.clone();
        plans.push(plan);
        self.commit(self.unit.clone(), plans);

        tracing::debug!(plans = self.plans.len(), "added installment plan");
        self.plans.len() - 1
    }

    pub fn remove_plan(&mut self, index: usize) -> Result<InstallmentPlan> {
        if index >= self.plans.len() {
            return Err(PricingError::PlanNotFound(index));
        }
        Ok(self.plans.remove(index))
    }

    /// Applies an edit to a unit field identified by its form name.
    pub fn edit_unit(&mut self, name: &str, raw: &str) -> Result<()> {
        let field = name.parse::<UnitField>().inspect_err(|error| {
            tracing::warn!(field = name, %error, "rejected unit edit");
        })?;
        self.apply_unit_edit(field, raw)
    }

    /// Applies an edit to a plan field identified by its form name.
    pub fn edit_plan(&mut self, index: usize, name: &str, raw: &str) -> Result<()> {
        let field = name.parse::<PlanField>().inspect_err(|error| {
            tracing::warn!(plan = index, field = name, %error, "rejected plan edit");
        })?;
        self.apply_plan_edit(index, field, raw)
    }

    pub fn apply_unit_edit(&mut self, field: UnitField, raw: &str) -> Result<()> {
        let mut unit = self.unit.clone();

        match field {
            UnitField::HasSplitArea => unit.has_split_area = parse_flag(raw),
            UnitField::Bua => unit.bua = parse_decimal(raw),
            UnitField::InternalArea => unit.internal_area = parse_decimal(raw),
            UnitField::ExternalArea => unit.external_area = parse_decimal(raw),
            UnitField::MeterPrice => unit.meter_price = parse_decimal(raw),
            UnitField::InternalMeterPrice => unit.internal_meter_price = parse_decimal(raw),
            UnitField::ExternalMeterPrice => unit.external_meter_price = parse_decimal(raw),
            UnitField::Discount => unit.discount = unit.discount.with_value(parse_decimal(raw)),
            UnitField::DiscountType => {
                let kind = self.selection::<ValueKind>(field.name(), raw)?;
                unit.discount = unit.discount.convert_to(kind, unit.price_anchor());
            }
            UnitField::GarageAmount => unit.garage_amount = parse_decimal(raw),
            UnitField::MaintenanceAmount => {
                unit.maintenance = unit.maintenance.with_value(parse_decimal(raw))
            }
            UnitField::MaintenanceType => {
                let kind = self.selection::<ValueKind>(field.name(), raw)?;
                unit.maintenance = unit.maintenance.convert_to(kind, unit.price_anchor());
            }
            UnitField::ReservationAmount => {
                unit.reservation = unit.reservation.with_value(parse_decimal(raw))
            }
            UnitField::ReservationType => {
                let kind = self.selection::<ValueKind>(field.name(), raw)?;
                unit.reservation = unit.reservation.convert_to(kind, unit.net_anchor());
            }
        }

        self.commit(unit, self.plans.clone());
        tracing::debug!(
            field = field.name(),
            value = raw,
            net_amount = ?self.unit.net_amount,
            "applied unit edit"
        );
        Ok(())
    }

    pub fn apply_plan_edit(&mut self, index: usize, field: PlanField, raw: &str) -> Result<()> {
        let mut plans = self.plans.clone();
        let plan = plans.get_mut(index).ok_or_else(|| {
            tracing::warn!(plan = index, field = field.name(), "edit for missing plan");
            PricingError::PlanNotFound(index)
        })?;

        match field {
            PlanField::DownPayment => {
                plan.down_payment = plan.down_payment.with_value(parse_decimal(raw))
            }
            PlanField::DownPaymentType => {
                let kind = self.selection::<ValueKind>(field.name(), raw)?;
                plan.down_payment = match plan.down_payment_source {
                    DownPaymentSource::Custom => {
                        plan.down_payment.convert_to(kind, self.unit.net_anchor())
                    }
                    DownPaymentSource::FromReservation => plan.down_payment.with_kind(kind),
                };
            }
            PlanField::DownPaymentSource => {
                plan.down_payment_source = self.selection::<DownPaymentSource>(field.name(), raw)?
            }
            PlanField::ReceiptAmount => plan.receipt_amount = parse_decimal(raw),
            PlanField::InstallmentAmount => plan.installment_amount = parse_decimal(raw),
            PlanField::InstallmentFrequency => {
                plan.installment_frequency = self.selection::<Frequency>(field.name(), raw)?
            }
            PlanField::Years => plan.years = parse_decimal(raw),
            PlanField::DeliveryDate => {
                plan.delivery_date = parse_date(raw).inspect_err(|error| {
                    tracing::warn!(plan = index, %error, "rejected plan edit");
                })?
            }
            PlanField::ExtraPaymentFrequency => {
                plan.extra_payment_frequency = self.selection::<Frequency>(field.name(), raw)?
            }
        }

        self.commit(self.unit.clone(), plans);
        let plan = &self.plans[index];
        tracing::debug!(
            plan = index,
            field = field.name(),
            value = raw,
            extra_payment = %plan.extra_payment,
            extra_payment_count = plan.extra_payment_count,
            "applied plan edit"
        );
        Ok(())
    }

    /// Generates a schedule, honouring the configured installment limit and drift tolerance.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::TooManyInstallments`] above the configured limit and
    /// [`PricingError::DateOutOfRange`] or [`PricingError::AmountOutOfRange`] from the generator.
    pub fn generate_schedule(&self, request: &ScheduleRequest) -> Result<AmortizationSchedule> {
        if request.installments_count > self.config.max_installments {
            tracing::warn!(
                requested = request.installments_count,
                max = self.config.max_installments,
                "rejected schedule request"
            );
            return Err(PricingError::TooManyInstallments {
                requested: request.installments_count,
                max: self.config.max_installments,
            });
        }

        generate_schedule_with_tolerance(request, self.config.drift_tolerance)
    }

    fn selection<T: FromStr>(&self, field: &'static str, raw: &str) -> Result<T> {
        parse_selection(field, raw).inspect_err(|error| {
            tracing::warn!(field, %error, "rejected selector value");
        })
    }

    /// Recomputes derived fields on the given records and swaps them in.
    fn commit(&mut self, unit: UnitPricingState, plans: Vec<InstallmentPlan>) {
        let unit = unit.recomputed();
        let reservation = unit.reservation;
        let net_amount = unit.net_anchor();
        let plans = plans
            .into_iter()
            .map(|plan| plan.rebalanced(reservation, net_amount))
            .collect();

        self.unit = unit;
        self.plans = plans;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convertible::Convertible;
    use rust_decimal_macros::dec;

    fn priced_session() -> PricingSession {
        let mut session = PricingSession::default();
        session.edit_unit("bua", "150").unwrap();
        session.edit_unit("meterPrice", "20000").unwrap();
        session.edit_unit("discountType", "percentage").unwrap();
        session.edit_unit("discount", "10").unwrap();
        session
    }

    #[test]
    fn test_discount_type_switch_converts_against_total_price() {
        let mut session = PricingSession::default();
        session.edit_unit("bua", "150").unwrap();
        session.edit_unit("meterPrice", "20000").unwrap();
        session.edit_unit("discount", "300000").unwrap();
        session.edit_unit("discountType", "percentage").unwrap();

        assert_eq!(session.unit().discount, Convertible::Percentage(dec!(10)));
        assert_eq!(session.unit().total_after_discount, Some(dec!(2700000)));
    }

    #[test]
    fn test_percentage_discount_follows_price_amount_does_not() {
        let mut session = priced_session();
        session.edit_unit("meterPrice", "10000").unwrap();
        assert_eq!(session.unit().total_after_discount, Some(dec!(1350000)));

        session.edit_unit("discountType", "amount").unwrap();
        assert_eq!(session.unit().discount, Convertible::Amount(dec!(150000)));

        session.edit_unit("meterPrice", "20000").unwrap();
        assert_eq!(session.unit().total_after_discount, Some(dec!(2850000)));
    }

    #[test]
    fn test_maintenance_type_switch_keeps_net_amount() {
        let mut session = PricingSession::default();
        session.edit_unit("bua", "150").unwrap();
        session.edit_unit("meterPrice", "20000").unwrap();
        session.edit_unit("maintenanceAmount", "300000").unwrap();
        assert_eq!(session.unit().net_amount, Some(dec!(3300000)));

        session.edit_unit("maintenanceType", "percentage").unwrap();

        assert_eq!(session.unit().maintenance, Convertible::Percentage(dec!(10)));
        assert_eq!(session.unit().net_amount, Some(dec!(3300000)));
    }

    #[test]
    fn test_oversized_area_price_is_unset() {
        let mut session = PricingSession::default();
        session.edit_unit("bua", "1e20").unwrap();
        session.edit_unit("meterPrice", "1e20").unwrap();

        assert_eq!(session.unit().total_area, Some(dec!(1e20)));
        assert_eq!(session.unit().total_price, None);
    }

    #[test]
    fn test_oversized_plan_duration_saturates_counts() {
        let mut session = priced_session();
        let index = session.add_plan();
        session.edit_plan(index, "installmentAmount", "50000").unwrap();
        session.edit_plan(index, "years", "10000000000000000000000000000").unwrap();

        let plan = session.plan(index).unwrap();
        assert_eq!(plan.installments_count, u32::MAX);
        assert_eq!(plan.extra_payment_count, u32::MAX);
        assert_eq!(plan.extra_payment, dec!(0));
    }

    #[test]
    fn test_type_switch_without_price_is_noop() {
        let mut session = PricingSession::default();
        session.edit_unit("discount", "5000").unwrap();
        session.edit_unit("discountType", "percentage").unwrap();

        assert_eq!(session.unit().discount, Convertible::Percentage(dec!(5000)));
    }

    #[test]
    fn test_plan_recomputes_when_reservation_changes() {
        let mut session = priced_session();
        let index = session.add_plan();
        session.edit_plan(index, "installmentAmount", "50000").unwrap();
        session.edit_plan(index, "years", "4").unwrap();
        assert_eq!(session.plan(index).unwrap().extra_payment, dec!(75000));

        session.edit_unit("reservationAmount", "300000").unwrap();
        assert_eq!(session.plan(index).unwrap().extra_payment, dec!(0));
    }

    #[test]
    fn test_custom_down_payment_type_switch_uses_net_amount() {
        let mut session = priced_session();
        let index = session.add_plan();
        session.edit_plan(index, "downPaymentSource", "custom").unwrap();
        session.edit_plan(index, "downPayment", "270000").unwrap();
        session.edit_plan(index, "downPaymentType", "percentage").unwrap();

        assert_eq!(session.plan(index).unwrap().down_payment, Convertible::Percentage(dec!(10)));
    }

    #[test]
    fn test_source_switch_keeps_custom_value() {
        let mut session = priced_session();
        let index = session.add_plan();
        session.edit_plan(index, "downPaymentSource", "custom").unwrap();
        session.edit_plan(index, "downPayment", "100000").unwrap();
        session.edit_plan(index, "downPaymentSource", "fromReservation").unwrap();
        session.edit_unit("reservationAmount", "50000").unwrap();
        session.edit_plan(index, "downPaymentSource", "custom").unwrap();

        assert_eq!(session.plan(index).unwrap().down_payment, Convertible::Amount(dec!(100000)));
    }

    #[test]
    fn test_rejected_edits_leave_state_untouched() {
        let mut session = priced_session();
        let before = session.snapshot();

        assert!(matches!(
            session.edit_unit("discountType", "bogus"),
            Err(PricingError::InvalidSelection { field: "discountType", .. })
        ));
        assert!(matches!(
            session.edit_unit("totalPrice", "1"),
            Err(PricingError::ReadOnlyField(_))
        ));
        assert!(matches!(session.edit_plan(3, "years", "1"), Err(PricingError::PlanNotFound(3))));

        assert_eq!(session.snapshot(), before);
    }

    #[test]
    fn test_delivery_date() {
        let mut session = PricingSession::default();
        let index = session.add_plan();

        session.edit_plan(index, "deliveryDate", "2028-06-30").unwrap();
        assert_eq!(
            session.plan(index).unwrap().delivery_date,
            NaiveDate::from_ymd_opt(2028, 6, 30)
        );

        assert!(matches!(
            session.edit_plan(index, "deliveryDate", "30/06/2028"),
            Err(PricingError::InvalidDate(_))
        ));

        session.edit_plan(index, "deliveryDate", "").unwrap();
        assert_eq!(session.plan(index).unwrap().delivery_date, None);
    }

    #[test]
    fn test_remove_plan() {
        let mut session = PricingSession::default();
        session.add_plan();
        session.add_plan();

        assert!(session.remove_plan(1).is_ok());
        assert_eq!(session.plans().len(), 1);
        assert!(matches!(session.remove_plan(1), Err(PricingError::PlanNotFound(1))));
    }

    #[test]
    fn test_restore_recomputes_derived_fields() {
        let mut snapshot = priced_session().snapshot();
        snapshot.unit.net_amount = Some(dec!(1));

        let restored = PricingSession::restore(snapshot, EngineConfig::default());
        assert_eq!(restored.unit().net_amount, Some(dec!(2700000)));
    }

    #[test]
    fn test_snapshot_json_round_trip() {
        let mut session = priced_session();
        session.add_plan();
        let snapshot = session.snapshot();

        let json = snapshot.to_json().unwrap();
        assert!(json.contains("\"netAmount\":\"2700000"));
        assert_eq!(PricingSnapshot::from_json(&json).unwrap(), snapshot);
    }

    #[test]
    fn test_schedule_limit() {
        let session = PricingSession::new(EngineConfig {
            max_installments: 12,
            ..EngineConfig::default()
        });
        let request = ScheduleRequest {
            base_price: dec!(1000),
            down_pct: dec!(0),
            installments_count: 13,
            frequency: Frequency::Monthly,
            grace_months: 0,
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        };

        assert!(matches!(
            session.generate_schedule(&request),
            Err(PricingError::TooManyInstallments { requested: 13, max: 12 })
        ));
    }
}

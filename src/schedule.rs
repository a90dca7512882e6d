//! Dated payment schedules that sum exactly to their principal.
//!
//! A schedule is an optional down payment row followed by equal installment
//! rows. Each row is rounded to cents, and whatever the rounding loses or gains
//! is added to the last row so the rows always add up to the base price.

use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{PricingError, Result};
use crate::frequency::Frequency;
use crate::numeric::round_money;

/// Smallest drift worth correcting, one cent.
pub const DEFAULT_DRIFT_TOLERANCE: Decimal = dec!(0.01);

/// Parameters of a schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRequest {
    /// Principal the rows must add up to.
    pub base_price: Decimal,
    /// Down payment as a percentage of the base price (e.g., 10 for 10%).
    pub down_pct: Decimal,
    pub installments_count: u32,
    pub frequency: Frequency,
    /// Months between the start date and the first installment.
    pub grace_months: u32,
    /// Due date of the down payment.
    pub start_date: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RowKind {
    DownPayment,
    Installment,
}

/// One dated payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRow {
    /// 0 for the down payment, 1.. for installments.
    pub sequence_number: u32,
    pub kind: RowKind,
    pub due_date: NaiveDate,
    pub amount: Decimal,
}

/// An ordered list of payments.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    pub rows: Vec<ScheduleRow>,
}

impl AmortizationSchedule {
    /// Sum of all row amounts.
    pub fn total(&self) -> Decimal {
        self.rows.iter().map(|row| row.amount).sum()
    }

    /// The down payment row, if the schedule has one.
    pub fn down_payment(&self) -> Option<&ScheduleRow> {
        self.rows.iter().find(|row| row.kind == RowKind::DownPayment)
    }

    /// Installment rows in due order, without the down payment.
    pub fn installments(&self) -> impl Iterator<Item = &ScheduleRow> {
        self.rows.iter().filter(|row| row.kind == RowKind::Installment)
    }

    /// Due date of the final row, `None` for an empty schedule.
    pub fn last_due_date(&self) -> Option<NaiveDate> {
        self.rows.last().map(|row| row.due_date)
    }

    /// Whether the schedule has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of rows, down payment included.
    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

fn add_months(start: NaiveDate, months: u32) -> Result<NaiveDate> {
    start
        .checked_add_months(Months::new(months))
        .ok_or(PricingError::DateOutOfRange { start, months })
}

/// Months from the start date to installment `index` (zero based).
fn installment_offset(request: &ScheduleRequest, index: u32) -> Result<u32> {
    index
        .checked_mul(request.frequency.schedule_step_months())
        .and_then(|months| months.checked_add(request.grace_months))
        .ok_or(PricingError::DateOutOfRange {
            start: request.start_date,
            months: u32::MAX,
        })
}

/// Generates a schedule, correcting drift of at least one cent.
///
/// # Errors
///
/// Returns [`PricingError::DateOutOfRange`] if a due date overflows the calendar and
/// [`PricingError::AmountOutOfRange`] if the amounts do not fit in a `Decimal`.
pub fn generate_schedule(request: &ScheduleRequest) -> Result<AmortizationSchedule> {
    generate_schedule_with_tolerance(request, DEFAULT_DRIFT_TOLERANCE)
}

/// Generates a schedule, correcting drift whose magnitude reaches `drift_tolerance`.
///
/// # Errors
///
/// Returns [`PricingError::DateOutOfRange`] if a due date overflows the calendar and
/// [`PricingError::AmountOutOfRange`] if the amounts do not fit in a `Decimal`.
pub fn generate_schedule_with_tolerance(
    request: &ScheduleRequest,
    drift_tolerance: Decimal,
) -> Result<AmortizationSchedule> {
    let out_of_range = || PricingError::AmountOutOfRange {
        base_price: request.base_price,
    };

    let count = request.installments_count;
    let down_amount = request
        .base_price
        .checked_mul(request.down_pct / dec!(100))
        .map(round_money)
        .ok_or_else(out_of_range)?;
    let remaining = request
        .base_price
        .checked_sub(down_amount)
        .ok_or_else(out_of_range)?;
    let per_installment = if count > 0 {
        round_money(remaining / Decimal::from(count))
    } else {
        Decimal::ZERO
    };

    // The last due date bounds every other one, so check it before allocating rows.
    if count > 0 {
        add_months(request.start_date, installment_offset(request, count - 1)?)?;
    }

    let mut rows = Vec::with_capacity(count as usize + 1);

    if down_amount > Decimal::ZERO {
        rows.push(ScheduleRow {
            sequence_number: 0,
            kind: RowKind::DownPayment,
            due_date: request.start_date,
            amount: down_amount,
        });
    }

    for i in 0..count {
        // Offsets are taken from the start date so month-end clamping does not accumulate.
        let offset = installment_offset(request, i)?;

        rows.push(ScheduleRow {
            sequence_number: i + 1,
            kind: RowKind::Installment,
            due_date: add_months(request.start_date, offset)?,
            amount: per_installment,
        });
    }

    let total = rows
        .iter()
        .try_fold(Decimal::ZERO, |total, row| total.checked_add(row.amount))
        .ok_or_else(out_of_range)?;
    let drift = request
        .base_price
        .checked_sub(total)
        .ok_or_else(out_of_range)?;
    if drift.abs() >= drift_tolerance {
        if let Some(last) = rows.last_mut() {
            if count > 0 && drift.abs() > Decimal::from(count) * DEFAULT_DRIFT_TOLERANCE {
                tracing::warn!(%drift, installments = count, "large drift absorbed by last row");
            }
            last.amount = last.amount.checked_add(drift).ok_or_else(out_of_range)?;
        }
    }

    tracing::debug!(
        base_price = %request.base_price,
        rows = rows.len(),
        %drift,
        "generated amortization schedule"
    );

    Ok(AmortizationSchedule { rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn request(base_price: Decimal, down_pct: Decimal, installments_count: u32) -> ScheduleRequest {
        ScheduleRequest {
            base_price,
            down_pct,
            installments_count,
            frequency: Frequency::Monthly,
            grace_months: 0,
            start_date: date(2025, 1, 15),
        }
    }

    #[test]
    fn test_down_payment_and_three_installments() {
        let schedule = generate_schedule(&request(dec!(1000000), dec!(10), 3)).unwrap();

        let amounts: Vec<Decimal> = schedule.rows.iter().map(|r| r.amount).collect();
        assert_eq!(amounts, vec![dec!(100000), dec!(300000), dec!(300000), dec!(300000)]);
        assert_eq!(schedule.total(), dec!(1000000));

        let down = schedule.down_payment().unwrap();
        assert_eq!(down.sequence_number, 0);
        assert_eq!(down.due_date, date(2025, 1, 15));
        assert_eq!(schedule.installments().count(), 3);
    }

    #[test]
    fn test_drift_goes_to_last_row() {
        let schedule = generate_schedule(&request(dec!(100), dec!(0), 3)).unwrap();

        let amounts: Vec<Decimal> = schedule.rows.iter().map(|r| r.amount).collect();
        assert_eq!(amounts, vec![dec!(33.33), dec!(33.33), dec!(33.34)]);
        assert_eq!(schedule.total(), dec!(100));
    }

    #[test]
    fn test_negative_drift_goes_to_last_row() {
        let schedule = generate_schedule(&request(dec!(200), dec!(0), 3)).unwrap();

        let amounts: Vec<Decimal> = schedule.rows.iter().map(|r| r.amount).collect();
        assert_eq!(amounts, vec![dec!(66.67), dec!(66.67), dec!(66.66)]);
        assert_eq!(schedule.total(), dec!(200));
    }

    #[test]
    fn test_no_down_payment_row_when_zero() {
        let schedule = generate_schedule(&request(dec!(1200), dec!(0), 12)).unwrap();

        assert!(schedule.down_payment().is_none());
        assert_eq!(schedule.rows[0].sequence_number, 1);
        assert_eq!(schedule.len(), 12);
    }

    #[test]
    fn test_empty_schedule_is_valid() {
        let schedule = generate_schedule(&request(dec!(0), dec!(0), 0)).unwrap();
        assert!(schedule.is_empty());
        assert_eq!(schedule.last_due_date(), None);
    }

    #[test]
    fn test_down_payment_only_absorbs_remaining() {
        let schedule = generate_schedule(&request(dec!(1000), dec!(10), 0)).unwrap();

        assert_eq!(schedule.len(), 1);
        assert_eq!(schedule.rows[0].kind, RowKind::DownPayment);
        assert_eq!(schedule.total(), dec!(1000));
    }

    #[rstest]
    #[case(Frequency::Monthly, 2, vec![date(2025, 3, 15), date(2025, 4, 15), date(2025, 5, 15)])]
    #[case(Frequency::Quarterly, 0, vec![date(2025, 1, 15), date(2025, 4, 15), date(2025, 7, 15)])]
    #[case(Frequency::Annual, 1, vec![date(2025, 2, 15), date(2025, 3, 15), date(2025, 4, 15)])]
    fn test_due_dates(
        #[case] frequency: Frequency,
        #[case] grace_months: u32,
        #[case] expected: Vec<NaiveDate>,
    ) {
        let schedule = generate_schedule(&ScheduleRequest {
            frequency,
            grace_months,
            ..request(dec!(900), dec!(0), 3)
        })
        .unwrap();

        let dates: Vec<NaiveDate> = schedule.rows.iter().map(|r| r.due_date).collect();
        assert_eq!(dates, expected);
    }

    #[test]
    fn test_month_end_does_not_drift() {
        let schedule = generate_schedule(&ScheduleRequest {
            start_date: date(2025, 1, 31),
            ..request(dec!(300), dec!(0), 3)
        })
        .unwrap();

        let dates: Vec<NaiveDate> = schedule.rows.iter().map(|r| r.due_date).collect();
        assert_eq!(dates, vec![date(2025, 1, 31), date(2025, 2, 28), date(2025, 3, 31)]);
    }

    #[test]
    fn test_date_overflow_is_an_error() {
        let result = generate_schedule(&ScheduleRequest {
            start_date: NaiveDate::MAX,
            ..request(dec!(300), dec!(0), 3)
        });

        assert!(matches!(result, Err(PricingError::DateOutOfRange { .. })));
    }

    #[test]
    fn test_full_down_payment() {
        let schedule = generate_schedule(&request(dec!(5000), dec!(100), 2)).unwrap();

        let amounts: Vec<Decimal> = schedule.rows.iter().map(|r| r.amount).collect();
        assert_eq!(amounts, vec![dec!(5000), dec!(0), dec!(0)]);
        assert_eq!(schedule.total(), dec!(5000));
    }

    #[test]
    fn test_max_base_price_splits_without_overflow() {
        let schedule = generate_schedule(&request(Decimal::MAX, dec!(50), 1)).unwrap();

        assert_eq!(schedule.len(), 2);
        assert_eq!(schedule.total(), Decimal::MAX);
    }

    #[test]
    fn test_unrepresentable_down_payment_is_an_error() {
        let result = generate_schedule(&request(Decimal::MAX, dec!(200), 1));

        assert!(matches!(result, Err(PricingError::AmountOutOfRange { .. })));
    }

    #[test]
    fn test_huge_count_fails_on_dates_before_allocating() {
        let result = generate_schedule(&request(dec!(1000), dec!(0), u32::MAX));

        assert!(matches!(result, Err(PricingError::DateOutOfRange { .. })));
    }
}

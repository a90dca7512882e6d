//! `unit_financing` is a Rust library for pricing real estate units and planning how they are paid.
//!
//! It covers the two calculations behind a unit sale:
//! - **Unit pricing**: total area and price from built-up or split internal/external areas,
//!   discount, garage and maintenance fees, and the resulting net amount.
//! - **Installment plans**: down payment (from the reservation or custom), fixed installments at a
//!   chosen cadence, and an extra payment derived so the plan covers the whole net amount.
//!
//! Separately, [`generate_schedule`] turns a base price, down payment percentage and installment
//! count into dated rows that add up exactly to the base price.
//!
//! Amounts and percentages can be entered either way (see [`Convertible`]); derived values that
//! come out zero or negative are reported as unset (`None`).
//!
//! ## Usage
//!
//! Add `unit_financing` to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! unit_financing = "0.1.0"
//! rust_decimal = "1.39.0"
//! rust_decimal_macros = "1.39.0"
//! ```
//!
//! Feed form edits into a [`PricingSession`] and read back the derived fields:
//!
//! ```rust
//! use unit_financing::PricingSession;
//! use rust_decimal_macros::dec;
//!
//! fn main() -> Result<(), unit_financing::PricingError> {
//!     let mut session = PricingSession::default();
//!     session.edit_unit("bua", "150")?;
//!     session.edit_unit("meterPrice", "20000")?;
//!     session.edit_unit("reservationType", "percentage")?;
//!     session.edit_unit("reservationAmount", "10")?;
//!
//!     let plan = session.add_plan();
//!     session.edit_plan(plan, "installmentAmount", "50000")?;
//!     session.edit_plan(plan, "years", "4")?;
//!
//!     assert_eq!(session.unit().net_amount, Some(dec!(3_000_000)));
//!     println!("Extra payment: {:.2} x {}",
//!         session.plan(plan)?.extra_payment,
//!         session.plan(plan)?.extra_payment_count);
//!     Ok(())
//! }
//! ```
//!
//! Or build a payment schedule directly:
//!
//! ```rust
//! use chrono::NaiveDate;
//! use unit_financing::{generate_schedule, Frequency, ScheduleRequest};
//! use rust_decimal_macros::dec;
//!
//! let schedule = generate_schedule(&ScheduleRequest {
//!     base_price: dec!(1_000_000),
//!     down_pct: dec!(10),
//!     installments_count: 3,
//!     frequency: Frequency::Quarterly,
//!     grace_months: 6,
//!     start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
//! })
//! .unwrap();
//!
//! assert_eq!(schedule.total(), dec!(1_000_000));
//! assert_eq!(schedule.rows.len(), 4);
//! ```

pub mod area;
pub mod config;
pub mod convertible;
pub mod down_payment;
pub mod error;
pub mod fields;
pub mod frequency;
pub mod installment;
pub mod net_amount;
pub mod numeric;
pub mod schedule;
pub mod session;
pub mod state;

pub use area::{AreaInput, AreaPrice, calculate_area_price};
pub use config::EngineConfig;
pub use convertible::{Convertible, ValueKind, convert};
pub use down_payment::{DownPaymentSource, resolve_down_payment};
pub use error::{PricingError, Result};
pub use fields::{PlanField, UnitField};
pub use frequency::Frequency;
pub use installment::{Balance, BalanceInput, InstallmentPlan, balance_installments};
pub use net_amount::{NetAmount, NetAmountInput, calculate_net_amount};
pub use schedule::{
    AmortizationSchedule, RowKind, ScheduleRequest, ScheduleRow, generate_schedule,
    generate_schedule_with_tolerance,
};
pub use session::{PricingSession, PricingSnapshot};
pub use state::UnitPricingState;

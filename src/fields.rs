//! Names of the form fields the engine accepts edits for.

use std::fmt;
use std::str::FromStr;

use crate::error::PricingError;

/// Fields the form may write to but the engine computes itself.
pub const DERIVED_FIELDS: &[&str] = &[
    "totalArea",
    "totalPrice",
    "totalAfterDiscount",
    "netAmount",
    "installmentsCount",
    "extraPayment",
    "extraPaymentCount",
];

fn unknown_or_read_only(name: &str) -> PricingError {
    if DERIVED_FIELDS.contains(&name) {
        PricingError::ReadOnlyField(name.to_string())
    } else {
        PricingError::UnknownField(name.to_string())
    }
}

/// Editable fields of a unit's pricing record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitField {
    HasSplitArea,
    Bua,
    InternalArea,
    ExternalArea,
    MeterPrice,
    InternalMeterPrice,
    ExternalMeterPrice,
    Discount,
    DiscountType,
    GarageAmount,
    MaintenanceAmount,
    MaintenanceType,
    ReservationAmount,
    ReservationType,
}

impl UnitField {
    pub const ALL: [UnitField; 14] = [
        UnitField::HasSplitArea,
        UnitField::Bua,
        UnitField::InternalArea,
        UnitField::ExternalArea,
        UnitField::MeterPrice,
        UnitField::InternalMeterPrice,
        UnitField::ExternalMeterPrice,
        UnitField::Discount,
        UnitField::DiscountType,
        UnitField::GarageAmount,
        UnitField::MaintenanceAmount,
        UnitField::MaintenanceType,
        UnitField::ReservationAmount,
        UnitField::ReservationType,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            UnitField::HasSplitArea => "hasSplitArea",
            UnitField::Bua => "bua",
            UnitField::InternalArea => "internalArea",
            UnitField::ExternalArea => "externalArea",
            UnitField::MeterPrice => "meterPrice",
            UnitField::InternalMeterPrice => "internalMeterPrice",
            UnitField::ExternalMeterPrice => "externalMeterPrice",
            UnitField::Discount => "discount",
            UnitField::DiscountType => "discountType",
            UnitField::GarageAmount => "garageAmount",
            UnitField::MaintenanceAmount => "maintenanceAmount",
            UnitField::MaintenanceType => "maintenanceType",
            UnitField::ReservationAmount => "reservationAmount",
            UnitField::ReservationType => "reservationType",
        }
    }
}

impl FromStr for UnitField {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        UnitField::ALL
            .into_iter()
            .find(|field| field.name() == name)
            .ok_or_else(|| unknown_or_read_only(name))
    }
}

impl fmt::Display for UnitField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Editable fields of an installment plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlanField {
    DownPayment,
    DownPaymentType,
    DownPaymentSource,
    ReceiptAmount,
    InstallmentAmount,
    InstallmentFrequency,
    Years,
    DeliveryDate,
    ExtraPaymentFrequency,
}

impl PlanField {
    pub const ALL: [PlanField; 9] = [
        PlanField::DownPayment,
        PlanField::DownPaymentType,
        PlanField::DownPaymentSource,
        PlanField::ReceiptAmount,
        PlanField::InstallmentAmount,
        PlanField::InstallmentFrequency,
        PlanField::Years,
        PlanField::DeliveryDate,
        PlanField::ExtraPaymentFrequency,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PlanField::DownPayment => "downPayment",
            PlanField::DownPaymentType => "downPaymentType",
            PlanField::DownPaymentSource => "downPaymentSource",
            PlanField::ReceiptAmount => "receiptAmount",
            PlanField::InstallmentAmount => "installmentAmount",
            PlanField::InstallmentFrequency => "installmentFrequency",
            PlanField::Years => "years",
            PlanField::DeliveryDate => "deliveryDate",
            PlanField::ExtraPaymentFrequency => "extraPaymentFrequency",
        }
    }
}

impl FromStr for PlanField {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        PlanField::ALL
            .into_iter()
            .find(|field| field.name() == name)
            .ok_or_else(|| unknown_or_read_only(name))
    }
}

impl fmt::Display for PlanField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

//! Core data models for the Rental Pricing Engine.
//!
//! This module contains all the domain models used throughout the engine.

mod charges;
mod discount;
mod payment;
mod pricing_result;
mod rental;

pub use charges::{ChargeSet, StorageCharge};
pub use discount::{DiscountEdit, DiscountSource, DiscountSpec};
pub use payment::{PaymentEntry, PaymentMethod, PaymentStatus};
pub use pricing_result::{
    AuditTrace, CostBreakdown, PayableSummary, PricingResult, PricingStep, PricingWarning,
    RateSource,
};
pub use rental::{BillingUnit, RentalPeriod, RentalReason, RentalTerms, RentalType, SpecialReason};

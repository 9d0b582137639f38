//! Calculation logic for the Rental Pricing Engine.
//!
//! This module contains the pricing steps: billable duration, rate lookup,
//! base cost with weekly blending, surcharges, discount derivation and
//! application, overdue charges, and the orchestrator that runs them for a
//! set of rental terms.

mod base_cost;
mod discount;
mod duration;
mod overdue;
mod pricing;
mod rate_lookup;
mod rounding;
mod surcharges;

pub use base_cost::{BaseCostResult, base_cost_amount, calculate_base_cost};
pub use discount::{
    DiscountFields, DiscountResult, apply_discount, apply_discount_edit, derive_discount_fields,
};
pub use duration::{DurationResult, billable_days, calculate_duration, inclusive_days, split_weeks};
pub use overdue::{OverdueResult, calculate_overdue, overdue_days};
pub use pricing::{OverdueCharge, commit_overdue, overdue_charge, price_rental};
pub use rate_lookup::{RateLookupResult, RateResolution, resolve_rate};
pub use rounding::{
    MONEY_DECIMAL_PLACES, PERCENTAGE_DECIMAL_PLACES, checked_mul, checked_sum, round_money,
    round_percentage,
};
pub use surcharges::{SurchargeResult, calculate_surcharges};

//! Pricing orchestration.
//!
//! Runs the calculation steps in order for a set of rental terms:
//!
//! 1. Billable duration
//! 2. Rate lookup
//! 3. Base cost
//! 4. Surcharges
//! 5. Discount
//!
//! Each step appends to the audit trace. Warnings from every step are
//! collected into the trace and logged.

use std::time::Instant;

use chrono::{NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::TariffConfig;
use crate::error::EngineResult;
use crate::models::{
    AuditTrace, CostBreakdown, PayableSummary, PricingResult, PricingStep, PricingWarning,
    RentalTerms,
};

use super::base_cost::calculate_base_cost;
use super::discount::apply_discount;
use super::duration::calculate_duration;
use super::overdue::calculate_overdue;
use super::rate_lookup::resolve_rate;
use super::rounding::checked_sum;
use super::surcharges::calculate_surcharges;

/// Live overdue charge for a rental at a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverdueCharge {
    /// The rental's booked end.
    pub original_end: NaiveDateTime,
    /// The instant the charge was evaluated at.
    pub as_of: NaiveDateTime,
    /// Calendar days past the original end.
    pub overdue_days: i64,
    /// The overdue charge.
    pub amount: Decimal,
    /// Rate lookup and overdue steps.
    pub steps: Vec<PricingStep>,
    /// Warnings from the rate lookup.
    pub warnings: Vec<PricingWarning>,
}

fn log_warnings(vehicle_id: &str, warnings: &[PricingWarning]) {
    for warning in warnings {
        warn!(
            vehicle_id = %vehicle_id,
            code = %warning.code,
            severity = %warning.severity,
            "{}",
            warning.message
        );
    }
}

/// Prices a rental.
///
/// Rates are taken from the table effective on the rental's start date.
///
/// # Errors
///
/// - `InvalidPeriod` if the period ends before it starts
/// - `InvalidCharge` for negative charges or a negative negotiated rate
/// - `InvalidDiscount` / `MissingDiscountNotes` for an invalid discount
/// - `RateNotFound` if the tariff has no rate for the rental
/// - `AmountOverflow` if rates or charges exceed the decimal range
pub fn price_rental(terms: &RentalTerms, config: &TariffConfig) -> EngineResult<PricingResult> {
    let start_time = Instant::now();
    terms.period.validate()?;
    terms.charges.validate()?;

    let mut steps = Vec::new();
    let mut warnings = Vec::new();
    let effective_date = terms.period.start_date();

    let duration = calculate_duration(&terms.period, 1);
    let days = duration.days;
    steps.push(duration.audit_step);

    let rate = resolve_rate(
        terms.period.rental_type,
        &terms.reason,
        terms.negotiated_rate,
        effective_date,
        config,
        2,
    )?;
    warnings.extend(rate.warnings);
    steps.push(rate.audit_step);
    let resolution = rate.resolution;

    let base_cost = calculate_base_cost(days, &resolution, 3)?;
    steps.push(base_cost.audit_step);

    let surcharges = calculate_surcharges(&terms.charges, days, config.policy().vat_rate, 4)?;
    warnings.extend(surcharges.warnings);
    steps.push(surcharges.audit_step);

    let subtotal = checked_sum([base_cost.amount, surcharges.total], "subtotal")?;

    let discount = apply_discount(subtotal, terms.discount.as_ref(), resolution.unit_rate, 5)?;
    warnings.extend(discount.warnings);
    steps.push(discount.audit_step);

    let breakdown = CostBreakdown {
        days,
        weeks: base_cost.weeks,
        remainder_days: base_cost.remainder_days,
        billing_unit: resolution.billing_unit,
        unit_rate: resolution.unit_rate,
        daily_rate: resolution.daily_rate,
        rate_source: resolution.source,
        base_cost: base_cost.amount,
        storage_days: surcharges.storage_days,
        storage_cost: surcharges.storage_cost,
        recovery_cost: surcharges.recovery_cost,
        delivery_charge: surcharges.delivery_charge,
        collection_charge: surcharges.collection_charge,
        insurance_cost: surcharges.insurance_cost,
        surcharges_total: surcharges.total,
        overdue_cost: Decimal::ZERO,
        subtotal,
        percentage_discount: discount.percentage_discount,
        free_period_discount: discount.free_period_discount,
        discount_amount: discount.discount_amount,
        final_amount: discount.final_amount,
    };

    let summary = PayableSummary::derive(
        breakdown.subtotal,
        breakdown.discount_amount,
        Decimal::ZERO,
        config.policy().settlement_tolerance,
    );

    log_warnings(&terms.vehicle_id, &warnings);
    let duration_us = start_time.elapsed().as_micros() as u64;
    debug!(
        vehicle_id = %terms.vehicle_id,
        days,
        subtotal = %breakdown.subtotal,
        final_amount = %breakdown.final_amount,
        duration_us,
        "Rental priced"
    );

    Ok(PricingResult {
        calculation_id: Uuid::new_v4(),
        timestamp: Utc::now(),
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        vehicle_id: terms.vehicle_id.clone(),
        period: terms.period.clone(),
        breakdown,
        summary,
        audit_trace: AuditTrace {
            steps,
            warnings,
            duration_us,
        },
    })
}

/// Calculates the overdue charge for a rental at `now`.
///
/// The overdue days are billed through the same rate path as the booking:
/// same rental type, reason and negotiated rate, rates effective on the
/// rental's start date, and no surcharges.
///
/// # Errors
///
/// - `InvalidPeriod` if the period ends before it starts
/// - `RateNotFound` if the tariff has no rate for the rental
/// - `AmountOverflow` if the charge exceeds the decimal range
pub fn overdue_charge(
    terms: &RentalTerms,
    now: NaiveDateTime,
    config: &TariffConfig,
) -> EngineResult<OverdueCharge> {
    terms.period.validate()?;

    let rate = resolve_rate(
        terms.period.rental_type,
        &terms.reason,
        terms.negotiated_rate,
        terms.period.start_date(),
        config,
        1,
    )?;
    let overdue = calculate_overdue(terms.period.end, now, &rate.resolution, 2)?;

    log_warnings(&terms.vehicle_id, &rate.warnings);

    Ok(OverdueCharge {
        original_end: terms.period.end,
        as_of: now,
        overdue_days: overdue.overdue_days,
        amount: overdue.amount,
        steps: vec![rate.audit_step, overdue.audit_step],
        warnings: rate.warnings,
    })
}

/// Commits an overdue charge into a breakdown.
///
/// The discount amount is kept as priced; the overdue cost is added to the
/// subtotal and the final amount.
///
/// # Errors
///
/// Returns `AmountOverflow` if the committed totals exceed the decimal range.
pub fn commit_overdue(breakdown: &CostBreakdown, amount: Decimal) -> EngineResult<CostBreakdown> {
    let mut committed = breakdown.clone();
    committed.overdue_cost = checked_sum([committed.overdue_cost, amount], "overdue cost")?;
    committed.subtotal = checked_sum([committed.subtotal, amount], "subtotal")?;
    committed.final_amount = checked_sum(
        [committed.subtotal, -committed.discount_amount],
        "final amount",
    )?;
    Ok(committed)
}

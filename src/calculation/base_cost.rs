//! Base cost calculation.
//!
//! Prices a number of billable days at a resolved rate, before surcharges
//! and discounts. Per-day rates multiply straight through; per-week rates
//! bill full weeks at the weekly rate and leftover days at the daily rate.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EngineResult;
use crate::models::{BillingUnit, PricingStep, SpecialReason};

use super::duration::split_weeks;
use super::rate_lookup::RateResolution;
use super::rounding::{checked_mul, checked_sum};

/// The base cost of a rental and the audit step recording it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseCostResult {
    /// Cost before surcharges.
    pub amount: Decimal,
    /// Full weeks billed at the weekly rate.
    pub weeks: i64,
    /// Days billed at the per-day or daily remainder rate.
    pub remainder_days: i64,
    /// The audit step recording this calculation.
    pub audit_step: PricingStep,
}

/// Cost of `days` at a resolved rate, returned as `(amount, weeks, remainder_days)`.
///
/// Workshop rentals always cost nothing.
///
/// # Errors
///
/// Returns `AmountOverflow` if the cost exceeds the decimal range.
pub fn base_cost_amount(
    days: i64,
    resolution: &RateResolution,
) -> EngineResult<(Decimal, i64, i64)> {
    if resolution.special_reason == Some(SpecialReason::Workshop) {
        return Ok((Decimal::ZERO, 0, days));
    }

    match resolution.billing_unit {
        BillingUnit::PerDay => {
            let amount = checked_mul(Decimal::from(days), resolution.unit_rate, "base cost")?;
            Ok((amount, 0, days))
        }
        BillingUnit::PerWeek => {
            let (weeks, remainder_days) = split_weeks(days);
            let amount = checked_sum(
                [
                    checked_mul(Decimal::from(weeks), resolution.unit_rate, "base cost")?,
                    checked_mul(Decimal::from(remainder_days), resolution.daily_rate, "base cost")?,
                ],
                "base cost",
            )?;
            Ok((amount, weeks, remainder_days))
        }
    }
}

/// Calculates the base cost of a rental.
///
/// # Examples
///
/// ```
/// use rental_engine::calculation::{calculate_base_cost, RateResolution};
/// use rental_engine::models::{BillingUnit, RateSource};
/// use rust_decimal::Decimal;
///
/// let weekly = RateResolution {
///     unit_rate: Decimal::new(360, 0),
///     billing_unit: BillingUnit::PerWeek,
///     daily_rate: Decimal::new(60, 0),
///     source: RateSource::Table,
///     special_reason: None,
/// };
///
/// // 9 days = 1 week + 2 days = 360 + 120
/// let result = calculate_base_cost(9, &weekly, 1).unwrap();
/// assert_eq!(result.amount, Decimal::new(480, 0));
/// assert_eq!(result.weeks, 1);
/// assert_eq!(result.remainder_days, 2);
/// ```
pub fn calculate_base_cost(
    days: i64,
    resolution: &RateResolution,
    step_number: u32,
) -> EngineResult<BaseCostResult> {
    let (amount, weeks, remainder_days) = base_cost_amount(days, resolution)?;

    let reasoning = if resolution.special_reason == Some(SpecialReason::Workshop) {
        format!("Workshop rental of {} day(s) is not billed", days)
    } else {
        match resolution.billing_unit {
            BillingUnit::PerDay => format!(
                "{} day(s) x {} = {}",
                days, resolution.unit_rate, amount
            ),
            BillingUnit::PerWeek => format!(
                "{} week(s) x {} + {} day(s) x {} = {}",
                weeks, resolution.unit_rate, remainder_days, resolution.daily_rate, amount
            ),
        }
    };

    let audit_step = PricingStep {
        step_number,
        rule_id: "base_cost".to_string(),
        rule_name: "Base Cost".to_string(),
        input: serde_json::json!({
            "days": days,
            "unit_rate": resolution.unit_rate.to_string(),
            "daily_rate": resolution.daily_rate.to_string(),
            "billing_unit": resolution.billing_unit
        }),
        output: serde_json::json!({
            "amount": amount.to_string(),
            "weeks": weeks,
            "remainder_days": remainder_days
        }),
        reasoning,
    };

    Ok(BaseCostResult {
        amount,
        weeks,
        remainder_days,
        audit_step,
    })
}

//! Overdue charge calculation.
//!
//! A rental kept past its original end is billed for the extra days at the
//! same rate as the booking. The original end day is already billed, so the
//! overdue window starts on the following calendar day and runs through the
//! calendar day of `now`.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EngineResult;
use crate::models::PricingStep;

use super::base_cost::base_cost_amount;
use super::rate_lookup::RateResolution;

/// The overdue charge of a rental and the audit step recording it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverdueResult {
    /// Calendar days past the original end.
    pub overdue_days: i64,
    /// Full weeks within the overdue days (weekly billing only).
    pub weeks: i64,
    /// Days billed at the per-day or daily remainder rate.
    pub remainder_days: i64,
    /// The overdue charge.
    pub amount: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: PricingStep,
}

/// Calendar days from the day after `original_end` through `now`.
///
/// ```
/// use rental_engine::calculation::overdue_days;
/// use chrono::NaiveDate;
///
/// let at = |day, hour| {
///     NaiveDate::from_ymd_opt(2026, 3, day).unwrap().and_hms_opt(hour, 0, 0).unwrap()
/// };
/// assert_eq!(overdue_days(at(10, 10), at(10, 18)), 0);
/// assert_eq!(overdue_days(at(10, 10), at(13, 9)), 3);
/// ```
pub fn overdue_days(original_end: NaiveDateTime, now: NaiveDateTime) -> i64 {
    if now <= original_end {
        return 0;
    }
    (now.date() - original_end.date()).num_days()
}

/// Calculates the overdue charge at `now`.
///
/// # Errors
///
/// Returns `AmountOverflow` if the charge exceeds the decimal range.
pub fn calculate_overdue(
    original_end: NaiveDateTime,
    now: NaiveDateTime,
    resolution: &RateResolution,
    step_number: u32,
) -> EngineResult<OverdueResult> {
    let days = overdue_days(original_end, now);
    let (amount, weeks, remainder_days) = if days > 0 {
        base_cost_amount(days, resolution)?
    } else {
        (Decimal::ZERO, 0, 0)
    };

    let reasoning = if days == 0 {
        format!("{} is not past the original end {}", now, original_end)
    } else {
        format!(
            "{} day(s) past {} billed at {} = {}",
            days,
            original_end.date(),
            resolution.unit_rate,
            amount
        )
    };

    let audit_step = PricingStep {
        step_number,
        rule_id: "overdue".to_string(),
        rule_name: "Overdue Charge".to_string(),
        input: serde_json::json!({
            "original_end": original_end.to_string(),
            "now": now.to_string(),
            "unit_rate": resolution.unit_rate.to_string(),
            "billing_unit": resolution.billing_unit
        }),
        output: serde_json::json!({
            "overdue_days": days,
            "weeks": weeks,
            "remainder_days": remainder_days,
            "amount": amount.to_string()
        }),
        reasoning,
    };

    Ok(OverdueResult {
        overdue_days: days,
        weeks,
        remainder_days,
        amount,
        audit_step,
    })
}

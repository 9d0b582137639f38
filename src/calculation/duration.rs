//! Billable duration calculation.
//!
//! Durations are counted in calendar days, not elapsed hours: a rental that
//! starts at 17:00 and ends at 09:00 the next morning spans two billable
//! days. Both boundary days are billed.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::models::{PricingStep, RentalPeriod};

/// The billable days of a rental period and the audit step recording them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationResult {
    /// Billable calendar days (at least 1).
    pub days: i64,
    /// The audit step recording this calculation.
    pub audit_step: PricingStep,
}

/// Counts calendar days from `start` to `end`, both inclusive.
///
/// Returns `None` when `end` is before `start`.
///
/// # Examples
///
/// ```
/// use rental_engine::calculation::inclusive_days;
/// use chrono::NaiveDate;
///
/// let d = |day| NaiveDate::from_ymd_opt(2026, 3, day).unwrap();
/// assert_eq!(inclusive_days(d(2), d(2)), Some(1));
/// assert_eq!(inclusive_days(d(2), d(11)), Some(10));
/// assert_eq!(inclusive_days(d(11), d(2)), None);
/// ```
pub fn inclusive_days(start: NaiveDate, end: NaiveDate) -> Option<i64> {
    if end < start {
        return None;
    }
    Some((end - start).num_days() + 1)
}

/// Billable days between two instants.
///
/// The caller must reject `end < start` beforehand; the result is never
/// less than one day.
pub fn billable_days(start: NaiveDateTime, end: NaiveDateTime) -> i64 {
    inclusive_days(start.date(), end.date()).unwrap_or(1).max(1)
}

/// Splits a day count into full weeks and leftover days.
///
/// ```
/// use rental_engine::calculation::split_weeks;
///
/// assert_eq!(split_weeks(9), (1, 2));
/// assert_eq!(split_weeks(6), (0, 6));
/// assert_eq!(split_weeks(14), (2, 0));
/// ```
pub fn split_weeks(days: i64) -> (i64, i64) {
    (days / 7, days % 7)
}

/// Calculates the billable days of a rental period.
pub fn calculate_duration(period: &RentalPeriod, step_number: u32) -> DurationResult {
    let days = billable_days(period.start, period.end);

    let audit_step = PricingStep {
        step_number,
        rule_id: "billable_duration".to_string(),
        rule_name: "Billable Duration".to_string(),
        input: serde_json::json!({
            "start": period.start.to_string(),
            "end": period.end.to_string(),
            "rental_type": period.rental_type.as_str()
        }),
        output: serde_json::json!({
            "days": days
        }),
        reasoning: format!(
            "{} to {} inclusive is {} billable day(s)",
            period.start_date(),
            period.end_date(),
            days
        ),
    };

    DurationResult { days, audit_step }
}

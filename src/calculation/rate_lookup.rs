//! Rate lookup functionality.
//!
//! This module decides which rate a rental is billed at: a special reason's
//! rate, a negotiated rate, or the rate table entry for the rental type.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::TariffConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    BillingUnit, PricingStep, PricingWarning, RateSource, RentalReason, RentalType, SpecialReason,
};

/// The rate a rental is billed at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateResolution {
    /// Rate per billing unit.
    pub unit_rate: Decimal,
    /// Unit the rate is quoted in.
    pub billing_unit: BillingUnit,
    /// Table daily rate, used for the leftover days of weekly billing.
    pub daily_rate: Decimal,
    /// Where `unit_rate` came from.
    pub source: RateSource,
    /// The special reason that set the rate, if any.
    pub special_reason: Option<SpecialReason>,
}

/// The result of a rate lookup, including the audit step and any warnings.
#[derive(Debug, Clone)]
pub struct RateLookupResult {
    /// The resolved rate.
    pub resolution: RateResolution,
    /// Warnings about inputs that were ignored or defaulted.
    pub warnings: Vec<PricingWarning>,
    /// The audit step recording this lookup.
    pub audit_step: PricingStep,
}

/// Determines the rate a rental is billed at.
///
/// Priority:
/// 1. A special reason (`staff`, `workshop`, `c-substitute`, `h-substitute`)
///    uses its own table entry and ignores any negotiated rate
/// 2. A negotiated rate replaces the rental type's table rate for its unit
/// 3. Otherwise the rental type's table rate applies
///
/// Unrecognized reason text falls back to the rental type's rate and raises
/// an `UNRECOGNIZED_REASON` warning. A missing table entry is an error.
///
/// # Errors
///
/// - `RateNotFound` if no table is effective on `effective_date` or the
///   table has no entry for the key
/// - `InvalidCharge` if the negotiated rate is negative
pub fn resolve_rate(
    rental_type: RentalType,
    reason: &RentalReason,
    negotiated_rate: Option<Decimal>,
    effective_date: NaiveDate,
    config: &TariffConfig,
    step_number: u32,
) -> EngineResult<RateLookupResult> {
    let table = config.rate_table_for(effective_date)?;
    let mut warnings = Vec::new();

    let daily_rate = table
        .type_rate(RentalType::Daily)
        .map(|entry| entry.rate)
        .ok_or_else(|| EngineError::RateNotFound {
            rate_key: RentalType::Daily.as_str().to_string(),
            date: effective_date,
        })?;

    let (resolution, reasoning) = if let Some(special) = reason.special() {
        let entry = table
            .reason_rate(special)
            .ok_or_else(|| EngineError::RateNotFound {
                rate_key: special.as_str().to_string(),
                date: effective_date,
            })?;

        if negotiated_rate.is_some() {
            warnings.push(PricingWarning::new(
                "NEGOTIATED_RATE_IGNORED",
                format!(
                    "Negotiated rate ignored: reason '{}' has its own rate",
                    special.as_str()
                ),
                "low",
            ));
        }

        let reasoning = format!(
            "Reason '{}' overrides the {} rate: {} {}",
            special.as_str(),
            rental_type,
            entry.rate,
            unit_label(entry.unit)
        );

        (
            RateResolution {
                unit_rate: entry.rate,
                billing_unit: entry.unit,
                daily_rate,
                source: RateSource::Reason,
                special_reason: Some(special),
            },
            reasoning,
        )
    } else {
        let entry = table
            .type_rate(rental_type)
            .ok_or_else(|| EngineError::RateNotFound {
                rate_key: rental_type.as_str().to_string(),
                date: effective_date,
            })?;

        if !reason.is_recognized() {
            warnings.push(PricingWarning::new(
                "UNRECOGNIZED_REASON",
                format!(
                    "Reason '{}' is not recognized; billed at the {} rate",
                    reason.as_str(),
                    rental_type
                ),
                "medium",
            ));
        }

        match negotiated_rate {
            Some(rate) if rate < Decimal::ZERO => {
                return Err(EngineError::InvalidCharge {
                    field: "negotiated_rate".to_string(),
                    message: format!("must not be negative, got {}", rate),
                });
            }
            Some(rate) => {
                let reasoning = format!(
                    "Negotiated rate {} {} replaces table rate {}",
                    rate,
                    unit_label(entry.unit),
                    entry.rate
                );
                (
                    RateResolution {
                        unit_rate: rate,
                        billing_unit: entry.unit,
                        daily_rate,
                        source: RateSource::Negotiated,
                        special_reason: None,
                    },
                    reasoning,
                )
            }
            None => {
                let reasoning = format!(
                    "Table rate for {} rentals effective {}: {} {}",
                    rental_type,
                    table.effective_date,
                    entry.rate,
                    unit_label(entry.unit)
                );
                (
                    RateResolution {
                        unit_rate: entry.rate,
                        billing_unit: entry.unit,
                        daily_rate,
                        source: RateSource::Table,
                        special_reason: None,
                    },
                    reasoning,
                )
            }
        }
    };

    let audit_step = PricingStep {
        step_number,
        rule_id: "rate_lookup".to_string(),
        rule_name: "Rate Lookup".to_string(),
        input: serde_json::json!({
            "rental_type": rental_type.as_str(),
            "reason": reason.as_str(),
            "negotiated_rate": negotiated_rate.map(|r| r.to_string()),
            "effective_date": effective_date.to_string()
        }),
        output: serde_json::json!({
            "unit_rate": resolution.unit_rate.to_string(),
            "billing_unit": unit_label(resolution.billing_unit),
            "daily_rate": resolution.daily_rate.to_string(),
            "source": resolution.source,
            "rate_effective_date": table.effective_date.to_string()
        }),
        reasoning,
    };

    Ok(RateLookupResult {
        resolution,
        warnings,
        audit_step,
    })
}

fn unit_label(unit: BillingUnit) -> &'static str {
    match unit {
        BillingUnit::PerDay => "per day",
        BillingUnit::PerWeek => "per week",
    }
}

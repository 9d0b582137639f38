//! Surcharge calculation.
//!
//! Sums the optional extras of a [`ChargeSet`]: storage (with VAT when the
//! storage is VAT-inclusive), recovery, delivery, collection and insurance.
//! Storage with missing or inverted dates is billed as zero days and
//! reported through an `INVALID_STORAGE_DATES` warning.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EngineResult;
use crate::models::{ChargeSet, PricingStep, PricingWarning, StorageCharge};

use super::duration::inclusive_days;
use super::rounding::{checked_mul, checked_sum, round_money};

/// The surcharges of a rental and the audit step recording them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurchargeResult {
    /// Storage days after date validation.
    pub storage_days: i64,
    /// Storage cost, VAT included when applicable.
    pub storage_cost: Decimal,
    /// Recovery cost.
    pub recovery_cost: Decimal,
    /// Delivery charge.
    pub delivery_charge: Decimal,
    /// Collection charge.
    pub collection_charge: Decimal,
    /// Insurance over the rental days.
    pub insurance_cost: Decimal,
    /// Sum of all surcharges.
    pub total: Decimal,
    /// Warnings about defaulted inputs.
    pub warnings: Vec<PricingWarning>,
    /// The audit step recording this calculation.
    pub audit_step: PricingStep,
}

fn storage_days(storage: &StorageCharge) -> Option<i64> {
    match (storage.start_date, storage.end_date) {
        (Some(start), Some(end)) => inclusive_days(start, end),
        _ => None,
    }
}

/// Calculates the surcharges for a rental of `rental_days` days.
///
/// `vat_rate` is applied to VAT-inclusive storage only; insurance is charged
/// per rental day, not per storage day.
///
/// # Errors
///
/// Returns `AmountOverflow` if a surcharge or their total exceeds the
/// decimal range.
pub fn calculate_surcharges(
    charges: &ChargeSet,
    rental_days: i64,
    vat_rate: Decimal,
    step_number: u32,
) -> EngineResult<SurchargeResult> {
    let mut warnings = Vec::new();

    let (storage_days, storage_cost) = match &charges.storage {
        Some(storage) => {
            let days = storage_days(storage).unwrap_or_else(|| {
                warnings.push(PricingWarning::new(
                    "INVALID_STORAGE_DATES",
                    format!(
                        "Storage dates {:?} to {:?} are missing or inverted; storage billed as 0 days",
                        storage.start_date, storage.end_date
                    ),
                    "medium",
                ));
                0
            });
            let multiplier = if storage.vat_inclusive {
                Decimal::ONE + vat_rate
            } else {
                Decimal::ONE
            };
            let before_vat = checked_mul(Decimal::from(days), storage.cost_per_day, "storage")?;
            (days, round_money(checked_mul(before_vat, multiplier, "storage")?))
        }
        None => (0, Decimal::ZERO),
    };

    let insurance_cost = round_money(checked_mul(
        Decimal::from(rental_days),
        charges.insurance_per_day,
        "insurance",
    )?);

    let total = checked_sum(
        [
            storage_cost,
            charges.recovery_cost,
            charges.delivery_charge,
            charges.collection_charge,
            insurance_cost,
        ],
        "surcharges",
    )?;

    let audit_step = PricingStep {
        step_number,
        rule_id: "surcharges".to_string(),
        rule_name: "Surcharges".to_string(),
        input: serde_json::json!({
            "charges": charges,
            "rental_days": rental_days,
            "vat_rate": vat_rate.to_string()
        }),
        output: serde_json::json!({
            "storage_days": storage_days,
            "storage_cost": storage_cost.to_string(),
            "insurance_cost": insurance_cost.to_string(),
            "total": total.to_string()
        }),
        reasoning: format!(
            "Storage {} + recovery {} + delivery {} + collection {} + insurance {} = {}",
            storage_cost,
            charges.recovery_cost,
            charges.delivery_charge,
            charges.collection_charge,
            insurance_cost,
            total
        ),
    };

    Ok(SurchargeResult {
        storage_days,
        storage_cost,
        recovery_cost: charges.recovery_cost,
        delivery_charge: charges.delivery_charge,
        collection_charge: charges.collection_charge,
        insurance_cost,
        total,
        warnings,
        audit_step,
    })
}

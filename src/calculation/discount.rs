//! Discount calculation.
//!
//! This module has two jobs:
//!
//! - **Derivation**: a discount edit sets one of percentage or amount and
//!   derives the other from the subtotal. The edited field becomes the
//!   source of truth.
//! - **Application**: the authoritative discount, plus any free periods
//!   credited at the rental's unit rate, is subtracted from the subtotal.
//!   The final amount is not floored; a discount larger than the subtotal
//!   yields a negative amount and a `NEGATIVE_FINAL_AMOUNT` warning.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{DiscountEdit, DiscountSource, DiscountSpec, PricingStep, PricingWarning};

use super::rounding::{checked_mul, checked_sum, round_money, round_percentage};

/// Both discount fields after a derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountFields {
    /// Percentage of the subtotal, rounded to 1 dp when derived.
    pub percentage: Decimal,
    /// Flat amount, rounded to 2 dp when derived.
    pub amount: Decimal,
    /// The field that was edited.
    pub source: DiscountSource,
}

/// The discount applied to a subtotal and the audit step recording it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountResult {
    /// Discount from the percentage or flat amount.
    pub percentage_discount: Decimal,
    /// Discount from free periods.
    pub free_period_discount: Decimal,
    /// Total discount.
    pub discount_amount: Decimal,
    /// Subtotal minus total discount.
    pub final_amount: Decimal,
    /// Warnings raised while applying the discount.
    pub warnings: Vec<PricingWarning>,
    /// The audit step recording this calculation.
    pub audit_step: PricingStep,
}

/// Derives the other discount field from an edit.
///
/// A percentage edit yields `amount = subtotal × pct / 100`; an amount edit
/// yields `pct = amount / subtotal × 100`. A zero subtotal derives a zero
/// percentage.
///
/// An amount above the subtotal derives a percentage above 100. The amount
/// stays authoritative, so the spec still validates and prices to a
/// negative final amount.
///
/// # Examples
///
/// ```
/// use rental_engine::calculation::derive_discount_fields;
/// use rental_engine::models::{DiscountEdit, DiscountSource};
/// use rust_decimal::Decimal;
///
/// let subtotal = Decimal::new(600, 0);
///
/// let fields = derive_discount_fields(subtotal, DiscountEdit::Percentage(Decimal::new(10, 0)))?;
/// assert_eq!(fields.amount, Decimal::new(60, 0));
///
/// let fields = derive_discount_fields(subtotal, DiscountEdit::Amount(Decimal::new(45, 0)))?;
/// assert_eq!(fields.percentage, Decimal::new(75, 1));
/// assert_eq!(fields.source, DiscountSource::Amount);
/// # Ok::<(), rental_engine::error::EngineError>(())
/// ```
///
/// # Errors
///
/// Returns `AmountOverflow` if the derived value exceeds the decimal range.
pub fn derive_discount_fields(subtotal: Decimal, edit: DiscountEdit) -> EngineResult<DiscountFields> {
    let (percentage, amount) = match edit {
        DiscountEdit::Percentage(percentage) => {
            let amount = checked_mul(subtotal, percentage, "discount amount")? / Decimal::ONE_HUNDRED;
            (percentage, round_money(amount))
        }
        DiscountEdit::Amount(amount) if subtotal.is_zero() => (Decimal::ZERO, amount),
        DiscountEdit::Amount(amount) => {
            let share = amount
                .checked_div(subtotal)
                .ok_or_else(|| EngineError::AmountOverflow {
                    operation: "discount percentage".to_string(),
                })?;
            let percentage = checked_mul(share, Decimal::ONE_HUNDRED, "discount percentage")?;
            (round_percentage(percentage), amount)
        }
    };

    Ok(DiscountFields {
        percentage,
        amount,
        source: edit.source(),
    })
}

/// Applies an edit to a discount, deriving the other field.
///
/// Notes and free periods are left unchanged. On error the discount is not
/// modified.
pub fn apply_discount_edit(
    discount: &mut DiscountSpec,
    subtotal: Decimal,
    edit: DiscountEdit,
) -> EngineResult<()> {
    let fields = derive_discount_fields(subtotal, edit)?;
    discount.percentage = fields.percentage;
    discount.amount = fields.amount;
    discount.source = fields.source;
    Ok(())
}

/// Applies a discount to a subtotal.
///
/// The authoritative field is re-read against `subtotal`, so a percentage
/// discount follows a changed subtotal while a flat amount stays fixed.
/// `unit_rate` is the rate each free period is credited at.
///
/// # Errors
///
/// Returns the discount's validation error (`InvalidDiscount` or
/// `MissingDiscountNotes`) before anything is computed, and
/// `AmountOverflow` if the discount exceeds the decimal range.
pub fn apply_discount(
    subtotal: Decimal,
    discount: Option<&DiscountSpec>,
    unit_rate: Decimal,
    step_number: u32,
) -> EngineResult<DiscountResult> {
    if let Some(discount) = discount {
        discount.validate()?;
    }

    let (percentage_discount, free_periods) = match discount {
        Some(discount) => {
            let percentage_discount = match discount.source {
                DiscountSource::Percentage => round_money(
                    checked_mul(subtotal, discount.percentage, "discount")? / Decimal::ONE_HUNDRED,
                ),
                DiscountSource::Amount => discount.amount,
            };
            (percentage_discount, discount.free_periods)
        }
        None => (Decimal::ZERO, 0),
    };

    let free_period_discount = checked_mul(Decimal::from(free_periods), unit_rate, "discount")?;
    let discount_amount = checked_sum([percentage_discount, free_period_discount], "discount")?;
    let final_amount = subtotal
        .checked_sub(discount_amount)
        .ok_or_else(|| EngineError::AmountOverflow {
            operation: "final amount".to_string(),
        })?;

    let mut warnings = Vec::new();
    if final_amount < Decimal::ZERO {
        warnings.push(PricingWarning::new(
            "NEGATIVE_FINAL_AMOUNT",
            format!(
                "Discount {} exceeds subtotal {}; final amount is {}",
                discount_amount, subtotal, final_amount
            ),
            "high",
        ));
    }

    let audit_step = PricingStep {
        step_number,
        rule_id: "discount".to_string(),
        rule_name: "Discount".to_string(),
        input: serde_json::json!({
            "subtotal": subtotal.to_string(),
            "discount": discount,
            "unit_rate": unit_rate.to_string()
        }),
        output: serde_json::json!({
            "percentage_discount": percentage_discount.to_string(),
            "free_period_discount": free_period_discount.to_string(),
            "discount_amount": discount_amount.to_string(),
            "final_amount": final_amount.to_string()
        }),
        reasoning: if discount_amount.is_zero() {
            "No discount applied".to_string()
        } else {
            format!(
                "{} - ({} + {} free period(s) x {}) = {}",
                subtotal, percentage_discount, free_periods, unit_rate, final_amount
            )
        },
    };

    Ok(DiscountResult {
        percentage_discount,
        free_period_discount,
        discount_amount,
        final_amount,
        warnings,
        audit_step,
    })
}

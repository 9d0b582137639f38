//! Discount models.
//!
//! A discount has two input modes, a percentage of the subtotal and a flat
//! amount. Exactly one of them is authoritative at any time, named by
//! [`DiscountSource`]; the other is derived from it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Which discount field is the source of truth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountSource {
    /// The percentage was entered; the amount is derived.
    #[default]
    Percentage,
    /// The amount was entered; the percentage is derived.
    Amount,
}

/// An edit to one of the two discount fields.
///
/// Serialized as `{"field": "percentage", "value": "10"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum DiscountEdit {
    /// A new percentage (0–100).
    Percentage(Decimal),
    /// A new flat amount.
    Amount(Decimal),
}

impl DiscountEdit {
    /// The source of truth this edit establishes.
    pub fn source(&self) -> DiscountSource {
        match self {
            DiscountEdit::Percentage(_) => DiscountSource::Percentage,
            DiscountEdit::Amount(_) => DiscountSource::Amount,
        }
    }

    /// Rejects a percentage outside 0–100 or a negative amount.
    pub fn validate(&self) -> EngineResult<()> {
        match *self {
            DiscountEdit::Percentage(pct) if pct < Decimal::ZERO || pct > Decimal::ONE_HUNDRED => {
                Err(EngineError::InvalidDiscount {
                    message: format!("percentage must be between 0 and 100, got {}", pct),
                })
            }
            DiscountEdit::Amount(amount) if amount < Decimal::ZERO => {
                Err(EngineError::InvalidDiscount {
                    message: format!("amount must not be negative, got {}", amount),
                })
            }
            _ => Ok(()),
        }
    }
}

/// A discount applied to a rental.
///
/// # Example
///
/// ```
/// use rental_engine::models::{DiscountSource, DiscountSpec};
/// use rust_decimal::Decimal;
///
/// let discount = DiscountSpec {
///     percentage: Decimal::new(10, 0),
///     amount: Decimal::ZERO,
///     source: DiscountSource::Percentage,
///     free_periods: 0,
///     notes: Some("Loyal customer".to_string()),
/// };
/// assert!(discount.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DiscountSpec {
    /// Percentage of the subtotal (0–100 when authoritative).
    ///
    /// When derived from an amount above the subtotal this exceeds 100.
    #[serde(default)]
    pub percentage: Decimal,
    /// Flat discount amount.
    #[serde(default)]
    pub amount: Decimal,
    /// Which of `percentage` and `amount` is authoritative.
    #[serde(default)]
    pub source: DiscountSource,
    /// Number of free days or weeks credited at the rental's unit rate.
    #[serde(default)]
    pub free_periods: u32,
    /// Why the discount was given.
    #[serde(default)]
    pub notes: Option<String>,
}

impl DiscountSpec {
    /// Returns true if the discount would not reduce the subtotal.
    pub fn is_empty(&self) -> bool {
        let authoritative = match self.source {
            DiscountSource::Percentage => self.percentage,
            DiscountSource::Amount => self.amount,
        };
        authoritative.is_zero() && self.free_periods == 0
    }

    /// Checks ranges and requires notes for any non-empty discount.
    ///
    /// The 100% cap applies only to an authoritative percentage.
    pub fn validate(&self) -> EngineResult<()> {
        let above_cap =
            self.source == DiscountSource::Percentage && self.percentage > Decimal::ONE_HUNDRED;
        if self.percentage < Decimal::ZERO || above_cap {
            return Err(EngineError::InvalidDiscount {
                message: format!("percentage must be between 0 and 100, got {}", self.percentage),
            });
        }

        if self.amount < Decimal::ZERO {
            return Err(EngineError::InvalidDiscount {
                message: format!("amount must not be negative, got {}", self.amount),
            });
        }

        let has_notes = self
            .notes
            .as_deref()
            .is_some_and(|notes| !notes.trim().is_empty());
        if !self.is_empty() && !has_notes {
            return Err(EngineError::MissingDiscountNotes);
        }

        Ok(())
    }
}

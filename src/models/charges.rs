//! Surcharge models.
//!
//! A [`ChargeSet`] groups the optional extras added on top of the base
//! rental cost. Every field defaults to zero when absent.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Storage of a vehicle between two dates at a daily cost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageCharge {
    /// First day of storage (inclusive).
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// Last day of storage (inclusive).
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Cost per storage day before VAT.
    pub cost_per_day: Decimal,
    /// Whether VAT is added on top of the daily cost.
    #[serde(default)]
    pub vat_inclusive: bool,
}

/// Optional surcharges applied to a rental.
///
/// # Example
///
/// ```
/// use rental_engine::models::ChargeSet;
/// use rust_decimal::Decimal;
///
/// let charges = ChargeSet {
///     delivery_charge: Decimal::new(25, 0),
///     ..ChargeSet::default()
/// };
/// assert!(charges.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargeSet {
    /// Storage charge, if the vehicle was stored.
    #[serde(default)]
    pub storage: Option<StorageCharge>,
    /// Flat recovery cost.
    #[serde(default)]
    pub recovery_cost: Decimal,
    /// Flat delivery charge.
    #[serde(default)]
    pub delivery_charge: Decimal,
    /// Flat collection charge.
    #[serde(default)]
    pub collection_charge: Decimal,
    /// Insurance cost per rental day.
    #[serde(default)]
    pub insurance_per_day: Decimal,
}

impl ChargeSet {
    /// Rejects negative charge values.
    pub fn validate(&self) -> EngineResult<()> {
        let storage_cost = self.storage.as_ref().map(|s| s.cost_per_day);
        let fields = [
            ("recovery_cost", Some(self.recovery_cost)),
            ("delivery_charge", Some(self.delivery_charge)),
            ("collection_charge", Some(self.collection_charge)),
            ("insurance_per_day", Some(self.insurance_per_day)),
            ("storage.cost_per_day", storage_cost),
        ];

        for (field, value) in fields {
            match value {
                Some(value) if value < Decimal::ZERO => {
                    return Err(EngineError::InvalidCharge {
                        field: field.to_string(),
                        message: format!("must not be negative, got {}", value),
                    });
                }
                _ => {}
            }
        }

        Ok(())
    }
}

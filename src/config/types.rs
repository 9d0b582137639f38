//! Configuration types for rental pricing.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;

use crate::error::{EngineError, EngineResult};
use crate::models::{BillingUnit, RentalType, SpecialReason};

/// Metadata about the tariff.
#[derive(Debug, Clone, Deserialize)]
pub struct TariffMetadata {
    /// Short identifier of the tariff (e.g., "default").
    pub code: String,
    /// The human-readable name of the tariff.
    pub name: String,
    /// ISO currency code all amounts are expressed in.
    pub currency: String,
    /// The version or effective date of the tariff.
    pub version: String,
}

/// A rate and the unit it is quoted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct RateEntry {
    /// The monetary rate.
    pub rate: Decimal,
    /// Whether the rate is per day or per week.
    pub unit: BillingUnit,
}

/// Rate table effective from a given date.
///
/// Maps rental types and special reasons to rates. A lookup for a key with
/// no entry is an error, never a silent default.
#[derive(Debug, Clone, Deserialize)]
pub struct RateTable {
    /// The effective date for these rates.
    pub effective_date: NaiveDate,
    /// Rates by rental type.
    pub rental_types: HashMap<RentalType, RateEntry>,
    /// Rates by special reason.
    #[serde(default)]
    pub reasons: HashMap<SpecialReason, RateEntry>,
}

impl RateTable {
    /// Returns the rate entry for a rental type.
    pub fn type_rate(&self, rental_type: RentalType) -> Option<&RateEntry> {
        self.rental_types.get(&rental_type)
    }

    /// Returns the rate entry for a special reason.
    pub fn reason_rate(&self, reason: SpecialReason) -> Option<&RateEntry> {
        self.reasons.get(&reason)
    }
}

/// Outbox settings for follow-up document generation.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentPolicy {
    /// Attempts before a document job is marked failed.
    pub max_attempts: u32,
}

impl Default for DocumentPolicy {
    fn default() -> Self {
        Self { max_attempts: 3 }
    }
}

/// Pricing policy from policy.yaml.
#[derive(Debug, Clone, Deserialize)]
pub struct PricingPolicy {
    /// VAT rate added to VAT-inclusive storage (0.20 for 20%).
    pub vat_rate: Decimal,
    /// Remaining balance at or below which a rental counts as paid.
    pub settlement_tolerance: Decimal,
    /// Document outbox settings.
    #[serde(default)]
    pub documents: DocumentPolicy,
}

/// The complete tariff configuration.
///
/// This struct aggregates all configuration loaded from the various YAML
/// files in a tariff configuration directory. It is passed explicitly into
/// every calculation, so tests can substitute their own tables.
#[derive(Debug, Clone)]
pub struct TariffConfig {
    /// Tariff metadata.
    metadata: TariffMetadata,
    /// Rate tables by effective date (sorted oldest first).
    rates: Vec<RateTable>,
    /// Pricing policy.
    policy: PricingPolicy,
}

impl TariffConfig {
    /// Creates a new TariffConfig from its component parts.
    pub fn new(metadata: TariffMetadata, rates: Vec<RateTable>, policy: PricingPolicy) -> Self {
        let mut sorted_rates = rates;
        sorted_rates.sort_by(|a, b| a.effective_date.cmp(&b.effective_date));
        Self {
            metadata,
            rates: sorted_rates,
            policy,
        }
    }

    /// Returns the tariff metadata.
    pub fn tariff(&self) -> &TariffMetadata {
        &self.metadata
    }

    /// Returns the pricing policy.
    pub fn policy(&self) -> &PricingPolicy {
        &self.policy
    }

    /// Returns all rate tables.
    pub fn rates(&self) -> &[RateTable] {
        &self.rates
    }

    /// Returns the most recent rate table effective on or before `date`.
    pub fn rate_table_for(&self, date: NaiveDate) -> EngineResult<&RateTable> {
        self.rates
            .iter()
            .rfind(|table| table.effective_date <= date)
            .ok_or_else(|| EngineError::RateNotFound {
                rate_key: "rate_table".to_string(),
                date,
            })
    }

    /// Checks the cross-file invariants the calculators rely on.
    ///
    /// Every table needs a per-day `daily` entry because weekly rentals
    /// bill their remainder days at it.
    pub fn validate(&self) -> EngineResult<()> {
        if self.policy.vat_rate < Decimal::ZERO {
            return Err(EngineError::InvalidConfig {
                message: format!("vat_rate must not be negative, got {}", self.policy.vat_rate),
            });
        }
        if self.policy.settlement_tolerance < Decimal::ZERO {
            return Err(EngineError::InvalidConfig {
                message: "settlement_tolerance must not be negative".to_string(),
            });
        }
        if self.policy.documents.max_attempts == 0 {
            return Err(EngineError::InvalidConfig {
                message: "documents.max_attempts must be at least 1".to_string(),
            });
        }

        for table in &self.rates {
            match table.type_rate(RentalType::Daily) {
                Some(entry) if entry.unit == BillingUnit::PerDay => {}
                Some(_) => {
                    return Err(EngineError::InvalidConfig {
                        message: format!(
                            "rate table {}: daily rate must be per_day",
                            table.effective_date
                        ),
                    });
                }
                None => {
                    return Err(EngineError::InvalidConfig {
                        message: format!(
                            "rate table {}: missing daily rate",
                            table.effective_date
                        ),
                    });
                }
            }

            let negative = table
                .rental_types
                .values()
                .chain(table.reasons.values())
                .any(|entry| entry.rate < Decimal::ZERO);
            if negative {
                return Err(EngineError::InvalidConfig {
                    message: format!(
                        "rate table {}: rates must not be negative",
                        table.effective_date
                    ),
                });
            }
        }

        Ok(())
    }
}

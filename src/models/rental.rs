//! Rental period, rental type and rental reason models.
//!
//! This module defines the inputs that identify what is being priced: the
//! booked period, how it is billed, and why the vehicle is out.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{EngineError, EngineResult};

use super::{ChargeSet, DiscountSpec};

/// The unit a rate is quoted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingUnit {
    /// The rate is charged per calendar day.
    PerDay,
    /// The rate is charged per full week; leftover days use the daily rate.
    PerWeek,
}

/// How a rental is billed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RentalType {
    /// Billed per day at the vehicle's daily rate.
    Daily,
    /// Billed per full week, remainder days at the daily rate.
    Weekly,
    /// Insurance claim hire, billed per day at the claim rate.
    Claim,
}

impl RentalType {
    /// Returns the billing unit of this rental type.
    ///
    /// # Examples
    ///
    /// ```
    /// use rental_engine::models::{BillingUnit, RentalType};
    ///
    /// assert_eq!(RentalType::Weekly.billing_unit(), BillingUnit::PerWeek);
    /// assert_eq!(RentalType::Claim.billing_unit(), BillingUnit::PerDay);
    /// ```
    pub fn billing_unit(&self) -> BillingUnit {
        match self {
            RentalType::Weekly => BillingUnit::PerWeek,
            RentalType::Daily | RentalType::Claim => BillingUnit::PerDay,
        }
    }

    /// Returns the configuration key of this rental type.
    pub fn as_str(&self) -> &'static str {
        match self {
            RentalType::Daily => "daily",
            RentalType::Weekly => "weekly",
            RentalType::Claim => "claim",
        }
    }
}

impl fmt::Display for RentalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reasons that replace the type-based rate entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpecialReason {
    /// Vehicle used by staff.
    #[serde(rename = "staff")]
    Staff,
    /// Vehicle in the workshop; never billed.
    #[serde(rename = "workshop")]
    Workshop,
    /// Courtesy substitute vehicle.
    #[serde(rename = "c-substitute")]
    CSubstitute,
    /// Hire substitute vehicle.
    #[serde(rename = "h-substitute")]
    HSubstitute,
}

impl SpecialReason {
    /// Returns the configuration key of this reason.
    pub fn as_str(&self) -> &'static str {
        match self {
            SpecialReason::Staff => "staff",
            SpecialReason::Workshop => "workshop",
            SpecialReason::CSubstitute => "c-substitute",
            SpecialReason::HSubstitute => "h-substitute",
        }
    }
}

/// Why a vehicle is out on rental.
///
/// Reasons arrive as free text from stored records. Known values map to
/// variants; anything else is kept verbatim in [`RentalReason::Other`] and
/// priced at the type-based rate.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RentalReason {
    /// Ordinary paying hire.
    #[default]
    Hired,
    /// Hire under an insurance claim.
    Claim,
    /// One of the reasons with its own rate.
    Special(SpecialReason),
    /// A reason the engine does not recognize.
    Other(String),
}

impl RentalReason {
    /// Returns the special reason, if this reason overrides the type rate.
    pub fn special(&self) -> Option<SpecialReason> {
        match self {
            RentalReason::Special(reason) => Some(*reason),
            _ => None,
        }
    }

    /// Returns true if the reason text was recognized.
    pub fn is_recognized(&self) -> bool {
        !matches!(self, RentalReason::Other(_))
    }

    /// Returns the reason as stored text.
    pub fn as_str(&self) -> &str {
        match self {
            RentalReason::Hired => "hired",
            RentalReason::Claim => "claim",
            RentalReason::Special(reason) => reason.as_str(),
            RentalReason::Other(text) => text,
        }
    }
}

impl From<String> for RentalReason {
    fn from(value: String) -> Self {
        match value.trim().to_lowercase().as_str() {
            "hired" | "hire" => RentalReason::Hired,
            "claim" => RentalReason::Claim,
            "staff" => RentalReason::Special(SpecialReason::Staff),
            "workshop" => RentalReason::Special(SpecialReason::Workshop),
            "c-substitute" => RentalReason::Special(SpecialReason::CSubstitute),
            "h-substitute" => RentalReason::Special(SpecialReason::HSubstitute),
            _ => RentalReason::Other(value),
        }
    }
}

impl From<RentalReason> for String {
    fn from(reason: RentalReason) -> Self {
        reason.as_str().to_string()
    }
}

/// A booked rental period.
///
/// Both boundary calendar days are billable.
///
/// # Example
///
/// ```
/// use rental_engine::models::{RentalPeriod, RentalType};
/// use chrono::NaiveDateTime;
///
/// let start = NaiveDateTime::parse_from_str("2026-03-02 10:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
/// let end = NaiveDateTime::parse_from_str("2026-03-11 09:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
///
/// let period = RentalPeriod::new(start, end, RentalType::Daily).unwrap();
/// assert_eq!(period.start_date().to_string(), "2026-03-02");
/// assert!(RentalPeriod::new(end, start, RentalType::Daily).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RentalPeriod {
    /// When the rental starts.
    pub start: NaiveDateTime,
    /// When the rental is booked to end.
    pub end: NaiveDateTime,
    /// How the rental is billed.
    pub rental_type: RentalType,
}

impl RentalPeriod {
    /// Creates a validated rental period.
    pub fn new(
        start: NaiveDateTime,
        end: NaiveDateTime,
        rental_type: RentalType,
    ) -> EngineResult<Self> {
        let period = Self {
            start,
            end,
            rental_type,
        };
        period.validate()?;
        Ok(period)
    }

    /// Rejects periods whose end precedes their start.
    pub fn validate(&self) -> EngineResult<()> {
        if self.end < self.start {
            return Err(EngineError::InvalidPeriod {
                message: format!("end {} is before start {}", self.end, self.start),
            });
        }
        Ok(())
    }

    /// The calendar date the rental starts on.
    pub fn start_date(&self) -> NaiveDate {
        self.start.date()
    }

    /// The calendar date the rental is booked to end on.
    pub fn end_date(&self) -> NaiveDate {
        self.end.date()
    }
}

/// Everything needed to price one rental.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentalTerms {
    /// The vehicle being rented.
    pub vehicle_id: String,
    /// The booked period.
    pub period: RentalPeriod,
    /// Why the vehicle is out.
    #[serde(default)]
    pub reason: RentalReason,
    /// Agreed rate replacing the table rate for the rental's billing unit.
    #[serde(default)]
    pub negotiated_rate: Option<Decimal>,
    /// Optional surcharges.
    #[serde(default)]
    pub charges: ChargeSet,
    /// Optional discount.
    #[serde(default)]
    pub discount: Option<DiscountSpec>,
}

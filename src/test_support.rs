//! Shared fixtures for unit tests.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::str::FromStr;

use crate::config::{
    DocumentPolicy, PricingPolicy, RateEntry, RateTable, TariffConfig, TariffMetadata,
};
use crate::models::{
    BillingUnit, ChargeSet, RentalPeriod, RentalReason, RentalTerms, RentalType, SpecialReason,
};

pub(crate) fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

pub(crate) fn make_datetime(date_str: &str, time_str: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(&format!("{} {}", date_str, time_str), "%Y-%m-%d %H:%M:%S")
        .unwrap()
}

fn entry(rate: &str, unit: BillingUnit) -> RateEntry {
    RateEntry {
        rate: dec(rate),
        unit,
    }
}

/// Tariff with daily 60, weekly 360, claim 85, staff 25, workshop 0,
/// c-substitute 40 and no h-substitute entry.
pub(crate) fn create_test_config() -> TariffConfig {
    let metadata = TariffMetadata {
        code: "test".to_string(),
        name: "Test Tariff".to_string(),
        currency: "GBP".to_string(),
        version: "2025-07-01".to_string(),
    };

    let mut rental_types = HashMap::new();
    rental_types.insert(RentalType::Daily, entry("60", BillingUnit::PerDay));
    rental_types.insert(RentalType::Weekly, entry("360", BillingUnit::PerWeek));
    rental_types.insert(RentalType::Claim, entry("85", BillingUnit::PerDay));

    let mut reasons = HashMap::new();
    reasons.insert(SpecialReason::Staff, entry("25", BillingUnit::PerDay));
    reasons.insert(SpecialReason::Workshop, entry("0", BillingUnit::PerDay));
    reasons.insert(SpecialReason::CSubstitute, entry("40", BillingUnit::PerDay));

    let rates = vec![RateTable {
        effective_date: NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
        rental_types,
        reasons,
    }];

    let policy = PricingPolicy {
        vat_rate: dec("0.20"),
        settlement_tolerance: dec("0.001"),
        documents: DocumentPolicy::default(),
    };

    TariffConfig::new(metadata, rates, policy)
}

/// Terms for a rental of `days` calendar days starting 2026-03-02.
pub(crate) fn create_test_terms(rental_type: RentalType, days: i64) -> RentalTerms {
    let start = make_datetime("2026-03-02", "10:00:00");
    let end = start + chrono::Duration::days(days - 1);
    RentalTerms {
        vehicle_id: "veh_001".to_string(),
        period: RentalPeriod {
            start,
            end,
            rental_type,
        },
        reason: RentalReason::Hired,
        negotiated_rate: None,
        charges: ChargeSet::default(),
        discount: None,
    }
}

//! Rounding rules and overflow-checked arithmetic for money and percentages.
//!
//! Rates and charges come from callers, so products and sums of them can
//! exceed the decimal range. The checked helpers turn that into
//! `AmountOverflow` instead of a panic.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{EngineError, EngineResult};

/// Monetary amounts are rounded to pence.
pub const MONEY_DECIMAL_PLACES: u32 = 2;

/// Discount percentages are rounded to one decimal place.
pub const PERCENTAGE_DECIMAL_PLACES: u32 = 1;

/// Rounds a monetary amount to 2 decimal places, half away from zero.
///
/// ```
/// use rental_engine::calculation::round_money;
/// use rust_decimal::Decimal;
///
/// assert_eq!(round_money(Decimal::new(24_99975, 5)), Decimal::new(2500, 2));
/// ```
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds a percentage to 1 decimal place, half away from zero.
pub fn round_percentage(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(
        PERCENTAGE_DECIMAL_PLACES,
        RoundingStrategy::MidpointAwayFromZero,
    )
}

/// Multiplies two amounts, failing with `AmountOverflow` outside the decimal range.
pub fn checked_mul(lhs: Decimal, rhs: Decimal, operation: &str) -> EngineResult<Decimal> {
    lhs.checked_mul(rhs).ok_or_else(|| EngineError::AmountOverflow {
        operation: operation.to_string(),
    })
}

/// Sums amounts, failing with `AmountOverflow` outside the decimal range.
pub fn checked_sum<I>(amounts: I, operation: &str) -> EngineResult<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    amounts
        .into_iter()
        .try_fold(Decimal::ZERO, |total, amount| total.checked_add(amount))
        .ok_or_else(|| EngineError::AmountOverflow {
            operation: operation.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_round_money_midpoint_goes_up() {
        assert_eq!(round_money(dec("10.005")), dec("10.01"));
        assert_eq!(round_money(dec("-10.005")), dec("-10.01"));
    }

    #[test]
    fn test_round_percentage() {
        assert_eq!(round_percentage(dec("7.50008")), dec("7.5"));
        assert_eq!(round_percentage(dec("33.3333")), dec("33.3"));
        assert_eq!(round_percentage(dec("12.25")), dec("12.3"));
    }

    #[test]
    fn test_checked_mul_reports_overflow() {
        assert_eq!(checked_mul(dec("60"), dec("10"), "base cost").unwrap(), dec("600"));
        assert!(matches!(
            checked_mul(Decimal::MAX, dec("10"), "base cost"),
            Err(EngineError::AmountOverflow { operation }) if operation == "base cost"
        ));
    }

    #[test]
    fn test_checked_sum_reports_overflow() {
        assert_eq!(
            checked_sum([dec("1.50"), dec("2.25")], "subtotal").unwrap(),
            dec("3.75")
        );
        assert!(checked_sum([Decimal::MAX, Decimal::ONE], "subtotal").is_err());
    }
}

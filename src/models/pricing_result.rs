//! Pricing result models for the Rental Pricing Engine.
//!
//! This module contains the [`PricingResult`] type and its associated
//! structures: the line-by-line [`CostBreakdown`], the derived
//! [`PayableSummary`], and the audit trace recording every rule applied.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{BillingUnit, PaymentStatus, RentalPeriod};

/// Where the unit rate of a rental came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateSource {
    /// The rate table entry for the rental type.
    Table,
    /// A negotiated rate agreed for this rental.
    Negotiated,
    /// The rate table entry for a special reason.
    Reason,
}

/// Every component of a rental's cost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostBreakdown {
    /// Billable calendar days.
    pub days: i64,
    /// Full weeks billed at the weekly rate (weekly billing only).
    pub weeks: i64,
    /// Days billed at the daily rate after full weeks.
    pub remainder_days: i64,
    /// Unit the rate is quoted in.
    pub billing_unit: BillingUnit,
    /// Rate per billing unit.
    pub unit_rate: Decimal,
    /// Daily rate used for remainder days.
    pub daily_rate: Decimal,
    /// Where `unit_rate` came from.
    pub rate_source: RateSource,
    /// Cost of the rental period before surcharges.
    pub base_cost: Decimal,
    /// Storage days after date validation.
    pub storage_days: i64,
    /// Storage surcharge, VAT included when applicable.
    pub storage_cost: Decimal,
    /// Recovery surcharge.
    pub recovery_cost: Decimal,
    /// Delivery surcharge.
    pub delivery_charge: Decimal,
    /// Collection surcharge.
    pub collection_charge: Decimal,
    /// Insurance surcharge over the rental days.
    pub insurance_cost: Decimal,
    /// Sum of all surcharges.
    pub surcharges_total: Decimal,
    /// Overdue cost committed on completion; zero until then.
    #[serde(default)]
    pub overdue_cost: Decimal,
    /// Base cost, surcharges and committed overdue cost.
    pub subtotal: Decimal,
    /// Discount from the percentage or flat amount.
    pub percentage_discount: Decimal,
    /// Discount from free periods.
    pub free_period_discount: Decimal,
    /// Total discount.
    pub discount_amount: Decimal,
    /// Subtotal minus discount; may be negative.
    pub final_amount: Decimal,
}

/// The amounts a payable document or ledger reads.
///
/// Always derived, never stored on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayableSummary {
    /// Base cost plus surcharges.
    pub subtotal: Decimal,
    /// Total discount.
    pub discount_amount: Decimal,
    /// Amount payable after discount.
    pub final_amount: Decimal,
    /// Sum of recorded payments.
    pub total_paid: Decimal,
    /// `final_amount - total_paid`.
    pub remaining: Decimal,
    /// Classification of `remaining`.
    pub status: PaymentStatus,
}

impl PayableSummary {
    /// Derives the summary from the priced amounts and the payments made.
    ///
    /// # Example
    ///
    /// ```
    /// use rental_engine::models::{PayableSummary, PaymentStatus};
    /// use rust_decimal::Decimal;
    ///
    /// let summary = PayableSummary::derive(
    ///     Decimal::new(600, 0),
    ///     Decimal::new(60, 0),
    ///     Decimal::new(540, 0),
    ///     Decimal::new(1, 3),
    /// );
    /// assert_eq!(summary.final_amount, Decimal::new(540, 0));
    /// assert_eq!(summary.remaining, Decimal::ZERO);
    /// assert_eq!(summary.status, PaymentStatus::Paid);
    /// ```
    pub fn derive(
        subtotal: Decimal,
        discount_amount: Decimal,
        total_paid: Decimal,
        tolerance: Decimal,
    ) -> Self {
        let final_amount = subtotal - discount_amount;
        let remaining = final_amount - total_paid;
        Self {
            subtotal,
            discount_amount,
            final_amount,
            total_paid,
            remaining,
            status: PaymentStatus::classify(total_paid, remaining, tolerance),
        }
    }
}

/// A single step in the audit trace recording a pricing decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning raised while pricing.
///
/// Warnings mark values that were defaulted rather than computed, so a caller
/// can tell "zero because invalid" from "zero because free".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level ("low", "medium", "high").
    pub severity: String,
}

impl PricingWarning {
    /// Creates a warning.
    pub fn new(
        code: impl Into<String>,
        message: impl Into<String>,
        severity: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            severity: severity.into(),
        }
    }
}

/// The complete audit trace for a pricing run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of pricing steps.
    pub steps: Vec<PricingStep>,
    /// Any warnings generated while pricing.
    pub warnings: Vec<PricingWarning>,
    /// The total calculation duration in microseconds.
    pub duration_us: u64,
}

/// The complete result of pricing one rental.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingResult {
    /// Unique identifier for this calculation.
    pub calculation_id: Uuid,
    /// When the calculation was performed.
    pub timestamp: DateTime<Utc>,
    /// The version of the engine that performed the calculation.
    pub engine_version: String,
    /// The vehicle that was priced.
    pub vehicle_id: String,
    /// The priced period.
    pub period: RentalPeriod,
    /// Line-by-line cost.
    pub breakdown: CostBreakdown,
    /// Payable amounts before any payments.
    pub summary: PayableSummary,
    /// Complete audit trace of pricing decisions.
    pub audit_trace: AuditTrace,
}

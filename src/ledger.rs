//! Append-only payment ledger.
//!
//! A [`PaymentLedger`] records payments against a rental's payable amount.
//! Totals, the remaining balance and the payment status are never stored;
//! they are derived from the entries on every read, so appending or
//! deleting an entry can't leave them stale.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{CostBreakdown, PayableSummary, PaymentEntry, PaymentMethod, PaymentStatus};

/// A payment to be recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPayment {
    /// Amount paid.
    pub amount: Decimal,
    /// How the payment was made.
    pub method: PaymentMethod,
    /// External reference.
    #[serde(default)]
    pub reference: Option<String>,
    /// Free-text notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// When the payment was made.
    pub date: DateTime<Utc>,
    /// Who recorded the payment.
    pub recorded_by: String,
}

/// Payments recorded against one rental.
///
/// # Example
///
/// ```
/// use rental_engine::ledger::{NewPayment, PaymentLedger};
/// use rental_engine::models::{PaymentMethod, PaymentStatus};
/// use rust_decimal::Decimal;
///
/// let mut ledger = PaymentLedger::new(Decimal::new(600, 0), Decimal::new(60, 0), Decimal::new(1, 3));
/// ledger
///     .record_payment(NewPayment {
///         amount: Decimal::new(540, 0),
///         method: PaymentMethod::Card,
///         reference: None,
///         notes: None,
///         date: chrono::Utc::now(),
///         recorded_by: "desk".to_string(),
///     })
///     .unwrap();
///
/// assert_eq!(ledger.remaining(), Decimal::ZERO);
/// assert_eq!(ledger.status(), PaymentStatus::Paid);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentLedger {
    subtotal: Decimal,
    discount_amount: Decimal,
    tolerance: Decimal,
    entries: Vec<PaymentEntry>,
}

impl PaymentLedger {
    /// Creates an empty ledger for a payable amount of
    /// `subtotal - discount_amount`.
    pub fn new(subtotal: Decimal, discount_amount: Decimal, tolerance: Decimal) -> Self {
        Self {
            subtotal,
            discount_amount,
            tolerance,
            entries: Vec::new(),
        }
    }

    /// Creates an empty ledger for a priced rental.
    pub fn from_breakdown(breakdown: &CostBreakdown, tolerance: Decimal) -> Self {
        Self::new(breakdown.subtotal, breakdown.discount_amount, tolerance)
    }

    /// Recorded payments, oldest first.
    pub fn entries(&self) -> &[PaymentEntry] {
        &self.entries
    }

    /// The payable amount.
    pub fn final_amount(&self) -> Decimal {
        self.subtotal - self.discount_amount
    }

    /// Sum of recorded payments.
    pub fn total_paid(&self) -> Decimal {
        self.entries.iter().map(|entry| entry.amount).sum()
    }

    /// Payable amount minus payments.
    pub fn remaining(&self) -> Decimal {
        self.final_amount() - self.total_paid()
    }

    /// Classification of the remaining balance.
    pub fn status(&self) -> PaymentStatus {
        PaymentStatus::classify(self.total_paid(), self.remaining(), self.tolerance)
    }

    /// The derived payable summary.
    pub fn summary(&self) -> PayableSummary {
        PayableSummary::derive(
            self.subtotal,
            self.discount_amount,
            self.total_paid(),
            self.tolerance,
        )
    }

    /// Records a payment.
    ///
    /// # Errors
    ///
    /// - `NonPositivePayment` if the amount is zero or negative
    /// - `Overpayment` if the amount exceeds the remaining balance
    ///
    /// The ledger is unchanged when an error is returned.
    pub fn record_payment(&mut self, payment: NewPayment) -> EngineResult<PaymentEntry> {
        if payment.amount <= Decimal::ZERO {
            return Err(EngineError::NonPositivePayment {
                amount: payment.amount,
            });
        }

        let remaining = self.remaining();
        if payment.amount > remaining {
            return Err(EngineError::Overpayment {
                amount: payment.amount,
                remaining,
            });
        }

        let entry = PaymentEntry {
            id: Uuid::new_v4(),
            amount: payment.amount,
            method: payment.method,
            reference: payment.reference,
            notes: payment.notes,
            date: payment.date,
            recorded_by: payment.recorded_by,
        };
        self.entries.push(entry.clone());

        debug!(
            payment_id = %entry.id,
            amount = %entry.amount,
            remaining = %self.remaining(),
            "Payment recorded"
        );
        Ok(entry)
    }

    /// Deletes a payment and returns it.
    ///
    /// # Errors
    ///
    /// Returns `PaymentNotFound` if no entry has `payment_id`.
    pub fn delete_payment(&mut self, payment_id: Uuid) -> EngineResult<PaymentEntry> {
        let index = self
            .entries
            .iter()
            .position(|entry| entry.id == payment_id)
            .ok_or(EngineError::PaymentNotFound { payment_id })?;
        let entry = self.entries.remove(index);

        debug!(
            payment_id = %entry.id,
            amount = %entry.amount,
            remaining = %self.remaining(),
            "Payment deleted"
        );
        Ok(entry)
    }

    /// Replaces the payable amount after the rental was repriced.
    ///
    /// Recorded payments are kept even if they now exceed the payable amount.
    pub fn reprice(&mut self, breakdown: &CostBreakdown) {
        self.subtotal = breakdown.subtotal;
        self.discount_amount = breakdown.discount_amount;
    }
}

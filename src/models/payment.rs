//! Payment entry and payment status models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How a payment was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Cash.
    Cash,
    /// Debit or credit card.
    Card,
    /// Bank transfer.
    BankTransfer,
    /// Cheque.
    Cheque,
    /// Settled by an insurer or third party.
    ThirdParty,
}

/// A single payment recorded against a rental.
///
/// Entries are appended to a ledger and never edited in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentEntry {
    /// Unique identifier for the entry.
    pub id: Uuid,
    /// Amount paid; always greater than zero.
    pub amount: Decimal,
    /// How the payment was made.
    pub method: PaymentMethod,
    /// External reference (receipt, transaction id).
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

/// Payment classification derived from the outstanding balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Nothing paid yet.
    Pending,
    /// Something paid, balance still outstanding.
    PartiallyPaid,
    /// Balance settled within tolerance.
    Paid,
}

impl PaymentStatus {
    /// Classifies a balance.
    ///
    /// A remaining balance within `tolerance` of zero (or below it) counts as
    /// paid; otherwise any payment makes it partially paid.
    ///
    /// # Examples
    ///
    /// ```
    /// use rental_engine::models::PaymentStatus;
    /// use rust_decimal::Decimal;
    ///
    /// let tolerance = Decimal::new(1, 3);
    /// assert_eq!(
    ///     PaymentStatus::classify(Decimal::ZERO, Decimal::new(540, 0), tolerance),
    ///     PaymentStatus::Pending
    /// );
    /// assert_eq!(
    ///     PaymentStatus::classify(Decimal::new(540, 0), Decimal::ZERO, tolerance),
    ///     PaymentStatus::Paid
    /// );
    /// ```
    pub fn classify(total_paid: Decimal, remaining: Decimal, tolerance: Decimal) -> Self {
        if remaining <= tolerance {
            PaymentStatus::Paid
        } else if total_paid > Decimal::ZERO {
            PaymentStatus::PartiallyPaid
        } else {
            PaymentStatus::Pending
        }
    }
}

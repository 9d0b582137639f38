//! Rental records.
//!
//! A [`RentalRecord`] is a priced rental together with its payment ledger
//! and lifecycle state. Every mutation bumps the record's revision, which
//! document jobs use as part of their idempotency key.

use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::calculation::{
    OverdueCharge, checked_sum, commit_overdue, overdue_charge, price_rental,
};
use crate::config::TariffConfig;
use crate::error::{EngineError, EngineResult};
use crate::ledger::{NewPayment, PaymentLedger};
use crate::models::{AuditTrace, CostBreakdown, PayableSummary, PaymentEntry, RentalTerms};

/// Lifecycle state of a rental.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RentalStatus {
    /// Booked or on hire; overdue charges are live.
    Scheduled,
    /// Returned; overdue charges have been committed.
    Completed,
}

/// Amounts including the live overdue charge of an open rental.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OngoingCharges {
    /// The live overdue charge.
    pub overdue: OverdueCharge,
    /// Subtotal plus the overdue charge.
    pub subtotal: Decimal,
    /// Final amount plus the overdue charge.
    pub final_amount: Decimal,
    /// Remaining balance plus the overdue charge.
    pub remaining: Decimal,
}

/// A stored rental.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentalRecord {
    /// Unique identifier of the rental.
    pub id: Uuid,
    /// The terms the rental was priced from.
    pub terms: RentalTerms,
    /// Line-by-line cost, including any committed overdue cost.
    pub breakdown: CostBreakdown,
    /// Audit trace of the pricing run.
    pub audit_trace: AuditTrace,
    /// Payments against the rental.
    pub ledger: PaymentLedger,
    /// Lifecycle state.
    pub status: RentalStatus,
    /// Overdue cost committed on completion.
    pub overdue_committed: Decimal,
    /// Incremented on every mutation, starting at 1.
    pub revision: u32,
    /// When the rental was created.
    pub created_at: DateTime<Utc>,
    /// When the rental was completed.
    pub completed_at: Option<DateTime<Utc>>,
}

impl RentalRecord {
    /// Prices terms and creates a scheduled rental.
    ///
    /// # Errors
    ///
    /// Returns any error from pricing the terms.
    pub fn create(terms: RentalTerms, config: &TariffConfig) -> EngineResult<Self> {
        let pricing = price_rental(&terms, config)?;
        let ledger =
            PaymentLedger::from_breakdown(&pricing.breakdown, config.policy().settlement_tolerance);

        let record = Self {
            id: Uuid::new_v4(),
            terms,
            breakdown: pricing.breakdown,
            audit_trace: pricing.audit_trace,
            ledger,
            status: RentalStatus::Scheduled,
            overdue_committed: Decimal::ZERO,
            revision: 1,
            created_at: Utc::now(),
            completed_at: None,
        };

        info!(
            rental_id = %record.id,
            vehicle_id = %record.terms.vehicle_id,
            final_amount = %record.breakdown.final_amount,
            "Rental created"
        );
        Ok(record)
    }

    /// The derived payable summary.
    pub fn summary(&self) -> PayableSummary {
        self.ledger.summary()
    }

    /// Amounts including the overdue charge at `now`.
    ///
    /// Returns `None` once the rental is completed, because its overdue
    /// charge is already part of the breakdown.
    ///
    /// # Errors
    ///
    /// - `RateNotFound` if the tariff no longer has the rental's rate
    /// - `AmountOverflow` if the live totals exceed the decimal range
    pub fn ongoing_charges(
        &self,
        now: NaiveDateTime,
        config: &TariffConfig,
    ) -> EngineResult<Option<OngoingCharges>> {
        if self.status == RentalStatus::Completed {
            return Ok(None);
        }

        let overdue = overdue_charge(&self.terms, now, config)?;
        let summary = self.summary();
        Ok(Some(OngoingCharges {
            subtotal: checked_sum([summary.subtotal, overdue.amount], "subtotal")?,
            final_amount: checked_sum([summary.final_amount, overdue.amount], "final amount")?,
            remaining: checked_sum([summary.remaining, overdue.amount], "remaining")?,
            overdue,
        }))
    }

    /// Records a payment against the rental.
    ///
    /// # Errors
    ///
    /// Returns the ledger's rejection; the record is unchanged on error.
    pub fn record_payment(&mut self, payment: NewPayment) -> EngineResult<PaymentEntry> {
        let entry = self.ledger.record_payment(payment)?;
        self.revision += 1;
        info!(
            rental_id = %self.id,
            payment_id = %entry.id,
            amount = %entry.amount,
            status = ?self.ledger.status(),
            "Payment recorded"
        );
        Ok(entry)
    }

    /// Deletes a payment from the rental.
    ///
    /// # Errors
    ///
    /// Returns `PaymentNotFound` for an unknown id.
    pub fn delete_payment(&mut self, payment_id: Uuid) -> EngineResult<PaymentEntry> {
        let entry = self.ledger.delete_payment(payment_id)?;
        self.revision += 1;
        info!(
            rental_id = %self.id,
            payment_id = %entry.id,
            status = ?self.ledger.status(),
            "Payment deleted"
        );
        Ok(entry)
    }

    /// Completes the rental at `now`, committing any overdue charge.
    ///
    /// The discount amount is kept as priced; the overdue charge is added to
    /// the subtotal and the final amount.
    ///
    /// # Errors
    ///
    /// - `RentalAlreadyCompleted` if the rental was already completed
    /// - `RateNotFound` if the tariff no longer has the rental's rate
    /// - `AmountOverflow` if the committed totals exceed the decimal range
    pub fn complete(
        &mut self,
        now: NaiveDateTime,
        config: &TariffConfig,
    ) -> EngineResult<OverdueCharge> {
        if self.status == RentalStatus::Completed {
            return Err(EngineError::RentalAlreadyCompleted { rental_id: self.id });
        }

        let overdue = overdue_charge(&self.terms, now, config)?;
        self.breakdown = commit_overdue(&self.breakdown, overdue.amount)?;
        self.ledger.reprice(&self.breakdown);
        let offset = self.audit_trace.steps.len() as u32;
        self.audit_trace
            .steps
            .extend(overdue.steps.iter().cloned().map(|mut step| {
                step.step_number += offset;
                step
            }));
        self.overdue_committed = overdue.amount;
        self.status = RentalStatus::Completed;
        self.completed_at = Some(Utc::now());
        self.revision += 1;

        info!(
            rental_id = %self.id,
            overdue_days = overdue.overdue_days,
            overdue_cost = %overdue.amount,
            final_amount = %self.breakdown.final_amount,
            "Rental completed"
        );
        Ok(overdue)
    }

    /// Snapshot of the record for document rendering.
    pub fn document_payload(&self) -> serde_json::Value {
        serde_json::json!({
            "rental_id": self.id,
            "vehicle_id": self.terms.vehicle_id,
            "period": self.terms.period,
            "status": self.status,
            "breakdown": self.breakdown,
            "summary": self.summary()
        })
    }
}

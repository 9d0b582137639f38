//! Request types for the Rental Pricing Engine API.
//!
//! This module defines the JSON request structures for every endpoint and
//! their conversions into domain types.

use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ledger::NewPayment;
use crate::models::{
    ChargeSet, DiscountEdit, DiscountSpec, PaymentMethod, RentalPeriod, RentalReason,
    RentalTerms, RentalType,
};

/// Rental terms in a request.
///
/// Used by `/quote` and `/rentals`, and flattened into `/overdue`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RentalRequest {
    /// The vehicle being rented.
    pub vehicle_id: String,
    /// When the rental starts.
    pub start: NaiveDateTime,
    /// When the rental is booked to end.
    pub end: NaiveDateTime,
    /// How the rental is billed.
    pub rental_type: RentalType,
    /// Why the vehicle is out (e.g., "hired", "staff", "workshop").
    #[serde(default)]
    pub reason: Option<String>,
    /// Agreed rate replacing the table rate.
    #[serde(default)]
    pub negotiated_rate: Option<Decimal>,
    /// Optional surcharges.
    #[serde(default)]
    pub charges: ChargeSet,
    /// Optional discount.
    #[serde(default)]
    pub discount: Option<DiscountSpec>,
}

impl From<RentalRequest> for RentalTerms {
    fn from(req: RentalRequest) -> Self {
        RentalTerms {
            vehicle_id: req.vehicle_id,
            period: RentalPeriod {
                start: req.start,
                end: req.end,
                rental_type: req.rental_type,
            },
            reason: req.reason.map(RentalReason::from).unwrap_or_default(),
            negotiated_rate: req.negotiated_rate,
            charges: req.charges,
            discount: req.discount,
        }
    }
}

/// Request body for the `/overdue` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverdueRequest {
    /// The rental's terms.
    #[serde(flatten)]
    pub rental: RentalRequest,
    /// The instant to evaluate the overdue charge at.
    pub as_of: NaiveDateTime,
}

/// Request body for the `/discount/derive` endpoint.
///
/// ```json
/// { "subtotal": "600", "edit": { "field": "percentage", "value": "10" } }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscountDeriveRequest {
    /// The subtotal the discount applies to.
    pub subtotal: Decimal,
    /// The field that was edited and its new value.
    pub edit: DiscountEdit,
}

/// Request body for `POST /rentals/:id/payments`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRequest {
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
    /// When the payment was made; defaults to now.
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    /// Who recorded the payment.
    pub recorded_by: String,
}

impl From<PaymentRequest> for NewPayment {
    fn from(req: PaymentRequest) -> Self {
        NewPayment {
            amount: req.amount,
            method: req.method,
            reference: req.reference,
            notes: req.notes,
            date: req.date.unwrap_or_else(Utc::now),
            recorded_by: req.recorded_by,
        }
    }
}

/// Request body for `POST /rentals/:id/complete`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompleteRequest {
    /// When the vehicle came back; defaults to now.
    #[serde(default)]
    pub returned_at: Option<NaiveDateTime>,
}

/// Query parameters for `GET /rentals/:id`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RentalQuery {
    /// Instant to evaluate ongoing charges at; defaults to now.
    #[serde(default)]
    pub as_of: Option<NaiveDateTime>,
}

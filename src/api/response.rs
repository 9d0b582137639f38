//! Response types for the Rental Pricing Engine API.
//!
//! This module defines the response bodies, the error response structure,
//! and the mapping from engine errors to HTTP status codes.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculation::OverdueCharge;
use crate::documents::{DispatchReport, DocumentJob, RenderedDocument};
use crate::error::EngineError;
use crate::models::{CostBreakdown, PayableSummary, PaymentEntry, PricingWarning};
use crate::rentals::{OngoingCharges, RentalRecord};

/// Body returned by `POST /rentals` and `GET /rentals/:id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RentalResponse {
    /// The stored rental.
    pub rental: RentalRecord,
    /// Payable amounts derived from the ledger.
    pub summary: PayableSummary,
    /// Amounts including the live overdue charge, while the rental is open.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ongoing: Option<OngoingCharges>,
    /// Warnings raised while pricing.
    pub warnings: Vec<PricingWarning>,
}

/// Body returned by the payment endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentResponse {
    /// The rental the payment belongs to.
    pub rental_id: Uuid,
    /// The recorded or deleted entry.
    pub payment: PaymentEntry,
    /// Payable amounts after the change.
    pub summary: PayableSummary,
    /// Rental revision after the change.
    pub revision: u32,
}

/// Body returned by `POST /rentals/:id/complete`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// The completed rental.
    pub rental_id: Uuid,
    /// The overdue charge that was committed.
    pub overdue: OverdueCharge,
    /// Breakdown including the committed overdue cost.
    pub breakdown: CostBreakdown,
    /// Payable amounts after completion.
    pub summary: PayableSummary,
}

/// Body returned by `POST /documents/dispatch`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchResponse {
    /// Counts from this pass.
    pub report: DispatchReport,
    /// Jobs still waiting for a retry.
    pub pending: usize,
}

/// Body returned by `GET /rentals/:id/documents`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentsResponse {
    /// The rental the documents belong to.
    pub rental_id: Uuid,
    /// Every job queued for the rental, oldest first.
    pub jobs: Vec<DocumentJob>,
    /// Documents rendered so far, oldest first.
    pub documents: Vec<RenderedDocument>,
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    fn new(status: StatusCode, error: ApiError) -> Self {
        Self { status, error }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        match error {
            EngineError::ConfigNotFound { path } => ApiErrorResponse::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration error",
                    format!("Configuration file not found: {}", path),
                ),
            ),
            EngineError::ConfigParseError { .. } | EngineError::InvalidConfig { .. } => {
                ApiErrorResponse::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiError::with_details("CONFIG_ERROR", "Configuration error", message),
                )
            }
            EngineError::RateNotFound { rate_key, .. } => ApiErrorResponse::new(
                StatusCode::BAD_REQUEST,
                ApiError::with_details(
                    "RATE_NOT_FOUND",
                    message,
                    format!("The tariff has no rate for '{}' on the rental start date", rate_key),
                ),
            ),
            EngineError::InvalidPeriod { .. } => ApiErrorResponse::new(
                StatusCode::BAD_REQUEST,
                ApiError::new("INVALID_PERIOD", message),
            ),
            EngineError::InvalidCharge { field, .. } => ApiErrorResponse::new(
                StatusCode::BAD_REQUEST,
                ApiError::with_details("INVALID_CHARGE", message, field),
            ),
            EngineError::InvalidDiscount { .. } => ApiErrorResponse::new(
                StatusCode::BAD_REQUEST,
                ApiError::new("INVALID_DISCOUNT", message),
            ),
            EngineError::MissingDiscountNotes => ApiErrorResponse::new(
                StatusCode::BAD_REQUEST,
                ApiError::new("MISSING_DISCOUNT_NOTES", message),
            ),
            EngineError::NonPositivePayment { .. } => ApiErrorResponse::new(
                StatusCode::BAD_REQUEST,
                ApiError::new("INVALID_PAYMENT_AMOUNT", message),
            ),
            EngineError::Overpayment { remaining, .. } => ApiErrorResponse::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiError::with_details(
                    "OVERPAYMENT",
                    message,
                    format!("At most {} can be recorded", remaining),
                ),
            ),
            EngineError::PaymentNotFound { .. } => ApiErrorResponse::new(
                StatusCode::NOT_FOUND,
                ApiError::new("PAYMENT_NOT_FOUND", message),
            ),
            EngineError::RentalNotFound { .. } => ApiErrorResponse::new(
                StatusCode::NOT_FOUND,
                ApiError::new("RENTAL_NOT_FOUND", message),
            ),
            EngineError::RentalAlreadyCompleted { .. } => ApiErrorResponse::new(
                StatusCode::CONFLICT,
                ApiError::new("RENTAL_ALREADY_COMPLETED", message),
            ),
            EngineError::AmountOverflow { .. } => ApiErrorResponse::new(
                StatusCode::BAD_REQUEST,
                ApiError::with_details(
                    "AMOUNT_OUT_OF_RANGE",
                    message,
                    "Rates and charges must be small enough to price the rental",
                ),
            ),
            EngineError::DocumentRender { .. } => ApiErrorResponse::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("DOCUMENT_ERROR", "Document generation failed", message),
            ),
            EngineError::CalculationError { message } => ApiErrorResponse::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("CALCULATION_ERROR", "Calculation failed", message),
            ),
        }
    }
}

//! Error types for the Rental Pricing Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while pricing rentals and
//! maintaining payment ledgers.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

/// The main error type for the Rental Pricing Engine.
///
/// Every fallible operation in the engine returns this error type. Validation
/// rejections are raised before any state is mutated.
///
/// # Example
///
/// ```
/// use rental_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/tariff.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/tariff.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Configuration parsed but is internally inconsistent.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// What is wrong with the configuration.
        message: String,
    },

    /// No rate table entry exists for the requested key.
    #[error("Rate not found for '{rate_key}' on date {date}")]
    RateNotFound {
        /// The rental type or reason that was looked up.
        rate_key: String,
        /// The date for which the rate was requested.
        date: NaiveDate,
    },

    /// A rental period was inverted or otherwise unusable.
    #[error("Invalid rental period: {message}")]
    InvalidPeriod {
        /// A description of what made the period invalid.
        message: String,
    },

    /// A surcharge or rate input was invalid.
    #[error("Invalid charge '{field}': {message}")]
    InvalidCharge {
        /// The charge field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// A discount was out of range.
    #[error("Invalid discount: {message}")]
    InvalidDiscount {
        /// A description of what made the discount invalid.
        message: String,
    },

    /// A non-zero discount was supplied without an explanatory note.
    #[error("Discount notes are required when a discount is applied")]
    MissingDiscountNotes,

    /// A payment amount was zero or negative.
    #[error("Invalid payment amount {amount}: must be greater than zero")]
    NonPositivePayment {
        /// The rejected amount.
        amount: Decimal,
    },

    /// A payment exceeded the remaining balance.
    #[error("Payment of {amount} exceeds remaining balance {remaining}")]
    Overpayment {
        /// The rejected amount.
        amount: Decimal,
        /// The balance outstanding at the time of the attempt.
        remaining: Decimal,
    },

    /// The payment entry does not exist in the ledger.
    #[error("Payment not found: {payment_id}")]
    PaymentNotFound {
        /// The payment identifier that was not found.
        payment_id: Uuid,
    },

    /// The rental record does not exist in the store.
    #[error("Rental not found: {rental_id}")]
    RentalNotFound {
        /// The rental identifier that was not found.
        rental_id: Uuid,
    },

    /// The rental has already been completed and cannot be completed again.
    #[error("Rental {rental_id} is already completed")]
    RentalAlreadyCompleted {
        /// The rental identifier.
        rental_id: Uuid,
    },

    /// A queued document could not be rendered.
    #[error("Document job {job_id} failed: {message}")]
    DocumentRender {
        /// The outbox job that failed.
        job_id: Uuid,
        /// The renderer's failure description.
        message: String,
    },

    /// Money arithmetic overflowed the decimal range.
    #[error("Amount out of range while calculating {operation}")]
    AmountOverflow {
        /// The calculation that overflowed.
        operation: String,
    },

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

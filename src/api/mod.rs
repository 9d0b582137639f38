//! HTTP API module for the Rental Pricing Engine.
//!
//! This module provides the REST API endpoints for quoting rentals,
//! deriving discounts, maintaining rental records and their payment
//! ledgers, and dispatching queued documents.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    CompleteRequest, DiscountDeriveRequest, OverdueRequest, PaymentRequest, RentalQuery,
    RentalRequest,
};
pub use response::{
    ApiError, CompletionResponse, DispatchResponse, DocumentsResponse, PaymentResponse,
    RentalResponse,
};
pub use state::{AppState, RentalStore};

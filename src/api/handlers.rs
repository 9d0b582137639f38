//! HTTP request handlers for the Rental Pricing Engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{derive_discount_fields, overdue_charge, price_rental};
use crate::documents::DocumentKind;
use crate::error::EngineError;
use crate::models::RentalTerms;
use crate::rentals::RentalRecord;

use super::request::{
    CompleteRequest, DiscountDeriveRequest, OverdueRequest, PaymentRequest, RentalQuery,
    RentalRequest,
};
use super::response::{
    ApiError, ApiErrorResponse, CompletionResponse, DispatchResponse, DocumentsResponse,
    PaymentResponse, RentalResponse,
};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/quote", post(quote_handler))
        .route("/overdue", post(overdue_handler))
        .route("/discount/derive", post(derive_discount_handler))
        .route("/rentals", post(create_rental_handler))
        .route("/rentals/:id", get(get_rental_handler))
        .route("/rentals/:id/payments", post(record_payment_handler))
        .route(
            "/rentals/:id/payments/:payment_id",
            delete(delete_payment_handler),
        )
        .route("/rentals/:id/complete", post(complete_rental_handler))
        .route("/rentals/:id/documents", get(list_documents_handler))
        .route("/documents/dispatch", post(dispatch_documents_handler))
        .with_state(state)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn error_response(correlation_id: Uuid, err: EngineError) -> Response {
    warn!(
        correlation_id = %correlation_id,
        error = %err,
        "Request failed"
    );
    let api_error: ApiErrorResponse = err.into();
    json_response(api_error.status, api_error.error)
}

/// Unwraps a JSON body or builds the 400 response for its rejection.
fn parse_body<T>(
    correlation_id: Uuid,
    payload: Result<Json<T>, JsonRejection>,
) -> Result<T, Response> {
    let rejection = match payload {
        Ok(Json(body)) => return Ok(body),
        Err(rejection) => rejection,
    };

    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };

    Err(json_response(StatusCode::BAD_REQUEST, error))
}

/// Handler for POST /quote.
///
/// Prices rental terms without storing them.
async fn quote_handler(
    State(state): State<AppState>,
    payload: Result<Json<RentalRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing quote request");

    let terms: RentalTerms = match parse_body(correlation_id, payload) {
        Ok(request) => request.into(),
        Err(response) => return response,
    };

    let start_time = Instant::now();
    match price_rental(&terms, state.config().config()) {
        Ok(result) => {
            info!(
                correlation_id = %correlation_id,
                vehicle_id = %terms.vehicle_id,
                final_amount = %result.summary.final_amount,
                warnings = result.audit_trace.warnings.len(),
                duration_us = start_time.elapsed().as_micros(),
                "Quote completed successfully"
            );
            json_response(StatusCode::OK, result)
        }
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for POST /overdue.
async fn overdue_handler(
    State(state): State<AppState>,
    payload: Result<Json<OverdueRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing overdue request");

    let request = match parse_body(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let as_of = request.as_of;
    let terms: RentalTerms = request.rental.into();

    match overdue_charge(&terms, as_of, state.config().config()) {
        Ok(charge) => {
            info!(
                correlation_id = %correlation_id,
                overdue_days = charge.overdue_days,
                amount = %charge.amount,
                "Overdue charge calculated"
            );
            json_response(StatusCode::OK, charge)
        }
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for POST /discount/derive.
///
/// Derives the other discount field from an edit of one of them.
async fn derive_discount_handler(
    payload: Result<Json<DiscountDeriveRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    let request = match parse_body(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };

    if let Err(err) = request.edit.validate() {
        return error_response(correlation_id, err);
    }

    match derive_discount_fields(request.subtotal, request.edit) {
        Ok(fields) => json_response(StatusCode::OK, fields),
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for POST /rentals.
///
/// Prices and stores a rental, then queues its agreement.
async fn create_rental_handler(
    State(state): State<AppState>,
    payload: Result<Json<RentalRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing create rental request");

    let terms: RentalTerms = match parse_body(correlation_id, payload) {
        Ok(request) => request.into(),
        Err(response) => return response,
    };

    let record = match RentalRecord::create(terms, state.config().config()) {
        Ok(record) => record,
        Err(err) => return error_response(correlation_id, err),
    };

    let response = RentalResponse {
        summary: record.summary(),
        ongoing: None,
        warnings: record.audit_trace.warnings.clone(),
        rental: record.clone(),
    };
    let payload = record.document_payload();

    let mut rentals = state.rentals().write().await;
    rentals.insert(record.id, record);
    state.outbox().lock().await.enqueue(
        response.rental.id,
        DocumentKind::Agreement,
        response.rental.revision,
        payload,
    );

    info!(
        correlation_id = %correlation_id,
        rental_id = %response.rental.id,
        "Rental stored"
    );
    json_response(StatusCode::CREATED, response)
}

/// Handler for GET /rentals/:id.
///
/// Returns the rental with its ledger summary and, while it is open, the
/// live overdue charge at `as_of` (default now).
async fn get_rental_handler(
    State(state): State<AppState>,
    Path(rental_id): Path<Uuid>,
    Query(query): Query<RentalQuery>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let as_of = query.as_of.unwrap_or_else(|| Utc::now().naive_utc());

    let rentals = state.rentals().read().await;
    let Some(record) = rentals.get(&rental_id) else {
        return error_response(correlation_id, EngineError::RentalNotFound { rental_id });
    };

    let ongoing = match record.ongoing_charges(as_of, state.config().config()) {
        Ok(ongoing) => ongoing,
        Err(err) => return error_response(correlation_id, err),
    };

    json_response(
        StatusCode::OK,
        RentalResponse {
            rental: record.clone(),
            summary: record.summary(),
            ongoing,
            warnings: record.audit_trace.warnings.clone(),
        },
    )
}

/// Handler for POST /rentals/:id/payments.
///
/// Records a payment under the store's write lock, then queues a receipt.
async fn record_payment_handler(
    State(state): State<AppState>,
    Path(rental_id): Path<Uuid>,
    payload: Result<Json<PaymentRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, %rental_id, "Processing payment request");

    let request = match parse_body(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let mut rentals = state.rentals().write().await;
    let Some(record) = rentals.get_mut(&rental_id) else {
        return error_response(correlation_id, EngineError::RentalNotFound { rental_id });
    };

    let entry = match record.record_payment(request.into()) {
        Ok(entry) => entry,
        Err(err) => return error_response(correlation_id, err),
    };

    let mut document = record.document_payload();
    document["payment"] = serde_json::json!(entry);
    state.outbox().lock().await.enqueue(
        rental_id,
        DocumentKind::PaymentReceipt,
        record.revision,
        document,
    );

    json_response(
        StatusCode::CREATED,
        PaymentResponse {
            rental_id,
            payment: entry,
            summary: record.summary(),
            revision: record.revision,
        },
    )
}

/// Handler for DELETE /rentals/:id/payments/:payment_id.
async fn delete_payment_handler(
    State(state): State<AppState>,
    Path((rental_id, payment_id)): Path<(Uuid, Uuid)>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, %rental_id, %payment_id, "Processing payment deletion");

    let mut rentals = state.rentals().write().await;
    let Some(record) = rentals.get_mut(&rental_id) else {
        return error_response(correlation_id, EngineError::RentalNotFound { rental_id });
    };

    match record.delete_payment(payment_id) {
        Ok(entry) => json_response(
            StatusCode::OK,
            PaymentResponse {
                rental_id,
                payment: entry,
                summary: record.summary(),
                revision: record.revision,
            },
        ),
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for POST /rentals/:id/complete.
///
/// Commits the overdue charge at `returned_at` (default now), then queues
/// the invoice.
async fn complete_rental_handler(
    State(state): State<AppState>,
    Path(rental_id): Path<Uuid>,
    payload: Result<Json<CompleteRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, %rental_id, "Processing completion request");

    let request = match parse_body(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let returned_at = request
        .returned_at
        .unwrap_or_else(|| Utc::now().naive_utc());

    let mut rentals = state.rentals().write().await;
    let Some(record) = rentals.get_mut(&rental_id) else {
        return error_response(correlation_id, EngineError::RentalNotFound { rental_id });
    };

    let overdue = match record.complete(returned_at, state.config().config()) {
        Ok(overdue) => overdue,
        Err(err) => return error_response(correlation_id, err),
    };

    state.outbox().lock().await.enqueue(
        rental_id,
        DocumentKind::Invoice,
        record.revision,
        record.document_payload(),
    );

    json_response(
        StatusCode::OK,
        CompletionResponse {
            rental_id,
            overdue,
            breakdown: record.breakdown.clone(),
            summary: record.summary(),
        },
    )
}

/// Handler for GET /rentals/:id/documents.
///
/// Lists the rental's document jobs and the documents rendered from them.
async fn list_documents_handler(
    State(state): State<AppState>,
    Path(rental_id): Path<Uuid>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    let rentals = state.rentals().read().await;
    if !rentals.contains_key(&rental_id) {
        return error_response(correlation_id, EngineError::RentalNotFound { rental_id });
    }

    let outbox = state.outbox().lock().await;
    json_response(
        StatusCode::OK,
        DocumentsResponse {
            rental_id,
            jobs: outbox.jobs_for(rental_id).into_iter().cloned().collect(),
            documents: outbox.documents_for(rental_id).into_iter().cloned().collect(),
        },
    )
}

/// Handler for POST /documents/dispatch.
///
/// Attempts every pending document job once.
async fn dispatch_documents_handler(State(state): State<AppState>) -> Response {
    let correlation_id = Uuid::new_v4();
    let start_time = Instant::now();

    let mut outbox = state.outbox().lock().await;
    let report = outbox.dispatch(state.renderer());
    let pending = outbox.pending_count();

    info!(
        correlation_id = %correlation_id,
        delivered = report.delivered,
        pending,
        duration_us = start_time.elapsed().as_micros(),
        "Document dispatch completed"
    );
    json_response(StatusCode::OK, DispatchResponse { report, pending })
}

//! Integration tests for the Rental Pricing Engine.
//!
//! This test suite drives the HTTP API against the default tariff and covers:
//! - Daily, weekly and claim pricing
//! - Special reasons and negotiated rates
//! - Surcharges and silent-default warnings
//! - Discounts and discount derivation
//! - Overdue charges and completion
//! - The payment ledger, including concurrent payments
//! - The document outbox
//! - Error cases

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use std::str::FromStr;
use tower::ServiceExt;

use rental_engine::api::{AppState, create_router};
use rental_engine::config::ConfigLoader;
use rental_engine::documents::{DocumentJob, DocumentRenderer, JobStatus, RenderedDocument};
use rental_engine::error::{EngineError, EngineResult};

// =============================================================================
// Test Helpers
// =============================================================================

fn create_test_state() -> AppState {
    let config = ConfigLoader::load("./config/default").expect("Failed to load config");
    AppState::new(config)
}

fn decimal(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = if body_bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap()
    };

    (status, json)
}

async fn post(router: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(router, "POST", uri, Some(body)).await
}

fn rental(rental_type: &str, start: &str, end: &str) -> Value {
    json!({
        "vehicle_id": "veh_042",
        "start": format!("{}T10:00:00", start),
        "end": format!("{}T10:00:00", end),
        "rental_type": rental_type
    })
}

fn ten_day_rental_with_discount() -> Value {
    let mut body = rental("daily", "2026-03-02", "2026-03-11");
    body["discount"] = json!({
        "percentage": "10",
        "source": "percentage",
        "notes": "Corporate account"
    });
    body
}

fn payment(amount: &str) -> Value {
    json!({
        "amount": amount,
        "method": "card",
        "reference": "AUTH-1234",
        "recorded_by": "front_desk"
    })
}

fn assert_amount(value: &Value, expected: &str) {
    let actual = value
        .as_str()
        .unwrap_or_else(|| panic!("Expected a decimal string, got {}", value));
    assert_eq!(
        decimal(actual),
        decimal(expected),
        "Expected {}, got {}",
        expected,
        actual
    );
}

fn warning_codes(result: &Value) -> Vec<String> {
    result["audit_trace"]["warnings"]
        .as_array()
        .unwrap()
        .iter()
        .map(|w| w["code"].as_str().unwrap().to_string())
        .collect()
}

async fn create_rental(router: &Router, body: Value) -> String {
    let (status, created) = post(router, "/rentals", body).await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {}", created);
    created["rental"]["id"].as_str().unwrap().to_string()
}

// =============================================================================
// Pricing
// =============================================================================

#[tokio::test]
async fn test_ten_day_daily_rental_costs_600() {
    let router = create_router(create_test_state());
    let (status, result) = post(&router, "/quote", rental("daily", "2026-03-02", "2026-03-11")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["breakdown"]["days"], 10);
    assert_amount(&result["breakdown"]["subtotal"], "600");
    assert_amount(&result["summary"]["final_amount"], "600");
    assert_eq!(result["summary"]["status"], "pending");
}

#[tokio::test]
async fn test_same_day_rental_bills_one_day() {
    let router = create_router(create_test_state());
    let (_, result) = post(&router, "/quote", rental("daily", "2026-03-02", "2026-03-02")).await;

    assert_eq!(result["breakdown"]["days"], 1);
    assert_amount(&result["breakdown"]["subtotal"], "60");
}

#[tokio::test]
async fn test_weekly_nine_days_blends_weekly_and_daily() {
    let router = create_router(create_test_state());
    let (status, result) = post(&router, "/quote", rental("weekly", "2026-03-02", "2026-03-10")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["breakdown"]["weeks"], 1);
    assert_eq!(result["breakdown"]["remainder_days"], 2);
    assert_amount(&result["breakdown"]["subtotal"], "480");
}

#[tokio::test]
async fn test_claim_rental_uses_claim_rate() {
    let router = create_router(create_test_state());
    let (_, result) = post(&router, "/quote", rental("claim", "2026-03-02", "2026-03-04")).await;

    assert_amount(&result["breakdown"]["unit_rate"], "85");
    assert_amount(&result["breakdown"]["subtotal"], "255");
}

#[tokio::test]
async fn test_rate_table_chosen_by_start_date() {
    let router = create_router(create_test_state());
    let (_, result) = post(&router, "/quote", rental("daily", "2025-03-01", "2025-03-03")).await;

    assert_amount(&result["breakdown"]["unit_rate"], "55");
    assert_amount(&result["breakdown"]["subtotal"], "165");
}

#[tokio::test]
async fn test_negotiated_weekly_rate_keeps_daily_remainder() {
    let router = create_router(create_test_state());
    let mut body = rental("weekly", "2026-03-02", "2026-03-10");
    body["negotiated_rate"] = json!("300");

    let (_, result) = post(&router, "/quote", body).await;
    assert_eq!(result["breakdown"]["rate_source"], "negotiated");
    // 300 + 2 x 60
    assert_amount(&result["breakdown"]["subtotal"], "420");
}

#[tokio::test]
async fn test_workshop_is_free_regardless_of_duration_or_negotiated_rate() {
    let router = create_router(create_test_state());
    let mut body = rental("weekly", "2026-03-02", "2026-03-30");
    body["reason"] = json!("workshop");
    body["negotiated_rate"] = json!("500");

    let (status, result) = post(&router, "/quote", body).await;
    assert_eq!(status, StatusCode::OK);
    assert_amount(&result["breakdown"]["base_cost"], "0");
    assert!(warning_codes(&result).contains(&"NEGOTIATED_RATE_IGNORED".to_string()));
}

#[tokio::test]
async fn test_staff_rate_ignores_type_and_negotiated_rate() {
    let router = create_router(create_test_state());
    let mut body = rental("weekly", "2026-03-02", "2026-03-11");
    body["reason"] = json!("staff");
    body["negotiated_rate"] = json!("100");

    let (_, result) = post(&router, "/quote", body).await;
    assert_eq!(result["breakdown"]["rate_source"], "reason");
    // 10 days x 25
    assert_amount(&result["breakdown"]["subtotal"], "250");
}

#[tokio::test]
async fn test_unrecognized_reason_priced_at_type_rate_with_warning() {
    let router = create_router(create_test_state());
    let mut body = rental("daily", "2026-03-02", "2026-03-03");
    body["reason"] = json!("loan-car");

    let (status, result) = post(&router, "/quote", body).await;
    assert_eq!(status, StatusCode::OK);
    assert_amount(&result["breakdown"]["subtotal"], "120");
    assert_eq!(warning_codes(&result), vec!["UNRECOGNIZED_REASON".to_string()]);
}

#[tokio::test]
async fn test_surcharges_with_vat_inclusive_storage() {
    let router = create_router(create_test_state());
    let mut body = rental("daily", "2026-03-02", "2026-03-04");
    body["charges"] = json!({
        "storage": {
            "start_date": "2026-02-25",
            "end_date": "2026-03-01",
            "cost_per_day": "12.50",
            "vat_inclusive": true
        },
        "recovery_cost": "95.00",
        "delivery_charge": "20.00",
        "collection_charge": "20.00",
        "insurance_per_day": "8.00"
    });

    let (_, result) = post(&router, "/quote", body).await;
    let breakdown = &result["breakdown"];
    assert_eq!(breakdown["storage_days"], 5);
    // 5 x 12.50 x 1.2
    assert_amount(&breakdown["storage_cost"], "75");
    // 3 rental days x 8
    assert_amount(&breakdown["insurance_cost"], "24");
    assert_amount(&breakdown["surcharges_total"], "234");
    // 180 base + 234
    assert_amount(&breakdown["subtotal"], "414");
}

#[tokio::test]
async fn test_inverted_storage_dates_zeroed_with_warning() {
    let router = create_router(create_test_state());
    let mut body = rental("daily", "2026-03-02", "2026-03-04");
    body["charges"] = json!({
        "storage": {
            "start_date": "2026-03-10",
            "end_date": "2026-03-01",
            "cost_per_day": "12.50"
        }
    });

    let (status, result) = post(&router, "/quote", body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["breakdown"]["storage_days"], 0);
    assert_amount(&result["breakdown"]["storage_cost"], "0");
    assert_eq!(warning_codes(&result), vec!["INVALID_STORAGE_DATES".to_string()]);
}

// =============================================================================
// Discounts
// =============================================================================

#[tokio::test]
async fn test_ten_percent_discount_on_600() {
    let router = create_router(create_test_state());
    let (_, result) = post(&router, "/quote", ten_day_rental_with_discount()).await;

    assert_amount(&result["breakdown"]["discount_amount"], "60");
    assert_amount(&result["summary"]["final_amount"], "540");
}

#[tokio::test]
async fn test_free_week_credited_at_weekly_rate() {
    let router = create_router(create_test_state());
    let mut body = rental("weekly", "2026-03-02", "2026-03-15");
    body["discount"] = json!({ "free_periods": 1, "notes": "Loyalty week" });

    let (_, result) = post(&router, "/quote", body).await;
    assert_amount(&result["breakdown"]["free_period_discount"], "360");
    assert_amount(&result["summary"]["final_amount"], "360");
}

#[tokio::test]
async fn test_discount_exceeding_subtotal_goes_negative_with_warning() {
    let router = create_router(create_test_state());
    let mut body = rental("daily", "2026-03-02", "2026-03-02");
    body["discount"] = json!({
        "amount": "100",
        "source": "amount",
        "notes": "Compensation"
    });

    let (status, result) = post(&router, "/quote", body).await;
    assert_eq!(status, StatusCode::OK);
    assert_amount(&result["summary"]["final_amount"], "-40");
    assert!(warning_codes(&result).contains(&"NEGATIVE_FINAL_AMOUNT".to_string()));
}

#[tokio::test]
async fn test_discount_without_notes_rejected() {
    let router = create_router(create_test_state());
    let mut body = rental("daily", "2026-03-02", "2026-03-11");
    body["discount"] = json!({ "percentage": "5" });

    let (status, error) = post(&router, "/quote", body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "MISSING_DISCOUNT_NOTES");
}

#[tokio::test]
async fn test_discount_derivation_round_trip() {
    let router = create_router(create_test_state());

    let (_, from_pct) = post(
        &router,
        "/discount/derive",
        json!({ "subtotal": "480", "edit": { "field": "percentage", "value": "12.5" } }),
    )
    .await;
    assert_amount(&from_pct["amount"], "60");
    assert_eq!(from_pct["source"], "percentage");

    let (_, from_amount) = post(
        &router,
        "/discount/derive",
        json!({ "subtotal": "480", "edit": { "field": "amount", "value": from_pct["amount"] } }),
    )
    .await;
    assert_amount(&from_amount["percentage"], "12.5");
    assert_eq!(from_amount["source"], "amount");
}

#[tokio::test]
async fn test_amount_above_subtotal_derives_percentage_above_100_and_still_prices() {
    let router = create_router(create_test_state());

    let (status, fields) = post(
        &router,
        "/discount/derive",
        json!({ "subtotal": "600", "edit": { "field": "amount", "value": "700" } }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_amount(&fields["percentage"], "116.7");
    assert_eq!(fields["source"], "amount");

    let mut body = rental("daily", "2026-03-02", "2026-03-11");
    body["discount"] = json!({
        "percentage": fields["percentage"],
        "amount": fields["amount"],
        "source": "amount",
        "notes": "Goodwill credit"
    });
    let (status, result) = post(&router, "/quote", body).await;
    assert_eq!(status, StatusCode::OK);
    assert_amount(&result["summary"]["final_amount"], "-100");
}

// =============================================================================
// Overdue
// =============================================================================

#[tokio::test]
async fn test_overdue_three_days_at_daily_rate() {
    let router = create_router(create_test_state());
    let mut body = rental("daily", "2026-03-02", "2026-03-11");
    body["as_of"] = json!("2026-03-14T10:00:00");

    let (status, charge) = post(&router, "/overdue", body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(charge["overdue_days"], 3);
    assert_amount(&charge["amount"], "180");
}

#[tokio::test]
async fn test_not_overdue_before_end() {
    let router = create_router(create_test_state());
    let mut body = rental("daily", "2026-03-02", "2026-03-11");
    body["as_of"] = json!("2026-03-11T09:00:00");

    let (_, charge) = post(&router, "/overdue", body).await;
    assert_eq!(charge["overdue_days"], 0);
    assert_amount(&charge["amount"], "0");
}

// =============================================================================
// Rental lifecycle and payment ledger
// =============================================================================

#[tokio::test]
async fn test_end_to_end_discount_then_paid_in_full() {
    let router = create_router(create_test_state());
    let id = create_rental(&router, ten_day_rental_with_discount()).await;

    let (status, paid) = post(&router, &format!("/rentals/{}/payments", id), payment("540")).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_amount(&paid["summary"]["remaining"], "0");
    assert_eq!(paid["summary"]["status"], "paid");
    assert_eq!(paid["revision"], 2);
}

#[tokio::test]
async fn test_partial_payments_and_one_cent_short() {
    let router = create_router(create_test_state());
    let id = create_rental(&router, ten_day_rental_with_discount()).await;
    let uri = format!("/rentals/{}/payments", id);

    let (_, first) = post(&router, &uri, payment("300")).await;
    assert_eq!(first["summary"]["status"], "partially_paid");

    let (_, second) = post(&router, &uri, payment("239.99")).await;
    assert_amount(&second["summary"]["remaining"], "0.01");
    assert_eq!(second["summary"]["status"], "partially_paid");

    let (_, last) = post(&router, &uri, payment("0.01")).await;
    assert_eq!(last["summary"]["status"], "paid");
}

#[tokio::test]
async fn test_overpayment_rejected_without_mutation() {
    let router = create_router(create_test_state());
    let id = create_rental(&router, ten_day_rental_with_discount()).await;
    let uri = format!("/rentals/{}/payments", id);

    post(&router, &uri, payment("100")).await;
    let (status, error) = post(&router, &uri, payment("440.01")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error["code"], "OVERPAYMENT");

    let (_, fetched) = send(&router, "GET", &format!("/rentals/{}", id), None).await;
    assert_amount(&fetched["summary"]["total_paid"], "100");
    assert_amount(&fetched["summary"]["remaining"], "440");
    assert_eq!(fetched["rental"]["revision"], 2);
}

#[tokio::test]
async fn test_non_positive_payment_rejected() {
    let router = create_router(create_test_state());
    let id = create_rental(&router, ten_day_rental_with_discount()).await;

    let (status, error) = post(&router, &format!("/rentals/{}/payments", id), payment("0")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "INVALID_PAYMENT_AMOUNT");
}

#[tokio::test]
async fn test_delete_payment_recomputes_summary() {
    let router = create_router(create_test_state());
    let id = create_rental(&router, ten_day_rental_with_discount()).await;
    let uri = format!("/rentals/{}/payments", id);

    let (_, first) = post(&router, &uri, payment("200")).await;
    post(&router, &uri, payment("340")).await;
    let payment_id = first["payment"]["id"].as_str().unwrap();

    let (status, deleted) = send(
        &router,
        "DELETE",
        &format!("/rentals/{}/payments/{}", id, payment_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_amount(&deleted["summary"]["total_paid"], "340");
    assert_amount(&deleted["summary"]["remaining"], "200");
    assert_eq!(deleted["summary"]["status"], "partially_paid");

    let (status, error) = send(
        &router,
        "DELETE",
        &format!("/rentals/{}/payments/{}", id, payment_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["code"], "PAYMENT_NOT_FOUND");
}

#[tokio::test]
async fn test_ongoing_charges_shown_but_not_committed() {
    let router = create_router(create_test_state());
    let id = create_rental(&router, ten_day_rental_with_discount()).await;

    let (status, fetched) = send(
        &router,
        "GET",
        &format!("/rentals/{}?as_of=2026-03-14T10:00:00", id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_amount(&fetched["ongoing"]["overdue"]["amount"], "180");
    assert_amount(&fetched["ongoing"]["final_amount"], "720");
    assert_amount(&fetched["summary"]["final_amount"], "540");
}

#[tokio::test]
async fn test_completion_commits_overdue_cost() {
    let router = create_router(create_test_state());
    let id = create_rental(&router, ten_day_rental_with_discount()).await;
    post(&router, &format!("/rentals/{}/payments", id), payment("540")).await;

    let (status, completed) = post(
        &router,
        &format!("/rentals/{}/complete", id),
        json!({ "returned_at": "2026-03-14T10:00:00" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_amount(&completed["overdue"]["amount"], "180");
    assert_amount(&completed["breakdown"]["overdue_cost"], "180");
    assert_amount(&completed["breakdown"]["discount_amount"], "60");
    assert_amount(&completed["summary"]["final_amount"], "720");
    assert_amount(&completed["summary"]["remaining"], "180");
    assert_eq!(completed["summary"]["status"], "partially_paid");

    let (_, fetched) = send(&router, "GET", &format!("/rentals/{}", id), None).await;
    assert_eq!(fetched["rental"]["status"], "completed");
    assert!(fetched.get("ongoing").is_none());

    let (status, error) = post(
        &router,
        &format!("/rentals/{}/complete", id),
        json!({ "returned_at": "2026-03-15T10:00:00" }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error["code"], "RENTAL_ALREADY_COMPLETED");
}

#[tokio::test]
async fn test_concurrent_payments_do_not_overwrite_each_other() {
    let router = create_router(create_test_state());
    let id = create_rental(&router, ten_day_rental_with_discount()).await;
    let uri = format!("/rentals/{}/payments", id);

    let mut handles = Vec::new();
    for _ in 0..10 {
        let router = router.clone();
        let uri = uri.clone();
        handles.push(tokio::spawn(async move {
            post(&router, &uri, payment("60")).await.0
        }));
    }

    let mut accepted = 0;
    let mut rejected = 0;
    for handle in handles {
        match handle.await.unwrap() {
            StatusCode::CREATED => accepted += 1,
            StatusCode::UNPROCESSABLE_ENTITY => rejected += 1,
            other => panic!("Unexpected status {}", other),
        }
    }
    assert_eq!(accepted, 9);
    assert_eq!(rejected, 1);

    let (_, fetched) = send(&router, "GET", &format!("/rentals/{}", id), None).await;
    assert_amount(&fetched["summary"]["total_paid"], "540");
    assert_eq!(fetched["summary"]["status"], "paid");
    assert_eq!(fetched["rental"]["ledger"]["entries"].as_array().unwrap().len(), 9);
}

// =============================================================================
// Document outbox
// =============================================================================

#[tokio::test]
async fn test_documents_queued_per_mutation_and_dispatched() {
    let state = create_test_state();
    let router = create_router(state.clone());
    let id = create_rental(&router, ten_day_rental_with_discount()).await;
    post(&router, &format!("/rentals/{}/payments", id), payment("540")).await;
    post(
        &router,
        &format!("/rentals/{}/complete", id),
        json!({ "returned_at": "2026-03-11T18:00:00" }),
    )
    .await;

    let (status, dispatched) = send(&router, "POST", "/documents/dispatch", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dispatched["report"]["delivered"], 3);
    assert_eq!(dispatched["pending"], 0);

    let outbox = state.outbox().lock().await;
    let bodies: Vec<&str> = outbox.documents().iter().map(|d| d.body.as_str()).collect();
    assert!(bodies[0].starts_with("Rental Agreement"));
    assert!(bodies[1].contains("Payment received: 540"));
    assert!(bodies[2].starts_with("Invoice"));
    drop(outbox);

    let (_, again) = send(&router, "POST", "/documents/dispatch", None).await;
    assert_eq!(again["report"]["attempted"], 0);

    let (status, listed) = send(&router, "GET", &format!("/rentals/{}/documents", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed["jobs"].as_array().unwrap().len(), 3);
    let documents = listed["documents"].as_array().unwrap();
    assert_eq!(documents.len(), 3);
    assert!(documents[2]["body"].as_str().unwrap().starts_with("Invoice"));
}

struct UnavailableRenderer;

impl DocumentRenderer for UnavailableRenderer {
    fn render(&self, job: &DocumentJob) -> EngineResult<RenderedDocument> {
        Err(EngineError::DocumentRender {
            job_id: job.id,
            message: "document store unavailable".to_string(),
        })
    }
}

#[tokio::test]
async fn test_render_failure_keeps_rental_and_retries_until_failed() {
    let config = ConfigLoader::load("./config/default").expect("Failed to load config");
    let state = AppState::with_renderer(config, Arc::new(UnavailableRenderer));
    let router = create_router(state.clone());
    let id = create_rental(&router, ten_day_rental_with_discount()).await;

    for attempt in 1..=3 {
        let (_, dispatched) = send(&router, "POST", "/documents/dispatch", None).await;
        assert_eq!(dispatched["report"]["attempted"], 1, "attempt {}", attempt);
    }

    let outbox = state.outbox().lock().await;
    let job = &outbox.jobs()[0];
    assert_eq!(job.status, JobStatus::Failed);
    assert_eq!(job.attempts, 3);
    assert!(job.last_error.as_deref().unwrap().contains("document store unavailable"));
    drop(outbox);

    let (status, fetched) = send(&router, "GET", &format!("/rentals/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_amount(&fetched["summary"]["final_amount"], "540");
}

// =============================================================================
// Error cases
// =============================================================================

#[tokio::test]
async fn test_end_before_start_rejected() {
    let router = create_router(create_test_state());
    let (status, error) = post(&router, "/quote", rental("daily", "2026-03-11", "2026-03-02")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "INVALID_PERIOD");
}

#[tokio::test]
async fn test_negative_charge_rejected() {
    let router = create_router(create_test_state());
    let mut body = rental("daily", "2026-03-02", "2026-03-04");
    body["charges"] = json!({ "delivery_charge": "-20" });

    let (status, error) = post(&router, "/quote", body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "INVALID_CHARGE");
    assert_eq!(error["details"], "delivery_charge");
}

#[tokio::test]
async fn test_overflowing_negotiated_rate_rejected() {
    let router = create_router(create_test_state());
    let mut body = rental("daily", "2026-03-02", "2026-03-11");
    body["negotiated_rate"] = json!("79228162514264337593543950335");

    let (status, error) = post(&router, "/quote", body.clone()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "AMOUNT_OUT_OF_RANGE");

    let (status, error) = post(&router, "/rentals", body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "AMOUNT_OUT_OF_RANGE");
}

#[tokio::test]
async fn test_no_rate_table_for_early_start_date() {
    let router = create_router(create_test_state());
    let (status, error) = post(&router, "/quote", rental("daily", "2020-01-01", "2020-01-02")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "RATE_NOT_FOUND");
}

#[tokio::test]
async fn test_payment_for_unknown_rental_returns_404() {
    let router = create_router(create_test_state());
    let (status, error) = post(
        &router,
        &format!("/rentals/{}/payments", uuid::Uuid::new_v4()),
        payment("10"),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["code"], "RENTAL_NOT_FOUND");
}

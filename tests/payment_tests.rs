// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Checkout verification tests.
//!
//! Offline tests cover the checks made before any database write. The full
//! activation runs against the Firestore emulator:
//! ```bash
//! FIRESTORE_EMULATOR_HOST=localhost:8080 cargo test --test payment_tests
//! ```

use axum::http::StatusCode;
use common::TestAppBuilder;
use project_code::models::pricing::default_plans;
use project_code::models::{Subscription, SubscriptionStatus};
use project_code::services::payment::payment_signature;
use project_code::time_utils::{now_millis, DAY_MILLIS};
use serde_json::{json, Value};
use std::sync::atomic::Ordering;

mod common;

const KEY_SECRET: &str = "test_razorpay_secret";

fn confirmation(order_id: &str, payment_id: &str, signature: &str, plan_id: &str) -> Value {
    json!({
        "razorpay_order_id": order_id,
        "razorpay_payment_id": payment_id,
        "razorpay_signature": signature,
        "planId": plan_id,
    })
}

fn signed_confirmation(order_id: &str, payment_id: &str, plan_id: &str) -> Value {
    let signature = payment_signature(KEY_SECRET, order_id, payment_id).unwrap();
    confirmation(order_id, payment_id, &signature, plan_id)
}

#[tokio::test]
async fn test_bad_signature_rejected_before_gateway_lookup() {
    let app = TestAppBuilder::new().build();
    let token = common::id_token("payer-1");

    let mut signature = payment_signature(KEY_SECRET, "order_1", "pay_1").unwrap();
    let last = if signature.ends_with('0') { "1" } else { "0" };
    signature.replace_range(signature.len() - 1.., last);

    let (status, body) = common::send(
        app.router,
        common::json_request(
            "POST",
            "/api/payment/verify",
            Some(&token),
            None,
            confirmation("order_1", "pay_1", &signature, "pro"),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_signature");
    assert_eq!(app.gateway.lookups.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_signature_for_other_order_rejected() {
    let app = TestAppBuilder::new().build();
    let token = common::id_token("payer-1");

    let signature = payment_signature(KEY_SECRET, "order_2", "pay_1").unwrap();
    let (status, body) = common::send(
        app.router,
        common::json_request(
            "POST",
            "/api/payment/verify",
            Some(&token),
            None,
            confirmation("order_1", "pay_1", &signature, "pro"),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_signature");
}

#[tokio::test]
async fn test_failed_payment_rejected() {
    let app = TestAppBuilder::new().payment_status("failed").build();
    let token = common::id_token("payer-1");

    let (status, body) = common::send(
        app.router,
        common::json_request(
            "POST",
            "/api/payment/verify",
            Some(&token),
            None,
            signed_confirmation("order_1", "pay_1", "pro"),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");
    assert_eq!(body["details"], "Payment not successful");
    assert_eq!(app.gateway.lookups.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_missing_fields_rejected() {
    let app = TestAppBuilder::new().build();
    let token = common::id_token("payer-1");

    let (status, _) = common::send(
        app.router,
        common::json_request(
            "POST",
            "/api/payment/verify",
            Some(&token),
            None,
            json!({"razorpay_order_id": "order_1", "planId": "pro"}),
        ),
    )
    .await;

    assert!(status.is_client_error());
    assert_eq!(app.gateway.lookups.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_verified_payment_reaches_database() {
    let app = TestAppBuilder::new().build();
    let token = common::id_token("payer-1");

    // Signature and gateway pass; the offline database fails the plan lookup
    let (status, body) = common::send(
        app.router,
        common::json_request(
            "POST",
            "/api/payment/verify",
            Some(&token),
            None,
            signed_confirmation("order_1", "pay_1", "pro"),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "database_error");
    assert_eq!(app.gateway.lookups.load(Ordering::SeqCst), 1);
}

// ─── Emulator ────────────────────────────────────────────────

#[tokio::test]
async fn test_activation_keeps_trial_fields() {
    require_emulator!();

    let db = common::test_db().await;
    let uid = common::unique_uid("payer");
    let now = now_millis();

    db.seed_pricing(&default_plans(now)).await.unwrap();
    let trial = Subscription::trial(&uid, now - DAY_MILLIS);
    db.set_subscription(&trial).await.unwrap();

    let app = TestAppBuilder::new().db(db.clone()).build();
    let token = common::id_token(&uid);
    let (status, body) = common::send(
        app.router,
        common::json_request(
            "POST",
            "/api/payment/verify",
            Some(&token),
            None,
            signed_confirmation("order_9", "pay_9", "pro"),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Payment verified and subscription activated");
    assert_eq!(body["subscription"]["plan"], "pro_tier");

    let stored = db.get_subscription(&uid).await.unwrap().unwrap();
    assert_eq!(stored.status, SubscriptionStatus::Pro);
    assert_eq!(stored.subscription_id.as_deref(), Some("pay_9"));
    assert_eq!(stored.trial_start, trial.trial_start);
    assert_eq!(stored.trial_end, trial.trial_end);
    let period_end = stored.current_period_end.unwrap();
    assert!(period_end > now + 27 * DAY_MILLIS);
}

#[tokio::test]
async fn test_unknown_plan_rejected() {
    require_emulator!();

    let db = common::test_db().await;
    let uid = common::unique_uid("payer");

    let app = TestAppBuilder::new().db(db.clone()).build();
    let token = common::id_token(&uid);
    let (status, body) = common::send(
        app.router,
        common::json_request(
            "POST",
            "/api/payment/verify",
            Some(&token),
            None,
            signed_confirmation("order_1", "pay_1", "no-such-plan"),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"], "Invalid plan");
    assert!(db.get_subscription(&uid).await.unwrap().is_none());
}

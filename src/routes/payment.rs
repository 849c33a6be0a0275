// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Checkout verification route.

use crate::error::Result;
use crate::middleware::AuthUser;
use crate::models::Subscription;
use crate::services::payment::{self, PaymentConfirmation};
use crate::time_utils::now_millis;
use crate::AppState;
use axum::{extract::State, routing::post, Extension, Json, Router};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/payment/verify", post(verify_payment))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct VerifyPaymentResponse {
    pub success: bool,
    pub message: String,
    pub subscription: Subscription,
}

/// Verify a completed checkout and activate the purchased plan.
async fn verify_payment(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(confirmation): Json<PaymentConfirmation>,
) -> Result<Json<VerifyPaymentResponse>> {
    let subscription = payment::verify_and_activate(
        &state.db,
        state.payments.as_ref(),
        &state.config.razorpay_key_secret,
        &user.uid,
        &confirmation,
        now_millis(),
    )
    .await?;

    Ok(Json(VerifyPaymentResponse {
        success: true,
        message: "Payment verified and subscription activated".to_string(),
        subscription,
    }))
}

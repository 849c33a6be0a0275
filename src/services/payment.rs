// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Checkout verification and subscription activation.
//!
//! A checkout is trusted only when all of these hold, checked in order:
//! 1. The callback signature matches `HMAC-SHA256(key_secret, "{order}|{payment}")`
//! 2. The gateway reports the payment as captured or authorized
//! 3. The plan exists
//!
//! The subscription is then written with the payment id and a period end
//! 30 or 365 days out. Trial fields already on the document are kept.

use crate::db::FirestoreDb;
use crate::error::AppError;
use crate::models::subscription::PRO_TIER;
use crate::models::{PricingConfig, Subscription, SubscriptionStatus};
use crate::services::razorpay::PaymentGateway;
use crate::time_utils::period_end_millis;
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Fields posted by the checkout widget after payment.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfirmation {
    pub razorpay_order_id: String,
    pub razorpay_payment_id: String,
    pub razorpay_signature: String,
    #[serde(rename = "planId")]
    pub plan_id: String,
}

/// Lowercase hex HMAC-SHA256 of `"{order_id}|{payment_id}"`.
pub fn payment_signature(
    key_secret: &str,
    order_id: &str,
    payment_id: &str,
) -> Result<String, AppError> {
    let mut mac = HmacSha256::new_from_slice(key_secret.as_bytes())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("HMAC init failed: {}", e)))?;
    mac.update(order_id.as_bytes());
    mac.update(b"|");
    mac.update(payment_id.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Check a checkout callback signature in constant time.
pub fn verify_payment_signature(
    key_secret: &str,
    order_id: &str,
    payment_id: &str,
    signature: &str,
) -> Result<(), AppError> {
    let expected = payment_signature(key_secret, order_id, payment_id)?;

    if bool::from(expected.as_bytes().ct_eq(signature.as_bytes())) {
        Ok(())
    } else {
        tracing::warn!(order_id, payment_id, "Payment signature mismatch");
        Err(AppError::SignatureMismatch)
    }
}

/// The subscription granted by paying for `plan`.
pub fn activation(plan: &PricingConfig, user_id: &str, payment_id: &str, now: i64) -> Subscription {
    let plan_name = if plan.id == "pro" {
        PRO_TIER.to_string()
    } else {
        plan.id.clone()
    };

    Subscription {
        user_id: user_id.to_string(),
        status: SubscriptionStatus::Pro,
        plan: plan_name,
        subscription_id: Some(payment_id.to_string()),
        trial_start: None,
        trial_end: None,
        current_period_end: Some(period_end_millis(now, plan.is_yearly())),
    }
}

/// Verify a checkout and activate the plan for `user_id`.
pub async fn verify_and_activate(
    db: &FirestoreDb,
    gateway: &dyn PaymentGateway,
    key_secret: &str,
    user_id: &str,
    confirmation: &PaymentConfirmation,
    now: i64,
) -> Result<Subscription, AppError> {
    verify_payment_signature(
        key_secret,
        &confirmation.razorpay_order_id,
        &confirmation.razorpay_payment_id,
        &confirmation.razorpay_signature,
    )?;

    let payment = gateway
        .fetch_payment(&confirmation.razorpay_payment_id)
        .await?;
    if !payment.is_successful() {
        tracing::info!(
            payment_id = %payment.id,
            status = %payment.status,
            "Payment not in a successful state"
        );
        return Err(AppError::BadRequest("Payment not successful".to_string()));
    }

    let plan = db
        .get_pricing(&confirmation.plan_id)
        .await?
        .ok_or_else(|| AppError::BadRequest("Invalid plan".to_string()))?;

    let subscription = activation(&plan, user_id, &confirmation.razorpay_payment_id, now);
    db.activate_subscription(&subscription).await?;

    tracing::info!(
        user_id,
        plan = %subscription.plan,
        current_period_end = ?subscription.current_period_end,
        "Subscription activated"
    );
    Ok(subscription)
}

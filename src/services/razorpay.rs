// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Razorpay REST client.
//!
//! Only the payment lookup used to confirm a checkout is implemented; order
//! creation and webhooks live elsewhere.

use crate::error::AppError;
use futures_util::future::BoxFuture;
use serde::Deserialize;

const RAZORPAY_API_URL: &str = "https://api.razorpay.com/v1";

/// Payment as reported by the gateway.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PaymentDetails {
    pub id: String,
    /// `created`, `authorized`, `captured`, `refunded` or `failed`
    pub status: String,
    #[serde(default)]
    pub order_id: Option<String>,
    /// Amount in the currency's smallest unit
    #[serde(default)]
    pub amount: Option<u64>,
    #[serde(default)]
    pub currency: Option<String>,
}

impl PaymentDetails {
    /// Whether the money has moved (or is held) for this payment.
    pub fn is_successful(&self) -> bool {
        matches!(self.status.as_str(), "captured" | "authorized")
    }
}

/// Source of truth for payment status.
pub trait PaymentGateway: Send + Sync {
    fn fetch_payment<'a>(
        &'a self,
        payment_id: &'a str,
    ) -> BoxFuture<'a, Result<PaymentDetails, AppError>>;
}

/// Razorpay client authenticated with the key id/secret pair.
pub struct RazorpayClient {
    http: reqwest::Client,
    base_url: String,
    key_id: String,
    key_secret: String,
}

impl RazorpayClient {
    pub fn new(key_id: &str, key_secret: &str) -> Self {
        Self::with_base_url(RAZORPAY_API_URL, key_id, key_secret)
    }

    pub fn with_base_url(base_url: &str, key_id: &str, key_secret: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            key_id: key_id.to_string(),
            key_secret: key_secret.to_string(),
        }
    }

    fn payment_url(&self, payment_id: &str) -> String {
        format!(
            "{}/payments/{}",
            self.base_url,
            urlencoding::encode(payment_id)
        )
    }

    /// GET /v1/payments/{id}
    async fn get_payment(&self, payment_id: &str) -> Result<PaymentDetails, AppError> {
        let response = self
            .http
            .get(self.payment_url(payment_id))
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .send()
            .await
            .map_err(|e| AppError::PaymentGateway(format!("Payment lookup failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(%status, payment_id, "Razorpay payment lookup rejected");
            return Err(AppError::PaymentGateway(format!("HTTP {}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::PaymentGateway(format!("JSON parse error: {}", e)))
    }
}

impl PaymentGateway for RazorpayClient {
    fn fetch_payment<'a>(
        &'a self,
        payment_id: &'a str,
    ) -> BoxFuture<'a, Result<PaymentDetails, AppError>> {
        Box::pin(self.get_payment(payment_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_url_is_escaped() {
        let client = RazorpayClient::new("rzp_test_key", "secret");
        assert_eq!(
            client.payment_url("pay_29QQoUBi66xm2f"),
            "https://api.razorpay.com/v1/payments/pay_29QQoUBi66xm2f"
        );
        assert_eq!(
            client.payment_url("../orders"),
            "https://api.razorpay.com/v1/payments/..%2Forders"
        );
    }

    #[test]
    fn test_payment_status() {
        let payment: PaymentDetails = serde_json::from_value(serde_json::json!({
            "id": "pay_29QQoUBi66xm2f",
            "entity": "payment",
            "amount": 19900,
            "currency": "INR",
            "status": "captured",
            "order_id": "order_9A33XWu170gUtm",
            "method": "card"
        }))
        .unwrap();
        assert!(payment.is_successful());
        assert_eq!(payment.amount, Some(19900));

        let failed = PaymentDetails {
            status: "failed".into(),
            ..payment.clone()
        };
        assert!(!failed.is_successful());

        let authorized = PaymentDetails {
            status: "authorized".into(),
            ..payment
        };
        assert!(authorized.is_successful());
    }
}

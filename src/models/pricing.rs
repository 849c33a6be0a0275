// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Pricing plans shown on the pricing page and used at checkout.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum BillingInterval {
    Monthly,
    Yearly,
}

/// Pricing plan document (`pricing/{id}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct PricingConfig {
    /// Plan id, stored in the document as well as being its document ID
    #[serde(default)]
    pub id: String,
    pub plan_name: String,
    pub price: f64,
    /// ISO currency code, e.g. "USD" or "INR"
    pub currency: String,
    pub interval: BillingInterval,
    #[serde(default)]
    pub features: Vec<String>,
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "binding-generation", ts(type = "number | null"))]
    pub created_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "binding-generation", ts(type = "number | null"))]
    pub updated_at: Option<i64>,
}

impl PricingConfig {
    pub fn is_yearly(&self) -> bool {
        self.interval == BillingInterval::Yearly
    }
}

fn features(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Plans written when the pricing collection is empty.
pub fn default_plans(now: i64) -> Vec<PricingConfig> {
    vec![
        PricingConfig {
            id: "free".to_string(),
            plan_name: "Free".to_string(),
            price: 0.0,
            currency: "USD".to_string(),
            interval: BillingInterval::Monthly,
            features: features(&[
                "AI-Powered Tutorial Generation",
                "3 Projects",
                "3 Learning Paths",
                "Community Support",
                "5 interview questions per day",
            ]),
            is_active: true,
            created_at: Some(now),
            updated_at: Some(now),
        },
        PricingConfig {
            id: "pro".to_string(),
            plan_name: "Pro".to_string(),
            price: 199.0,
            currency: "INR".to_string(),
            interval: BillingInterval::Monthly,
            features: features(&[
                "AI-Powered Tutorial Generation",
                "Unlimited Projects",
                "Unlimited Learning Paths",
                "Personalized Assistance",
                "Priority Support",
                "Unlimited interview questions",
                "Unlimited AI-Powered Tutorials",
            ]),
            is_active: true,
            created_at: Some(now),
            updated_at: Some(now),
        },
    ]
}

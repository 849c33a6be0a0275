// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Subscription model and trial bookkeeping.

use crate::time_utils::{days_remaining, DAY_MILLIS, TRIAL_DAYS};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Plan name used for trials and paid "pro" subscriptions.
pub const PRO_TIER: &str = "pro_tier";
/// Plan name after a trial lapses.
pub const FREE_TIER: &str = "free_tier";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    Free,
    Pro,
    Trial,
}

/// Subscription document (`subscriptions/{uid}`).
///
/// The trial and billing-period fields keep their snake_case names so that
/// documents written by earlier clients still decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub user_id: String,
    pub status: SubscriptionStatus,
    pub plan: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_id: Option<String>,
    #[serde(rename = "trial_start", default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "binding-generation", ts(type = "number | null"))]
    pub trial_start: Option<i64>,
    #[serde(rename = "trial_end", default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "binding-generation", ts(type = "number | null"))]
    pub trial_end: Option<i64>,
    #[serde(
        rename = "current_period_end",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    #[cfg_attr(feature = "binding-generation", ts(type = "number | null"))]
    pub current_period_end: Option<i64>,
}

impl Subscription {
    /// Firestore field names written when a payment activates a plan.
    /// Trial fields are left out so a merge keeps them.
    pub const ACTIVATION_FIELDS: [&'static str; 5] = [
        "userId",
        "status",
        "plan",
        "subscriptionId",
        "current_period_end",
    ];

    /// A fresh 30-day trial of the pro tier.
    pub fn trial(user_id: &str, now: i64) -> Self {
        Self {
            user_id: user_id.to_string(),
            status: SubscriptionStatus::Trial,
            plan: PRO_TIER.to_string(),
            subscription_id: None,
            trial_start: Some(now),
            trial_end: Some(now + TRIAL_DAYS * DAY_MILLIS),
            current_period_end: None,
        }
    }

    /// Downgrade a lapsed trial to the free tier.
    ///
    /// Returns `true` when the subscription changed and must be persisted.
    pub fn expire_trial(&mut self, now: i64) -> bool {
        match (self.status, self.trial_end) {
            (SubscriptionStatus::Trial, Some(end)) if now > end => {
                self.status = SubscriptionStatus::Free;
                self.plan = FREE_TIER.to_string();
                true
            }
            _ => false,
        }
    }

    pub fn is_trial_active(&self, now: i64) -> bool {
        self.status == SubscriptionStatus::Trial && self.trial_end.is_some_and(|end| now < end)
    }

    /// Access summary shown to the client.
    pub fn view(self, now: i64) -> SubscriptionView {
        let is_trial_active = self.is_trial_active(now);
        let trial_days_remaining = if is_trial_active {
            self.trial_end.map(|end| days_remaining(now, end))
        } else {
            None
        };
        let has_pro_access = self.status == SubscriptionStatus::Pro || is_trial_active;

        SubscriptionView {
            subscription: self,
            is_trial_active,
            trial_days_remaining,
            has_pro_access,
        }
    }
}

/// Subscription plus derived access flags.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionView {
    #[serde(flatten)]
    pub subscription: Subscription,
    pub is_trial_active: bool,
    #[cfg_attr(feature = "binding-generation", ts(type = "number | null"))]
    pub trial_days_remaining: Option<i64>,
    pub has_pro_access: bool,
}

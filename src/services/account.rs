// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile, subscription and pricing bookkeeping done on read.

use crate::db::FirestoreDb;
use crate::error::AppError;
use crate::models::pricing::default_plans;
use crate::models::{PricingConfig, Subscription, UserProfile};

/// Fetch the caller's profile, creating it (and a trial) on first sign-in.
pub async fn ensure_profile(
    db: &FirestoreDb,
    uid: &str,
    email: Option<String>,
    now: i64,
) -> Result<UserProfile, AppError> {
    if let Some(profile) = db.get_user_profile(uid).await? {
        return Ok(profile);
    }

    let profile = UserProfile::new_member(uid, email, now);
    db.upsert_user_profile(&profile).await?;
    db.set_subscription(&Subscription::trial(uid, now)).await?;

    tracing::info!(uid, "Created user profile with trial");
    Ok(profile)
}

/// Decide what a stored subscription reads as at `now`.
///
/// Returns the subscription and whether it must be written back.
pub fn reconcile_subscription(
    stored: Option<Subscription>,
    uid: &str,
    now: i64,
) -> (Subscription, bool) {
    match stored {
        None => (Subscription::trial(uid, now), true),
        Some(mut subscription) => {
            let expired = subscription.expire_trial(now);
            (subscription, expired)
        }
    }
}

/// The caller's subscription after trial bookkeeping.
pub async fn current_subscription(
    db: &FirestoreDb,
    uid: &str,
    now: i64,
) -> Result<Subscription, AppError> {
    let stored = db.get_subscription(uid).await?;
    let had_document = stored.is_some();
    let (subscription, changed) = reconcile_subscription(stored, uid, now);

    if changed {
        db.set_subscription(&subscription).await?;
        if had_document {
            tracing::info!(uid, "Trial expired, downgraded to free tier");
        } else {
            tracing::info!(uid, "Started trial for user without subscription");
        }
    }

    Ok(subscription)
}

/// Active pricing plans, seeding the defaults into an empty collection.
pub async fn active_pricing(db: &FirestoreDb, now: i64) -> Result<Vec<PricingConfig>, AppError> {
    let mut plans = db.list_pricing().await?;

    if plans.is_empty() {
        plans = default_plans(now);
        db.seed_pricing(&plans).await?;
    }

    plans.retain(|p| p.is_active);
    Ok(plans)
}

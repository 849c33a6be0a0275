// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile, subscription, pricing and practice catalog routes.

use crate::error::Result;
use crate::middleware::AuthUser;
use crate::models::{PracticeOptions, PricingConfig, SubscriptionView, UserProfile};
use crate::services::account;
use crate::time_utils::now_millis;
use crate::AppState;
use axum::{extract::State, routing::get, Extension, Json, Router};
use std::sync::Arc;

/// Routes that need a signed-in user.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/me", get(get_me))
        .route("/api/subscription", get(get_subscription))
}

/// Routes visible before sign-in.
pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/pricing", get(get_pricing))
        .route("/api/practice/options", get(get_practice_options))
}

/// Current user's profile, created with a trial on first call.
async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<UserProfile>> {
    let profile = account::ensure_profile(&state.db, &user.uid, user.email, now_millis()).await?;
    Ok(Json(profile))
}

async fn get_subscription(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<SubscriptionView>> {
    let now = now_millis();
    let subscription = account::current_subscription(&state.db, &user.uid, now).await?;
    Ok(Json(subscription.view(now)))
}

async fn get_pricing(State(state): State<Arc<AppState>>) -> Result<Json<Vec<PricingConfig>>> {
    let plans = account::active_pricing(&state.db, now_millis()).await?;
    Ok(Json(plans))
}

/// Languages, difficulties and emotions offered by the practice pages.
async fn get_practice_options() -> Json<PracticeOptions> {
    Json(PracticeOptions::catalog())
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Project Code API Server
//!
//! Serves the AI practice flows, practice history and subscription
//! endpoints for the Project Code frontend.

use anyhow::Context;
use project_code::{
    ai::GeminiFactory,
    config::Config,
    db::FirestoreDb,
    services::{FirebaseTokenVerifier, RazorpayClient},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Structured JSON logging for GCP
    init_logging()?;

    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(
        port = config.port,
        server_gemini_key = config.gemini_api_key.is_some(),
        "Starting Project Code API"
    );

    let db = FirestoreDb::new(&config.firebase_project_id)
        .await
        .context("Failed to connect to Firestore")?;

    let auth = Arc::new(
        FirebaseTokenVerifier::new(&config.firebase_project_id)
            .context("Failed to initialize Firebase token verifier")?,
    );
    let models = Arc::new(
        GeminiFactory::new(&config.gemini_api_base_url)
            .context("Failed to initialize Gemini client")?,
    );
    let payments = Arc::new(RazorpayClient::new(
        &config.razorpay_key_id,
        &config.razorpay_key_secret,
    ));

    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        auth,
        models,
        payments,
    });

    let app = project_code::routes::create_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() -> anyhow::Result<()> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("project_code=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();
    Ok(())
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Project Code: AI-guided language and interview practice
//!
//! This crate provides the backend API: typed Gemini prompt flows for
//! practice exercises, per-user practice history in Firestore, and
//! Razorpay checkout verification for subscriptions.

pub mod ai;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use ai::ModelFactory;
use config::Config;
use db::FirestoreDb;
use services::{FirebaseTokenVerifier, PaymentGateway};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub auth: Arc<FirebaseTokenVerifier>,
    /// Builds a model per request for the resolved API key
    pub models: Arc<dyn ModelFactory>,
    pub payments: Arc<dyn PaymentGateway>,
}

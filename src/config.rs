// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! A `.env` file is honoured for local development; in production the
//! variables are injected by the hosting platform.

use std::env;

/// Default Gemini REST endpoint.
pub const DEFAULT_GEMINI_API_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Environment Variables (non-sensitive) ---
    /// Firebase project that issues the ID tokens and owns Firestore
    pub firebase_project_id: String,
    /// Frontend URL (CORS origin)
    pub frontend_url: String,
    /// Server port
    pub port: u16,
    /// Base URL of the generative-language API
    pub gemini_api_base_url: String,
    /// Razorpay key id (public half of the key pair)
    pub razorpay_key_id: String,

    // --- Secrets ---
    /// Server-wide Gemini key used when the caller supplies none
    pub gemini_api_key: Option<String>,
    /// Razorpay key secret, used for HMAC verification and API basic auth
    pub razorpay_key_secret: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            firebase_project_id: firebase_project_id_from_env()?,
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            gemini_api_base_url: env::var("GEMINI_API_BASE_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_GEMINI_API_BASE_URL.to_string()),
            razorpay_key_id: env::var("RAZORPAY_KEY_ID")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("RAZORPAY_KEY_ID"))?,

            gemini_api_key: env::var("GEMINI_API_KEY")
                .or_else(|_| env::var("GOOGLE_API_KEY"))
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            razorpay_key_secret: env::var("RAZORPAY_KEY_SECRET")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("RAZORPAY_KEY_SECRET"))?,
        })
    }

    /// Config for tests. No server-side Gemini key is set.
    pub fn test_default() -> Self {
        Self {
            firebase_project_id: "test-project".to_string(),
            frontend_url: "http://localhost:3000".to_string(),
            port: 8080,
            gemini_api_base_url: DEFAULT_GEMINI_API_BASE_URL.to_string(),
            razorpay_key_id: "rzp_test_key".to_string(),
            gemini_api_key: None,
            razorpay_key_secret: "test_razorpay_secret".to_string(),
        }
    }
}

/// Firebase project id, for tools that need nothing else from the config.
pub fn firebase_project_id_from_env() -> Result<String, ConfigError> {
    dotenvy::dotenv().ok();
    env::var("FIREBASE_PROJECT_ID")
        .or_else(|_| env::var("NEXT_PUBLIC_FIREBASE_PROJECT_ID"))
        .map(|v| v.trim().to_string())
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::Missing("FIREBASE_PROJECT_ID"))
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}

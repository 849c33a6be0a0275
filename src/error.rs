// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("{}", AppError::MISSING_CREDENTIAL_MESSAGE)]
    MissingCredential,

    #[error("Invalid payment signature")]
    SignatureMismatch,

    #[error("Model API error: {0}")]
    ModelApi(String),

    #[error("Model output failed validation: {0}")]
    SchemaValidation(String),

    #[error("Model returned no media: {0}")]
    MissingMedia(String),

    #[error("Payment gateway error: {0}")]
    PaymentGateway(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// User-facing message when no Gemini API key is available.
    pub const MISSING_CREDENTIAL_MESSAGE: &'static str =
        "API key is required. Please enter your Gemini API key in the sidebar to use this feature.";

    /// Whether the failure came from the model rather than from our side.
    pub fn is_model_failure(&self) -> bool {
        matches!(
            self,
            AppError::ModelApi(_) | AppError::SchemaValidation(_) | AppError::MissingMedia(_)
        )
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_model_failure() {
            tracing::warn!(error = %self, "Model call failed");
        }

        let (status, error, details) = match &self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized", None),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "invalid_token", None),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", Some(msg.clone())),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", Some(msg.clone()))
            }
            AppError::MissingCredential => (
                StatusCode::BAD_REQUEST,
                "missing_credential",
                Some(Self::MISSING_CREDENTIAL_MESSAGE.to_string()),
            ),
            AppError::SignatureMismatch => (
                StatusCode::BAD_REQUEST,
                "invalid_signature",
                Some(self.to_string()),
            ),
            AppError::ModelApi(msg) => (StatusCode::BAD_GATEWAY, "model_error", Some(msg.clone())),
            AppError::SchemaValidation(msg) => (
                StatusCode::BAD_GATEWAY,
                "invalid_model_output",
                Some(msg.clone()),
            ),
            AppError::MissingMedia(msg) => {
                (StatusCode::BAD_GATEWAY, "missing_media", Some(msg.clone()))
            }
            AppError::PaymentGateway(msg) => (
                StatusCode::BAD_GATEWAY,
                "payment_gateway_error",
                Some(msg.clone()),
            ),
            AppError::Database(msg) => {
                tracing::error!(error = %msg, "Database error");
                (StatusCode::INTERNAL_SERVER_ERROR, "database_error", None)
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Generative model invocation.
//!
//! Every request builds its model through a [`ModelFactory`] bound to an
//! explicit credential. There is no shared default model instance.

pub mod flow;
pub mod flows;
pub mod gemini;
pub mod media;
pub mod prompt;

use crate::error::AppError;
use futures_util::future::BoxFuture;
use std::sync::Arc;

pub use flow::Generated;
pub use gemini::{GeminiClient, GeminiFactory};

/// Model used for structured text output.
pub const TEXT_MODEL: &str = "gemini-2.5-flash";
/// Model used for speech synthesis.
pub const TTS_MODEL: &str = "gemini-2.5-flash-preview-tts";
/// Model used for image generation.
pub const IMAGE_MODEL: &str = "gemini-2.5-flash-image";
/// Prebuilt voice for speech synthesis.
pub const TTS_VOICE: &str = "Algenib";

/// One piece of a prompt, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Part {
    Text(String),
    /// Base64 media sent inline
    InlineMedia { mime_type: String, data: String },
    /// Media fetched by the client before sending
    RemoteMedia { url: String },
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text(text.into())
    }
}

/// What the model should return.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseFormat {
    /// JSON matching the given schema
    Json { schema: serde_json::Value },
    /// Text plus generated images
    Image,
    /// Spoken audio with a prebuilt voice
    Audio { voice: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    pub model: String,
    pub parts: Vec<Part>,
    pub format: ResponseFormat,
}

/// Generated media, base64 encoded.
#[derive(Debug, Clone, PartialEq)]
pub struct Media {
    pub mime_type: String,
    pub data: String,
}

impl Media {
    pub fn data_uri(&self) -> String {
        media::build_data_uri(&self.mime_type, &self.data)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl TokenUsage {
    pub fn total(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerateResponse {
    /// Concatenated text parts, if any
    pub text: Option<String>,
    pub media: Vec<Media>,
    pub usage: TokenUsage,
}

/// A generative model bound to one credential.
pub trait GenerativeModel: Send + Sync {
    fn generate(&self, request: GenerateRequest) -> BoxFuture<'_, Result<GenerateResponse, AppError>>;
}

/// Builds models for a resolved credential.
pub trait ModelFactory: Send + Sync {
    fn create(&self, api_key: &str) -> Arc<dyn GenerativeModel>;
}

/// Header carrying the caller's own Gemini key.
pub const API_KEY_HEADER: &str = "x-gemini-api-key";

/// Pick the credential for a request: the caller's key first, then the
/// server's configured key.
///
/// Fails before any model is built when neither is available.
pub fn resolve_credential(
    request_key: Option<&str>,
    configured_key: Option<&str>,
) -> Result<String, AppError> {
    [request_key, configured_key]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|key| !key.is_empty())
        .map(str::to_string)
        .ok_or(AppError::MissingCredential)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_key_wins() {
        let key = resolve_credential(Some("user-key"), Some("server-key")).unwrap();
        assert_eq!(key, "user-key");
    }

    #[test]
    fn test_falls_back_to_configured_key() {
        assert_eq!(
            resolve_credential(None, Some("server-key")).unwrap(),
            "server-key"
        );
        assert_eq!(
            resolve_credential(Some("   "), Some("server-key")).unwrap(),
            "server-key"
        );
    }

    #[test]
    fn test_missing_credential() {
        let err = resolve_credential(None, None).unwrap_err();
        assert!(matches!(err, AppError::MissingCredential));
        assert!(err.to_string().starts_with("API key is required."));
    }

    #[test]
    fn test_usage_total() {
        let usage = TokenUsage {
            input_tokens: 120,
            output_tokens: 30,
        };
        assert_eq!(usage.total(), 150);
        assert_eq!(TokenUsage::default().total(), 0);
    }
}

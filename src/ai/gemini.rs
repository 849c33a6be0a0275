// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Gemini REST client.
//!
//! Calls `POST {base}/v1beta/models/{model}:generateContent` with the key in
//! the `x-goog-api-key` header. Remote media is downloaded and sent inline;
//! only public https hosts are fetched, without following redirects.

use super::{
    GenerateRequest, GenerateResponse, GenerativeModel, Media, ModelFactory, Part, ResponseFormat,
    TokenUsage,
};
use crate::error::AppError;
use anyhow::Context;
use base64::Engine;
use futures_util::future::BoxFuture;
use serde::Deserialize;
use serde_json::{json, Value};
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

/// Largest remote media file downloaded for a prompt.
pub const MAX_MEDIA_BYTES: usize = 20 * 1024 * 1024;

// Image and speech generation can take well over a minute
const MODEL_TIMEOUT: Duration = Duration::from_secs(180);
const MEDIA_TIMEOUT: Duration = Duration::from_secs(30);

/// Gemini model bound to one API key.
pub struct GeminiClient {
    http: reqwest::Client,
    media_http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(
        http: reqwest::Client,
        media_http: reqwest::Client,
        base_url: &str,
        api_key: &str,
    ) -> Self {
        Self {
            http,
            media_http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }

    async fn generate_content(&self, request: GenerateRequest) -> Result<GenerateResponse, AppError> {
        let mut parts = Vec::with_capacity(request.parts.len());
        for part in request.parts {
            parts.push(match part {
                Part::RemoteMedia { url } => self.download_media(&url).await?,
                other => other,
            });
        }
        let body = build_request_body(&parts, &request.format);

        tracing::debug!(model = %request.model, parts = parts.len(), "Calling Gemini");

        let response = self
            .http
            .post(self.endpoint(&request.model))
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::ModelApi(format!("request failed: {}", e)))?;

        let parsed: GenerateContentResponse = check_response_json(response).await?;
        Ok(parsed.into_response())
    }

    /// Fetch remote media so it can be sent inline.
    async fn download_media(&self, url: &str) -> Result<Part, AppError> {
        let url = check_media_url(url).await?;

        let mut response = self
            .media_http
            .get(url.clone())
            .send()
            .await
            .map_err(|e| AppError::ModelApi(format!("failed to fetch media {}: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(AppError::BadRequest(format!(
                "media {} returned HTTP {}",
                url,
                response.status()
            )));
        }
        if response
            .content_length()
            .is_some_and(|len| len > MAX_MEDIA_BYTES as u64)
        {
            return Err(media_too_large(&url));
        }

        let mime_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.split(';').next().unwrap_or(v).trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| "application/octet-stream".to_string());

        let mut bytes = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| AppError::ModelApi(format!("failed to read media {}: {}", url, e)))?
        {
            if bytes.len() + chunk.len() > MAX_MEDIA_BYTES {
                return Err(media_too_large(&url));
            }
            bytes.extend_from_slice(&chunk);
        }

        Ok(Part::InlineMedia {
            mime_type,
            data: base64::engine::general_purpose::STANDARD.encode(&bytes),
        })
    }
}

fn media_too_large(url: &reqwest::Url) -> AppError {
    AppError::BadRequest(format!(
        "media {} is larger than {} bytes",
        url, MAX_MEDIA_BYTES
    ))
}

/// Parse a media URL and check that every address it names is public.
pub async fn check_media_url(url: &str) -> Result<reqwest::Url, AppError> {
    let rejected = |reason: &str| AppError::BadRequest(format!("media URL {}: {}", url, reason));

    let parsed = reqwest::Url::parse(url).map_err(|e| rejected(&e.to_string()))?;
    if parsed.scheme() != "https" {
        return Err(rejected("only https is allowed"));
    }
    let host = parsed
        .host_str()
        .ok_or_else(|| rejected("missing host"))?
        .trim_start_matches('[')
        .trim_end_matches(']')
        .to_ascii_lowercase();

    let addresses: Vec<IpAddr> = match host.parse::<IpAddr>() {
        Ok(ip) => vec![ip],
        Err(_) => {
            let name = host.trim_end_matches('.');
            if name == "localhost" || name.ends_with(".localhost") || name.ends_with(".internal") {
                return Err(rejected("host is not public"));
            }
            let port = parsed.port_or_known_default().unwrap_or(443);
            tokio::net::lookup_host((name, port))
                .await
                .map_err(|e| rejected(&format!("cannot resolve host: {}", e)))?
                .map(|addr| addr.ip())
                .collect()
        }
    };

    if addresses.is_empty() || !addresses.into_iter().all(is_public_ip) {
        return Err(rejected("host is not public"));
    }
    Ok(parsed)
}

fn is_public_ip(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            let [a, b, ..] = v4.octets();
            !(v4.is_private()
                || v4.is_loopback()
                || v4.is_link_local()
                || v4.is_unspecified()
                || v4.is_broadcast()
                || v4.is_documentation()
                || a == 0
                // Carrier-grade NAT, 100.64.0.0/10
                || (a == 100 && (b & 0xc0) == 64))
        }
        IpAddr::V6(v6) => {
            if let Some(v4) = v6.to_ipv4_mapped() {
                return is_public_ip(IpAddr::V4(v4));
            }
            let first = v6.segments()[0];
            !(v6.is_loopback()
                || v6.is_unspecified()
                || (first & 0xfe00) == 0xfc00
                || (first & 0xffc0) == 0xfe80)
        }
    }
}

impl GenerativeModel for GeminiClient {
    fn generate(&self, request: GenerateRequest) -> BoxFuture<'_, Result<GenerateResponse, AppError>> {
        Box::pin(self.generate_content(request))
    }
}

/// Builds [`GeminiClient`]s sharing one HTTP connection pool.
#[derive(Clone)]
pub struct GeminiFactory {
    http: reqwest::Client,
    media_http: reqwest::Client,
    base_url: String,
}

impl GeminiFactory {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(MODEL_TIMEOUT)
            .build()
            .context("failed building Gemini HTTP client")?;
        let media_http = reqwest::Client::builder()
            .timeout(MEDIA_TIMEOUT)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .context("failed building media download HTTP client")?;

        Ok(Self {
            http,
            media_http,
            base_url: base_url.to_string(),
        })
    }
}

impl ModelFactory for GeminiFactory {
    fn create(&self, api_key: &str) -> Arc<dyn GenerativeModel> {
        Arc::new(GeminiClient::new(
            self.http.clone(),
            self.media_http.clone(),
            &self.base_url,
            api_key,
        ))
    }
}

/// Check response status and parse JSON, mapping failures to model errors.
async fn check_response_json<T: for<'de> Deserialize<'de>>(
    response: reqwest::Response,
) -> Result<T, AppError> {
    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(AppError::ModelApi(format!("HTTP {}: {}", status, body)));
    }

    response
        .json()
        .await
        .map_err(|e| AppError::ModelApi(format!("JSON parse error: {}", e)))
}

/// Request body for `generateContent`.
pub fn build_request_body(parts: &[Part], format: &ResponseFormat) -> Value {
    let parts: Vec<Value> = parts
        .iter()
        .map(|part| match part {
            Part::Text(text) => json!({ "text": text }),
            Part::InlineMedia { mime_type, data } => {
                json!({ "inlineData": { "mimeType": mime_type, "data": data } })
            }
            // Downloaded before this point
            Part::RemoteMedia { url } => json!({ "fileData": { "fileUri": url } }),
        })
        .collect();

    let generation_config = match format {
        ResponseFormat::Json { schema } => json!({
            "responseMimeType": "application/json",
            "responseSchema": schema,
        }),
        ResponseFormat::Image => json!({ "responseModalities": ["TEXT", "IMAGE"] }),
        ResponseFormat::Audio { voice } => json!({
            "responseModalities": ["AUDIO"],
            "speechConfig": {
                "voiceConfig": { "prebuiltVoiceConfig": { "voiceName": voice } }
            }
        }),
    };

    json!({
        "contents": [{ "role": "user", "parts": parts }],
        "generationConfig": generation_config,
    })
}

// ─── Response Types ──────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    inline_data: Option<InlineData>,
    /// Set on reasoning summaries, which are not part of the answer
    #[serde(default)]
    thought: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u64,
    #[serde(default)]
    candidates_token_count: u64,
}

impl GenerateContentResponse {
    /// Collect the first candidate's text and media.
    pub fn into_response(self) -> GenerateResponse {
        let usage = self
            .usage_metadata
            .map(|u| TokenUsage {
                input_tokens: u.prompt_token_count,
                output_tokens: u.candidates_token_count,
            })
            .unwrap_or_default();

        let parts = self
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts)
            .unwrap_or_default();

        let mut text = String::new();
        let mut media = Vec::new();
        for part in parts.into_iter().filter(|p| !p.thought) {
            if let Some(t) = part.text {
                text.push_str(&t);
            }
            if let Some(inline) = part.inline_data {
                media.push(Media {
                    mime_type: inline.mime_type,
                    data: inline.data,
                });
            }
        }

        GenerateResponse {
            text: (!text.is_empty()).then_some(text),
            media,
            usage,
        }
    }
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Structured flows: prompt, JSON schema, decode, validate.

use super::{GenerateRequest, GenerativeModel, Part, ResponseFormat, TEXT_MODEL};
use crate::error::AppError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Flow output plus the tokens spent producing it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[serde(rename_all = "camelCase")]
pub struct Generated<T> {
    #[serde(flatten)]
    pub output: T,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub tokens_used: u64,
}

/// A prompt template whose model output is JSON with a declared schema.
pub trait StructuredFlow {
    /// Name used in logs and error messages.
    const NAME: &'static str;

    type Input: Validate + Sync;
    type Output: DeserializeOwned + Validate;

    fn prompt(input: &Self::Input) -> Result<Vec<Part>, AppError>;

    fn response_schema() -> serde_json::Value;

    /// Checks that relate output to input, run after field validation.
    fn check(_input: &Self::Input, _output: &Self::Output) -> Result<(), String> {
        Ok(())
    }
}

/// Run a structured flow with a single model call.
pub async fn run_structured<F: StructuredFlow>(
    model: &dyn GenerativeModel,
    input: &F::Input,
) -> Result<Generated<F::Output>, AppError> {
    input
        .validate()
        .map_err(|e| AppError::BadRequest(format!("{}: {}", F::NAME, e)))?;

    let request = GenerateRequest {
        model: TEXT_MODEL.to_string(),
        parts: F::prompt(input)?,
        format: ResponseFormat::Json {
            schema: F::response_schema(),
        },
    };
    let response = model.generate(request).await?;

    let text = response.text.ok_or_else(|| {
        AppError::SchemaValidation(format!("{}: model returned no text output", F::NAME))
    })?;
    let output: F::Output = decode_json(F::NAME, &text)?;
    output
        .validate()
        .map_err(|e| AppError::SchemaValidation(format!("{}: {}", F::NAME, e)))?;
    F::check(input, &output).map_err(|e| AppError::SchemaValidation(format!("{}: {}", F::NAME, e)))?;

    let tokens_used = response.usage.total();
    tracing::debug!(flow = F::NAME, tokens_used, "Flow completed");

    Ok(Generated {
        output,
        tokens_used,
    })
}

/// Decode model JSON, tolerating a Markdown code fence around it.
pub fn decode_json<T: DeserializeOwned>(flow: &str, text: &str) -> Result<T, AppError> {
    let trimmed = text.trim();
    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.trim_end().strip_suffix("```"))
        .unwrap_or(trimmed);

    serde_json::from_str(body.trim())
        .map_err(|e| AppError::SchemaValidation(format!("{}: output is not valid JSON for the schema: {}", flow, e)))
}

/// Response schema builders (OpenAPI subset understood by Gemini).
pub mod schema {
    use serde_json::{json, Value};

    pub fn string(description: &str) -> Value {
        json!({ "type": "STRING", "description": description })
    }

    pub fn number(description: &str) -> Value {
        json!({ "type": "NUMBER", "description": description })
    }

    /// Number constrained to a score range of 0 to 100.
    pub fn score(description: &str) -> Value {
        json!({ "type": "NUMBER", "description": description, "minimum": 0, "maximum": 100 })
    }

    pub fn array(items: Value, description: &str) -> Value {
        json!({ "type": "ARRAY", "items": items, "description": description })
    }

    pub fn object(properties: Value, required: &[&str]) -> Value {
        json!({ "type": "OBJECT", "properties": properties, "required": required })
    }
}

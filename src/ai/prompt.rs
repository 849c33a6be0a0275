// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Prompt assembly helpers.

use super::media::parse_data_uri;
use super::Part;
use crate::error::AppError;

/// Render a "different from these" block, or nothing when `history` is empty.
pub fn history_block(noun: &str, history: &[String]) -> String {
    let entries: Vec<&str> = history
        .iter()
        .map(|h| h.trim())
        .filter(|h| !h.is_empty())
        .collect();
    if entries.is_empty() {
        return String::new();
    }

    let mut block = format!(
        "Please generate a new {} that is different from these previous ones:\n",
        noun
    );
    for entry in entries {
        block.push_str("- ");
        block.push_str(entry);
        block.push('\n');
    }
    block
}

/// Ordered prompt parts, with media placed where the template puts them.
#[derive(Debug, Default)]
pub struct PromptBuilder {
    parts: Vec<Part>,
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        if let Some(Part::Text(prev)) = self.parts.last_mut() {
            prev.push_str(&text);
        } else {
            self.parts.push(Part::Text(text));
        }
        self
    }

    /// Add media from a data URI or an http(s) URL.
    pub fn media(mut self, uri: &str) -> Result<Self, AppError> {
        if uri.starts_with("data:") {
            let parsed = parse_data_uri(uri)?;
            self.parts.push(Part::InlineMedia {
                mime_type: parsed.mime_type.to_string(),
                data: parsed.data.to_string(),
            });
        } else if uri.starts_with("https://") {
            self.parts.push(Part::RemoteMedia {
                url: uri.to_string(),
            });
        } else {
            return Err(AppError::BadRequest(
                "media must be a data URI or an https URL".to_string(),
            ));
        }
        Ok(self)
    }

    pub fn build(self) -> Vec<Part> {
        self.parts
    }
}

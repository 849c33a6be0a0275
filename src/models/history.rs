// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Practice history items, one Firestore collection per practice mode.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::db::collections;

/// Practice mode a history item belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryKind {
    /// Pronunciation practice
    Accent,
    /// Emotional tone practice
    Tone,
    Storyteller,
    Scramble,
    Impromptu,
}

impl HistoryKind {
    pub const ALL: [HistoryKind; 5] = [
        HistoryKind::Accent,
        HistoryKind::Tone,
        HistoryKind::Storyteller,
        HistoryKind::Scramble,
        HistoryKind::Impromptu,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            HistoryKind::Accent => "accent",
            HistoryKind::Tone => "tone",
            HistoryKind::Storyteller => "storyteller",
            HistoryKind::Scramble => "scramble",
            HistoryKind::Impromptu => "impromptu",
        }
    }

    pub fn collection(self) -> &'static str {
        match self {
            HistoryKind::Accent => collections::PRONUNCIATION_HISTORY,
            HistoryKind::Tone => collections::PITCH_PERFECT_HISTORY,
            HistoryKind::Storyteller => collections::STORYTELLER_HISTORY,
            HistoryKind::Scramble => collections::SENTENCE_SCRAMBLE_HISTORY,
            HistoryKind::Impromptu => collections::IMPROMPTU_HISTORY,
        }
    }

    /// Maximum number of items returned by a listing.
    pub fn list_limit(self) -> u32 {
        50
    }
}

impl fmt::Display for HistoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HistoryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HistoryKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| format!("unknown history kind '{}'", s))
    }
}

/// Stored history item.
///
/// The document ID is not stored as a field; Firestore hands it back as
/// `_firestore_id` when reading.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    #[serde(alias = "_firestore_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub user_id: String,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub created_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "binding-generation", ts(type = "number | null"))]
    pub updated_at: Option<i64>,
    #[serde(flatten)]
    pub content: HistoryDraft,
}

impl HistoryItem {
    pub fn new(user_id: &str, content: HistoryDraft, now: i64) -> Self {
        Self {
            id: None,
            user_id: user_id.to_string(),
            created_at: now,
            updated_at: None,
            content,
        }
    }
}

/// Client-supplied fields of a history item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct HistoryDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1))]
    pub phrase: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1))]
    pub topic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(equal = 3))]
    pub images: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scrambled_sentence: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_sentence: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_audio_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scrambled_audio_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recorded_audio_url: Option<String>,
    /// Opaque analysis result, stored as given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "binding-generation", ts(type = "unknown"))]
    pub analysis: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_text_response: Option<String>,
}

impl HistoryDraft {
    /// Check field bounds and the fields `kind` requires.
    pub fn validate_for(&self, kind: HistoryKind) -> Result<(), String> {
        self.validate().map_err(|e| e.to_string())?;

        let missing = |field: &str, value: Option<&String>| match value {
            Some(v) if !v.trim().is_empty() => Ok(()),
            _ => Err(format!("'{}' is required for {} history", field, kind)),
        };

        match kind {
            HistoryKind::Accent => missing("phrase", self.phrase.as_ref()),
            HistoryKind::Tone => {
                missing("phrase", self.phrase.as_ref())?;
                missing("emotion", self.emotion.as_ref())
            }
            HistoryKind::Storyteller => match &self.images {
                Some(images) if images.len() == 3 => Ok(()),
                _ => Err("'images' must hold exactly 3 entries for storyteller history".into()),
            },
            HistoryKind::Scramble => {
                missing("scrambledSentence", self.scrambled_sentence.as_ref())?;
                missing("correctSentence", self.correct_sentence.as_ref())
            }
            HistoryKind::Impromptu => missing("topic", self.topic.as_ref()),
        }
    }
}

/// Fields a client may change on an existing history item.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recorded_audio_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_text_response: Option<String>,
    /// Set by the server on every update
    #[serde(default, skip_deserializing)]
    pub updated_at: i64,
}

impl HistoryUpdate {
    /// Firestore field paths to merge, including `updatedAt`.
    pub fn field_paths(&self) -> Vec<&'static str> {
        let mut paths = Vec::with_capacity(5);
        if self.recorded_audio_url.is_some() {
            paths.push("recordedAudioUrl");
        }
        if self.analysis.is_some() {
            paths.push("analysis");
        }
        if self.analysis_id.is_some() {
            paths.push("analysisId");
        }
        if self.raw_text_response.is_some() {
            paths.push("rawTextResponse");
        }
        paths.push("updatedAt");
        paths
    }

    /// Apply this update to an in-memory copy of the item.
    pub fn apply_to(&self, item: &mut HistoryItem) {
        if let Some(url) = &self.recorded_audio_url {
            item.content.recorded_audio_url = Some(url.clone());
        }
        if let Some(analysis) = &self.analysis {
            item.content.analysis = Some(analysis.clone());
        }
        if let Some(id) = &self.analysis_id {
            item.content.analysis_id = Some(id.clone());
        }
        if let Some(text) = &self.raw_text_response {
            item.content.raw_text_response = Some(text.clone());
        }
        item.updated_at = Some(self.updated_at);
    }
}

/// Sort newest first. Items are fetched unordered and sorted here.
pub fn sort_newest_first(items: &mut [HistoryItem]) {
    items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_from_path_segment() {
        assert_eq!("tone".parse::<HistoryKind>(), Ok(HistoryKind::Tone));
        assert!("analysis".parse::<HistoryKind>().is_err());
        assert_eq!(HistoryKind::Accent.collection(), "pronunciationPracticeHistory");
        assert_eq!(HistoryKind::Tone.collection(), "pitchPerfectHistory");
        assert!(HistoryKind::ALL.iter().all(|k| k.list_limit() == 50));
    }

    #[test]
    fn test_required_fields_per_kind() {
        let tone = HistoryDraft {
            phrase: Some("I can't believe it!".into()),
            ..Default::default()
        };
        assert!(tone.validate_for(HistoryKind::Accent).is_ok());
        let err = tone.validate_for(HistoryKind::Tone).unwrap_err();
        assert!(err.contains("emotion"));

        let scramble = HistoryDraft {
            scrambled_sentence: Some("dog the".into()),
            correct_sentence: Some("the dog".into()),
            ..Default::default()
        };
        assert!(scramble.validate_for(HistoryKind::Scramble).is_ok());
        assert!(scramble.validate_for(HistoryKind::Impromptu).is_err());
    }

    #[test]
    fn test_storyteller_requires_three_images() {
        let two = HistoryDraft {
            images: Some(vec!["a".into(), "b".into()]),
            ..Default::default()
        };
        assert!(two.validate_for(HistoryKind::Storyteller).is_err());

        let three = HistoryDraft {
            images: Some(vec!["a".into(), "b".into(), "c".into()]),
            ..Default::default()
        };
        assert!(three.validate_for(HistoryKind::Storyteller).is_ok());
    }

    #[test]
    fn test_blank_phrase_rejected() {
        let draft = HistoryDraft {
            phrase: Some("   ".into()),
            ..Default::default()
        };
        assert!(draft.validate_for(HistoryKind::Accent).is_err());
    }

    #[test]
    fn test_update_field_paths() {
        let update: HistoryUpdate = serde_json::from_value(json!({
            "analysisId": "a1",
            "rawTextResponse": "hello",
            "updatedAt": 99
        }))
        .unwrap();

        assert_eq!(
            update.field_paths(),
            vec!["analysisId", "rawTextResponse", "updatedAt"]
        );
        // Clients cannot choose the update time
        assert_eq!(update.updated_at, 0);
    }

    #[test]
    fn test_apply_update_merges() {
        let mut item = HistoryItem::new(
            "u1",
            HistoryDraft {
                phrase: Some("hola".into()),
                ..Default::default()
            },
            10,
        );
        let update = HistoryUpdate {
            recorded_audio_url: Some("https://cdn/rec.webm".into()),
            updated_at: 20,
            ..Default::default()
        };
        update.apply_to(&mut item);

        assert_eq!(item.content.phrase.as_deref(), Some("hola"));
        assert_eq!(item.content.recorded_audio_url.as_deref(), Some("https://cdn/rec.webm"));
        assert_eq!(item.updated_at, Some(20));
    }

    #[test]
    fn test_item_json_shape() {
        let mut item = HistoryItem::new(
            "u1",
            HistoryDraft {
                topic: Some("Describe your favorite place".into()),
                ..Default::default()
            },
            5,
        );
        item.id = Some("doc1".into());
        let value = serde_json::to_value(&item).unwrap();

        assert_eq!(value["id"], "doc1");
        assert_eq!(value["userId"], "u1");
        assert_eq!(value["topic"], "Describe your favorite place");
        assert!(value.get("phrase").is_none());

        let from_store: HistoryItem = serde_json::from_value(json!({
            "_firestore_id": "doc2",
            "userId": "u1",
            "createdAt": 7,
            "phrase": "bonjour"
        }))
        .unwrap();
        assert_eq!(from_store.id.as_deref(), Some("doc2"));
        assert_eq!(from_store.content.phrase.as_deref(), Some("bonjour"));
    }

    #[test]
    fn test_sort_newest_first() {
        let mut items: Vec<HistoryItem> = [3, 9, 1]
            .into_iter()
            .map(|t| HistoryItem::new("u1", HistoryDraft::default(), t))
            .collect();
        sort_newest_first(&mut items);
        let order: Vec<i64> = items.iter().map(|i| i.created_at).collect();
        assert_eq!(order, vec![9, 3, 1]);
    }
}

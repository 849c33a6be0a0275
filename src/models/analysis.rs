// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Persisted impromptu-speech analyses (`analysisHistory`).
//!
//! The nested model output is flattened into a stable record. Optional model
//! fields are backfilled so every stored record has the same shape: scalar
//! gaps become `null`, list gaps become `[]`, and the sentiment defaults to
//! `"neutral"`.

use serde::{Deserialize, Serialize};
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::ai::flows::accent::WordFeedback;
use crate::ai::flows::impromptu::{GrammarMistake, SpeechAnalysis};

/// Maximum number of analyses returned by a listing.
pub const ANALYSIS_LIST_LIMIT: u32 = 20;

fn neutral() -> String {
    "neutral".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct PronunciationRecord {
    #[validate(range(min = 0.0, max = 100.0))]
    pub overall_accuracy: f64,
    #[serde(default)]
    pub detailed_feedback: Vec<WordFeedback>,
    #[serde(default)]
    pub suggestions: String,
    #[serde(default)]
    pub accent_notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryRecord {
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub words_per_minute: Option<f64>,
    #[serde(default)]
    pub filler_words: Vec<String>,
    #[serde(default)]
    pub structure_feedback: Option<String>,
    #[serde(default)]
    pub pacing_feedback: Option<String>,
}

/// Analysis fields as submitted by the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisDraft {
    /// Transcript of what the user said
    pub user_response: String,
    /// Overall summary
    pub analysis: String,
    #[serde(default = "neutral")]
    pub sentiment: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub corrected_text: String,
    #[validate(range(min = 0.0, max = 100.0))]
    pub grammar_accuracy: f64,
    #[serde(default)]
    pub grammar_mistakes: Vec<GrammarMistake>,
    #[validate(nested)]
    pub pronunciation: PronunciationRecord,
    #[validate(range(min = 0.0, max = 100.0))]
    pub topicality_adherence: f64,
    pub topicality_explanation: String,
    #[serde(default)]
    pub topicality_strong_points: Vec<String>,
    #[serde(default)]
    pub topicality_missed_points: Vec<String>,
    #[serde(default)]
    #[validate(nested)]
    pub delivery: DeliveryRecord,
}

impl From<&SpeechAnalysis> for AnalysisDraft {
    fn from(full: &SpeechAnalysis) -> Self {
        Self {
            user_response: full.transcript.clone(),
            analysis: full.summary.clone(),
            sentiment: neutral(),
            keywords: Vec::new(),
            corrected_text: full.grammar.corrected_text.clone(),
            grammar_accuracy: full.grammar.accuracy,
            grammar_mistakes: full.grammar.mistakes.clone(),
            pronunciation: PronunciationRecord {
                overall_accuracy: full.pronunciation.overall_accuracy,
                detailed_feedback: full.pronunciation.detailed_feedback.clone(),
                suggestions: full.pronunciation.suggestions.clone(),
                accent_notes: full.pronunciation.accent_notes.clone(),
            },
            topicality_adherence: full.topicality.adherence,
            topicality_explanation: full.topicality.explanation.clone(),
            topicality_strong_points: full.topicality.strong_points.clone().unwrap_or_default(),
            topicality_missed_points: full.topicality.missed_points.clone().unwrap_or_default(),
            delivery: DeliveryRecord {
                words_per_minute: full.delivery.words_per_minute,
                filler_words: full.delivery.filler_words.clone().unwrap_or_default(),
                structure_feedback: full.delivery.structure_feedback.clone(),
                pacing_feedback: full.delivery.pacing_feedback.clone(),
            },
        }
    }
}

/// Stored analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRecord {
    #[serde(alias = "_firestore_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub user_id: String,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub created_at: i64,
    #[serde(flatten)]
    pub draft: AnalysisDraft,
}

impl AnalysisRecord {
    pub fn new(user_id: &str, draft: AnalysisDraft, now: i64) -> Self {
        Self {
            id: None,
            user_id: user_id.to_string(),
            created_at: now,
            draft,
        }
    }
}

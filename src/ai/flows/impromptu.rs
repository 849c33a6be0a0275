// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Impromptu speaking: topic generation and full speech analysis.

use crate::ai::flow::{run_structured, schema, StructuredFlow};
use crate::ai::prompt::{history_block, PromptBuilder};
use crate::ai::{Generated, GenerativeModel, Part};
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use serde_json::json;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use super::accent::{word_feedback_schema, WordFeedback};

// ─── Topic Generation ────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TopicInput {
    #[serde(default)]
    pub history: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ImpromptuTopic {
    #[validate(length(min = 1))]
    pub topic: String,
}

pub struct GenerateImpromptuTopic;

impl StructuredFlow for GenerateImpromptuTopic {
    const NAME: &'static str = "generate_impromptu_topic";
    type Input = TopicInput;
    type Output = ImpromptuTopic;

    fn prompt(input: &TopicInput) -> Result<Vec<Part>, AppError> {
        let text = format!(
            "You are an AI for a public speaking practice app.\n\
             Generate a single, interesting, and SFW (safe for work) topic for an impromptu speech.\n\
             The topic should be a question or a statement that someone can talk about for a minute.\n\n\
             Examples:\n\
             - \"What is a skill you'd like to learn and why?\"\n\
             - \"Describe your favorite place in the world.\"\n\
             - \"If you could have any superpower, what would it be and how would you use it?\"\n\
             - \"Talk about a book or movie that has had a big impact on you.\"\n\n\
             {history}",
            history = history_block("topic", &input.history),
        );
        Ok(PromptBuilder::new().text(text).build())
    }

    fn response_schema() -> serde_json::Value {
        schema::object(
            json!({ "topic": schema::string("A random, engaging topic for an impromptu speech.") }),
            &["topic"],
        )
    }
}

pub async fn generate_impromptu_topic(
    model: &dyn GenerativeModel,
    input: &TopicInput,
) -> Result<Generated<ImpromptuTopic>, AppError> {
    run_structured::<GenerateImpromptuTopic>(model, input).await
}

// ─── Speech Analysis ─────────────────────────────────────────

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SpeechInput {
    #[validate(length(min = 1))]
    pub audio_data_uri: String,
    #[validate(length(min = 1))]
    pub topic: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct GrammarMistake {
    pub mistake: String,
    pub explanation: String,
    pub correction: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct GrammarReport {
    pub corrected_text: String,
    #[validate(range(min = 0.0, max = 100.0))]
    pub accuracy: f64,
    pub mistakes: Vec<GrammarMistake>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct PronunciationReport {
    #[validate(range(min = 0.0, max = 100.0))]
    pub overall_accuracy: f64,
    #[validate(nested)]
    pub detailed_feedback: Vec<WordFeedback>,
    pub suggestions: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent_notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct TopicalityReport {
    /// How well the speaker stayed on topic
    #[validate(range(min = 0.0, max = 100.0))]
    pub adherence: f64,
    pub explanation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub missed_points: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strong_points: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0))]
    pub words_per_minute: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filler_words: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structure_feedback: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pacing_feedback: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RoadmapSection {
    pub title: String,
    pub steps: Vec<String>,
}

/// Full analysis of an impromptu speech.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct SpeechAnalysis {
    pub transcript: String,
    #[validate(nested)]
    pub grammar: GrammarReport,
    #[validate(nested)]
    pub pronunciation: PronunciationReport,
    #[validate(nested)]
    pub topicality: TopicalityReport,
    #[validate(nested)]
    pub delivery: DeliveryReport,
    pub summary: String,
    pub improvement_roadmap: Vec<RoadmapSection>,
}

pub struct AnalyzeSpeech;

impl StructuredFlow for AnalyzeSpeech {
    const NAME: &'static str = "analyze_speech";
    type Input = SpeechInput;
    type Output = SpeechAnalysis;

    fn prompt(input: &SpeechInput) -> Result<Vec<Part>, AppError> {
        let parts = PromptBuilder::new()
            .text(format!(
                "You are an expert speech coach.\n\
                 Analyze the following spoken audio directly for pronunciation, accent, grammar, \
                 and topicality.\n\
                 The user was given this topic: {topic}\n\n\
                 Audio: ",
                topic = input.topic,
            ))
            .media(&input.audio_data_uri)?
            .text(
                "\n\nProvide:\n\
                 - transcript: a best-effort transcript of the speech.\n\
                 - grammar: correctedText, accuracy (0-100), and concrete mistakes with \
                 explanation and correction.\n\
                 - pronunciation: overallAccuracy (0-100), detailed word-level feedback with \
                 errors, suggestions, accent notes.\n\
                 - topicality: adherence (0-100) to the topic with explanation, strongPoints, \
                 missedPoints.\n\
                 - delivery: wordsPerMinute (estimate), fillerWords (list), structureFeedback, \
                 pacingFeedback.\n\
                 - summary: a concise but insightful overall summary.\n\
                 - improvementRoadmap: 2-3 sections, each with step-by-step actions.\n\n\
                 Be precise and actionable. Return all fields fully populated.\n",
            )
            .build();
        Ok(parts)
    }

    fn response_schema() -> serde_json::Value {
        let strings = |d: &str| schema::array(json!({ "type": "STRING" }), d);
        schema::object(
            json!({
                "transcript": schema::string("Best-effort transcript derived from audio."),
                "grammar": schema::object(
                    json!({
                        "correctedText": schema::string("The transcript with grammar corrected."),
                        "accuracy": schema::score("Grammar accuracy (0-100)."),
                        "mistakes": schema::array(
                            schema::object(
                                json!({
                                    "mistake": schema::string("What was said."),
                                    "explanation": schema::string("Why it is wrong."),
                                    "correction": schema::string("What to say instead."),
                                }),
                                &["mistake", "explanation", "correction"],
                            ),
                            "Concrete grammar mistakes.",
                        ),
                    }),
                    &["correctedText", "accuracy", "mistakes"],
                ),
                "pronunciation": schema::object(
                    json!({
                        "overallAccuracy": schema::score("Overall pronunciation accuracy (0-100)."),
                        "detailedFeedback": schema::array(word_feedback_schema(), "Word-level feedback."),
                        "suggestions": schema::string("How to improve pronunciation."),
                        "accentNotes": schema::string("Notes on the speaker's accent."),
                    }),
                    &["overallAccuracy", "detailedFeedback", "suggestions"],
                ),
                "topicality": schema::object(
                    json!({
                        "adherence": schema::score("How well the user stuck to the given topic."),
                        "explanation": schema::string("Why the adherence score was given."),
                        "missedPoints": strings("Relevant points the speaker missed."),
                        "strongPoints": strings("Points the speaker made well."),
                    }),
                    &["adherence", "explanation"],
                ),
                "delivery": schema::object(
                    json!({
                        "wordsPerMinute": schema::number("Estimated speaking rate."),
                        "fillerWords": strings("Filler words used."),
                        "structureFeedback": schema::string("Feedback on the speech structure."),
                        "pacingFeedback": schema::string("Feedback on the pacing."),
                    }),
                    &[],
                ),
                "summary": schema::string("A concise overall summary."),
                "improvementRoadmap": schema::array(
                    schema::object(
                        json!({
                            "title": schema::string("Focus area."),
                            "steps": strings("Step-by-step actions."),
                        }),
                        &["title", "steps"],
                    ),
                    "Two or three improvement sections.",
                ),
            }),
            &[
                "transcript",
                "grammar",
                "pronunciation",
                "topicality",
                "delivery",
                "summary",
                "improvementRoadmap",
            ],
        )
    }
}

pub async fn analyze_speech(
    model: &dyn GenerativeModel,
    input: &SpeechInput,
) -> Result<Generated<SpeechAnalysis>, AppError> {
    run_structured::<AnalyzeSpeech>(model, input).await
}

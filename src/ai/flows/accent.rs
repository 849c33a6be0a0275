// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Pronunciation analysis of a recorded phrase against its reference text.

use crate::ai::flow::{run_structured, schema, StructuredFlow};
use crate::ai::prompt::PromptBuilder;
use crate::ai::{Generated, GenerativeModel, Part};
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use serde_json::json;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AccentInput {
    #[validate(length(min = 1))]
    pub recorded_audio_data_uri: String,
    #[validate(length(min = 1))]
    pub reference_text: String,
}

/// Pronunciation feedback for one word.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct WordFeedback {
    pub word: String,
    #[validate(range(min = 0.0, max = 100.0))]
    pub pronunciation_accuracy: f64,
    pub error_details: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct AccentAnalysis {
    #[validate(range(min = 0.0, max = 100.0))]
    pub overall_accuracy: f64,
    #[validate(nested)]
    pub detailed_feedback: Vec<WordFeedback>,
    pub suggestions: String,
}

pub(crate) fn word_feedback_schema() -> serde_json::Value {
    schema::object(
        json!({
            "word": schema::string("The word being analyzed."),
            "pronunciationAccuracy": schema::score("Pronunciation accuracy score (0-100) for the word."),
            "errorDetails": schema::string("Specific feedback on pronunciation errors and suggestions."),
        }),
        &["word", "pronunciationAccuracy", "errorDetails"],
    )
}

pub struct AnalyzeAccent;

impl StructuredFlow for AnalyzeAccent {
    const NAME: &'static str = "analyze_accent";
    type Input = AccentInput;
    type Output = AccentAnalysis;

    fn prompt(input: &AccentInput) -> Result<Vec<Part>, AppError> {
        let word_count = input.reference_text.split_whitespace().count();
        let parts = PromptBuilder::new()
            .text(
                "You are an advanced AI-powered accent analysis tool. Your task is to analyze a \
                 user's recorded speech and provide detailed feedback on their pronunciation \
                 compared to a reference text.\n\n\
                 Analyze the user's pronunciation of each word in the context of the entire \
                 phrase. Provide specific feedback on pronunciation errors, phoneme \
                 inaccuracies, and areas for improvement. Also consider the linguistic \
                 correctness.\n\n\
                 Recorded Audio: ",
            )
            .media(&input.recorded_audio_data_uri)?
            .text(format!(
                "\nReference Text: {reference}\n\n\
                 Output a detailed analysis including:\n\
                 - overallAccuracy: An overall accuracy score (0-100) of the user's pronunciation.\n\
                 - detailedFeedback: An array with exactly {word_count} objects, one per word of \
                 the reference text in order, each containing:\n\
                 \x20 - word: The word being analyzed.\n\
                 \x20 - pronunciationAccuracy: A pronunciation accuracy score (0-100) for the word.\n\
                 \x20 - errorDetails: Specific feedback on pronunciation errors and suggestions.\n\
                 - suggestions: General suggestions for improving accent, rhythm, and intonation.\n\n\
                 Ensure the feedback is constructive and actionable, focusing on specific areas \
                 the user can improve to match the reference accent.",
                reference = input.reference_text,
            ))
            .build();
        Ok(parts)
    }

    fn response_schema() -> serde_json::Value {
        schema::object(
            json!({
                "overallAccuracy": schema::score("Overall accuracy score (0-100) of the user's pronunciation."),
                "detailedFeedback": schema::array(word_feedback_schema(), "Detailed feedback for each word in the phrase."),
                "suggestions": schema::string("General suggestions for improving accent."),
            }),
            &["overallAccuracy", "detailedFeedback", "suggestions"],
        )
    }

    /// One feedback entry per whitespace-separated word of the reference.
    fn check(input: &AccentInput, output: &AccentAnalysis) -> Result<(), String> {
        let expected = input.reference_text.split_whitespace().count();
        if output.detailed_feedback.len() != expected {
            return Err(format!(
                "expected {} detailedFeedback entries, got {}",
                expected,
                output.detailed_feedback.len()
            ));
        }
        Ok(())
    }
}

pub async fn analyze_accent(
    model: &dyn GenerativeModel,
    input: &AccentInput,
) -> Result<Generated<AccentAnalysis>, AppError> {
    run_structured::<AnalyzeAccent>(model, input).await
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Emotional tone practice: phrase generation and delivery analysis.

use crate::ai::flow::{run_structured, schema, StructuredFlow};
use crate::ai::prompt::{history_block, PromptBuilder};
use crate::ai::{Generated, GenerativeModel, Part};
use crate::error::AppError;
use crate::models::Emotion;
use serde::{Deserialize, Serialize};
use serde_json::json;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use super::phrase::PhraseOutput;

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EmotionPhraseInput {
    pub emotion: Emotion,
    #[serde(default)]
    pub history: Vec<String>,
}

pub struct GenerateEmotionPhrase;

impl StructuredFlow for GenerateEmotionPhrase {
    const NAME: &'static str = "generate_emotion_phrase";
    type Input = EmotionPhraseInput;
    type Output = PhraseOutput;

    fn prompt(input: &EmotionPhraseInput) -> Result<Vec<Part>, AppError> {
        let text = format!(
            "You are an AI for a speech coaching app.\n\
             Generate a single, common, SFW (safe for work) English sentence that someone would \
             realistically say with a \"{emotion}\" tone.\n\
             The sentence should be between 7 and 15 words long.\n\n\
             {history}\n\
             Return just the sentence itself.\n",
            emotion = input.emotion,
            history = history_block("sentence", &input.history),
        );
        Ok(PromptBuilder::new().text(text).build())
    }

    fn response_schema() -> serde_json::Value {
        schema::object(
            json!({
                "phrase": schema::string("A sentence that is commonly said with the specified emotion.")
            }),
            &["phrase"],
        )
    }
}

pub async fn generate_emotion_phrase(
    model: &dyn GenerativeModel,
    input: &EmotionPhraseInput,
) -> Result<Generated<PhraseOutput>, AppError> {
    run_structured::<GenerateEmotionPhrase>(model, input).await
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ToneInput {
    #[validate(length(min = 1))]
    pub recorded_audio_data_uri: String,
    #[validate(length(min = 1))]
    pub phrase: String,
    pub emotion: Emotion,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct ToneAnalysis {
    #[validate(range(min = 0.0, max = 100.0))]
    pub consistency_score: f64,
    pub pitch_analysis: String,
    pub volume_analysis: String,
    pub overall_feedback: String,
}

pub struct AnalyzeTone;

impl StructuredFlow for AnalyzeTone {
    const NAME: &'static str = "analyze_tone";
    type Input = ToneInput;
    type Output = ToneAnalysis;

    fn prompt(input: &ToneInput) -> Result<Vec<Part>, AppError> {
        let emotion = input.emotion;
        let parts = PromptBuilder::new()
            .text(format!(
                "You are an expert speech coach AI. You are analyzing a user's speech to see how \
                 well they conveyed a specific emotion.\n\n\
                 The user was asked to say the phrase: \"{phrase}\"\n\
                 They were trying to sound: {emotion}\n\n\
                 Analyze the provided audio recording. Evaluate the user's pitch, tone, volume, \
                 and pacing to determine how successfully they conveyed the target emotion.\n\n\
                 User's recording: ",
                phrase = input.phrase,
            ))
            .media(&input.recorded_audio_data_uri)?
            .text(format!(
                "\n\nProvide the following analysis:\n\
                 - consistencyScore: A score from 0 to 100 representing how well the vocal \
                 delivery matched the \"{emotion}\" emotion.\n\
                 - pitchAnalysis: Specific feedback on the user's pitch. Was it varied or \
                 monotone? Was the intonation appropriate for the emotion?\n\
                 - volumeAnalysis: Specific feedback on the user's volume. Was it too loud, too \
                 soft, or just right? Was there dynamic variation?\n\
                 - overallFeedback: Constructive, actionable advice on how the user could better \
                 convey the \"{emotion}\" emotion in their speech.\n"
            ))
            .build();
        Ok(parts)
    }

    fn response_schema() -> serde_json::Value {
        schema::object(
            json!({
                "consistencyScore": schema::score("How well the user's tone matched the target emotion (0-100)."),
                "pitchAnalysis": schema::string("Feedback on the user's pitch and intonation."),
                "volumeAnalysis": schema::string("Feedback on the user's volume and dynamics."),
                "overallFeedback": schema::string("Holistic feedback and suggestions for improvement."),
            }),
            &["consistencyScore", "pitchAnalysis", "volumeAnalysis", "overallFeedback"],
        )
    }
}

pub async fn analyze_tone(
    model: &dyn GenerativeModel,
    input: &ToneInput,
) -> Result<Generated<ToneAnalysis>, AppError> {
    run_structured::<AnalyzeTone>(model, input).await
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Plain speech-to-text.

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
pub struct TranscribeInput {
    #[validate(length(min = 1))]
    pub recorded_audio_data_uri: String,
}

/// Silence transcribes to an empty string, so no length bound here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Transcript {
    pub transcript: String,
}

pub struct TranscribeAudio;

impl StructuredFlow for TranscribeAudio {
    const NAME: &'static str = "transcribe_audio";
    type Input = TranscribeInput;
    type Output = Transcript;

    fn prompt(input: &TranscribeInput) -> Result<Vec<Part>, AppError> {
        let parts = PromptBuilder::new()
            .text(
                "You are an accurate speech transcription assistant.\n\
                 Transcribe the following audio precisely, preserving punctuation and \
                 capitalization where appropriate.\n\n\
                 Audio: ",
            )
            .media(&input.recorded_audio_data_uri)?
            .text("\n\nReturn only the transcript text in the 'transcript' field.\n")
            .build();
        Ok(parts)
    }

    fn response_schema() -> serde_json::Value {
        schema::object(
            json!({ "transcript": schema::string("The transcribed text of the provided audio.") }),
            &["transcript"],
        )
    }
}

pub async fn transcribe_audio(
    model: &dyn GenerativeModel,
    input: &TranscribeInput,
) -> Result<Generated<Transcript>, AppError> {
    run_structured::<TranscribeAudio>(model, input).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::flows::test_support::ScriptedModel;

    #[tokio::test]
    async fn test_transcribe() {
        let model = ScriptedModel::replying(json!({"transcript": "Hello, world."}));
        let input = TranscribeInput {
            recorded_audio_data_uri: "data:audio/ogg;base64,T2dnUw==".into(),
        };

        let result = transcribe_audio(&model, &input).await.unwrap();
        assert_eq!(result.output.transcript, "Hello, world.");
        assert_eq!(result.tokens_used, 120);
    }
}

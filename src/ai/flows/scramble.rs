// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sentence scramble game: a sentence and a jumbled copy of it.

use crate::ai::flow::{run_structured, schema, StructuredFlow};
use crate::ai::prompt::{history_block, PromptBuilder};
use crate::ai::{Generated, GenerativeModel, Part};
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use serde_json::json;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ScrambleInput {
    #[serde(default)]
    pub history: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ScrambledSentence {
    #[validate(length(min = 1))]
    pub original: String,
    #[validate(length(min = 1))]
    pub jumbled: String,
}

pub struct GenerateScrambledSentence;

impl StructuredFlow for GenerateScrambledSentence {
    const NAME: &'static str = "generate_scrambled_sentence";
    type Input = ScrambleInput;
    type Output = ScrambledSentence;

    fn prompt(input: &ScrambleInput) -> Result<Vec<Part>, AppError> {
        let text = format!(
            "You are an AI for a language learning game.\n\
             Generate a common English sentence that is between 7 and 12 words long.\n\
             Then, jumble the words of that sentence.\n\n\
             {history}\n\
             Return both the original sentence and the jumbled sentence.\n\
             For example:\n\
             Original: \"The quick brown fox jumps over the lazy dog.\"\n\
             Jumbled: \"lazy the over fox brown jumps dog The quick.\"\n",
            history = history_block("sentence", &input.history),
        );
        Ok(PromptBuilder::new().text(text).build())
    }

    fn response_schema() -> serde_json::Value {
        schema::object(
            json!({
                "original": schema::string("The original, correct sentence."),
                "jumbled": schema::string("The jumbled version of the sentence."),
            }),
            &["original", "jumbled"],
        )
    }
}

pub async fn generate_scrambled_sentence(
    model: &dyn GenerativeModel,
    input: &ScrambleInput,
) -> Result<Generated<ScrambledSentence>, AppError> {
    run_structured::<GenerateScrambledSentence>(model, input).await
}

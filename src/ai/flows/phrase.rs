// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Practice phrase generation.

use crate::ai::flow::{run_structured, schema, StructuredFlow};
use crate::ai::prompt::{history_block, PromptBuilder};
use crate::ai::{Generated, GenerativeModel, Part};
use crate::error::AppError;
use crate::models::Difficulty;
use serde::{Deserialize, Serialize};
use serde_json::json;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PhraseInput {
    #[validate(length(min = 1))]
    pub language: String,
    pub difficulty: Difficulty,
    /// Earlier phrases to avoid repeating
    #[serde(default)]
    pub history: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PhraseOutput {
    #[validate(length(min = 1))]
    pub phrase: String,
}

pub struct GeneratePhrase;

impl StructuredFlow for GeneratePhrase {
    const NAME: &'static str = "generate_phrase";
    type Input = PhraseInput;
    type Output = PhraseOutput;

    fn prompt(input: &PhraseInput) -> Result<Vec<Part>, AppError> {
        let text = format!(
            "You are an AI that generates practice phrases for language learners.\n\n\
             Generate a standard, common, and grammatically correct phrase in {language}.\n\
             The phrase should be suitable for a {difficulty} difficulty level.\n\
             - Easy: 5-7 words, simple vocabulary.\n\
             - Medium: 8-12 words, more complex sentence structure.\n\
             - Hard: 13-15 words, advanced vocabulary and structure.\n\n\
             The phrase should be no more than 15 words.\n\n\
             {history}\n\
             Return just the phrase itself. Do not include any regional dialect or slang.\n",
            language = input.language,
            difficulty = input.difficulty,
            history = history_block("phrase", &input.history),
        );
        Ok(PromptBuilder::new().text(text).build())
    }

    fn response_schema() -> serde_json::Value {
        schema::object(
            json!({ "phrase": schema::string("The generated practice phrase.") }),
            &["phrase"],
        )
    }
}

pub async fn generate_phrase(
    model: &dyn GenerativeModel,
    input: &PhraseInput,
) -> Result<Generated<PhraseOutput>, AppError> {
    run_structured::<GeneratePhrase>(model, input).await
}

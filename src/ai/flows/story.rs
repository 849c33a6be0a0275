// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Storyteller practice: prompt images and story analysis.

use crate::ai::flow::{run_structured, schema, StructuredFlow};
use crate::ai::prompt::PromptBuilder;
use crate::ai::{
    Generated, GenerateRequest, GenerativeModel, Part, ResponseFormat, IMAGE_MODEL,
};
use crate::error::AppError;
use futures_util::future::try_join_all;
use serde::{Deserialize, Serialize};
use serde_json::json;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Scenes drawn for every storyteller round.
pub const STORY_SCENES: [&str; 3] = [
    "A mysterious, ancient key held in a gloved hand.",
    "A bustling, futuristic city street at night with flying vehicles.",
    "A serene, hidden waterfall in a lush, green forest.",
];

const IMAGE_STYLE_PREFIX: &str = "cinematic, high detail, photorealistic image: ";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct StoryImages {
    /// Exactly three image data URIs, in scene order
    pub images: Vec<String>,
}

/// Generate the three scene images concurrently.
///
/// Fails as a whole when any image call fails or returns no image.
pub async fn generate_story_images(
    model: &dyn GenerativeModel,
) -> Result<Generated<StoryImages>, AppError> {
    let calls = STORY_SCENES.iter().map(|scene| async move {
        let response = model
            .generate(GenerateRequest {
                model: IMAGE_MODEL.to_string(),
                parts: vec![Part::text(format!("{}{}", IMAGE_STYLE_PREFIX, scene))],
                format: ResponseFormat::Image,
            })
            .await?;

        let image = response.media.first().ok_or_else(|| {
            AppError::MissingMedia("Image generation failed for one of the prompts.".to_string())
        })?;
        Ok::<_, AppError>((image.data_uri(), response.usage.total()))
    });

    let results = try_join_all(calls).await?;
    let tokens_used: u64 = results.iter().map(|(_, tokens)| tokens).sum();
    let images = results.into_iter().map(|(uri, _)| uri).collect();

    tracing::debug!(flow = "generate_story_images", tokens_used, "Flow completed");
    Ok(Generated {
        output: StoryImages { images },
        tokens_used,
    })
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StoryInput {
    #[validate(length(min = 1))]
    pub story_audio_data_uri: String,
    /// The three images the story was told about
    #[validate(length(equal = 3))]
    pub image_urls: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct StoryAnalysis {
    #[validate(range(min = 0.0, max = 100.0))]
    pub relevance_score: f64,
    pub feedback: String,
    pub title_suggestion: String,
}

pub struct AnalyzeStory;

impl StructuredFlow for AnalyzeStory {
    const NAME: &'static str = "analyze_story";
    type Input = StoryInput;
    type Output = StoryAnalysis;

    fn prompt(input: &StoryInput) -> Result<Vec<Part>, AppError> {
        let mut builder = PromptBuilder::new().text(
            "You are an expert story critic AI. You are analyzing a user's spoken story to \
             evaluate how well it connects with three prompt images.\n\n\
             The user was shown these three images:",
        );
        for (i, url) in input.image_urls.iter().enumerate() {
            builder = builder.text(format!("\nImage {}: ", i + 1)).media(url)?;
        }
        let parts = builder
            .text(
                "\n\nListen to the user's story recording and analyze it based on the images.\n\
                 User's story: ",
            )
            .media(&input.story_audio_data_uri)?
            .text(
                "\n\nProvide the following analysis:\n\
                 - relevanceScore: A score from 0 to 100 representing how well the story \
                 creatively and coherently connects all three images.\n\
                 - feedback: Constructive feedback on the storytelling. Did it mention elements \
                 from each image? Was the narrative compelling? How could they improve?\n\
                 - titleSuggestion: A creative and fitting title for the story they told.\n",
            )
            .build();
        Ok(parts)
    }

    fn response_schema() -> serde_json::Value {
        schema::object(
            json!({
                "relevanceScore": schema::score("How well the story connects to the provided images (0-100)."),
                "feedback": schema::string("Constructive feedback on how well the story incorporates the images."),
                "titleSuggestion": schema::string("A creative title suggestion for the story."),
            }),
            &["relevanceScore", "feedback", "titleSuggestion"],
        )
    }
}

pub async fn analyze_story(
    model: &dyn GenerativeModel,
    input: &StoryInput,
) -> Result<Generated<StoryAnalysis>, AppError> {
    run_structured::<AnalyzeStory>(model, input).await
}

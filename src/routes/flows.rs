// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! AI flow endpoints.
//!
//! Each call resolves a Gemini credential (the caller's `X-Gemini-Api-Key`
//! header, then the server key) and builds a model for it. Without either,
//! the call fails before any model exists.

use crate::ai::flows::{
    accent::{self, AccentAnalysis, AccentInput},
    audio::{self, AudioInput, GeneratedAudio},
    compound_code::{self, CompoundCode, CompoundCodeInput},
    impromptu::{self, ImpromptuTopic, SpeechAnalysis, SpeechInput, TopicInput},
    phrase::{self, PhraseInput, PhraseOutput},
    scramble::{self, ScrambleInput, ScrambledSentence},
    story::{self, StoryAnalysis, StoryImages, StoryInput},
    tone::{self, EmotionPhraseInput, ToneAnalysis, ToneInput},
    transcribe::{self, TranscribeInput, Transcript},
};
use crate::ai::{resolve_credential, Generated, GenerativeModel, API_KEY_HEADER};
use crate::error::Result;
use crate::middleware::AuthUser;
use crate::routes::MEDIA_BODY_LIMIT;
use crate::AppState;
use axum::{
    extract::{DefaultBodyLimit, State},
    http::HeaderMap,
    routing::post,
    Extension, Json, Router,
};
use std::sync::Arc;

/// Flow routes (require authentication).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/flows/generate-phrase", post(generate_phrase))
        .route("/api/flows/analyze-accent", post(analyze_accent))
        .route("/api/flows/generate-emotion-phrase", post(generate_emotion_phrase))
        .route("/api/flows/analyze-tone", post(analyze_tone))
        .route("/api/flows/generate-scrambled-sentence", post(generate_scrambled_sentence))
        .route("/api/flows/generate-impromptu-topic", post(generate_impromptu_topic))
        .route("/api/flows/analyze-speech", post(analyze_speech))
        .route("/api/flows/analyze-story", post(analyze_story))
        .route("/api/flows/transcribe-audio", post(transcribe_audio))
        .route("/api/flows/generate-compound-code", post(generate_compound_code))
        .route("/api/flows/generate-audio", post(generate_audio))
        .route("/api/flows/generate-story-images", post(generate_story_images))
        .layer(DefaultBodyLimit::max(MEDIA_BODY_LIMIT))
}

/// Model bound to the credential for this request.
fn model_for(state: &AppState, headers: &HeaderMap) -> Result<Arc<dyn GenerativeModel>> {
    let request_key = headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok());
    let api_key = resolve_credential(request_key, state.config.gemini_api_key.as_deref())?;
    Ok(state.models.create(&api_key))
}

fn log_flow(flow: &str, user: &AuthUser, tokens_used: u64) {
    tracing::info!(flow, uid = %user.uid, tokens_used, "Flow completed");
}

// ─── Pronunciation & Tone ────────────────────────────────────

async fn generate_phrase(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    headers: HeaderMap,
    Json(input): Json<PhraseInput>,
) -> Result<Json<Generated<PhraseOutput>>> {
    let model = model_for(&state, &headers)?;
    let result = phrase::generate_phrase(model.as_ref(), &input).await?;
    log_flow("generate_phrase", &user, result.tokens_used);
    Ok(Json(result))
}

async fn analyze_accent(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    headers: HeaderMap,
    Json(input): Json<AccentInput>,
) -> Result<Json<Generated<AccentAnalysis>>> {
    let model = model_for(&state, &headers)?;
    let result = accent::analyze_accent(model.as_ref(), &input).await?;
    log_flow("analyze_accent", &user, result.tokens_used);
    Ok(Json(result))
}

async fn generate_emotion_phrase(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    headers: HeaderMap,
    Json(input): Json<EmotionPhraseInput>,
) -> Result<Json<Generated<PhraseOutput>>> {
    let model = model_for(&state, &headers)?;
    let result = tone::generate_emotion_phrase(model.as_ref(), &input).await?;
    log_flow("generate_emotion_phrase", &user, result.tokens_used);
    Ok(Json(result))
}

async fn analyze_tone(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    headers: HeaderMap,
    Json(input): Json<ToneInput>,
) -> Result<Json<Generated<ToneAnalysis>>> {
    let model = model_for(&state, &headers)?;
    let result = tone::analyze_tone(model.as_ref(), &input).await?;
    log_flow("analyze_tone", &user, result.tokens_used);
    Ok(Json(result))
}

// ─── Sentence Scramble & Impromptu ───────────────────────────

async fn generate_scrambled_sentence(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    headers: HeaderMap,
    Json(input): Json<ScrambleInput>,
) -> Result<Json<Generated<ScrambledSentence>>> {
    let model = model_for(&state, &headers)?;
    let result = scramble::generate_scrambled_sentence(model.as_ref(), &input).await?;
    log_flow("generate_scrambled_sentence", &user, result.tokens_used);
    Ok(Json(result))
}

async fn generate_impromptu_topic(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    headers: HeaderMap,
    Json(input): Json<TopicInput>,
) -> Result<Json<Generated<ImpromptuTopic>>> {
    let model = model_for(&state, &headers)?;
    let result = impromptu::generate_impromptu_topic(model.as_ref(), &input).await?;
    log_flow("generate_impromptu_topic", &user, result.tokens_used);
    Ok(Json(result))
}

async fn analyze_speech(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    headers: HeaderMap,
    Json(input): Json<SpeechInput>,
) -> Result<Json<Generated<SpeechAnalysis>>> {
    let model = model_for(&state, &headers)?;
    let result = impromptu::analyze_speech(model.as_ref(), &input).await?;
    log_flow("analyze_speech", &user, result.tokens_used);
    Ok(Json(result))
}

// ─── Storyteller ─────────────────────────────────────────────

async fn generate_story_images(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    headers: HeaderMap,
) -> Result<Json<Generated<StoryImages>>> {
    let model = model_for(&state, &headers)?;
    let result = story::generate_story_images(model.as_ref()).await?;
    log_flow("generate_story_images", &user, result.tokens_used);
    Ok(Json(result))
}

async fn analyze_story(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    headers: HeaderMap,
    Json(input): Json<StoryInput>,
) -> Result<Json<Generated<StoryAnalysis>>> {
    let model = model_for(&state, &headers)?;
    let result = story::analyze_story(model.as_ref(), &input).await?;
    log_flow("analyze_story", &user, result.tokens_used);
    Ok(Json(result))
}

// ─── Utilities ───────────────────────────────────────────────

async fn transcribe_audio(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    headers: HeaderMap,
    Json(input): Json<TranscribeInput>,
) -> Result<Json<Generated<Transcript>>> {
    let model = model_for(&state, &headers)?;
    let result = transcribe::transcribe_audio(model.as_ref(), &input).await?;
    log_flow("transcribe_audio", &user, result.tokens_used);
    Ok(Json(result))
}

async fn generate_compound_code(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    headers: HeaderMap,
    Json(input): Json<CompoundCodeInput>,
) -> Result<Json<Generated<CompoundCode>>> {
    let model = model_for(&state, &headers)?;
    let result = compound_code::generate_compound_code(model.as_ref(), &input).await?;
    log_flow("generate_compound_code", &user, result.tokens_used);
    Ok(Json(result))
}

async fn generate_audio(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    headers: HeaderMap,
    Json(input): Json<AudioInput>,
) -> Result<Json<Generated<GeneratedAudio>>> {
    let model = model_for(&state, &headers)?;
    let result = audio::generate_audio(model.as_ref(), &input).await?;
    log_flow("generate_audio", &user, result.tokens_used);
    Ok(Json(result))
}

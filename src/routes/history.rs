// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Practice history routes.
//!
//! Every read and write is scoped to the authenticated user. Items owned by
//! someone else are reported as not found.

use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::{
    AnalysisDraft, AnalysisRecord, HistoryDraft, HistoryItem, HistoryKind, HistoryUpdate,
};
use crate::routes::MEDIA_BODY_LIMIT;
use crate::time_utils::now_millis;
use crate::AppState;
use axum::{
    extract::{DefaultBodyLimit, Path, State},
    routing::{get, patch},
    Extension, Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// History routes (require authentication).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/history/analysis",
            get(list_analyses).post(create_analysis),
        )
        .route("/api/history/{kind}", get(list_items).post(create_item))
        .route("/api/history/{kind}/{id}", patch(update_item))
        .layer(DefaultBodyLimit::max(MEDIA_BODY_LIMIT))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CreatedResponse {
    pub id: String,
}

fn parse_kind(kind: &str) -> Result<HistoryKind> {
    kind.parse::<HistoryKind>().map_err(AppError::NotFound)
}

// ─── Practice Items ──────────────────────────────────────────

async fn create_item(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(kind): Path<String>,
    Json(draft): Json<HistoryDraft>,
) -> Result<Json<CreatedResponse>> {
    let kind = parse_kind(&kind)?;
    draft.validate_for(kind).map_err(AppError::BadRequest)?;

    let item = HistoryItem::new(&user.uid, draft, now_millis());
    let id = state.db.add_history_item(kind, &item).await?;

    tracing::debug!(kind = %kind, uid = %user.uid, id = %id, "History item created");
    Ok(Json(CreatedResponse { id }))
}

async fn update_item(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path((kind, id)): Path<(String, String)>,
    Json(mut update): Json<HistoryUpdate>,
) -> Result<Json<HistoryItem>> {
    let kind = parse_kind(&kind)?;

    let mut item = state
        .db
        .get_history_item(kind, &id)
        .await?
        .filter(|item| item.user_id == user.uid)
        .ok_or_else(|| AppError::NotFound(format!("{} history item {} not found", kind, id)))?;

    update.updated_at = now_millis();
    state.db.update_history_item(kind, &id, &update).await?;

    update.apply_to(&mut item);
    item.id = Some(id);
    Ok(Json(item))
}

async fn list_items(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(kind): Path<String>,
) -> Result<Json<Vec<HistoryItem>>> {
    let kind = parse_kind(&kind)?;
    let items = state.db.list_history(kind, &user.uid).await?;
    Ok(Json(items))
}

// ─── Speech Analyses ─────────────────────────────────────────

async fn create_analysis(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(draft): Json<AnalysisDraft>,
) -> Result<Json<CreatedResponse>> {
    draft
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let record = AnalysisRecord::new(&user.uid, draft, now_millis());
    let id = state.db.add_analysis(&record).await?;

    tracing::debug!(uid = %user.uid, id = %id, "Speech analysis saved");
    Ok(Json(CreatedResponse { id }))
}

async fn list_analyses(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<AnalysisRecord>>> {
    let records = state.db.list_analyses(&user.uid).await?;
    Ok(Json(records))
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes for the user's profile, settings, stats and history.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{StatsSummary, TrainingRecord, UserSettings};
use crate::services::workout;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

const DEFAULT_HISTORY_LIMIT: usize = 50;
const MAX_HISTORY_LIMIT: usize = 200;

/// API routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/me", get(get_me))
        .route("/api/settings", get(get_settings).put(put_settings))
        .route("/api/stats", get(get_stats))
        .route("/api/history", get(get_history))
        .route(
            "/api/history/{record_id}",
            get(get_record).delete(delete_record),
        )
        .route("/api/account", axum::routing::delete(delete_account))
}

// ─── User Profile ────────────────────────────────────────────

/// Current user response.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserResponse {
    pub user_id: String,
    pub email: String,
    pub created_at: String,
    pub settings: UserSettings,
    pub exercise_type_count: usize,
    pub template_count: usize,
    pub training_count: usize,
    /// Whether a session is in progress
    pub session_in_progress: bool,
}

/// Get current user profile.
async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<UserResponse>> {
    let doc = state.store.load(&user.user_id).await?;

    Ok(Json(UserResponse {
        session_in_progress: !doc.current_session.is_empty(),
        exercise_type_count: doc.exercise_types.len(),
        template_count: doc.templates.len(),
        training_count: doc.history.len(),
        user_id: doc.user_id,
        email: doc.email,
        created_at: doc.created_at,
        settings: doc.settings,
    }))
}

// ─── Settings ────────────────────────────────────────────────

async fn get_settings(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<UserSettings>> {
    Ok(Json(state.store.load(&user.user_id).await?.settings))
}

async fn put_settings(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(settings): Json<UserSettings>,
) -> Result<Json<UserSettings>> {
    let settings = state
        .store
        .mutate(&user.user_id, |doc| workout::update_settings(doc, settings))
        .await?;
    Ok(Json(settings))
}

// ─── Stats ───────────────────────────────────────────────────

async fn get_stats(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<StatsSummary>> {
    let doc = state.store.load(&user.user_id).await?;
    Ok(Json(StatsSummary::from_history(&doc.stats, &doc.history)))
}

// ─── History ─────────────────────────────────────────────────

#[derive(Deserialize)]
struct HistoryQuery {
    limit: Option<usize>,
    offset: Option<usize>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct HistoryResponse {
    pub records: Vec<TrainingRecord>,
    pub total: usize,
    pub has_more: bool,
}

/// Records newest first. Same-day records keep most-recent-first order.
fn newest_first(history: Vec<TrainingRecord>) -> Vec<TrainingRecord> {
    let mut records: Vec<_> = history.into_iter().rev().collect();
    records.sort_by(|a, b| b.date.cmp(&a.date));
    records
}

async fn get_history(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>> {
    let limit = query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    if limit == 0 || limit > MAX_HISTORY_LIMIT {
        return Err(AppError::BadRequest(format!(
            "limit must be between 1 and {}",
            MAX_HISTORY_LIMIT
        )));
    }
    let offset = query.offset.unwrap_or(0);

    let doc = state.store.load(&user.user_id).await?;
    let total = doc.history.len();
    let records: Vec<_> = newest_first(doc.history)
        .into_iter()
        .skip(offset)
        .take(limit)
        .collect();

    Ok(Json(HistoryResponse {
        has_more: offset + records.len() < total,
        records,
        total,
    }))
}

async fn get_record(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(record_id): Path<String>,
) -> Result<Json<TrainingRecord>> {
    let doc = state.store.load(&user.user_id).await?;
    doc.history
        .into_iter()
        .find(|r| r.id == record_id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Training record {}", record_id)))
}

async fn delete_record(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(record_id): Path<String>,
) -> Result<StatusCode> {
    state
        .store
        .mutate(&user.user_id, |doc| {
            workout::remove_training_record(doc, &record_id)
        })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ─── Account Deletion ────────────────────────────────────────

/// Delete the user's document and login.
async fn delete_account(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<StatusCode> {
    tracing::info!(user_id = %user.user_id, "User-initiated account deletion");

    state.store.delete_user(&user.user_id).await?;
    state.store.forget(&user.user_id);

    Ok(StatusCode::NO_CONTENT)
}

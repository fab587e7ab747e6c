// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Exercise type and template routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Extension, Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::{CurrentSession, ExerciseType, PlannedExercise, TrainingTemplate};
use crate::services::workout::{self, NewExerciseType};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/exercise-types",
            get(list_exercise_types).post(create_exercise_type),
        )
        .route("/api/exercise-types/{type_id}", delete(delete_exercise_type))
        .route("/api/templates", get(list_templates).post(create_template))
        .route("/api/templates/{template_id}", delete(delete_template))
        .route("/api/templates/{template_id}/load", post(load_template))
}

// ─── Exercise Types ──────────────────────────────────────────

async fn list_exercise_types(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<ExerciseType>>> {
    let mut types = state.store.load(&user.user_id).await?.exercise_types;
    types.sort_by_key(|t| t.name.to_lowercase());
    Ok(Json(types))
}

async fn create_exercise_type(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<NewExerciseType>,
) -> Result<(StatusCode, Json<ExerciseType>)> {
    let created = state
        .store
        .mutate(&user.user_id, |doc| workout::add_exercise_type(doc, request))
        .await?;

    tracing::info!(
        user_id = %user.user_id,
        exercise_type = %created.name,
        category = created.category.label(),
        "Exercise type created"
    );
    Ok((StatusCode::CREATED, Json(created)))
}

async fn delete_exercise_type(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(type_id): Path<String>,
) -> Result<StatusCode> {
    state
        .store
        .mutate(&user.user_id, |doc| workout::remove_exercise_type(doc, &type_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ─── Templates ───────────────────────────────────────────────

#[derive(Deserialize)]
struct CreateTemplateRequest {
    name: String,
    /// Exercises to save; the current session's plan when omitted.
    #[serde(default)]
    exercises: Option<Vec<PlannedExercise>>,
}

async fn list_templates(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<TrainingTemplate>>> {
    Ok(Json(state.store.load(&user.user_id).await?.templates))
}

async fn create_template(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<CreateTemplateRequest>,
) -> Result<(StatusCode, Json<TrainingTemplate>)> {
    let template = state
        .store
        .mutate(&user.user_id, |doc| {
            workout::save_template(doc, &request.name, request.exercises)
        })
        .await?;
    Ok((StatusCode::CREATED, Json(template)))
}

async fn delete_template(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(template_id): Path<String>,
) -> Result<StatusCode> {
    state
        .store
        .mutate(&user.user_id, |doc| {
            workout::remove_template(doc, &template_id)
        })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn load_template(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(template_id): Path<String>,
) -> Result<Json<CurrentSession>> {
    let session = state
        .store
        .mutate(&user.user_id, |doc| workout::load_template(doc, &template_id))
        .await?;
    Ok(Json(session))
}

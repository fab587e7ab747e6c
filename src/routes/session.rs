// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Current session routes: planning, sets, timers and finishing.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{
    CurrentSession, PlannedExercise, RestTimer, SessionTimer, Set, TrainingRecord,
};
use crate::services::workout::{self, ExerciseChanges, Mutation, PlanParams, TimerAction};
use crate::units::{to_kg, WeightUnit};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/session", get(get_session).delete(discard_session))
        .route("/api/session/exercises", post(add_exercise))
        .route(
            "/api/session/exercises/{exercise_id}",
            put(update_exercise).delete(remove_exercise),
        )
        .route(
            "/api/session/exercises/{exercise_id}/done",
            put(set_exercise_done),
        )
        .route("/api/session/exercises/{exercise_id}/sets", post(add_set))
        .route(
            "/api/session/exercises/{exercise_id}/sets/{set_id}",
            put(update_set).delete(remove_set),
        )
        .route("/api/session/finish", post(finish))
        .route("/api/session/timer", get(get_timer))
        .route("/api/session/timer/{action}", post(control_timer))
        .route("/api/session/rest", post(start_rest).delete(cancel_rest))
}

fn exercise_not_found(exercise_id: &str) -> AppError {
    AppError::NotFound(format!("Exercise {} in current session", exercise_id))
}

// ─── Views ───────────────────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TimerResponse {
    pub active: bool,
    pub paused: bool,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub elapsed_secs: u64,
    /// Elapsed time as HH:MM:SS
    pub elapsed: String,
}

impl TimerResponse {
    fn new(timer: &SessionTimer, now: DateTime<Utc>) -> Self {
        Self {
            active: timer.active,
            paused: timer.paused,
            elapsed_secs: timer.elapsed_secs(now),
            elapsed: timer.display(now),
        }
    }
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RestResponse {
    pub active: bool,
    pub duration_secs: u32,
    pub remaining_secs: u32,
    /// Countdown reached zero; the client should alert the user
    pub finished: bool,
}

impl RestResponse {
    fn new(rest: &RestTimer, now: DateTime<Utc>) -> Self {
        Self {
            active: rest.active,
            duration_secs: rest.duration_secs,
            remaining_secs: rest.remaining_secs(now),
            finished: rest.is_finished(now),
        }
    }
}

/// The current session plus live timer readings.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SessionResponse {
    pub exercises: Vec<PlannedExercise>,
    pub timer: TimerResponse,
    pub rest: RestResponse,
    /// Unit the client should display weights in (stored values are kg)
    pub weight_unit: WeightUnit,
    pub can_finish: bool,
}

impl SessionResponse {
    fn new(session: CurrentSession, weight_unit: WeightUnit, now: DateTime<Utc>) -> Self {
        Self {
            can_finish: session.has_progress(),
            timer: TimerResponse::new(&session.timer, now),
            rest: RestResponse::new(&session.rest, now),
            exercises: session.exercises,
            weight_unit,
        }
    }
}

// ─── Session ─────────────────────────────────────────────────

async fn get_session(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<SessionResponse>> {
    let doc = state.store.load(&user.user_id).await?;
    Ok(Json(SessionResponse::new(
        doc.current_session,
        doc.settings.weight_unit,
        Utc::now(),
    )))
}

async fn discard_session(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<StatusCode> {
    state
        .store
        .mutate(&user.user_id, workout::discard_session)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn finish(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<(StatusCode, Json<TrainingRecord>)> {
    let now = Utc::now();
    let record = state
        .store
        .mutate(&user.user_id, |doc| workout::finish_training(doc, now))
        .await?;
    Ok((StatusCode::CREATED, Json(record)))
}

// ─── Planned Exercises ───────────────────────────────────────

#[derive(Deserialize)]
struct AddExerciseRequest {
    exercise_type_id: String,
    #[serde(flatten)]
    params: PlanParams,
}

async fn add_exercise(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<AddExerciseRequest>,
) -> Result<(StatusCode, Json<PlannedExercise>)> {
    let planned = state
        .store
        .mutate(&user.user_id, |doc| {
            workout::add_exercise_to_plan(doc, &request.exercise_type_id, request.params)
        })
        .await?;
    Ok((StatusCode::CREATED, Json(planned)))
}

#[derive(Deserialize)]
struct UpdateExerciseRequest {
    #[serde(default)]
    done: Option<bool>,
    #[serde(default)]
    sets: Option<Vec<SetRequest>>,
    #[serde(default)]
    duration_minutes: Option<u32>,
    #[serde(default)]
    reps: Option<u32>,
}

async fn update_exercise(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(exercise_id): Path<String>,
    Json(request): Json<UpdateExerciseRequest>,
) -> Result<Json<PlannedExercise>> {
    for set in request.sets.iter().flatten() {
        check_weight(set.weight)?;
    }

    state
        .store
        .mutate(&user.user_id, |doc| {
            let preferred = doc.settings.weight_unit;
            let sets = request.sets.map(|sets| {
                sets.into_iter()
                    .map(|set| Set {
                        weight: weight_in_kg(&set, preferred),
                        id: set.id.unwrap_or_default(),
                        reps: set.reps,
                        done: set.done,
                    })
                    .collect()
            });
            let changes = ExerciseChanges {
                done: request.done,
                sets,
                duration_minutes: request.duration_minutes,
                reps: request.reps,
            };
            workout::update_planned_exercise(doc, &exercise_id, changes)
        })
        .await?
        .map(Json)
        .ok_or_else(|| exercise_not_found(&exercise_id))
}

async fn remove_exercise(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(exercise_id): Path<String>,
) -> Result<StatusCode> {
    let removed = state
        .store
        .mutate(&user.user_id, |doc| {
            workout::remove_exercise_from_plan(doc, &exercise_id)
        })
        .await?;

    if removed {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(exercise_not_found(&exercise_id))
    }
}

#[derive(Deserialize)]
struct DoneRequest {
    done: bool,
}

async fn set_exercise_done(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(exercise_id): Path<String>,
    Json(request): Json<DoneRequest>,
) -> Result<Json<PlannedExercise>> {
    state
        .store
        .mutate(&user.user_id, |doc| {
            workout::set_exercise_done(doc, &exercise_id, request.done)
        })
        .await?
        .map(Json)
        .ok_or_else(|| exercise_not_found(&exercise_id))
}

// ─── Sets ────────────────────────────────────────────────────

/// Set payload. Weight is in `unit`, or the user's preferred unit.
#[derive(Deserialize)]
struct SetRequest {
    /// Only used when replacing a whole set list
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    weight: Option<f64>,
    #[serde(default)]
    reps: Option<u32>,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    unit: Option<WeightUnit>,
}

fn check_weight(weight: Option<f64>) -> Result<()> {
    match weight {
        Some(w) if !w.is_finite() || w < 0.0 => Err(AppError::BadRequest(
            "Weight must be a non-negative number".to_string(),
        )),
        _ => Ok(()),
    }
}

fn weight_in_kg(request: &SetRequest, preferred: WeightUnit) -> Option<f64> {
    request
        .weight
        .map(|w| to_kg(w, request.unit.unwrap_or(preferred)))
}

async fn add_set(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(exercise_id): Path<String>,
    Json(request): Json<SetRequest>,
) -> Result<(StatusCode, Json<Set>)> {
    check_weight(request.weight)?;

    let set = state
        .store
        .mutate(&user.user_id, |doc| {
            let weight = weight_in_kg(&request, doc.settings.weight_unit);
            workout::add_set(doc, &exercise_id, weight, request.reps)
        })
        .await?
        .ok_or_else(|| exercise_not_found(&exercise_id))?;
    Ok((StatusCode::CREATED, Json(set)))
}

async fn update_set(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path((exercise_id, set_id)): Path<(String, String)>,
    Json(request): Json<SetRequest>,
) -> Result<Json<Set>> {
    check_weight(request.weight)?;

    state
        .store
        .mutate(&user.user_id, |doc| {
            let updated = Set {
                id: set_id.clone(),
                weight: weight_in_kg(&request, doc.settings.weight_unit),
                reps: request.reps,
                done: request.done,
            };
            workout::update_set(doc, &exercise_id, updated)
        })
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Set {}", set_id)))
}

async fn remove_set(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path((exercise_id, set_id)): Path<(String, String)>,
) -> Result<StatusCode> {
    let removed = state
        .store
        .mutate(&user.user_id, |doc| {
            workout::remove_set(doc, &exercise_id, &set_id)
        })
        .await?;

    if removed {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Set {}", set_id)))
    }
}

// ─── Timers ──────────────────────────────────────────────────

async fn get_timer(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<TimerResponse>> {
    let doc = state.store.load(&user.user_id).await?;
    Ok(Json(TimerResponse::new(
        &doc.current_session.timer,
        Utc::now(),
    )))
}

async fn control_timer(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(action): Path<TimerAction>,
) -> Result<Json<TimerResponse>> {
    let now = Utc::now();
    let timer = state
        .store
        .mutate(&user.user_id, |doc| workout::control_timer(doc, action, now))
        .await?;
    Ok(Json(TimerResponse::new(&timer, now)))
}

#[derive(Deserialize, Default)]
struct RestRequest {
    /// Countdown length; the user's default rest time when omitted
    #[serde(default)]
    seconds: Option<u32>,
}

/// The body is optional: an empty POST starts the default countdown.
async fn start_rest(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    body: Bytes,
) -> Result<Json<RestResponse>> {
    let request: RestRequest = if body.is_empty() {
        RestRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| AppError::BadRequest(format!("Invalid rest request: {}", e)))?
    };

    let now = Utc::now();
    let rest = state
        .store
        .mutate(&user.user_id, |doc| {
            let started = workout::start_rest(doc, request.seconds, now)?;
            Ok(Mutation::new(
                doc.current_session.rest.clone(),
                started.updates,
            ))
        })
        .await?;
    Ok(Json(RestResponse::new(&rest, now)))
}

async fn cancel_rest(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<StatusCode> {
    state
        .store
        .mutate(&user.user_id, workout::cancel_rest)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

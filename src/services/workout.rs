// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout mutations.
//!
//! Each function applies one change to an in-memory [`UserDocument`] and
//! returns the [`DocumentUpdate`]s that bring the remote copy in line.
//! Array-shaped collections (exercise types, history, templates) are
//! updated with union/remove transforms; the current session is small and
//! nested, so it is written back as one field.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashSet;

use crate::db::DocumentUpdate;
use crate::error::AppError;
use crate::ids::new_id;
use crate::models::user::fields;
use crate::models::{
    Category, CurrentSession, ExerciseType, MuscleGroup, PlannedExercise, SessionTimer, Set,
    TrainingRecord, TrainingTemplate, UserDocument, UserSettings,
};
use crate::time_utils::format_day;

/// Result of a mutation: what the caller gets back plus the remote updates.
#[derive(Debug)]
pub struct Mutation<T> {
    pub output: T,
    pub updates: Vec<DocumentUpdate>,
}

impl<T> Mutation<T> {
    pub fn new(output: T, updates: Vec<DocumentUpdate>) -> Self {
        Self { output, updates }
    }

    /// A mutation that changed nothing.
    pub fn unchanged(output: T) -> Self {
        Self {
            output,
            updates: Vec::new(),
        }
    }
}

type MutationResult<T> = Result<Mutation<T>, AppError>;

fn session_update(doc: &UserDocument) -> Result<DocumentUpdate, AppError> {
    DocumentUpdate::set(fields::CURRENT_SESSION, &doc.current_session)
}

fn session_changed<T>(doc: &UserDocument, output: T) -> MutationResult<T> {
    Ok(Mutation::new(output, vec![session_update(doc)?]))
}

// ─── Exercise Types ──────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct NewExerciseType {
    pub name: String,
    pub category: Category,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub muscle_groups: Vec<MuscleGroup>,
}

pub fn add_exercise_type(doc: &mut UserDocument, new: NewExerciseType) -> MutationResult<ExerciseType> {
    let name = new.name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("Exercise name is required".to_string()));
    }

    let exercise_type = ExerciseType::new(
        new_id()?,
        name.to_string(),
        new.category,
        new.description.trim().to_string(),
        new.muscle_groups,
    );
    doc.exercise_types.push(exercise_type.clone());

    let update = DocumentUpdate::array_union(fields::EXERCISE_TYPES, &exercise_type)?;
    Ok(Mutation::new(exercise_type, vec![update]))
}

pub fn remove_exercise_type(doc: &mut UserDocument, type_id: &str) -> MutationResult<()> {
    let index = doc
        .exercise_types
        .iter()
        .position(|t| t.id == type_id)
        .ok_or_else(|| AppError::NotFound(format!("Exercise type {}", type_id)))?;
    let removed = doc.exercise_types.remove(index);

    let update = DocumentUpdate::array_remove(fields::EXERCISE_TYPES, &removed)?;
    Ok(Mutation::new((), vec![update]))
}

// ─── Planned Exercises ───────────────────────────────────────────

/// Category-specific parameters when adding an exercise to the plan.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlanParams {
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    #[serde(default)]
    pub reps: Option<u32>,
}

/// Add an exercise of the given type, pre-filled from its last use.
pub fn add_exercise_to_plan(
    doc: &mut UserDocument,
    type_id: &str,
    params: PlanParams,
) -> MutationResult<PlannedExercise> {
    let exercise_type = doc
        .exercise_type(type_id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("Exercise type {}", type_id)))?;

    let mut planned = PlannedExercise {
        id: new_id()?,
        exercise_type_id: exercise_type.id.clone(),
        name: exercise_type.name.clone(),
        category: exercise_type.category,
        done: false,
        sets: Vec::new(),
        duration_minutes: None,
        reps: None,
    };

    if exercise_type.category.is_strength() {
        for last in &exercise_type.last_sets {
            planned.sets.push(Set {
                id: new_id()?,
                weight: last.weight,
                reps: last.reps,
                done: false,
            });
        }
    } else {
        planned.duration_minutes = params
            .duration_minutes
            .or(exercise_type.last_duration_minutes);
        planned.reps = params.reps.or(exercise_type.last_reps);
    }

    doc.current_session.exercises.push(planned.clone());
    session_changed(doc, planned)
}

/// Returns `false` (and changes nothing) if the exercise is not planned.
pub fn remove_exercise_from_plan(doc: &mut UserDocument, exercise_id: &str) -> MutationResult<bool> {
    let before = doc.current_session.exercises.len();
    doc.current_session.exercises.retain(|e| e.id != exercise_id);
    if doc.current_session.exercises.len() == before {
        return Ok(Mutation::unchanged(false));
    }
    session_changed(doc, true)
}

/// Changes to a planned exercise; omitted fields are left as they are.
#[derive(Debug, Clone, Default)]
pub struct ExerciseChanges {
    pub done: Option<bool>,
    /// Replacement set list (weights in kg)
    pub sets: Option<Vec<Set>>,
    pub duration_minutes: Option<u32>,
    pub reps: Option<u32>,
}

/// Update a planned exercise's payload.
///
/// Identity fields (type, name, category) cannot change, and payload that
/// does not fit the category is dropped.
pub fn update_planned_exercise(
    doc: &mut UserDocument,
    exercise_id: &str,
    changes: ExerciseChanges,
) -> MutationResult<Option<PlannedExercise>> {
    let Some(existing) = doc.current_session.exercise_mut(exercise_id) else {
        return Ok(Mutation::unchanged(None));
    };

    if let Some(done) = changes.done {
        existing.done = done;
    }
    if let Some(mut sets) = changes.sets {
        // Set ids must stay unique within the exercise
        let mut seen = HashSet::new();
        for set in &mut sets {
            if set.id.is_empty() || seen.contains(&set.id) {
                set.id = new_id()?;
            }
            seen.insert(set.id.clone());
        }
        existing.sets = sets;
    }
    if changes.duration_minutes.is_some() {
        existing.duration_minutes = changes.duration_minutes;
    }
    if changes.reps.is_some() {
        existing.reps = changes.reps;
    }
    existing.normalize();
    let result = existing.clone();

    session_changed(doc, Some(result))
}

pub fn set_exercise_done(
    doc: &mut UserDocument,
    exercise_id: &str,
    done: bool,
) -> MutationResult<Option<PlannedExercise>> {
    let Some(existing) = doc.current_session.exercise_mut(exercise_id) else {
        return Ok(Mutation::unchanged(None));
    };
    existing.done = done;
    let result = existing.clone();

    session_changed(doc, Some(result))
}

fn strength_exercise<'a>(
    doc: &'a mut UserDocument,
    exercise_id: &str,
) -> Result<Option<&'a mut PlannedExercise>, AppError> {
    match doc.current_session.exercise_mut(exercise_id) {
        Some(exercise) if !exercise.category.is_strength() => Err(AppError::BadRequest(format!(
            "{} is a {} exercise and has no sets",
            exercise.name,
            exercise.category.label()
        ))),
        other => Ok(other),
    }
}

/// Append a set; `None` if the exercise is not planned.
pub fn add_set(
    doc: &mut UserDocument,
    exercise_id: &str,
    weight_kg: Option<f64>,
    reps: Option<u32>,
) -> MutationResult<Option<Set>> {
    let Some(exercise) = strength_exercise(doc, exercise_id)? else {
        return Ok(Mutation::unchanged(None));
    };

    let set = Set {
        id: new_id()?,
        weight: weight_kg,
        reps,
        done: false,
    };
    exercise.sets.push(set.clone());

    session_changed(doc, Some(set))
}

pub fn update_set(doc: &mut UserDocument, exercise_id: &str, updated: Set) -> MutationResult<Option<Set>> {
    let Some(exercise) = strength_exercise(doc, exercise_id)? else {
        return Ok(Mutation::unchanged(None));
    };
    let Some(set) = exercise.set_mut(&updated.id) else {
        return Ok(Mutation::unchanged(None));
    };
    *set = updated.clone();

    session_changed(doc, Some(updated))
}

pub fn remove_set(doc: &mut UserDocument, exercise_id: &str, set_id: &str) -> MutationResult<bool> {
    let Some(exercise) = strength_exercise(doc, exercise_id)? else {
        return Ok(Mutation::unchanged(false));
    };
    let before = exercise.sets.len();
    exercise.sets.retain(|s| s.id != set_id);
    if exercise.sets.len() == before {
        return Ok(Mutation::unchanged(false));
    }

    session_changed(doc, true)
}

// ─── Timers ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerAction {
    Start,
    Pause,
    Resume,
    Stop,
}

pub fn control_timer(
    doc: &mut UserDocument,
    action: TimerAction,
    now: DateTime<Utc>,
) -> MutationResult<SessionTimer> {
    let before = doc.current_session.timer.clone();
    let timer = &mut doc.current_session.timer;
    match action {
        TimerAction::Start => timer.start(now),
        TimerAction::Pause => timer.pause(now),
        TimerAction::Resume => timer.resume(now),
        TimerAction::Stop => timer.stop(now),
    }
    let after = timer.clone();

    if after == before {
        return Ok(Mutation::unchanged(after));
    }
    session_changed(doc, after)
}

/// Start the rest countdown; `None` uses the user's default rest time.
pub fn start_rest(
    doc: &mut UserDocument,
    seconds: Option<u32>,
    now: DateTime<Utc>,
) -> MutationResult<u32> {
    let seconds = seconds.unwrap_or(doc.settings.default_rest_secs);
    if seconds == 0 {
        return Err(AppError::BadRequest(
            "Rest time must be at least one second".to_string(),
        ));
    }
    doc.current_session.rest.start(seconds, now);
    session_changed(doc, seconds)
}

pub fn cancel_rest(doc: &mut UserDocument) -> MutationResult<()> {
    if !doc.current_session.rest.active {
        return Ok(Mutation::unchanged(()));
    }
    doc.current_session.rest.cancel();
    session_changed(doc, ())
}

// ─── Finishing ───────────────────────────────────────────────────

/// Close the session: append it to history, bump stats, refresh the
/// last-used snapshots and start over with an empty session.
pub fn finish_training(doc: &mut UserDocument, now: DateTime<Utc>) -> MutationResult<TrainingRecord> {
    if !doc.current_session.has_progress() {
        return Err(AppError::BadRequest(
            "Complete at least one strength set or one timed exercise before finishing"
                .to_string(),
        ));
    }

    let date = format_day(now);
    let record = TrainingRecord {
        id: new_id()?,
        date: date.clone(),
        duration_secs: doc.current_session.timer.elapsed_secs(now),
        exercises: doc.current_session.exercises.clone(),
    };

    let snapshots_changed = refresh_snapshots(doc, &record, &date);

    doc.history.push(record.clone());
    doc.stats.update_from_record(&record);
    doc.current_session = CurrentSession::default();

    let mut updates = vec![DocumentUpdate::array_union(fields::HISTORY, &record)?];
    updates.push(DocumentUpdate::increment(fields::STATS_TOTAL_TRAININGS, 1));
    let sets = record.completed_sets() as i64;
    if sets > 0 {
        updates.push(DocumentUpdate::increment(fields::STATS_COMPLETED_SETS, sets));
    }
    let timed = record.completed_timed() as i64;
    if timed > 0 {
        updates.push(DocumentUpdate::increment(fields::STATS_COMPLETED_TIMED, timed));
    }
    if snapshots_changed {
        updates.push(DocumentUpdate::set(
            fields::EXERCISE_TYPES,
            &doc.exercise_types,
        )?);
    }
    updates.push(session_update(doc)?);

    tracing::info!(
        user_id = %doc.user_id,
        record_id = %record.id,
        duration_secs = record.duration_secs,
        "Training finished"
    );

    Ok(Mutation::new(record, updates))
}

/// Copy what was done into each exercise type's last-used snapshot.
fn refresh_snapshots(doc: &mut UserDocument, record: &TrainingRecord, date: &str) -> bool {
    let mut changed = false;
    for exercise in record.exercises.iter().filter(|e| e.has_progress()) {
        let Some(ty) = doc
            .exercise_types
            .iter_mut()
            .find(|t| t.id == exercise.exercise_type_id)
        else {
            continue;
        };

        ty.last_used_date = Some(date.to_string());
        if exercise.category.is_strength() {
            ty.last_sets = exercise
                .sets
                .iter()
                .filter(|s| s.done)
                .map(|s| Set {
                    done: false,
                    ..s.clone()
                })
                .collect();
        } else {
            ty.last_duration_minutes = exercise.duration_minutes;
            ty.last_reps = exercise.reps;
        }
        changed = true;
    }
    changed
}

pub fn discard_session(doc: &mut UserDocument) -> MutationResult<()> {
    if doc.current_session == CurrentSession::default() {
        return Ok(Mutation::unchanged(()));
    }
    doc.current_session = CurrentSession::default();
    session_changed(doc, ())
}

// ─── History ─────────────────────────────────────────────────────

pub fn remove_training_record(doc: &mut UserDocument, record_id: &str) -> MutationResult<()> {
    let index = doc
        .history
        .iter()
        .position(|r| r.id == record_id)
        .ok_or_else(|| AppError::NotFound(format!("Training record {}", record_id)))?;
    let removed = doc.history.remove(index);

    let update = DocumentUpdate::array_remove(fields::HISTORY, &removed)?;
    Ok(Mutation::new((), vec![update]))
}

// ─── Templates ───────────────────────────────────────────────────

/// Copy exercises under fresh ids with execution state cleared.
fn fresh_copies(exercises: &[PlannedExercise]) -> Result<Vec<PlannedExercise>, AppError> {
    exercises
        .iter()
        .map(|exercise| {
            let mut copy = exercise.clone();
            copy.id = new_id()?;
            for set in &mut copy.sets {
                set.id = new_id()?;
            }
            copy.reset_progress();
            copy.normalize();
            Ok(copy)
        })
        .collect()
}

/// Save a template from `exercises`, or from the current session if `None`.
pub fn save_template(
    doc: &mut UserDocument,
    name: &str,
    exercises: Option<Vec<PlannedExercise>>,
) -> MutationResult<TrainingTemplate> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("Template name is required".to_string()));
    }

    let source = exercises.unwrap_or_else(|| doc.current_session.exercises.clone());
    if source.is_empty() {
        return Err(AppError::BadRequest(
            "A template needs at least one exercise".to_string(),
        ));
    }

    let template = TrainingTemplate {
        id: new_id()?,
        name: name.to_string(),
        exercises: fresh_copies(&source)?,
    };
    doc.templates.push(template.clone());

    let update = DocumentUpdate::array_union(fields::TEMPLATES, &template)?;
    Ok(Mutation::new(template, vec![update]))
}

pub fn remove_template(doc: &mut UserDocument, template_id: &str) -> MutationResult<()> {
    let index = doc
        .templates
        .iter()
        .position(|t| t.id == template_id)
        .ok_or_else(|| AppError::NotFound(format!("Template {}", template_id)))?;
    let removed = doc.templates.remove(index);

    let update = DocumentUpdate::array_remove(fields::TEMPLATES, &removed)?;
    Ok(Mutation::new((), vec![update]))
}

/// Start a new session from a template.
///
/// Refuses to overwrite a session that already has work done in it.
pub fn load_template(doc: &mut UserDocument, template_id: &str) -> MutationResult<CurrentSession> {
    let template = doc
        .templates
        .iter()
        .find(|t| t.id == template_id)
        .ok_or_else(|| AppError::NotFound(format!("Template {}", template_id)))?;

    if doc.current_session.has_progress() {
        return Err(AppError::Conflict(
            "Finish or discard the current session before loading a template".to_string(),
        ));
    }

    doc.current_session = CurrentSession {
        exercises: fresh_copies(&template.exercises)?,
        ..Default::default()
    };
    let session = doc.current_session.clone();
    session_changed(doc, session)
}

// ─── Settings ────────────────────────────────────────────────────

pub fn update_settings(doc: &mut UserDocument, settings: UserSettings) -> MutationResult<UserSettings> {
    if settings.default_rest_secs == 0 {
        return Err(AppError::BadRequest(
            "Default rest time must be at least one second".to_string(),
        ));
    }
    doc.settings = settings.clone();

    let update = DocumentUpdate::set(fields::SETTINGS, &settings)?;
    Ok(Mutation::new(settings, vec![update]))
}

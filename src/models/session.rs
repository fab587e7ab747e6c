// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! The active (unfinished) training session and its planned exercises.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::exercise::Category;
use crate::models::timer::{RestTimer, SessionTimer};

/// One set of a strength exercise.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Set {
    pub id: String,
    /// Weight in kilograms
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub reps: Option<u32>,
    #[serde(default)]
    pub done: bool,
}

impl Set {
    /// Volume lifted in this set (kg x reps), zero when either is unknown.
    pub fn volume(&self) -> f64 {
        match (self.weight, self.reps) {
            (Some(w), Some(r)) => w * r as f64,
            _ => 0.0,
        }
    }
}

/// An exercise scheduled within the current session.
///
/// Strength exercises carry `sets`; timed categories carry
/// `duration_minutes` and/or `reps`. [`PlannedExercise::normalize`] drops
/// whichever payload does not belong to the category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PlannedExercise {
    pub id: String,
    pub exercise_type_id: String,
    pub name: String,
    pub category: Category,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub sets: Vec<Set>,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    #[serde(default)]
    pub reps: Option<u32>,
}

impl PlannedExercise {
    pub fn normalize(&mut self) {
        if self.category.is_strength() {
            self.duration_minutes = None;
            self.reps = None;
        } else {
            self.sets.clear();
        }
    }

    /// Whether any work was actually performed.
    pub fn has_progress(&self) -> bool {
        if self.category.is_strength() {
            self.sets.iter().any(|s| s.done)
        } else {
            self.done
        }
    }

    pub fn completed_sets(&self) -> usize {
        self.sets.iter().filter(|s| s.done).count()
    }

    /// Clear execution state (done flags on the exercise and its sets).
    pub fn reset_progress(&mut self) {
        self.done = false;
        for set in &mut self.sets {
            set.done = false;
        }
    }

    pub fn set_mut(&mut self, set_id: &str) -> Option<&mut Set> {
        self.sets.iter_mut().find(|s| s.id == set_id)
    }
}

/// Session currently being planned or executed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CurrentSession {
    #[serde(default)]
    pub exercises: Vec<PlannedExercise>,
    #[serde(default)]
    pub timer: SessionTimer,
    #[serde(default)]
    pub rest: RestTimer,
}

impl CurrentSession {
    pub fn exercise_mut(&mut self, exercise_id: &str) -> Option<&mut PlannedExercise> {
        self.exercises.iter_mut().find(|e| e.id == exercise_id)
    }

    /// A session can only be finished once something was done.
    pub fn has_progress(&self) -> bool {
        self.exercises.iter().any(PlannedExercise::has_progress)
    }

    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty() && !self.timer.active
    }
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Finished training records and reusable templates.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::session::PlannedExercise;

/// Immutable result of a finished session, appended to history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TrainingRecord {
    pub id: String,
    /// Day of the session (YYYY-MM-DD)
    pub date: String,
    /// Session length in seconds, from the session timer
    #[serde(default)]
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub duration_secs: u64,
    pub exercises: Vec<PlannedExercise>,
}

impl TrainingRecord {
    pub fn completed_sets(&self) -> usize {
        self.exercises.iter().map(PlannedExercise::completed_sets).sum()
    }

    /// Timed (non-strength) exercises marked done.
    pub fn completed_timed(&self) -> usize {
        self.exercises
            .iter()
            .filter(|e| !e.category.is_strength() && e.done)
            .count()
    }

    /// Total kg lifted across done sets.
    pub fn volume(&self) -> f64 {
        self.exercises
            .iter()
            .flat_map(|e| e.sets.iter())
            .filter(|s| s.done)
            .map(|s| s.volume())
            .sum()
    }
}

/// Named exercise list without execution state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TrainingTemplate {
    pub id: String,
    pub name: String,
    pub exercises: Vec<PlannedExercise>,
}

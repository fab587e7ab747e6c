// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Exercise type definitions.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::session::Set;

/// How an exercise is measured.
///
/// Strength work is tracked as an ordered list of sets; every other
/// category is timed (duration and/or reps).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum Category {
    Strength,
    Cardio,
    Flexibility,
    Recovery,
}

impl Category {
    /// True for set-based categories.
    pub fn is_strength(&self) -> bool {
        matches!(self, Category::Strength)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Strength => "strength",
            Category::Cardio => "cardio",
            Category::Flexibility => "flexibility",
            Category::Recovery => "recovery",
        }
    }
}

/// Muscle groups used to tag exercise types.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum MuscleGroup {
    Chest,
    Shoulders,
    Triceps,
    Back,
    Biceps,
    Core,
    Glutes,
    Quads,
    Hamstrings,
    Calves,
    FullBody,
}

/// A user-defined kind of exercise.
///
/// The `last_*` fields hold a snapshot of the most recent finished session
/// that included this exercise and are used to pre-fill new plans.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ExerciseType {
    pub id: String,
    pub name: String,
    pub category: Category,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub muscle_groups: Vec<MuscleGroup>,
    /// Date of last use (YYYY-MM-DD)
    #[serde(default)]
    pub last_used_date: Option<String>,
    #[serde(default)]
    pub last_sets: Vec<Set>,
    #[serde(default)]
    pub last_duration_minutes: Option<u32>,
    #[serde(default)]
    pub last_reps: Option<u32>,
}

impl ExerciseType {
    pub fn new(
        id: String,
        name: String,
        category: Category,
        description: String,
        muscle_groups: Vec<MuscleGroup>,
    ) -> Self {
        Self {
            id,
            name,
            category,
            description,
            muscle_groups,
            last_used_date: None,
            last_sets: Vec::new(),
            last_duration_minutes: None,
            last_reps: None,
        }
    }

    /// Whether a previous session left a snapshot to pre-fill from.
    pub fn has_history(&self) -> bool {
        self.last_used_date.is_some()
    }
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod exercise;
pub mod record;
pub mod session;
pub mod stats;
pub mod timer;
pub mod user;

pub use exercise::{Category, ExerciseType, MuscleGroup};
pub use record::{TrainingRecord, TrainingTemplate};
pub use session::{CurrentSession, PlannedExercise, Set};
pub use stats::{StatsSummary, UserStats};
pub use timer::{RestTimer, SessionTimer};
pub use user::{Credentials, UserDocument, UserSettings};

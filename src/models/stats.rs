//! User statistics: running counters plus summaries derived from history.
//!
//! The counters live in the user document and are bumped with field
//! increments when a session finishes, so reading them is O(1). The
//! breakdowns in [`StatsSummary`] are computed from history on demand.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::{Category, TrainingRecord};

/// Counters stored at `users/{uid}.stats`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserStats {
    /// Finished sessions
    #[serde(default)]
    pub total_trainings: u32,
    /// Done sets across all strength exercises
    #[serde(default)]
    pub total_completed_sets: u32,
    /// Done cardio/flexibility/recovery exercises
    #[serde(default)]
    pub total_completed_timed: u32,
}

impl UserStats {
    /// Update counters with a newly finished record.
    pub fn update_from_record(&mut self, record: &TrainingRecord) {
        self.total_trainings += 1;
        self.total_completed_sets += record.completed_sets() as u32;
        self.total_completed_timed += record.completed_timed() as u32;
    }
}

/// Derived statistics for the stats view.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct StatsSummary {
    pub totals: UserStats,
    /// Total kg lifted in done sets
    pub total_volume_kg: f64,
    /// Total seconds spent in finished sessions
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub total_duration_secs: u64,
    /// Sessions per month ("YYYY-MM")
    pub trainings_by_month: HashMap<String, u32>,
    /// Exercises performed per category
    pub exercises_by_category: HashMap<String, u32>,
    /// How often each exercise type appears in history, keyed by name
    pub exercise_frequency: HashMap<String, u32>,
    /// Date of the most recent session
    pub last_training_date: Option<String>,
}

impl StatsSummary {
    pub fn from_history(totals: &UserStats, history: &[TrainingRecord]) -> Self {
        let mut summary = StatsSummary {
            totals: totals.clone(),
            ..Default::default()
        };

        for record in history {
            summary.total_volume_kg += record.volume();
            summary.total_duration_secs += record.duration_secs;

            if let Some(month) = record.date.get(0..7) {
                *summary
                    .trainings_by_month
                    .entry(month.to_string())
                    .or_insert(0) += 1;
            }

            for exercise in record.exercises.iter().filter(|e| e.has_progress()) {
                *summary
                    .exercises_by_category
                    .entry(category_key(exercise.category))
                    .or_insert(0) += 1;
                *summary
                    .exercise_frequency
                    .entry(exercise.name.clone())
                    .or_insert(0) += 1;
            }

            // Dates are YYYY-MM-DD, so string order is chronological
            if summary
                .last_training_date
                .as_deref()
                .map_or(true, |last| record.date.as_str() > last)
            {
                summary.last_training_date = Some(record.date.clone());
            }
        }

        summary
    }
}

fn category_key(category: Category) -> String {
    category.label().to_string()
}

//! User document and credential models for storage and API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::{CurrentSession, ExerciseType, TrainingRecord, TrainingTemplate, UserStats};
use crate::units::WeightUnit;

pub const DEFAULT_REST_SECS: u32 = 90;

/// Per-user preferences.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserSettings {
    #[serde(default)]
    pub weight_unit: WeightUnit,
    #[serde(default = "default_rest_secs")]
    pub default_rest_secs: u32,
}

fn default_rest_secs() -> u32 {
    DEFAULT_REST_SECS
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            weight_unit: WeightUnit::Kg,
            default_rest_secs: DEFAULT_REST_SECS,
        }
    }
}

/// The single document holding all of a user's data.
///
/// Stored at `users/{user_id}`. Top-level field names double as the
/// field paths used for incremental updates (see [`fields`]).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserDocument {
    pub user_id: String,
    pub email: String,
    pub created_at: String,
    #[serde(default)]
    pub settings: UserSettings,
    #[serde(default)]
    pub exercise_types: Vec<ExerciseType>,
    #[serde(default)]
    pub current_session: CurrentSession,
    #[serde(default)]
    pub history: Vec<TrainingRecord>,
    #[serde(default)]
    pub templates: Vec<TrainingTemplate>,
    #[serde(default)]
    pub stats: UserStats,
}

/// Field paths within [`UserDocument`].
pub mod fields {
    pub const SETTINGS: &str = "settings";
    pub const EXERCISE_TYPES: &str = "exercise_types";
    pub const CURRENT_SESSION: &str = "current_session";
    pub const HISTORY: &str = "history";
    pub const TEMPLATES: &str = "templates";
    pub const STATS_TOTAL_TRAININGS: &str = "stats.total_trainings";
    pub const STATS_COMPLETED_SETS: &str = "stats.total_completed_sets";
    pub const STATS_COMPLETED_TIMED: &str = "stats.total_completed_timed";
}

impl UserDocument {
    pub fn new(user_id: String, email: String, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            email,
            created_at: crate::time_utils::format_utc_rfc3339(now),
            settings: UserSettings::default(),
            exercise_types: Vec::new(),
            current_session: CurrentSession::default(),
            history: Vec::new(),
            templates: Vec::new(),
            stats: UserStats::default(),
        }
    }

    pub fn exercise_type(&self, id: &str) -> Option<&ExerciseType> {
        self.exercise_types.iter().find(|t| t.id == id)
    }
}

/// Login credentials, stored in `credentials/{hex(email)}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub user_id: String,
    pub email: String,
    /// PBKDF2-HMAC-SHA256 output (base64)
    pub password_hash: String,
    /// Random salt (base64)
    pub salt: String,
    pub iterations: u32,
    pub created_at: String,
}

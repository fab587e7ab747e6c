// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session (elapsed) and rest (countdown) timers.
//!
//! Both timers are stored as timestamps rather than ticking counters, so
//! every read takes the current time and derives the value from it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::time_utils::format_hms;

/// Elapsed-time timer for the whole session.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SessionTimer {
    /// Start of the currently running segment
    #[serde(default)]
    #[cfg_attr(feature = "binding-generation", ts(type = "string | null"))]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub paused: bool,
    #[serde(default)]
    pub active: bool,
    /// Seconds accumulated by segments that already ended
    #[serde(default)]
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub accumulated_secs: u64,
}

impl SessionTimer {
    pub fn start(&mut self, now: DateTime<Utc>) {
        self.started_at = Some(now);
        self.paused = false;
        self.active = true;
        self.accumulated_secs = 0;
    }

    pub fn pause(&mut self, now: DateTime<Utc>) {
        if !self.active || self.paused {
            return;
        }
        self.accumulated_secs += self.running_secs(now);
        self.started_at = None;
        self.paused = true;
    }

    pub fn resume(&mut self, now: DateTime<Utc>) {
        if !self.active || !self.paused {
            return;
        }
        self.started_at = Some(now);
        self.paused = false;
    }

    /// Stop the timer, keeping the accumulated time.
    pub fn stop(&mut self, now: DateTime<Utc>) {
        self.accumulated_secs += self.running_secs(now);
        self.started_at = None;
        self.paused = false;
        self.active = false;
    }

    pub fn elapsed_secs(&self, now: DateTime<Utc>) -> u64 {
        self.accumulated_secs + self.running_secs(now)
    }

    /// Elapsed time as `HH:MM:SS`.
    pub fn display(&self, now: DateTime<Utc>) -> String {
        format_hms(self.elapsed_secs(now))
    }

    fn running_secs(&self, now: DateTime<Utc>) -> u64 {
        match self.started_at {
            Some(start) if self.active && !self.paused => {
                (now - start).num_seconds().max(0) as u64
            }
            _ => 0,
        }
    }
}

/// Countdown between sets.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RestTimer {
    #[serde(default)]
    pub duration_secs: u32,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    #[cfg_attr(feature = "binding-generation", ts(type = "string | null"))]
    pub started_at: Option<DateTime<Utc>>,
}

impl RestTimer {
    pub fn start(&mut self, duration_secs: u32, now: DateTime<Utc>) {
        self.duration_secs = duration_secs;
        self.active = true;
        self.started_at = Some(now);
    }

    pub fn cancel(&mut self) {
        self.active = false;
        self.started_at = None;
    }

    /// Seconds left, saturating at zero.
    pub fn remaining_secs(&self, now: DateTime<Utc>) -> u32 {
        match self.started_at {
            Some(start) if self.active => {
                let spent = (now - start).num_seconds().max(0);
                (self.duration_secs as i64 - spent).max(0) as u32
            }
            _ => 0,
        }
    }

    pub fn is_finished(&self, now: DateTime<Utc>) -> bool {
        self.active && self.remaining_secs(now) == 0
    }
}

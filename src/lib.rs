// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout Tracker: plan strength and timed training sessions
//!
//! This crate provides the backend API for logging workouts. Each user's
//! exercise library, current session, history and templates live in one
//! document that is kept in sync with the document store.

pub mod config;
pub mod db;
pub mod error;
pub mod ids;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;
pub mod units;

use config::Config;
use services::WorkoutStore;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub store: WorkoutStore,
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod auth;
pub mod store;
pub mod workout;

pub use store::WorkoutStore;
pub use workout::Mutation;

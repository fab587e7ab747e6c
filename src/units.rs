// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Weight unit conversion. Weights are always stored in kilograms.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub const KG_TO_LB: f64 = 2.20462;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum WeightUnit {
    #[default]
    Kg,
    Lb,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn lb_to_kg(lb: f64) -> f64 {
    round2(lb / KG_TO_LB)
}

/// Convert a weight entered in `unit` to kilograms.
pub fn to_kg(value: f64, unit: WeightUnit) -> f64 {
    match unit {
        WeightUnit::Kg => value,
        WeightUnit::Lb => lb_to_kg(value),
    }
}

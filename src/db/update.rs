// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Incremental document updates.
//!
//! A [`DocumentUpdate`] describes a change to one field of a user document
//! without rewriting the rest of it. The Firestore backend turns these into
//! field masks and server-side transforms; the memory backend applies them
//! to a JSON document with the same semantics:
//!
//! - `ArrayUnion` appends the value only if no equal element is present.
//! - `ArrayRemove` removes every element equal to the value.
//! - `Increment` adds to a number, treating a missing field as zero.
//! - A non-array (or non-numeric) field targeted by an array (or increment)
//!   transform is replaced, as Firestore does.

use anyhow::anyhow;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::AppError;

#[derive(Debug, Clone, PartialEq)]
pub enum DocumentUpdate {
    Set { field: &'static str, value: Value },
    ArrayUnion { field: &'static str, value: Value },
    ArrayRemove { field: &'static str, value: Value },
    Increment { field: &'static str, by: i64 },
}

fn to_value<T: Serialize>(value: &T) -> Result<Value, AppError> {
    serde_json::to_value(value)
        .map_err(|e| AppError::Internal(anyhow!("Failed to serialize update: {}", e)))
}

impl DocumentUpdate {
    pub fn set<T: Serialize>(field: &'static str, value: &T) -> Result<Self, AppError> {
        Ok(DocumentUpdate::Set {
            field,
            value: to_value(value)?,
        })
    }

    pub fn array_union<T: Serialize>(field: &'static str, value: &T) -> Result<Self, AppError> {
        Ok(DocumentUpdate::ArrayUnion {
            field,
            value: to_value(value)?,
        })
    }

    pub fn array_remove<T: Serialize>(field: &'static str, value: &T) -> Result<Self, AppError> {
        Ok(DocumentUpdate::ArrayRemove {
            field,
            value: to_value(value)?,
        })
    }

    pub fn increment(field: &'static str, by: i64) -> Self {
        DocumentUpdate::Increment { field, by }
    }

    pub fn field(&self) -> &'static str {
        match self {
            DocumentUpdate::Set { field, .. }
            | DocumentUpdate::ArrayUnion { field, .. }
            | DocumentUpdate::ArrayRemove { field, .. }
            | DocumentUpdate::Increment { field, .. } => field,
        }
    }

    /// Apply this update to a JSON document in place.
    pub fn apply(&self, doc: &mut Value) -> Result<(), AppError> {
        let target = field_mut(doc, self.field())?;

        match self {
            DocumentUpdate::Set { value, .. } => {
                *target = value.clone();
            }
            DocumentUpdate::ArrayUnion { value, .. } => match target {
                Value::Array(items) => {
                    if !items.contains(value) {
                        items.push(value.clone());
                    }
                }
                other => *other = Value::Array(vec![value.clone()]),
            },
            DocumentUpdate::ArrayRemove { value, .. } => match target {
                Value::Array(items) => items.retain(|item| item != value),
                other => *other = Value::Array(Vec::new()),
            },
            DocumentUpdate::Increment { by, .. } => {
                let next = match target {
                    Value::Number(n) if n.is_i64() || n.is_u64() => {
                        Value::from(n.as_i64().unwrap_or(i64::MAX).saturating_add(*by))
                    }
                    Value::Number(n) => Value::from(n.as_f64().unwrap_or(0.0) + *by as f64),
                    _ => Value::from(*by),
                };
                *target = next;
            }
        }

        Ok(())
    }
}

/// Apply a batch of updates in order.
pub fn apply_all(doc: &mut Value, updates: &[DocumentUpdate]) -> Result<(), AppError> {
    for update in updates {
        update.apply(doc)?;
    }
    Ok(())
}

/// Build `{a: {b: value}}` for the dotted path `a.b`.
pub fn nest(path: &str, value: Value) -> Value {
    path.rsplit('.').fold(value, |inner, segment| {
        let mut map = Map::new();
        map.insert(segment.to_string(), inner);
        Value::Object(map)
    })
}

/// Walk a dotted field path, creating (or replacing) intermediate objects.
fn field_mut<'a>(doc: &'a mut Value, path: &str) -> Result<&'a mut Value, AppError> {
    let mut current = doc;
    for segment in path.split('.') {
        if !current.is_object() {
            *current = Value::Object(Map::new());
        }
        current = current
            .as_object_mut()
            .ok_or_else(|| AppError::Internal(anyhow!("Field path {} is not an object", path)))?
            .entry(segment)
            .or_insert(Value::Null);
    }
    Ok(current)
}

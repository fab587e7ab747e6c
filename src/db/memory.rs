// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process document store.
//!
//! Documents are kept as JSON values so that incremental updates go through
//! exactly the same code path ([`DocumentUpdate::apply`]) as they would
//! against a schemaless remote store.

use anyhow::anyhow;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde_json::Value;
use std::sync::Arc;

use crate::db::update::{apply_all, DocumentUpdate};
use crate::error::AppError;
use crate::models::{Credentials, UserDocument};

#[derive(Clone, Default)]
pub struct MemoryDb {
    users: Arc<DashMap<String, Value>>,
    credentials: Arc<DashMap<String, Credentials>>,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_user_document(&self, user_id: &str) -> Result<Option<UserDocument>, AppError> {
        let Some(doc) = self.users.get(user_id) else {
            return Ok(None);
        };
        serde_json::from_value(doc.value().clone())
            .map(Some)
            .map_err(|e| AppError::Database(format!("Corrupt user document: {}", e)))
    }

    pub fn set_user_document(&self, doc: &UserDocument) -> Result<(), AppError> {
        let value = serde_json::to_value(doc)
            .map_err(|e| AppError::Internal(anyhow!("Failed to serialize document: {}", e)))?;
        self.users.insert(doc.user_id.clone(), value);
        Ok(())
    }

    pub fn apply_updates(&self, user_id: &str, updates: &[DocumentUpdate]) -> Result<(), AppError> {
        let mut doc = self
            .users
            .get_mut(user_id)
            .ok_or_else(|| AppError::NotFound(format!("User document {}", user_id)))?;

        // All or nothing, like a remote transaction
        let mut updated = doc.value().clone();
        apply_all(&mut updated, updates)?;
        *doc.value_mut() = updated;
        Ok(())
    }

    pub fn delete_user_document(&self, user_id: &str) {
        self.users.remove(user_id);
    }

    /// Raw JSON for a user document, as the store holds it.
    pub fn raw_user_document(&self, user_id: &str) -> Option<Value> {
        self.users.get(user_id).map(|doc| doc.value().clone())
    }

    pub fn get_credentials(&self, key: &str) -> Option<Credentials> {
        self.credentials.get(key).map(|c| c.value().clone())
    }

    /// Insert credentials unless the key is already taken.
    pub fn insert_credentials(&self, key: &str, credentials: &Credentials) -> Result<(), AppError> {
        match self.credentials.entry(key.to_string()) {
            Entry::Occupied(_) => Err(AppError::Conflict("Email already registered".to_string())),
            Entry::Vacant(slot) => {
                slot.insert(credentials.clone());
                Ok(())
            }
        }
    }

    pub fn delete_credentials(&self, key: &str) {
        self.credentials.remove(key);
    }
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Central store for user documents.
//!
//! Holds an in-memory copy of each active user's document and funnels every
//! change through [`WorkoutStore::mutate`], which:
//! 1. Serializes writers per user (per-user mutex)
//! 2. Applies the mutation to a working copy of the cached document
//! 3. Pushes the resulting incremental updates to the document store
//! 4. Publishes the working copy as the new cached state
//!
//! If the push fails the cache entry is dropped, so the next read reloads
//! whatever the remote document actually holds.

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::db::DocumentDb;
use crate::error::AppError;
use crate::models::UserDocument;
use crate::services::workout::Mutation;

/// Shared document cache type.
pub type DocumentCache = Arc<DashMap<String, UserDocument>>;

/// Shared per-user write locks.
pub type UserLocks = Arc<DashMap<String, Arc<Mutex<()>>>>;

#[derive(Clone)]
pub struct WorkoutStore {
    db: DocumentDb,
    cache: DocumentCache,
    locks: UserLocks,
}

impl WorkoutStore {
    pub fn new(db: DocumentDb) -> Self {
        Self {
            db,
            cache: Arc::new(DashMap::new()),
            locks: Arc::new(DashMap::new()),
        }
    }

    pub fn db(&self) -> &DocumentDb {
        &self.db
    }

    fn lock_for(&self, user_id: &str) -> Arc<Mutex<()>> {
        self.locks
            .entry(user_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Current state of a user's document.
    pub async fn load(&self, user_id: &str) -> Result<UserDocument, AppError> {
        if let Some(doc) = self.cache.get(user_id) {
            return Ok(doc.clone());
        }

        let lock = self.lock_for(user_id);
        let _guard = lock.lock().await;
        self.load_locked(user_id).await
    }

    /// Load with the user's lock already held.
    async fn load_locked(&self, user_id: &str) -> Result<UserDocument, AppError> {
        // A writer may have filled the cache while we waited
        if let Some(doc) = self.cache.get(user_id) {
            return Ok(doc.clone());
        }

        let doc = self
            .db
            .get_user_document(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {}", user_id)))?;

        tracing::debug!(user_id, "User document loaded into cache");
        self.cache.insert(user_id.to_string(), doc.clone());
        Ok(doc)
    }

    /// Apply a mutation locally and push its updates to the remote document.
    pub async fn mutate<T, F>(&self, user_id: &str, mutation: F) -> Result<T, AppError>
    where
        F: FnOnce(&mut UserDocument) -> Result<Mutation<T>, AppError>,
    {
        let lock = self.lock_for(user_id);
        let _guard = lock.lock().await;

        let mut working = self.load_locked(user_id).await?;
        let Mutation { output, updates } = mutation(&mut working)?;

        if updates.is_empty() {
            return Ok(output);
        }

        if let Err(e) = self.db.apply_updates(user_id, &updates).await {
            tracing::warn!(user_id, error = %e, "Remote update failed, dropping cached document");
            self.cache.remove(user_id);
            return Err(e);
        }

        tracing::debug!(user_id, updates = updates.len(), "User document mutated");
        self.cache.insert(user_id.to_string(), working);
        Ok(output)
    }

    /// Drop everything held for a user (account deletion, logout).
    pub fn forget(&self, user_id: &str) {
        self.cache.remove(user_id);
        self.locks.remove(user_id);
    }

    /// Delete a user's document and credentials.
    pub async fn delete_user(&self, user_id: &str) -> Result<(), AppError> {
        let lock = self.lock_for(user_id);
        let _guard = lock.lock().await;

        let doc = self.load_locked(user_id).await?;
        self.db.delete_credentials(&doc.email).await?;
        self.db.delete_user_document(user_id).await?;
        self.cache.remove(user_id);

        tracing::info!(user_id, "User data deletion complete");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DocumentUpdate;
    use crate::models::user::fields;
    use chrono::Utc;

    async fn store_with_user() -> WorkoutStore {
        let db = DocumentDb::new_memory();
        db.set_user_document(&UserDocument::new(
            "u1".into(),
            "a@example.com".into(),
            Utc::now(),
        ))
        .await
        .unwrap();
        WorkoutStore::new(db)
    }

    #[tokio::test]
    async fn test_mutation_updates_cache_and_remote() {
        let store = store_with_user().await;

        let total = store
            .mutate("u1", |doc| {
                doc.stats.total_trainings += 1;
                Ok(Mutation::new(
                    doc.stats.total_trainings,
                    vec![DocumentUpdate::increment(fields::STATS_TOTAL_TRAININGS, 1)],
                ))
            })
            .await
            .unwrap();
        assert_eq!(total, 1);

        assert_eq!(store.load("u1").await.unwrap().stats.total_trainings, 1);
        let remote = store.db().get_user_document("u1").await.unwrap().unwrap();
        assert_eq!(remote.stats.total_trainings, 1);
    }

    #[tokio::test]
    async fn test_failed_mutation_leaves_cache_untouched() {
        let store = store_with_user().await;
        store.load("u1").await.unwrap();

        let result: Result<(), AppError> = store
            .mutate("u1", |doc| {
                doc.stats.total_trainings = 99;
                Err(AppError::BadRequest("nope".into()))
            })
            .await;
        assert!(result.is_err());
        assert_eq!(store.load("u1").await.unwrap().stats.total_trainings, 0);
    }

    #[tokio::test]
    async fn test_push_failure_drops_cache_entry() {
        let store = store_with_user().await;
        store.load("u1").await.unwrap();
        // Remote document disappears behind the cache's back
        store.db().delete_user_document("u1").await.unwrap();

        let result = store
            .mutate("u1", |doc| {
                doc.stats.total_trainings += 1;
                Ok(Mutation::new(
                    (),
                    vec![DocumentUpdate::increment(fields::STATS_TOTAL_TRAININGS, 1)],
                ))
            })
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert!(matches!(store.load("u1").await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_concurrent_mutations_are_serialized() {
        let store = store_with_user().await;

        let handles: Vec<_> = (0..20)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move {
                    store
                        .mutate("u1", |doc| {
                            doc.stats.total_completed_sets += 1;
                            Ok(Mutation::new(
                                (),
                                vec![DocumentUpdate::increment(fields::STATS_COMPLETED_SETS, 1)],
                            ))
                        })
                        .await
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(store.load("u1").await.unwrap().stats.total_completed_sets, 20);
        let remote = store.db().get_user_document("u1").await.unwrap().unwrap();
        assert_eq!(remote.stats.total_completed_sets, 20);
    }

    #[tokio::test]
    async fn test_delete_user_removes_document() {
        let store = store_with_user().await;
        store.delete_user("u1").await.unwrap();
        assert!(store.db().get_user_document("u1").await.unwrap().is_none());
        assert!(matches!(store.load("u1").await, Err(AppError::NotFound(_))));
    }
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - User documents (all workout data, one document per user)
//! - Credentials (login records keyed by email)
//!
//! Incremental updates are committed in a single transaction so that a
//! store mutation lands on the remote document all-or-nothing.

use crate::db::collections;
use crate::db::update::{nest, DocumentUpdate};
use crate::error::AppError;
use crate::models::{Credentials, UserDocument};
use firestore::errors::FirestoreError;
use firestore::FirestoreWritePrecondition;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreClient {
    client: firestore::FirestoreDb,
}

impl FirestoreClient {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // Talk to the emulator without credentials
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self { client })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self { client })
    }

    // ─── User Document Operations ────────────────────────────────

    pub async fn get_user_document(&self, user_id: &str) -> Result<Option<UserDocument>, AppError> {
        self.client
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(user_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Write a whole user document (account creation only).
    pub async fn set_user_document(&self, doc: &UserDocument) -> Result<(), AppError> {
        let _: () = self
            .client
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(&doc.user_id)
            .object(doc)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Apply incremental updates to a user document atomically.
    ///
    /// `Set` becomes a masked field write; the array and counter updates
    /// become server-side transforms, so untouched fields are never sent.
    pub async fn apply_updates(
        &self,
        user_id: &str,
        updates: &[DocumentUpdate],
    ) -> Result<(), AppError> {
        if updates.is_empty() {
            return Ok(());
        }

        let mut transaction = self
            .client
            .begin_transaction()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        for update in updates {
            let field = update.field();
            let builder = self
                .client
                .fluent()
                .update();

            let added = match update {
                DocumentUpdate::Set { value, .. } => builder
                    .fields([field])
                    .in_col(collections::USERS)
                    .precondition(FirestoreWritePrecondition::Exists(true))
                    .document_id(user_id)
                    .object(&nest(field, value.clone()))
                    .add_to_transaction(&mut transaction),
                DocumentUpdate::ArrayUnion { value, .. } => builder
                    .in_col(collections::USERS)
                    .precondition(FirestoreWritePrecondition::Exists(true))
                    .document_id(user_id)
                    .transforms(|t| t.fields([t.field(field).append_missing_elements([value])]))
                    .only_transform()
                    .add_to_transaction(&mut transaction),
                DocumentUpdate::ArrayRemove { value, .. } => builder
                    .in_col(collections::USERS)
                    .precondition(FirestoreWritePrecondition::Exists(true))
                    .document_id(user_id)
                    .transforms(|t| t.fields([t.field(field).remove_all_from_array([value])]))
                    .only_transform()
                    .add_to_transaction(&mut transaction),
                DocumentUpdate::Increment { by, .. } => builder
                    .in_col(collections::USERS)
                    .precondition(FirestoreWritePrecondition::Exists(true))
                    .document_id(user_id)
                    .transforms(|t| t.fields([t.field(field).increment(*by)]))
                    .only_transform()
                    .add_to_transaction(&mut transaction),
            };

            added.map_err(|e| {
                AppError::Database(format!(
                    "Failed to add update of {} to transaction: {}",
                    field, e
                ))
            })?;
        }

        // A failed exists precondition means the document is gone
        transaction.commit().await.map_err(|e| match e {
            FirestoreError::DataNotFoundError(_) => {
                AppError::NotFound(format!("User document {}", user_id))
            }
            e => AppError::Database(format!("Transaction commit failed: {}", e)),
        })?;

        tracing::debug!(user_id, count = updates.len(), "User document updated");
        Ok(())
    }

    pub async fn delete_user_document(&self, user_id: &str) -> Result<(), AppError> {
        self.client
            .fluent()
            .delete()
            .from(collections::USERS)
            .document_id(user_id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Credential Operations ───────────────────────────────────

    pub async fn get_credentials(&self, key: &str) -> Result<Option<Credentials>, AppError> {
        self.client
            .fluent()
            .select()
            .by_id_in(collections::CREDENTIALS)
            .obj()
            .one(key)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create credentials; fails with `Conflict` if the email is taken.
    pub async fn insert_credentials(
        &self,
        key: &str,
        credentials: &Credentials,
    ) -> Result<(), AppError> {
        if self.get_credentials(key).await?.is_some() {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }

        let _: () = self
            .client
            .fluent()
            .insert()
            .into(collections::CREDENTIALS)
            .document_id(key)
            .object(credentials)
            .execute()
            .await
            .map_err(insert_error)?;
        Ok(())
    }

    pub async fn delete_credentials(&self, key: &str) -> Result<(), AppError> {
        self.client
            .fluent()
            .delete()
            .from(collections::CREDENTIALS)
            .document_id(key)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}

/// A concurrent registration can win between the lookup and the insert.
fn insert_error(e: FirestoreError) -> AppError {
    match e {
        FirestoreError::DataConflictError(_) => {
            AppError::Conflict("Email already registered".to_string())
        }
        e => AppError::Database(e.to_string()),
    }
}

//! Database layer (Firestore or in-process memory).

pub mod firestore;
pub mod memory;
pub mod update;

pub use firestore::FirestoreClient;
pub use memory::MemoryDb;
pub use update::DocumentUpdate;

use crate::config::{Config, StoreBackend};
use crate::error::AppError;
use crate::models::{Credentials, UserDocument};

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    pub const CREDENTIALS: &str = "credentials";
}

#[derive(Clone)]
enum Backend {
    Firestore(FirestoreClient),
    Memory(MemoryDb),
    Offline,
}

/// Handle to the remote document store.
#[derive(Clone)]
pub struct DocumentDb {
    backend: Backend,
}

impl DocumentDb {
    /// Connect to the backend selected in the config.
    pub async fn connect(config: &Config) -> Result<Self, AppError> {
        match config.store_backend {
            StoreBackend::Firestore => Ok(Self {
                backend: Backend::Firestore(FirestoreClient::new(&config.gcp_project_id).await?),
            }),
            StoreBackend::Memory => {
                tracing::warn!("Using in-memory document store; data is lost on restart");
                Ok(Self::new_memory())
            }
        }
    }

    pub fn new_memory() -> Self {
        Self {
            backend: Backend::Memory(MemoryDb::new()),
        }
    }

    /// Create a mock client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self {
            backend: Backend::Offline,
        }
    }

    /// The memory backend, when in use.
    pub fn memory(&self) -> Option<&MemoryDb> {
        match &self.backend {
            Backend::Memory(db) => Some(db),
            _ => None,
        }
    }

    fn offline() -> AppError {
        AppError::Database("Database not connected (offline mode)".to_string())
    }

    // ─── User Documents ──────────────────────────────────────────

    pub async fn get_user_document(&self, user_id: &str) -> Result<Option<UserDocument>, AppError> {
        match &self.backend {
            Backend::Firestore(db) => db.get_user_document(user_id).await,
            Backend::Memory(db) => db.get_user_document(user_id),
            Backend::Offline => Err(Self::offline()),
        }
    }

    pub async fn set_user_document(&self, doc: &UserDocument) -> Result<(), AppError> {
        match &self.backend {
            Backend::Firestore(db) => db.set_user_document(doc).await,
            Backend::Memory(db) => db.set_user_document(doc),
            Backend::Offline => Err(Self::offline()),
        }
    }

    pub async fn apply_updates(
        &self,
        user_id: &str,
        updates: &[DocumentUpdate],
    ) -> Result<(), AppError> {
        match &self.backend {
            Backend::Firestore(db) => db.apply_updates(user_id, updates).await,
            Backend::Memory(db) => db.apply_updates(user_id, updates),
            Backend::Offline => Err(Self::offline()),
        }
    }

    pub async fn delete_user_document(&self, user_id: &str) -> Result<(), AppError> {
        match &self.backend {
            Backend::Firestore(db) => db.delete_user_document(user_id).await,
            Backend::Memory(db) => {
                db.delete_user_document(user_id);
                Ok(())
            }
            Backend::Offline => Err(Self::offline()),
        }
    }

    // ─── Credentials ─────────────────────────────────────────────

    pub async fn get_credentials(&self, email: &str) -> Result<Option<Credentials>, AppError> {
        let key = credentials_key(email);
        match &self.backend {
            Backend::Firestore(db) => db.get_credentials(&key).await,
            Backend::Memory(db) => Ok(db.get_credentials(&key)),
            Backend::Offline => Err(Self::offline()),
        }
    }

    pub async fn insert_credentials(&self, credentials: &Credentials) -> Result<(), AppError> {
        let key = credentials_key(&credentials.email);
        match &self.backend {
            Backend::Firestore(db) => db.insert_credentials(&key, credentials).await,
            Backend::Memory(db) => db.insert_credentials(&key, credentials),
            Backend::Offline => Err(Self::offline()),
        }
    }

    pub async fn delete_credentials(&self, email: &str) -> Result<(), AppError> {
        let key = credentials_key(email);
        match &self.backend {
            Backend::Firestore(db) => db.delete_credentials(&key).await,
            Backend::Memory(db) => {
                db.delete_credentials(&key);
                Ok(())
            }
            Backend::Offline => Err(Self::offline()),
        }
    }
}

/// Document ID for an email: hex keeps `/` and `.` out of the ID.
pub fn credentials_key(email: &str) -> String {
    hex::encode(email.trim().to_lowercase())
}

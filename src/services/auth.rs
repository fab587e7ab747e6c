// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Email/password identity: registration, login and password hashing.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Utc};
use ring::pbkdf2;
use serde::Deserialize;
use std::num::NonZeroU32;
use validator::Validate;

use crate::db::DocumentDb;
use crate::error::AppError;
use crate::ids::{new_id, random_bytes};
use crate::models::{Credentials, UserDocument};
use crate::time_utils::format_utc_rfc3339;

pub const DEFAULT_PBKDF2_ITERATIONS: u32 = 100_000;
const SALT_LEN: usize = 16;
const HASH_LEN: usize = 32;
static PBKDF2_ALG: pbkdf2::Algorithm = pbkdf2::PBKDF2_HMAC_SHA256;

/// Signup form.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub confirm_password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

fn iterations(n: u32) -> Result<NonZeroU32, AppError> {
    NonZeroU32::new(n)
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("PBKDF2 iterations must be non-zero")))
}

/// Hash a password with a fresh salt. Returns `(salt, hash)`, base64 encoded.
pub fn hash_password(password: &str, rounds: u32) -> Result<(String, String), AppError> {
    let mut salt = [0u8; SALT_LEN];
    random_bytes(&mut salt)?;

    let mut hash = [0u8; HASH_LEN];
    pbkdf2::derive(
        PBKDF2_ALG,
        iterations(rounds)?,
        &salt,
        password.as_bytes(),
        &mut hash,
    );

    Ok((STANDARD.encode(salt), STANDARD.encode(hash)))
}

/// Constant-time check of a password against stored credentials.
pub fn verify_password(password: &str, credentials: &Credentials) -> bool {
    let (Ok(salt), Ok(hash)) = (
        STANDARD.decode(&credentials.salt),
        STANDARD.decode(&credentials.password_hash),
    ) else {
        return false;
    };
    let Some(rounds) = NonZeroU32::new(credentials.iterations) else {
        return false;
    };

    pbkdf2::verify(PBKDF2_ALG, rounds, &salt, password.as_bytes(), &hash).is_ok()
}

/// Create credentials and an empty user document.
pub async fn register(
    db: &DocumentDb,
    request: &RegisterRequest,
    rounds: u32,
    now: DateTime<Utc>,
) -> Result<UserDocument, AppError> {
    request.validate()?;

    let email = request.email.trim().to_lowercase();
    let user_id = new_id()?;
    let (salt, password_hash) = hash_password(&request.password, rounds)?;

    let credentials = Credentials {
        user_id: user_id.clone(),
        email: email.clone(),
        password_hash,
        salt,
        iterations: rounds,
        created_at: format_utc_rfc3339(now),
    };
    db.insert_credentials(&credentials).await?;

    let doc = UserDocument::new(user_id, email, now);
    if let Err(e) = db.set_user_document(&doc).await {
        // Don't leave a login pointing at a missing document
        if let Err(cleanup) = db.delete_credentials(&credentials.email).await {
            tracing::error!(error = %cleanup, "Failed to roll back credentials");
        }
        return Err(e);
    }

    tracing::info!(user_id = %doc.user_id, "User registered");
    Ok(doc)
}

/// Check email and password, returning the stored credentials.
pub async fn login(db: &DocumentDb, request: &LoginRequest) -> Result<Credentials, AppError> {
    let credentials = db
        .get_credentials(&request.email)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if !verify_password(&request.password, &credentials) {
        tracing::warn!(user_id = %credentials.user_id, "Failed login attempt");
        return Err(AppError::InvalidCredentials);
    }

    Ok(credentials)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds(password: &str) -> Credentials {
        let (salt, password_hash) = hash_password(password, 1_000).unwrap();
        Credentials {
            user_id: "u1".into(),
            email: "a@example.com".into(),
            password_hash,
            salt,
            iterations: 1_000,
            created_at: "2026-01-01T00:00:00Z".into(),
        }
    }

    #[test]
    fn test_password_roundtrip() {
        let stored = creds("hunter22");
        assert!(verify_password("hunter22", &stored));
        assert!(!verify_password("hunter23", &stored));
    }

    #[test]
    fn test_corrupt_credentials_never_verify() {
        let mut stored = creds("hunter22");
        stored.salt = "!!not base64!!".into();
        assert!(!verify_password("hunter22", &stored));

        let mut stored = creds("hunter22");
        stored.iterations = 0;
        assert!(!verify_password("hunter22", &stored));
    }

    #[test]
    fn test_register_request_validation() {
        let ok = RegisterRequest {
            email: "a@example.com".into(),
            password: "secret1".into(),
            confirm_password: "secret1".into(),
        };
        assert!(ok.validate().is_ok());

        let short = RegisterRequest {
            password: "abc".into(),
            confirm_password: "abc".into(),
            ..ok.clone()
        };
        assert!(short.validate().is_err());

        let mismatch = RegisterRequest {
            confirm_password: "secret2".into(),
            ..ok.clone()
        };
        assert!(mismatch.validate().is_err());

        let bad_email = RegisterRequest {
            email: "not-an-email".into(),
            ..ok.clone()
        };
        assert!(bad_email.validate().is_err());
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let db = DocumentDb::new_memory();
        let request = RegisterRequest {
            email: "Lifter@Example.com".into(),
            password: "secret1".into(),
            confirm_password: "secret1".into(),
        };
        let doc = register(&db, &request, 1_000, Utc::now()).await.unwrap();
        assert_eq!(doc.email, "lifter@example.com");
        assert!(db.get_user_document(&doc.user_id).await.unwrap().is_some());

        let again = register(&db, &request, 1_000, Utc::now()).await;
        assert!(matches!(again, Err(AppError::Conflict(_))));

        let creds = login(
            &db,
            &LoginRequest {
                email: "lifter@example.com".into(),
                password: "secret1".into(),
            },
        )
        .await
        .unwrap();
        assert_eq!(creds.user_id, doc.user_id);

        let wrong = login(
            &db,
            &LoginRequest {
                email: "lifter@example.com".into(),
                password: "secret2".into(),
            },
        )
        .await;
        assert!(matches!(wrong, Err(AppError::InvalidCredentials)));
    }
}

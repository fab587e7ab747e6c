// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore integration tests.
//!
//! These tests require the Firestore emulator to be running
//! (`FIRESTORE_EMULATOR_HOST` set). They check that the incremental
//! updates produced by each mutation leave the stored document identical
//! to the in-memory copy.

use chrono::{TimeZone, Utc};
use workout_tracker::db::DocumentUpdate;
use workout_tracker::error::AppError;
use workout_tracker::models::user::fields;
use workout_tracker::models::{Category, Credentials, UserDocument, UserSettings};
use workout_tracker::services::workout::{self, NewExerciseType, PlanParams};
use workout_tracker::services::WorkoutStore;

mod common;
use common::test_db;

/// Generate a unique user ID for test isolation.
fn unique_user_id() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("test-{nanos}")
}

fn test_document(user_id: &str) -> UserDocument {
    let now = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
    UserDocument::new(user_id.to_string(), format!("{user_id}@example.com"), now)
}

// ═══════════════════════════════════════════════════════════════════════════
// DOCUMENT TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_user_document_crud() {
    require_emulator!();

    let db = test_db().await;
    let user_id = unique_user_id();

    let before = db.get_user_document(&user_id).await.unwrap();
    assert!(before.is_none(), "Document should not exist before creation");

    let doc = test_document(&user_id);
    db.set_user_document(&doc).await.unwrap();

    let fetched = db.get_user_document(&user_id).await.unwrap().unwrap();
    assert_eq!(fetched, doc);

    db.delete_user_document(&user_id).await.unwrap();
    let after = db.get_user_document(&user_id).await.unwrap();
    assert!(after.is_none(), "Document should be deleted");

    println!("✓ User document CRUD verified: user_id={}", user_id);
}

#[tokio::test]
async fn test_incremental_updates_match_local_copy() {
    require_emulator!();

    let db = test_db().await;
    let user_id = unique_user_id();
    let store = WorkoutStore::new(db.clone());
    db.set_user_document(&test_document(&user_id)).await.unwrap();

    let bench = store
        .mutate(&user_id, |doc| {
            workout::add_exercise_type(
                doc,
                NewExerciseType {
                    name: "Bench".to_string(),
                    category: Category::Strength,
                    description: String::new(),
                    muscle_groups: Vec::new(),
                },
            )
        })
        .await
        .unwrap();
    let planned = store
        .mutate(&user_id, |doc| {
            workout::add_exercise_to_plan(doc, &bench.id, PlanParams::default())
        })
        .await
        .unwrap();
    let mut set = store
        .mutate(&user_id, |doc| {
            workout::add_set(doc, &planned.id, Some(80.0), Some(5))
        })
        .await
        .unwrap()
        .unwrap();
    set.done = true;
    store
        .mutate(&user_id, |doc| workout::update_set(doc, &planned.id, set))
        .await
        .unwrap();
    let now = Utc::now();
    store
        .mutate(&user_id, |doc| workout::finish_training(doc, now))
        .await
        .unwrap();

    let local = store.load(&user_id).await.unwrap();
    let remote = db.get_user_document(&user_id).await.unwrap().unwrap();
    assert_eq!(remote, local);
    assert_eq!(remote.stats.total_trainings, 1);
    assert_eq!(remote.stats.total_completed_sets, 1);
    assert_eq!(remote.history.len(), 1);
    assert_eq!(remote.exercise_types[0].last_sets.len(), 1);

    // Removing an array element by value
    let record_id = remote.history[0].id.clone();
    store
        .mutate(&user_id, |doc| workout::remove_training_record(doc, &record_id))
        .await
        .unwrap();
    let remote = db.get_user_document(&user_id).await.unwrap().unwrap();
    assert!(remote.history.is_empty());

    db.delete_user_document(&user_id).await.unwrap();
    println!("✓ Incremental updates verified: user_id={}", user_id);
}

#[tokio::test]
async fn test_updates_to_deleted_document_not_found() {
    require_emulator!();

    let db = test_db().await;
    let user_id = unique_user_id();
    db.set_user_document(&test_document(&user_id)).await.unwrap();
    db.delete_user_document(&user_id).await.unwrap();

    let updates = [
        DocumentUpdate::increment(fields::STATS_TOTAL_TRAININGS, 1),
        DocumentUpdate::set(fields::SETTINGS, &UserSettings::default()).unwrap(),
    ];
    let result = db.apply_updates(&user_id, &updates).await;
    assert!(
        matches!(result, Err(AppError::NotFound(_))),
        "expected NotFound, got {result:?}"
    );

    // No partial document left behind
    let after = db.get_user_document(&user_id).await.unwrap();
    assert!(after.is_none(), "Deleted document must not be recreated");

    println!("✓ Updates to deleted document rejected: user_id={}", user_id);
}

// ═══════════════════════════════════════════════════════════════════════════
// CREDENTIAL TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_credentials_unique_per_email() {
    require_emulator!();

    let db = test_db().await;
    let user_id = unique_user_id();
    let email = format!("{user_id}@example.com");

    let credentials = Credentials {
        user_id: user_id.clone(),
        email: email.clone(),
        password_hash: "aGFzaA==".to_string(),
        salt: "c2FsdA==".to_string(),
        iterations: 1000,
        created_at: "2026-03-01T09:00:00Z".to_string(),
    };
    db.insert_credentials(&credentials).await.unwrap();

    let fetched = db
        .get_credentials(&email.to_uppercase())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fetched.user_id, user_id);

    let duplicate = db.insert_credentials(&credentials).await;
    assert!(
        matches!(duplicate, Err(AppError::Conflict(_))),
        "Second insert should conflict"
    );

    db.delete_credentials(&email).await.unwrap();
    assert!(db.get_credentials(&email).await.unwrap().is_none());

    println!("✓ Credentials verified: user_id={}", user_id);
}

#[tokio::test]
async fn test_concurrent_credential_inserts_conflict() {
    require_emulator!();

    let db = test_db().await;
    let user_id = unique_user_id();
    let email = format!("{user_id}@example.com");
    let credentials = Credentials {
        user_id: user_id.clone(),
        email: email.clone(),
        password_hash: "aGFzaA==".to_string(),
        salt: "c2FsdA==".to_string(),
        iterations: 1000,
        created_at: "2026-03-01T09:00:00Z".to_string(),
    };

    // Both may pass the lookup; the losing insert must still be a conflict
    let (a, b) = tokio::join!(
        db.insert_credentials(&credentials),
        db.insert_credentials(&credentials)
    );
    let conflicts = [&a, &b]
        .into_iter()
        .filter(|r| matches!(r, Err(AppError::Conflict(_))))
        .count();
    assert!(a.is_ok() || b.is_ok(), "one insert should win: {a:?} {b:?}");
    assert_eq!(conflicts, 1, "loser should conflict: {a:?} {b:?}");

    db.delete_credentials(&email).await.unwrap();
}

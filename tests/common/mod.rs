// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;
use workout_tracker::config::Config;
use workout_tracker::db::DocumentDb;
use workout_tracker::middleware::auth::create_jwt;
use workout_tracker::routes::create_router;
use workout_tracker::services::WorkoutStore;
use workout_tracker::AppState;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> DocumentDb {
    let mut config = Config::test_default();
    config.store_backend = workout_tracker::config::StoreBackend::Firestore;
    DocumentDb::connect(&config)
        .await
        .expect("Failed to connect to Firestore emulator")
}

fn app_with_config(config: Config, db: DocumentDb) -> (Router, Arc<AppState>) {
    let state = Arc::new(AppState {
        config,
        store: WorkoutStore::new(db),
    });
    (create_router(state.clone()), state)
}

/// Create a test app backed by the in-memory store.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (Router, Arc<AppState>) {
    app_with_config(Config::test_default(), DocumentDb::new_memory())
}

/// Create a test app whose store rejects every call.
#[allow(dead_code)]
pub fn create_offline_test_app() -> (Router, Arc<AppState>) {
    app_with_config(Config::test_default(), DocumentDb::new_mock())
}

#[allow(dead_code)]
pub fn create_test_app_with_frontend_url(frontend_url: &str) -> (Router, Arc<AppState>) {
    let mut config = Config::test_default();
    config.frontend_url = frontend_url.to_string();
    app_with_config(config, DocumentDb::new_memory())
}

#[allow(dead_code)]
pub fn create_test_jwt(user_id: &str, signing_key: &[u8]) -> String {
    create_jwt(user_id, signing_key).unwrap()
}

/// Send a JSON request, returning the status and parsed body (`Null` if empty).
#[allow(dead_code)]
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

/// Register a user and return the bearer token.
#[allow(dead_code)]
pub async fn register_user(app: &Router, email: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/auth/register",
        None,
        Some(serde_json::json!({
            "email": email,
            "password": "hunter22",
            "confirm_password": "hunter22",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
    body["token"].as_str().unwrap().to_string()
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! History listing tests.
//!
//! These tests verify that:
//! 1. Pagination parameters are validated
//! 2. Pages are newest first and report whether more remain

use axum::http::StatusCode;
use axum::Router;
use serde_json::json;

mod common;
use common::send;

/// Finish `count` one-exercise sessions.
async fn log_sessions(app: &Router, token: &str, count: usize) {
    let (_, cardio) = send(
        app,
        "POST",
        "/api/exercise-types",
        Some(token),
        Some(json!({"name": "Rowing", "category": "cardio"})),
    )
    .await;

    for minutes in 0..count {
        let (_, planned) = send(
            app,
            "POST",
            "/api/session/exercises",
            Some(token),
            Some(json!({"exercise_type_id": cardio["id"], "duration_minutes": 10 + minutes})),
        )
        .await;
        let id = planned["id"].as_str().unwrap();
        send(
            app,
            "PUT",
            &format!("/api/session/exercises/{id}/done"),
            Some(token),
            Some(json!({"done": true})),
        )
        .await;
        let (status, _) = send(app, "POST", "/api/session/finish", Some(token), None).await;
        assert_eq!(status, StatusCode::CREATED);
    }
}

#[tokio::test]
async fn test_history_limit_validation() {
    let (app, _) = common::create_test_app();
    let token = common::register_user(&app, "limits@example.com").await;

    for uri in ["/api/history?limit=0", "/api/history?limit=201"] {
        let (status, _) = send(&app, "GET", uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
    }

    // Negative numbers don't parse as usize
    let (status, _) = send(&app, "GET", "/api/history?offset=-1", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_history_pages() {
    let (app, _) = common::create_test_app();
    let token = common::register_user(&app, "pages@example.com").await;
    log_sessions(&app, &token, 3).await;

    let (status, page) = send(&app, "GET", "/api/history?limit=2", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 3);
    assert_eq!(page["has_more"], true);
    let records = page["records"].as_array().unwrap();
    assert_eq!(records.len(), 2);
    // Same-day sessions: the last one finished comes first
    assert_eq!(records[0]["exercises"][0]["duration_minutes"], 12);

    let (_, rest) = send(&app, "GET", "/api/history?limit=2&offset=2", Some(&token), None).await;
    assert_eq!(rest["has_more"], false);
    assert_eq!(rest["records"].as_array().unwrap().len(), 1);
    assert_eq!(rest["records"][0]["exercises"][0]["duration_minutes"], 10);

    let (_, past_end) = send(&app, "GET", "/api/history?offset=10", Some(&token), None).await;
    assert_eq!(past_end["records"], json!([]));
    assert_eq!(past_end["has_more"], false);
}

#[tokio::test]
async fn test_history_record_lookup_and_delete() {
    let (app, _) = common::create_test_app();
    let token = common::register_user(&app, "records@example.com").await;
    log_sessions(&app, &token, 2).await;

    let (_, page) = send(&app, "GET", "/api/history", Some(&token), None).await;
    let id = page["records"][0]["id"].as_str().unwrap().to_string();
    let uri = format!("/api/history/{id}");

    let (status, record) = send(&app, "GET", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(record["id"], id.as_str());

    let (status, _) = send(&app, "DELETE", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "GET", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, "DELETE", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, page) = send(&app, "GET", "/api/history", Some(&token), None).await;
    assert_eq!(page["total"], 1);
}

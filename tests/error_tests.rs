// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::http::StatusCode;
use axum::response::IntoResponse;
use workout_tracker::error::AppError;

#[test]
fn test_client_errors() {
    assert!(AppError::Unauthorized.is_client_error());
    assert!(AppError::InvalidCredentials.is_client_error());
    assert!(AppError::NotFound("x".to_string()).is_client_error());
    assert!(AppError::Conflict("x".to_string()).is_client_error());

    assert!(!AppError::Database("down".to_string()).is_client_error());
    assert!(!AppError::Internal(anyhow::anyhow!("boom")).is_client_error());
}

#[test]
fn test_status_codes() {
    let cases = [
        (AppError::InvalidToken, StatusCode::UNAUTHORIZED),
        (AppError::BadRequest("x".to_string()), StatusCode::BAD_REQUEST),
        (AppError::NotFound("x".to_string()), StatusCode::NOT_FOUND),
        (AppError::Conflict("x".to_string()), StatusCode::CONFLICT),
        (
            AppError::Database("x".to_string()),
            StatusCode::INTERNAL_SERVER_ERROR,
        ),
    ];
    for (error, status) in cases {
        assert_eq!(error.into_response().status(), status);
    }
}

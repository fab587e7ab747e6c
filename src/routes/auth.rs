// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Registration, login and logout routes.

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::{AppError, Result};
use crate::middleware::auth::{create_jwt, SESSION_DAYS, TOKEN_COOKIE};
use crate::services::auth::{self, LoginRequest, RegisterRequest};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
}

/// Successful login/registration.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SessionTokenResponse {
    pub user_id: String,
    pub email: String,
    /// Same JWT as the cookie, for clients using the Authorization header
    pub token: String,
}

/// Only mark cookies `Secure` when the frontend is served over HTTPS.
fn is_secure(state: &AppState) -> bool {
    state.config.frontend_url.starts_with("https://")
}

fn session_cookie(state: &AppState, token: String) -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(is_secure(state))
        .max_age(time::Duration::days(SESSION_DAYS))
        .build()
}

fn issue_session(
    state: &AppState,
    jar: CookieJar,
    user_id: String,
    email: String,
) -> Result<(CookieJar, SessionTokenResponse)> {
    let token = create_jwt(&user_id, &state.config.jwt_signing_key)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("JWT creation failed: {}", e)))?;
    let jar = jar.add(session_cookie(state, token.clone()));

    Ok((
        jar,
        SessionTokenResponse {
            user_id,
            email,
            token,
        },
    ))
}

/// Create an account and log straight in.
async fn register(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, CookieJar, Json<SessionTokenResponse>)> {
    let doc = auth::register(
        state.store.db(),
        &request,
        state.config.password_iterations,
        chrono::Utc::now(),
    )
    .await?;

    let (jar, body) = issue_session(&state, jar, doc.user_id, doc.email)?;
    Ok((StatusCode::CREATED, jar, Json(body)))
}

async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(request): Json<LoginRequest>,
) -> Result<(CookieJar, Json<SessionTokenResponse>)> {
    let credentials = auth::login(state.store.db(), &request).await?;
    tracing::info!(user_id = %credentials.user_id, "User logged in");

    let (jar, body) = issue_session(&state, jar, credentials.user_id, credentials.email)?;
    Ok((jar, Json(body)))
}

/// Clear the session cookie. Tokens are stateless, so nothing else to do.
async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> (StatusCode, CookieJar) {
    let removal = Cookie::build(TOKEN_COOKIE)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(is_secure(&state));

    (StatusCode::NO_CONTENT, jar.remove(removal))
}

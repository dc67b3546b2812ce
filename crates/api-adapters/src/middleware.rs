//! Session-cookie authentication middleware.
//!
//! Verifies the `token` cookie, resolves the account, and injects a
//! [`CurrentUser`] extension for the handlers downstream.

use axum::extract::{Request, State};
use axum::http::{header, HeaderMap};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use uuid::Uuid;

use domains::{DomainError, Result};

use crate::error::ApiError;
use crate::AppState;

pub const SESSION_COOKIE: &str = "token";

/// The authenticated caller, available to every protected handler.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Uuid,
    pub username: String,
}

/// The `Set-Cookie` value that logs a session in.
pub fn session_cookie(token: &str) -> String {
    format!("{SESSION_COOKIE}={token}; HttpOnly; Secure; SameSite=None; Path=/")
}

/// The `Set-Cookie` value that logs a session out.
pub fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Max-Age=0; HttpOnly; Secure; SameSite=None; Path=/")
}

pub async fn require_session(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    match authenticate(&state, req.headers()).await {
        Ok(user) => {
            req.extensions_mut().insert(user);
            next.run(req).await
        }
        Err(err) => ApiError(err).into_response(),
    }
}

async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<CurrentUser> {
    let token = token_from_headers(headers)
        .ok_or_else(|| DomainError::unauthorized("missing session token"))?;
    let user_id = state.auth.verify_token(&token)?;
    let user = state
        .user_repo
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| DomainError::unauthorized("session user no longer exists"))?;
    Ok(CurrentUser {
        id: user.id,
        username: user.username,
    })
}

fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE).then(|| value.to_string())
    })
}

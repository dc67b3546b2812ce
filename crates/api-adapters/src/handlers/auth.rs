//! Registration, login, and session handlers.

use axum::extract::State;
use axum::http::header;
use axum::response::{AppendHeaders, IntoResponse};
use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::json;

use domains::UserProfile;
use services::Registration;

use crate::error::ApiResult;
use crate::middleware::{clear_session_cookie, session_cookie, CurrentUser};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Email or username; a value containing `@` is treated as an email.
    pub email: String,
    pub password: String,
}

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<Registration>,
) -> ApiResult<impl IntoResponse> {
    let user = state.users.register(body).await?;
    let token = state.auth.sign_token(user.id)?;
    Ok((
        AppendHeaders([(header::SET_COOKIE, session_cookie(&token))]),
        Json(json!({ "success": true, "user": UserProfile::from(&user) })),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    let user = state.users.login(&body.email, &body.password).await?;
    let token = state.auth.sign_token(user.id)?;
    Ok((
        AppendHeaders([(header::SET_COOKIE, session_cookie(&token))]),
        Json(json!({ "success": true, "user": UserProfile::from(&user) })),
    ))
}

pub async fn logged_in(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> ApiResult<impl IntoResponse> {
    let user = state.users.find(current.id).await?;
    Ok(Json(json!({
        "loggedIn": true,
        "user": UserProfile::from(&user),
    })))
}

pub async fn logout() -> impl IntoResponse {
    (
        AppendHeaders([(header::SET_COOKIE, clear_session_cookie())]),
        Json(json!({ "success": true })),
    )
}

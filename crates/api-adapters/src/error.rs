//! Maps domain failures onto HTTP responses.
//!
//! Every failure body is `{ "success": false, "errorMessage": ... }`;
//! internals are logged server-side and replaced by a generic message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use domains::DomainError;

pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self.0 {
            DomainError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            DomainError::Conflict(msg) => (StatusCode::BAD_REQUEST, msg),
            DomainError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            DomainError::NotFound(kind, id) => {
                (StatusCode::NOT_FOUND, format!("{kind} not found with id {id}"))
            }
            DomainError::Internal(msg) => {
                error!(%msg, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "There was a problem with that request.".to_string(),
                )
            }
        };
        let body = Json(json!({ "success": false, "errorMessage": message }));
        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

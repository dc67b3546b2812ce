//! `/top5list` resource handlers.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use services::{ListDraft, ListUpdate};

use crate::error::ApiResult;
use crate::middleware::CurrentUser;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct RatingRequest {
    pub value: i16,
}

#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    pub text: String,
}

pub async fn create(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(draft): Json<ListDraft>,
) -> ApiResult<impl IntoResponse> {
    let list = state.lists.create_list(&current.username, draft).await?;
    Ok(Json(json!({ "success": true, "top5List": list })))
}

pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let list = state.lists.get_list(id).await?;
    Ok(Json(json!({ "success": true, "top5List": list })))
}

pub async fn get_all(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let lists = state.lists.list_all().await?;
    Ok(Json(json!({ "success": true, "data": lists })))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(body): Json<ListUpdate>,
) -> ApiResult<impl IntoResponse> {
    let list = state.lists.update_list(&current.username, id, body).await?;
    Ok(Json(json!({ "success": true, "top5List": list })))
}

pub async fn remove(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    state.lists.delete_list(&current.username, id).await?;
    Ok(Json(json!({ "success": true })))
}

pub async fn rate(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(body): Json<RatingRequest>,
) -> ApiResult<impl IntoResponse> {
    state.lists.rate_list(&current.username, id, body.value).await?;
    Ok(Json(json!({ "success": true })))
}

pub async fn view(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    state.lists.view_list(id).await?;
    Ok(Json(json!({ "success": true })))
}

pub async fn comment(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(body): Json<CommentRequest>,
) -> ApiResult<impl IntoResponse> {
    state
        .lists
        .comment_list(&current.username, id, body.text)
        .await?;
    Ok(Json(json!({ "success": true })))
}

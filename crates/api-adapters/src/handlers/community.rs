//! `/communitylist` resource handlers.
//!
//! The consensus ranking itself is owned by the aggregation engine; the
//! create/update/delete passthroughs exist for parity with the original
//! REST surface and for administrative repair.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use domains::{CommunityList, ScoredItem};

use crate::error::ApiResult;
use crate::handlers::lists::{CommentRequest, RatingRequest};
use crate::middleware::CurrentUser;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CommunityDraft {
    pub name: String,
    pub items: Vec<ScoredItem>,
}

pub async fn create(
    State(state): State<AppState>,
    Json(draft): Json<CommunityDraft>,
) -> ApiResult<impl IntoResponse> {
    let list = state
        .community
        .create(CommunityList::new(draft.name, draft.items))
        .await?;
    Ok(Json(json!({ "success": true, "communityList": list })))
}

pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let list = state.community.get(id).await?;
    Ok(Json(json!({ "success": true, "communityList": list })))
}

pub async fn get_all(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let lists = state.community.list_all().await?;
    Ok(Json(json!({ "success": true, "data": lists })))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(draft): Json<CommunityDraft>,
) -> ApiResult<impl IntoResponse> {
    let mut list = state.community.get(id).await?;
    list.name = draft.name;
    list.items = draft.items;
    list.updated_at = chrono::Utc::now();
    let list = state.community.update(list).await?;
    Ok(Json(json!({ "success": true, "communityList": list })))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    state.community.delete(id).await?;
    Ok(Json(json!({ "success": true })))
}

pub async fn rate(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(body): Json<RatingRequest>,
) -> ApiResult<impl IntoResponse> {
    state
        .community
        .rate(&current.username, id, body.value)
        .await?;
    Ok(Json(json!({ "success": true })))
}

pub async fn view(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    state.community.view(id).await?;
    Ok(Json(json!({ "success": true })))
}

pub async fn comment(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(body): Json<CommentRequest>,
) -> ApiResult<impl IntoResponse> {
    state
        .community
        .comment(&current.username, id, body.text)
        .await?;
    Ok(Json(json!({ "success": true })))
}

use axum::{
    Json,
    extract::{Path, State},
    http::HeaderMap,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_sessions::Session;

use super::auth::authenticate;
use super::validation::{validate_comment, validate_video_id};
use super::{ApiError, ApiResponse, AppState, CommentDto};

#[derive(Deserialize)]
pub struct AddCommentRequest {
    pub content: String,
}

#[derive(Serialize)]
pub struct CommentCreatedResponse {
    pub id: i32,
}

/// GET /comments/{id}
/// Comments for a video in creation order
pub async fn list_comments(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<CommentDto>>>, ApiError> {
    validate_video_id(id)?;

    let comments = state.store().list_comments(id).await?;
    let dtos: Vec<CommentDto> = comments.into_iter().map(CommentDto::from).collect();
    Ok(Json(ApiResponse::success(dtos)))
}

/// POST /comment/{id}
/// Attach a comment to a video
pub async fn add_comment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    headers: HeaderMap,
    session: Session,
    Json(payload): Json<AddCommentRequest>,
) -> Result<Json<ApiResponse<CommentCreatedResponse>>, ApiError> {
    let user = authenticate(&state, &headers, &session).await?;
    validate_video_id(id)?;
    let content = validate_comment(&payload.content)?;

    let video = state.store().get_video(id).await?;
    if video.is_none() {
        return Err(ApiError::video_not_found(id));
    }

    let comment_id = state.store().add_comment(id, user.id, content).await?;

    Ok(Json(ApiResponse::success(CommentCreatedResponse {
        id: comment_id,
    })))
}

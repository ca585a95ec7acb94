use axum::{
    Json,
    extract::{Path, State},
    http::HeaderMap,
};
use serde::Serialize;
use std::sync::Arc;
use tower_sessions::Session;

use super::auth::authenticate;
use super::validation::validate_video_id;
use super::{ApiError, ApiResponse, AppState};

#[derive(Serialize)]
pub struct LikeResponse {
    pub likes: i32,
    pub liked: bool,
}

#[derive(Serialize)]
pub struct LikedResponse {
    pub liked: bool,
}

/// POST /like/{id}
/// Toggle the caller's like on a video; counter and join row move together
pub async fn toggle_like(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    headers: HeaderMap,
    session: Session,
) -> Result<Json<ApiResponse<LikeResponse>>, ApiError> {
    let user = authenticate(&state, &headers, &session).await?;
    validate_video_id(id)?;

    let toggle = state
        .store()
        .toggle_like(user.id, id)
        .await?
        .ok_or_else(|| ApiError::video_not_found(id))?;

    Ok(Json(ApiResponse::success(LikeResponse {
        likes: toggle.likes,
        liked: toggle.liked,
    })))
}

/// POST /liked/{id}
/// Whether the caller has liked a video
pub async fn check_liked(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    headers: HeaderMap,
    session: Session,
) -> Result<Json<ApiResponse<LikedResponse>>, ApiError> {
    let user = authenticate(&state, &headers, &session).await?;
    validate_video_id(id)?;

    let liked = state.store().is_liked(user.id, id).await?;

    Ok(Json(ApiResponse::success(LikedResponse { liked })))
}

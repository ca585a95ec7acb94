use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use std::sync::Arc;
use tower_http::services::ServeFile;

use super::validation::validate_video_id;
use super::{ApiError, AppState};

/// GET /video/{id}
/// Stream the stored file for a video. Range headers are passed through so
/// players can seek.
pub async fn stream_video(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    headers: axum::http::HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    validate_video_id(id)?;

    let video = state
        .store()
        .get_video(id)
        .await?
        .ok_or_else(|| ApiError::video_not_found(id))?;

    let path = state
        .media()
        .resolve(&video.filename)
        .ok_or_else(|| ApiError::NotFound("Video file missing on disk".to_string()))?;

    let mut builder = axum::http::Request::builder();
    if let Some(range) = headers.get("range") {
        builder = builder.header("range", range.clone());
    }
    let req = builder
        .body(axum::body::Body::empty())
        .map_err(|e| ApiError::internal(format!("Failed to build request: {e}")))?;

    match ServeFile::new(path).try_call(req).await {
        Ok(res) => Ok(res),
        Err(e) => Err(ApiError::internal(format!("Streaming error: {e}"))),
    }
}

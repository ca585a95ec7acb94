use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::HeaderMap,
};
use serde::Serialize;
use std::sync::Arc;
use tower_sessions::Session;

use super::auth::authenticate;
use super::validation::{validate_nonempty, validate_video_id};
use super::{ApiError, ApiResponse, AppState, MessageResponse, VideoDto};

#[derive(Serialize)]
pub struct UploadResponse {
    pub id: i32,
}

/// GET /videos
/// All videos with uploader and like count, in creation order
pub async fn list_videos(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<VideoDto>>>, ApiError> {
    let videos = state.store().list_videos().await?;
    let dtos: Vec<VideoDto> = videos.into_iter().map(VideoDto::from).collect();
    Ok(Json(ApiResponse::success(dtos)))
}

/// POST /upload
/// Accept a multipart upload (title, description, file), persist the blob,
/// then insert the video row
pub async fn upload_video(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    session: Session,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<UploadResponse>>, ApiError> {
    let user = authenticate(&state, &headers, &session).await?;

    let mut title = None;
    let mut description = None;
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation(format!("Malformed multipart body: {e}")))?
    {
        let name = field.name().map(ToString::to_string);
        match name.as_deref() {
            Some("title") => {
                title = Some(field.text().await.map_err(|e| {
                    ApiError::validation(format!("Failed to read title field: {e}"))
                })?);
            }
            Some("description") => {
                description = Some(field.text().await.map_err(|e| {
                    ApiError::validation(format!("Failed to read description field: {e}"))
                })?);
            }
            Some("file") => {
                let original_name = field
                    .file_name()
                    .map_or_else(|| "upload.bin".to_string(), ToString::to_string);
                let bytes = field.bytes().await.map_err(|e| {
                    ApiError::validation(format!("Failed to read file field: {e}"))
                })?;
                file = Some((original_name, bytes.to_vec()));
            }
            _ => {}
        }
    }

    let title = validate_nonempty(title.as_deref().unwrap_or_default(), "Title")?.to_string();
    let description =
        validate_nonempty(description.as_deref().unwrap_or_default(), "Description")?.to_string();
    let (original_name, bytes) =
        file.ok_or_else(|| ApiError::validation("No file uploaded"))?;

    // Blob lands on disk before the row exists; an insert failure leaves an
    // orphaned file rather than a dangling row.
    let stored_name = state.media().save(&original_name, &bytes).await?;

    let id = match state
        .store()
        .add_video(&title, &description, &stored_name, user.id)
        .await
    {
        Ok(id) => id,
        Err(e) => {
            state.media().remove(&stored_name).await;
            return Err(ApiError::internal(format!("Failed to insert video: {e}")));
        }
    };

    tracing::info!("User {} uploaded video {} ({})", user.username, id, title);

    Ok(Json(ApiResponse::success(UploadResponse { id })))
}

/// DELETE /video/{id}
/// Owner-only: removes the row, its likes and comments, then the blob
pub async fn delete_video(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    headers: HeaderMap,
    session: Session,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let user = authenticate(&state, &headers, &session).await?;
    validate_video_id(id)?;

    let video = state
        .store()
        .get_video(id)
        .await?
        .ok_or_else(|| ApiError::video_not_found(id))?;

    if video.uploader_id != user.id {
        return Err(ApiError::Forbidden(
            "Not authorized to delete this video".to_string(),
        ));
    }

    let filename = state
        .store()
        .remove_video(id)
        .await?
        .ok_or_else(|| ApiError::video_not_found(id))?;

    state.media().remove(&filename).await;

    tracing::info!("User {} deleted video {}", user.username, id);

    Ok(Json(ApiResponse::success(MessageResponse {
        message: "Video deleted successfully".to_string(),
    })))
}

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct VideoDto {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub likes: i32,
    pub uploader: String,
    pub created_at: String,
}

impl From<crate::db::VideoSummary> for VideoDto {
    fn from(row: crate::db::VideoSummary) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            likes: row.likes,
            uploader: row.uploader,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CommentDto {
    pub id: i32,
    pub user: String,
    pub content: String,
    pub created_at: String,
}

impl From<crate::db::CommentRow> for CommentDto {
    fn from(row: crate::db::CommentRow) -> Self {
        Self {
            id: row.id,
            user: row.user,
            content: row.content,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

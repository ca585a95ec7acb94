use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};

use crate::entities::{comments, users};

/// Comment row joined with the commenter's username.
#[derive(Debug, Clone, FromQueryResult)]
pub struct CommentRow {
    pub id: i32,
    pub user: String,
    pub content: String,
    pub created_at: String,
}

pub struct CommentRepository {
    conn: DatabaseConnection,
}

impl CommentRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn add(&self, video_id: i32, user_id: i32, content: &str) -> Result<i32> {
        let active = comments::ActiveModel {
            video_id: Set(video_id),
            user_id: Set(user_id),
            content: Set(content.to_string()),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert comment")?;

        Ok(model.id)
    }

    /// Comments for a video in creation order.
    pub async fn list_for_video(&self, video_id: i32) -> Result<Vec<CommentRow>> {
        let rows = comments::Entity::find()
            .filter(comments::Column::VideoId.eq(video_id))
            .column_as(users::Column::Username, "user")
            .join(JoinType::InnerJoin, comments::Relation::Users.def())
            .order_by_asc(comments::Column::CreatedAt)
            .order_by_asc(comments::Column::Id)
            .into_model::<CommentRow>()
            .all(&self.conn)
            .await
            .context("Failed to list comments")?;

        Ok(rows)
    }
}

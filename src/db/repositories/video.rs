use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
};

use crate::entities::{comments, likes, users, videos};

/// Video row joined with its uploader's username, as shown in listings.
#[derive(Debug, Clone, FromQueryResult)]
pub struct VideoSummary {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub likes: i32,
    pub uploader: String,
    pub created_at: String,
}

/// Outcome of a like toggle, committed in one transaction.
#[derive(Debug, Clone, Copy)]
pub struct LikeToggle {
    pub likes: i32,
    pub liked: bool,
}

pub struct VideoRepository {
    conn: DatabaseConnection,
}

impl VideoRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn add(
        &self,
        title: &str,
        description: &str,
        filename: &str,
        uploader_id: i32,
    ) -> Result<i32> {
        let active = videos::ActiveModel {
            title: Set(title.to_string()),
            description: Set(description.to_string()),
            filename: Set(filename.to_string()),
            likes: Set(0),
            uploader_id: Set(uploader_id),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert video")?;

        Ok(model.id)
    }

    pub async fn get(&self, id: i32) -> Result<Option<videos::Model>> {
        let video = videos::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query video by ID")?;

        Ok(video)
    }

    /// List all videos with uploader usernames, in creation order.
    pub async fn list(&self) -> Result<Vec<VideoSummary>> {
        let rows = videos::Entity::find()
            .column_as(users::Column::Username, "uploader")
            .join(JoinType::InnerJoin, videos::Relation::Users.def())
            .order_by_asc(videos::Column::Id)
            .into_model::<VideoSummary>()
            .all(&self.conn)
            .await
            .context("Failed to list videos")?;

        Ok(rows)
    }

    /// Delete a video together with its likes and comments. Returns the
    /// stored blob name so the caller can remove the file afterwards.
    pub async fn remove(&self, id: i32) -> Result<Option<String>> {
        let txn = self.conn.begin().await?;

        let Some(video) = videos::Entity::find_by_id(id).one(&txn).await? else {
            txn.rollback().await?;
            return Ok(None);
        };

        let filename = video.filename.clone();

        comments::Entity::delete_many()
            .filter(comments::Column::VideoId.eq(id))
            .exec(&txn)
            .await?;

        likes::Entity::delete_many()
            .filter(likes::Column::VideoId.eq(id))
            .exec(&txn)
            .await?;

        videos::Entity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;

        Ok(Some(filename))
    }

    /// Flip a user's like for a video and adjust the counter in lockstep.
    /// Both writes land in one transaction so the counter and the join rows
    /// cannot drift apart under concurrent toggles.
    pub async fn toggle_like(&self, user_id: i32, video_id: i32) -> Result<Option<LikeToggle>> {
        let txn = self.conn.begin().await?;

        let Some(video) = videos::Entity::find_by_id(video_id).one(&txn).await? else {
            txn.rollback().await?;
            return Ok(None);
        };

        let existing = likes::Entity::find()
            .filter(likes::Column::UserId.eq(user_id))
            .filter(likes::Column::VideoId.eq(video_id))
            .one(&txn)
            .await?;

        let current = video.likes;

        let toggle = match existing {
            Some(like) => {
                likes::Entity::delete_by_id(like.id).exec(&txn).await?;

                let count = (current - 1).max(0);
                let mut active: videos::ActiveModel = video.into();
                active.likes = Set(count);
                active.update(&txn).await?;

                LikeToggle {
                    likes: count,
                    liked: false,
                }
            }
            None => {
                let like = likes::ActiveModel {
                    user_id: Set(user_id),
                    video_id: Set(video_id),
                    ..Default::default()
                };
                like.insert(&txn).await?;

                let count = current + 1;
                let mut active: videos::ActiveModel = video.into();
                active.likes = Set(count);
                active.update(&txn).await?;

                LikeToggle {
                    likes: count,
                    liked: true,
                }
            }
        };

        txn.commit().await?;

        Ok(Some(toggle))
    }

    pub async fn is_liked(&self, user_id: i32, video_id: i32) -> Result<bool> {
        let existing = likes::Entity::find()
            .filter(likes::Column::UserId.eq(user_id))
            .filter(likes::Column::VideoId.eq(video_id))
            .one(&self.conn)
            .await
            .context("Failed to query like")?;

        Ok(existing.is_some())
    }
}

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();

        // One like per (user, video) pair; the toggle logic keeps this
        // invariant, the index makes it hold under concurrent requests too.
        conn.execute_unprepared(
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_likes_user_video_unique ON likes(user_id, video_id)",
        )
        .await?;

        conn.execute_unprepared(
            "CREATE INDEX IF NOT EXISTS idx_comments_video ON comments(video_id)",
        )
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();

        conn.execute_unprepared("DROP INDEX IF EXISTS idx_comments_video")
            .await?;

        conn.execute_unprepared("DROP INDEX IF EXISTS idx_likes_user_video_unique")
            .await?;

        Ok(())
    }
}

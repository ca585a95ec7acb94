use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::config::SecurityConfig;

pub mod migrator;
pub mod repositories;

pub use repositories::comment::CommentRow;
pub use repositories::session::IssuedSession;
pub use repositories::user::User;
pub use repositories::video::{LikeToggle, VideoSummary};

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn session_repo(&self) -> repositories::session::SessionRepository {
        repositories::session::SessionRepository::new(self.conn.clone())
    }

    fn video_repo(&self) -> repositories::video::VideoRepository {
        repositories::video::VideoRepository::new(self.conn.clone())
    }

    fn comment_repo(&self) -> repositories::comment::CommentRepository {
        repositories::comment::CommentRepository::new(self.conn.clone())
    }

    // ========================================================================
    // Users
    // ========================================================================

    pub async fn create_user(
        &self,
        username: &str,
        email: &str,
        password: &str,
        config: &SecurityConfig,
    ) -> Result<User> {
        self.user_repo()
            .create(username, email, password, config)
            .await
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.user_repo().get_by_username(username).await
    }

    pub async fn get_user_by_id(&self, id: i32) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn verify_user_password(&self, username: &str, password: &str) -> Result<bool> {
        self.user_repo().verify_password(username, password).await
    }

    // ========================================================================
    // Sessions
    // ========================================================================

    pub async fn create_session(&self, user_id: i32, ttl_hours: u32) -> Result<IssuedSession> {
        self.session_repo().create(user_id, ttl_hours).await
    }

    pub async fn verify_session_token(&self, token: &str) -> Result<Option<User>> {
        self.session_repo().verify(token).await
    }

    pub async fn revoke_session_token(&self, token: &str) -> Result<bool> {
        self.session_repo().revoke(token).await
    }

    pub async fn prune_expired_sessions(&self) -> Result<u64> {
        self.session_repo().prune_expired().await
    }

    // ========================================================================
    // Videos & likes
    // ========================================================================

    pub async fn add_video(
        &self,
        title: &str,
        description: &str,
        filename: &str,
        uploader_id: i32,
    ) -> Result<i32> {
        self.video_repo()
            .add(title, description, filename, uploader_id)
            .await
    }

    pub async fn get_video(&self, id: i32) -> Result<Option<crate::entities::videos::Model>> {
        self.video_repo().get(id).await
    }

    pub async fn list_videos(&self) -> Result<Vec<VideoSummary>> {
        self.video_repo().list().await
    }

    pub async fn remove_video(&self, id: i32) -> Result<Option<String>> {
        self.video_repo().remove(id).await
    }

    pub async fn toggle_like(&self, user_id: i32, video_id: i32) -> Result<Option<LikeToggle>> {
        self.video_repo().toggle_like(user_id, video_id).await
    }

    pub async fn is_liked(&self, user_id: i32, video_id: i32) -> Result<bool> {
        self.video_repo().is_liked(user_id, video_id).await
    }

    // ========================================================================
    // Comments
    // ========================================================================

    pub async fn add_comment(&self, video_id: i32, user_id: i32, content: &str) -> Result<i32> {
        self.comment_repo().add(video_id, user_id, content).await
    }

    pub async fn list_comments(&self, video_id: i32) -> Result<Vec<CommentRow>> {
        self.comment_repo().list_for_video(video_id).await
    }
}

use anyhow::{Context, Result};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use super::user::User;
use crate::entities::{sessions, users};

/// A freshly issued login session.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub expires_at: String,
}

pub struct SessionRepository {
    conn: DatabaseConnection,
}

impl SessionRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Issue a new bearer token for a user, valid for `ttl_hours`.
    pub async fn create(&self, user_id: i32, ttl_hours: u32) -> Result<IssuedSession> {
        let token = generate_token();
        let now = chrono::Utc::now();
        let expires_at = (now + chrono::Duration::hours(i64::from(ttl_hours))).to_rfc3339();

        let active = sessions::ActiveModel {
            user_id: Set(user_id),
            token: Set(token.clone()),
            created_at: Set(now.to_rfc3339()),
            expires_at: Set(expires_at.clone()),
            ..Default::default()
        };

        active
            .insert(&self.conn)
            .await
            .context("Failed to insert session")?;

        Ok(IssuedSession { token, expires_at })
    }

    /// Resolve a bearer token to its user. Expired tokens resolve to None.
    pub async fn verify(&self, token: &str) -> Result<Option<User>> {
        let now = chrono::Utc::now().to_rfc3339();

        let session = sessions::Entity::find()
            .filter(sessions::Column::Token.eq(token))
            .filter(sessions::Column::ExpiresAt.gt(now))
            .one(&self.conn)
            .await
            .context("Failed to query session by token")?;

        let Some(session) = session else {
            return Ok(None);
        };

        let user = users::Entity::find_by_id(session.user_id)
            .one(&self.conn)
            .await
            .context("Failed to query session user")?;

        Ok(user.map(User::from))
    }

    /// Delete a session by token. Returns whether a row was removed.
    pub async fn revoke(&self, token: &str) -> Result<bool> {
        let result = sessions::Entity::delete_many()
            .filter(sessions::Column::Token.eq(token))
            .exec(&self.conn)
            .await
            .context("Failed to revoke session")?;

        Ok(result.rows_affected > 0)
    }

    /// Remove sessions past their expiry. Called opportunistically at login.
    pub async fn prune_expired(&self) -> Result<u64> {
        let now = chrono::Utc::now().to_rfc3339();

        let result = sessions::Entity::delete_many()
            .filter(sessions::Column::ExpiresAt.lte(now))
            .exec(&self.conn)
            .await
            .context("Failed to prune expired sessions")?;

        Ok(result.rows_affected)
    }
}

/// Generate a random session token (64 character hex string)
#[must_use]
pub fn generate_token() -> String {
    use rand::Rng;

    let mut rng = rand::rng();
    let bytes: [u8; 32] = rng.random();

    bytes.iter().fold(String::with_capacity(64), |mut acc, b| {
        use std::fmt::Write;
        let _ = write!(acc, "{b:02x}");
        acc
    })
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct BotUser {
    pub user_id: i64,
    pub username: String,
    pub last_seen: DateTime<Utc>,
}

impl BotUser {
    /// Records an interaction: inserts the user or refreshes handle and
    /// last-seen timestamp.
    pub async fn touch(
        pool: &sqlx::SqlitePool,
        user_id: i64,
        username: Option<&str>,
    ) -> Result<(), sqlx::Error> {
        let now = Utc::now();
        sqlx::query(
            r#"
            INSERT INTO users (user_id, username, last_seen)
            VALUES (?, ?, ?)
            ON CONFLICT(user_id) DO UPDATE SET
                username = excluded.username,
                last_seen = excluded.last_seen
            "#,
        )
        .bind(user_id)
        .bind(username.unwrap_or_default())
        .bind(now)
        .execute(pool)
        .await?;
        Ok(())
    }

    pub async fn find(pool: &sqlx::SqlitePool, user_id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, BotUser>(
            "SELECT user_id, username, last_seen FROM users WHERE user_id = ?"
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    /// Broadcast recipients, ordered by id.
    pub async fn list_ids(pool: &sqlx::SqlitePool) -> Result<Vec<i64>, sqlx::Error> {
        sqlx::query_scalar("SELECT user_id FROM users ORDER BY user_id")
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &sqlx::SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await
    }
}

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
}

impl Category {
    /// Returns `false` when the category already existed.
    pub async fn create(pool: &sqlx::SqlitePool, name: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("INSERT INTO categories (name) VALUES (?) ON CONFLICT(name) DO NOTHING")
            .bind(name)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Movies pointing at the category are left untouched.
    pub async fn delete(pool: &sqlx::SqlitePool, name: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM categories WHERE name = ?")
            .bind(name)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn list_all(pool: &sqlx::SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Category>("SELECT name FROM categories ORDER BY name")
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &sqlx::SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM categories")
            .fetch_one(pool)
            .await
    }
}

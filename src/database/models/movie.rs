use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Category assigned to movies added without one.
pub const DEFAULT_CATEGORY: &str = "New";

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Movie {
    pub code: String,
    pub file_id: String,
    pub title: String,
    pub category: String,
    pub views: i64,
}

impl Movie {
    /// Inserts a movie, or overwrites media, title and category of the movie
    /// already stored under `code`. The view counter is never reset.
    pub async fn upsert(
        pool: &sqlx::SqlitePool,
        code: &str,
        file_id: &str,
        title: &str,
        category: &str,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO movies (code, file_id, title, category, views)
            VALUES (?, ?, ?, ?, 0)
            ON CONFLICT(code) DO UPDATE SET
                file_id = excluded.file_id,
                title = excluded.title,
                category = excluded.category
            "#,
        )
        .bind(code)
        .bind(file_id)
        .bind(title)
        .bind(category)
        .execute(pool)
        .await?;

        Self::find_by_code(pool, code)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Returns `true` if a movie was removed.
    pub async fn delete(pool: &sqlx::SqlitePool, code: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM movies WHERE code = ?")
            .bind(code)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn find_by_code(
        pool: &sqlx::SqlitePool,
        code: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Movie>(
            "SELECT code, file_id, title, category, views FROM movies WHERE code = ?"
        )
        .bind(code)
        .fetch_optional(pool)
        .await
    }

    pub async fn list_all(pool: &sqlx::SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Movie>(
            "SELECT code, file_id, title, category, views FROM movies ORDER BY title"
        )
        .fetch_all(pool)
        .await
    }

    pub async fn list_by_category(
        pool: &sqlx::SqlitePool,
        category: &str,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Movie>(
            "SELECT code, file_id, title, category, views FROM movies WHERE category = ? ORDER BY title"
        )
        .bind(category)
        .fetch_all(pool)
        .await
    }

    /// Case-insensitive substring search over titles.
    ///
    /// SQLite's `LOWER`/`LIKE` only fold ASCII, so matching happens here with
    /// full Unicode lowercasing over a single catalog read.
    pub async fn search(pool: &sqlx::SqlitePool, query: &str) -> Result<Vec<Self>, sqlx::Error> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }

        let movies = Self::list_all(pool).await?;
        Ok(movies
            .into_iter()
            .filter(|movie| movie.title.to_lowercase().contains(&needle))
            .collect())
    }

    pub async fn count(pool: &sqlx::SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM movies")
            .fetch_one(pool)
            .await
    }

    pub async fn top(pool: &sqlx::SqlitePool, limit: i64) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Movie>(
            "SELECT code, file_id, title, category, views FROM movies ORDER BY views DESC LIMIT ?"
        )
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// Returns `true` if the movie exists and its counter was bumped.
    pub async fn increment_views(pool: &sqlx::SqlitePool, code: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE movies SET views = views + 1 WHERE code = ?")
            .bind(code)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

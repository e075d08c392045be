use anyhow::Result;
use std::path::Path;
use sqlx::{SqlitePool, migrate::MigrateDatabase, Sqlite};
use tracing::info;

#[derive(Clone)]
pub struct DatabaseManager {
    pub pool: SqlitePool,
}

impl DatabaseManager {
    pub async fn new(database_url: &str) -> Result<Self> {
        // Create database if it doesn't exist
        if let Some(parent) = sqlite_file_parent(database_url) {
            std::fs::create_dir_all(parent)?;
        }
        if !Sqlite::database_exists(database_url).await.unwrap_or(false) {
            info!("Creating database {}", database_url);
            Sqlite::create_database(database_url).await?;
        }

        let pool = SqlitePool::connect(database_url).await?;

        Ok(Self { pool })
    }

    /// Creates the catalog tables if they are absent.
    pub async fn run_migrations(&self) -> Result<()> {
        info!("Running database migrations");
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    pub async fn close(&self) {
        info!("Closing database pool");
        self.pool.close().await;
    }
}

/// On-disk file of a SQLite URL. `None` for in-memory and non-SQLite URLs.
pub fn sqlite_file_path(database_url: &str) -> Option<&Path> {
    let path = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))?;
    let path = path.split('?').next()?;
    if path.is_empty() || path == ":memory:" {
        return None;
    }
    Some(Path::new(path))
}

/// Directory holding an on-disk SQLite file, if the URL names one.
fn sqlite_file_parent(database_url: &str) -> Option<&Path> {
    sqlite_file_path(database_url)?
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqlite_file_path() {
        assert_eq!(
            sqlite_file_path("sqlite://data/catalog.db?mode=rwc"),
            Some(Path::new("data/catalog.db"))
        );
        assert_eq!(sqlite_file_path("sqlite:catalog.db"), Some(Path::new("catalog.db")));
        assert_eq!(sqlite_file_path("sqlite::memory:"), None);
        assert_eq!(sqlite_file_path("postgres://localhost/db"), None);
    }

    #[test]
    fn test_sqlite_file_parent() {
        assert_eq!(sqlite_file_parent("sqlite:./data/catalog.db"), Some(Path::new("./data")));
        assert_eq!(sqlite_file_parent("sqlite://data/catalog.db?mode=rwc"), Some(Path::new("data")));
        assert_eq!(sqlite_file_parent("sqlite:catalog.db"), None);
        assert_eq!(sqlite_file_parent("sqlite::memory:"), None);
        assert_eq!(sqlite_file_parent("postgres://localhost/db"), None);
    }
}

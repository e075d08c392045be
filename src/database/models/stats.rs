use serde::{Deserialize, Serialize};

use super::{BotUser, Category, Movie};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogStats {
    pub users: i64,
    pub movies: i64,
    pub categories: i64,
}

impl CatalogStats {
    pub async fn collect(pool: &sqlx::SqlitePool) -> Result<Self, sqlx::Error> {
        Ok(Self {
            users: BotUser::count(pool).await?,
            movies: Movie::count(pool).await?,
            categories: Category::count(pool).await?,
        })
    }
}

//! `SQLite` connection pool setup and migration runner.

use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::sqlite::SqliteConnectOptions;

use crate::error::StorageError;

/// Configuration for the `SQLite` storage adapter.
pub struct Config {
    /// `SQLite` connection URL (e.g. `sqlite:autohub.db` or `sqlite::memory:`).
    pub database_url: String,
}

impl Config {
    /// Build a [`Database`] from this configuration.
    ///
    /// Creates the connection pool, creates the database file if missing,
    /// and runs all pending migrations.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the connection or migrations fail.
    pub async fn build(self) -> Result<Database, StorageError> {
        Database::initialize(&self.database_url).await
    }
}

/// Holds the `SQLite` connection pool and provides access to it.
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    async fn initialize(database_url: &str) -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        let pool = SqlitePool::connect_with(options).await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::debug!(%database_url, "database migrated");

        Ok(Self { pool })
    }

    /// Borrow the underlying connection pool.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_db() -> Database {
        Config {
            database_url: "sqlite::memory:".to_string(),
        }
        .build()
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn should_create_automations_table_with_unique_path_and_position() {
        let db = memory_db().await;

        let columns: Vec<(String,)> =
            sqlx::query_as("SELECT name FROM pragma_table_info('automations') ORDER BY cid")
                .fetch_all(db.pool())
                .await
                .unwrap();
        let names: Vec<&str> = columns.iter().map(|row| row.0.as_str()).collect();
        assert_eq!(names, vec!["id", "name", "url_path", "position", "image"]);

        let unique: Vec<(String,)> = sqlx::query_as(
            "SELECT ii.name FROM pragma_index_list('automations') AS il \
             JOIN pragma_index_info(il.name) AS ii WHERE il.\"unique\" = 1 AND il.origin = 'u' \
             ORDER BY ii.name",
        )
        .fetch_all(db.pool())
        .await
        .unwrap();
        let unique: Vec<&str> = unique.iter().map(|row| row.0.as_str()).collect();
        assert_eq!(unique, vec!["position", "url_path"]);
    }

    #[tokio::test]
    async fn should_reject_second_row_with_same_position() {
        let db = memory_db().await;
        let insert = "INSERT INTO automations (id, name, url_path, position) VALUES (?, ?, ?, 1)";

        sqlx::query(insert)
            .bind(uuid::Uuid::new_v4())
            .bind("Backup")
            .bind("backup")
            .execute(db.pool())
            .await
            .unwrap();
        let second = sqlx::query(insert)
            .bind(uuid::Uuid::new_v4())
            .bind("Cleanup")
            .bind("cleanup")
            .execute(db.pool())
            .await;

        assert!(second.is_err());
    }
}

//! Opens the alumno database and brings its schema up to date.

use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::sqlite::SqliteConnectOptions;

use crate::error::StorageError;

/// Where the alumno database lives.
pub struct Config {
    /// `sqlite:progrmobil.db` for a file, `sqlite::memory:` for tests.
    pub database_url: String,
}

impl Config {
    /// Open the database, creating the file on first use, and apply the
    /// embedded migrations.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the URL is invalid, the connection fails
    /// or a migration cannot be applied.
    pub async fn build(self) -> Result<Database, StorageError> {
        let pool = SqlitePool::connect_with(connect_options(&self.database_url)?).await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::debug!(url = %self.database_url, "alumno database ready");
        Ok(Database { pool })
    }
}

/// Every pooled connection gets `case_sensitive_like`, so `like` keeps its
/// case while `ilike` lowercases both sides in the generated SQL.
fn connect_options(database_url: &str) -> Result<SqliteConnectOptions, StorageError> {
    Ok(SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .pragma("case_sensitive_like", "ON"))
}

/// An open, migrated alumno database.
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

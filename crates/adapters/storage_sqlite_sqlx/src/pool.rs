//! Opening the schedule database.

use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::sqlite::SqliteConnectOptions;

use crate::error::StorageError;

/// Where the schedule database lives.
pub struct Config {
    /// e.g. `sqlite:planner.db?mode=rwc`, or `sqlite::memory:` in tests.
    pub database_url: String,
}

impl Config {
    /// Open the pool and bring the schema to the latest migration.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the database cannot be opened or migrated.
    pub async fn build(self) -> Result<Database, StorageError> {
        let options =
            SqliteConnectOptions::from_str(&self.database_url)?.create_if_missing(true);
        let pool = SqlitePool::connect_with(options).await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::debug!(database_url = %self.database_url, "schedule database ready");
        Ok(Database { pool })
    }
}

/// A migrated schedule database.
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Pool to hand to [`crate::SqliteScheduleStore::new`].
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

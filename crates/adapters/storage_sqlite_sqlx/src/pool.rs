//! Connection pool bootstrap: opens the `SQLite` database, enforces foreign
//! keys and applies the embedded migrations.

use std::str::FromStr;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode};

use crate::error::StorageError;

const IN_MEMORY_URL: &str = "sqlite::memory:";

/// How long a writer waits on a locked database before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Storage settings for the cardflow database.
pub struct Config {
    /// `SQLite` connection URL (e.g. `sqlite:cardflow.db` or `sqlite::memory:`).
    pub database_url: String,
}

impl Config {
    /// A private, throwaway database shared by all connections of one pool.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            database_url: IN_MEMORY_URL.to_string(),
        }
    }

    /// Open the database described by this configuration.
    ///
    /// The file is created when missing and all pending migrations run
    /// before the pool is handed out.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the URL is invalid, the connection fails
    /// or a migration fails.
    pub async fn build(self) -> Result<Database, StorageError> {
        Database::open(&self.database_url).await
    }
}

/// An opened, migrated cardflow database.
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    async fn open(database_url: &str) -> Result<Self, StorageError> {
        let mut options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(BUSY_TIMEOUT);
        // WAL lets the audit log append while cards are being read.
        if database_url != IN_MEMORY_URL {
            options = options.journal_mode(SqliteJournalMode::Wal);
        }

        let pool = SqlitePool::connect_with(options).await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::debug!(url = database_url, "database ready");

        Ok(Self { pool })
    }

    /// The connection pool every store is built from.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

//! Database Module
//!
//! SQLite connection pool, migrations and the per-table repositories.

pub mod category;
pub mod guest;
pub mod map_table;
pub mod message;
pub mod seat;
pub mod table;
pub mod user;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use std::str::FromStr;

use crate::BoxError;

/// Database service, owns a SQLite connection pool
#[derive(Clone)]
pub struct DbService {
    pub pool: SqlitePool,
}

impl DbService {
    /// Open (or create) the database and apply migrations
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self, BoxError> {
        let in_memory = database_url.contains(":memory:");

        let mut options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| format!("Invalid database url: {e}"))?
            .create_if_missing(true)
            .pragma("foreign_keys", "ON")
            .busy_timeout(std::time::Duration::from_millis(5000));
        if !in_memory {
            options = options
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal)
                .optimize_on_close(true, None);
        }

        // Every connection to `:memory:` is a separate database, so keep one alive forever
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(max_connections.max(1))
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| format!("Failed to open database: {e}"))?;

        tracing::info!(in_memory, "Database connection established (busy_timeout=5000ms)");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| format!("Failed to apply migrations: {e}"))?;
        tracing::info!("Database migrations applied");

        Ok(Self { pool })
    }

    /// Fresh in-memory database with migrations applied
    pub async fn in_memory() -> Result<Self, BoxError> {
        Self::new("sqlite::memory:", 1).await
    }
}

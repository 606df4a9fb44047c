// ABOUTME: Core database management with the embedded migration system for SQLite
// ABOUTME: Owns the connection pool and exposes user, workout, nutrition and goal operations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTrack Contributors

/// Goal storage and progress tracking
pub mod goals;
/// Nutrition log storage and daily summaries
pub mod nutrition;
/// User account management and authentication lookups
pub mod users;
/// Workout log storage
pub mod workouts;

pub use workouts::WorkoutFilter;

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};

/// How long a query waits for a free connection before the store counts as unavailable
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Database connection pool
#[derive(Clone, Debug)]
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Connect to the database and run all pending migrations
    ///
    /// `sqlite:` file URLs are created if missing; `sqlite::memory:` gives a
    /// private in-memory database backed by a single connection.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Database URL is invalid or malformed
    /// - Database connection fails
    /// - Migration process fails
    pub async fn new(database_url: &str) -> AppResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| AppError::config(format!("Invalid database URL: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true);

        // Every in-memory connection is a separate database, so pin the pool to one
        let max_connections = if database_url.contains(":memory:") {
            1
        } else {
            5
        };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect_with(options)
            .await
            .map_err(|e| {
                AppError::upstream_unavailable(format!("Failed to connect to database: {e}"))
            })?;

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Get a reference to the database pool for advanced operations
    #[must_use]
    pub const fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Run all database migrations
    ///
    /// # Errors
    ///
    /// Returns an error if any migration fails
    pub async fn migrate(&self) -> AppResult<()> {
        info!("Running database migrations...");

        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Migration failed: {e}")))?;

        info!("Database migrations completed successfully");
        Ok(())
    }

    /// Round-trip a trivial query to confirm the store is reachable
    ///
    /// # Errors
    ///
    /// Returns `UpstreamUnavailable` if the pool cannot serve a connection
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        debug!("Database ping succeeded");
        Ok(())
    }

    /// Close all pooled connections
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Parse a TEXT id column back into a `Uuid`
pub(crate) fn parse_uuid(raw: &str, column: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw)
        .map_err(|e| AppError::database(format!("Corrupt {column} value '{raw}': {e}")))
}

/// Parse a TEXT enum column
pub(crate) fn parse_enum<T>(raw: &str, column: &str) -> AppResult<T>
where
    T: FromStr<Err = String>,
{
    raw.parse()
        .map_err(|e: String| AppError::database(format!("Corrupt {column} value: {e}")))
}

/// Convert an INTEGER column that must fit in `u32`
pub(crate) fn to_u32(value: i64, column: &str) -> AppResult<u32> {
    u32::try_from(value)
        .map_err(|_| AppError::database(format!("Out-of-range {column} value: {value}")))
}

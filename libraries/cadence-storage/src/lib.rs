//! Cadence Storage
//!
//! SQLite persistence layer for Cadence. Stores track references,
//! per-guild tracklists, and player mode flags.
//!
//! # Architecture
//!
//! - **Vertical Slicing**: each entity owns its own queries and logic
//! - **Write-Through**: the queue engine persists after every mutation,
//!   so queries here are small and frequent
//! - **Backend-Agnostic Core**: the engine consumes the
//!   [`cadence_core::TrackStore`] trait; this crate provides the SQLite
//!   implementation via [`SqliteTrackStore`]
//!
//! # Example
//!
//! ```rust,no_run
//! use cadence_storage::{create_pool, run_migrations, SqliteTrackStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool("sqlite://cadence.db").await?;
//! run_migrations(&pool).await?;
//!
//! let store = SqliteTrackStore::new(pool);
//! # Ok(())
//! # }
//! ```

mod context;
mod error;

// Vertical slices
pub mod player_state;
pub mod track_refs;
pub mod tracklists;

pub use context::SqliteTrackStore;
pub use error::StorageError;

use sqlx::sqlite::SqlitePool;

/// Run database migrations
///
/// This should be called once when the application starts to ensure
/// the database schema is up to date.
///
/// # Errors
///
/// Returns an error if migrations fail to run
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), StorageError> {
    // Embedded migrations for reliability across different execution contexts
    const MIGRATIONS: &[&str] = &[
        include_str!("../migrations/20250501000001_create_track_refs.sql"),
        include_str!("../migrations/20250501000002_create_tracklists.sql"),
        include_str!("../migrations/20250501000003_create_guild_player_state.sql"),
    ];

    for migration in MIGRATIONS {
        sqlx::raw_sql(migration)
            .execute(pool)
            .await
            .map_err(|e| StorageError::Migration(e.to_string()))?;
    }

    Ok(())
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `<sqlite://cadence.db>`)
///
/// # Errors
///
/// Returns an error if the connection fails
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(std::time::Duration::from_secs(30));

    SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
}

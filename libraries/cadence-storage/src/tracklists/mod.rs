//! Tracklist persistence
//!
//! A tracklist row is the full ordered id sequence for one `(owner, name)`
//! key, stored as a JSON array. The queue engine saves after every
//! mutation, so the row is always the engine's latest view.

use cadence_core::types::{TrackId, Tracklist};
use sqlx::{Row, SqlitePool};

use crate::error::{Result, StorageError};

/// Load a tracklist, returning an empty one if no row exists yet
///
/// The row itself is created on first save.
pub async fn load(pool: &SqlitePool, owner_id: i64, name: &str) -> Result<Tracklist> {
    let row = sqlx::query("SELECT track_ids FROM tracklists WHERE owner_id = ? AND name = ?")
        .bind(owner_id)
        .bind(name)
        .fetch_optional(pool)
        .await?;

    match row {
        Some(row) => {
            let raw: String = row.get("track_ids");
            let track_ids: Vec<TrackId> = serde_json::from_str(&raw)
                .map_err(|e| StorageError::SerializationError(e.to_string()))?;
            Ok(Tracklist::with_tracks(owner_id, name, track_ids))
        }
        None => Ok(Tracklist::new(owner_id, name)),
    }
}

/// Upsert a tracklist
pub async fn save(pool: &SqlitePool, tracklist: &Tracklist) -> Result<()> {
    let track_ids = serde_json::to_string(tracklist.ids())
        .map_err(|e| StorageError::SerializationError(e.to_string()))?;
    let now = chrono::Utc::now().timestamp();

    sqlx::query(
        "INSERT INTO tracklists (owner_id, name, track_ids, updated_at) \
         VALUES (?, ?, ?, ?) \
         ON CONFLICT(owner_id, name) \
         DO UPDATE SET track_ids = excluded.track_ids, updated_at = excluded.updated_at",
    )
    .bind(tracklist.owner_id())
    .bind(tracklist.name())
    .bind(&track_ids)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(())
}

/// Delete a tracklist row
pub async fn delete(pool: &SqlitePool, owner_id: i64, name: &str) -> Result<()> {
    sqlx::query("DELETE FROM tracklists WHERE owner_id = ? AND name = ?")
        .bind(owner_id)
        .bind(name)
        .execute(pool)
        .await?;

    Ok(())
}

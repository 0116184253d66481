//! Track reference persistence
//!
//! One row per queued track. Rows are immutable once inserted; the
//! store assigns the `track_id` on first insert and the queue engine
//! addresses tracks by that id from then on.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use cadence_core::types::{CreateTrackRef, GuildId, SplitInfo, TrackId, TrackRef, UserId};
use chrono::DateTime;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use std::collections::HashMap;

use crate::error::{Result, StorageError};

const SELECT_COLUMNS: &str = "track_id, user_id, guild_id, added_at, duration_millis, \
     is_stream, is_split, split_title, split_start_millis, split_end_millis, encoded";

/// Persist a new track reference, assigning its id
pub async fn insert(pool: &SqlitePool, track: CreateTrackRef) -> Result<TrackRef> {
    let mut tx = pool.begin().await?;
    let persisted = insert_in_tx(&mut tx, track).await?;
    tx.commit().await?;
    Ok(persisted)
}

/// Persist a batch of new track references in one transaction
///
/// Returns the persisted refs in input order, ids assigned.
pub async fn insert_all(pool: &SqlitePool, tracks: Vec<CreateTrackRef>) -> Result<Vec<TrackRef>> {
    let mut tx = pool.begin().await?;

    let mut persisted = Vec::with_capacity(tracks.len());
    for track in tracks {
        persisted.push(insert_in_tx(&mut tx, track).await?);
    }

    tx.commit().await?;
    Ok(persisted)
}

async fn insert_in_tx(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    track: CreateTrackRef,
) -> Result<TrackRef> {
    let encoded = BASE64.encode(&track.encoded);
    let added_at = track.added_at.timestamp_millis();
    let (is_split, split_title, split_start, split_end) = match &track.split {
        Some(split) => (
            1i64,
            Some(split.title.clone()),
            Some(split.start_millis),
            Some(split.end_millis),
        ),
        None => (0, None, None, None),
    };

    let result = sqlx::query(
        "INSERT INTO track_refs (user_id, guild_id, added_at, duration_millis, is_stream, \
         is_split, split_title, split_start_millis, split_end_millis, encoded) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(track.user_id)
    .bind(track.guild_id)
    .bind(added_at)
    .bind(track.duration_millis)
    .bind(i64::from(track.is_stream))
    .bind(is_split)
    .bind(split_title)
    .bind(split_start)
    .bind(split_end)
    .bind(&encoded)
    .execute(&mut **tx)
    .await?;

    Ok(TrackRef {
        track_id: result.last_insert_rowid(),
        user_id: track.user_id,
        guild_id: track.guild_id,
        added_at: track.added_at,
        duration_millis: track.duration_millis,
        is_stream: track.is_stream,
        split: track.split,
        encoded: track.encoded,
    })
}

/// Load a single track reference
pub async fn get_by_id(pool: &SqlitePool, track_id: TrackId) -> Result<Option<TrackRef>> {
    let row = sqlx::query(&format!(
        "SELECT {SELECT_COLUMNS} FROM track_refs WHERE track_id = ?"
    ))
    .bind(track_id)
    .fetch_optional(pool)
    .await?;

    row.map(|row| track_ref_from_row(&row)).transpose()
}

/// Load several track references
///
/// Missing ids are silently omitted; request order and duplicates are
/// preserved for the ids that resolve.
pub async fn get_by_ids(pool: &SqlitePool, track_ids: &[TrackId]) -> Result<Vec<TrackRef>> {
    if track_ids.is_empty() {
        return Ok(Vec::new());
    }

    let distinct = distinct_ids(track_ids);
    let sql = format!(
        "SELECT {SELECT_COLUMNS} FROM track_refs WHERE track_id IN ({})",
        placeholders(distinct.len())
    );

    let mut query = sqlx::query(&sql);
    for id in &distinct {
        query = query.bind(*id);
    }
    let rows = query.fetch_all(pool).await?;

    let mut by_id: HashMap<TrackId, TrackRef> = HashMap::with_capacity(rows.len());
    for row in &rows {
        let track_ref = track_ref_from_row(row)?;
        by_id.insert(track_ref.track_id, track_ref);
    }

    Ok(track_ids
        .iter()
        .filter_map(|id| by_id.get(id).cloned())
        .collect())
}

/// Sum of `duration_millis` over the given ids within one guild
///
/// Each distinct id is counted once, so a track queued twice contributes
/// its duration once; stream rows contribute 0 by construction.
pub async fn sum_duration_millis(
    pool: &SqlitePool,
    guild_id: GuildId,
    track_ids: &[TrackId],
) -> Result<i64> {
    if track_ids.is_empty() {
        return Ok(0);
    }

    let distinct = distinct_ids(track_ids);
    let sql = format!(
        "SELECT COALESCE(SUM(duration_millis), 0) AS total FROM track_refs \
         WHERE guild_id = ? AND track_id IN ({})",
        placeholders(distinct.len())
    );

    let mut query = sqlx::query(&sql).bind(guild_id);
    for id in &distinct {
        query = query.bind(*id);
    }
    let row = query.fetch_one(pool).await?;

    Ok(row.get("total"))
}

/// Number of live streams among the given ids within one guild
pub async fn count_streams(
    pool: &SqlitePool,
    guild_id: GuildId,
    track_ids: &[TrackId],
) -> Result<i64> {
    if track_ids.is_empty() {
        return Ok(0);
    }

    let distinct = distinct_ids(track_ids);
    let sql = format!(
        "SELECT COUNT(*) AS total FROM track_refs \
         WHERE is_stream = 1 AND guild_id = ? AND track_id IN ({})",
        placeholders(distinct.len())
    );

    let mut query = sqlx::query(&sql).bind(guild_id);
    for id in &distinct {
        query = query.bind(*id);
    }
    let row = query.fetch_one(pool).await?;

    Ok(row.get("total"))
}

/// Number of the given tracks queued by someone other than `user_id`
pub async fn count_non_owned_among(
    pool: &SqlitePool,
    user_id: UserId,
    track_ids: &[TrackId],
) -> Result<i64> {
    if track_ids.is_empty() {
        return Ok(0);
    }

    let distinct = distinct_ids(track_ids);
    let sql = format!(
        "SELECT COUNT(*) AS total FROM track_refs \
         WHERE user_id != ? AND track_id IN ({})",
        placeholders(distinct.len())
    );

    let mut query = sqlx::query(&sql).bind(user_id);
    for id in &distinct {
        query = query.bind(*id);
    }
    let row = query.fetch_one(pool).await?;

    Ok(row.get("total"))
}

// Helper functions

fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

fn distinct_ids(track_ids: &[TrackId]) -> Vec<TrackId> {
    let mut distinct = track_ids.to_vec();
    distinct.sort_unstable();
    distinct.dedup();
    distinct
}

fn track_ref_from_row(row: &SqliteRow) -> Result<TrackRef> {
    let encoded_b64: String = row.get("encoded");
    let encoded = BASE64
        .decode(&encoded_b64)
        .map_err(|e| StorageError::SerializationError(e.to_string()))?;

    let added_at_millis: i64 = row.get("added_at");
    let added_at = DateTime::from_timestamp_millis(added_at_millis).ok_or_else(|| {
        StorageError::SerializationError(format!("invalid timestamp {added_at_millis}"))
    })?;

    let split = if row.get::<i64, _>("is_split") != 0 {
        Some(SplitInfo {
            title: row.get("split_title"),
            start_millis: row.get("split_start_millis"),
            end_millis: row.get("split_end_millis"),
        })
    } else {
        None
    };

    Ok(TrackRef {
        track_id: row.get("track_id"),
        user_id: row.get("user_id"),
        guild_id: row.get("guild_id"),
        added_at,
        duration_millis: row.get("duration_millis"),
        is_stream: row.get::<i64, _>("is_stream") != 0,
        split,
        encoded,
    })
}

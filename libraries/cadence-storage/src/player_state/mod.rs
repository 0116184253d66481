//! Guild player mode persistence
//!
//! Mode flags are written through on every change so a restarted process
//! resumes each guild in the mode it was left in.

use cadence_core::types::{GuildId, PlayerState, RepeatMode};
use sqlx::{Row, SqlitePool};

use crate::error::Result;

/// Get a guild's player state
///
/// Returns default state if none exists
pub async fn get(pool: &SqlitePool, guild_id: GuildId) -> Result<PlayerState> {
    let row = sqlx::query(
        "SELECT guild_id, shuffle_enabled, repeat_mode, updated_at \
         FROM guild_player_state WHERE guild_id = ?",
    )
    .bind(guild_id)
    .fetch_optional(pool)
    .await?;

    Ok(row
        .map(|r| PlayerState {
            guild_id: r.get("guild_id"),
            shuffle_enabled: r.get::<i64, _>("shuffle_enabled") != 0,
            repeat: RepeatMode::from_str(&r.get::<String, _>("repeat_mode"))
                .unwrap_or(RepeatMode::Off),
            updated_at: r.get("updated_at"),
        })
        .unwrap_or_else(|| PlayerState::new(guild_id)))
}

/// Create or update a guild's player state
pub async fn upsert(pool: &SqlitePool, state: &PlayerState) -> Result<()> {
    let shuffle_enabled = i64::from(state.shuffle_enabled);
    let repeat_mode = state.repeat.as_str();
    let now = chrono::Utc::now().timestamp();

    sqlx::query(
        "INSERT INTO guild_player_state (guild_id, shuffle_enabled, repeat_mode, updated_at) \
         VALUES (?, ?, ?, ?) \
         ON CONFLICT(guild_id) \
         DO UPDATE SET \
            shuffle_enabled = excluded.shuffle_enabled, \
            repeat_mode = excluded.repeat_mode, \
            updated_at = excluded.updated_at",
    )
    .bind(state.guild_id)
    .bind(shuffle_enabled)
    .bind(repeat_mode)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(())
}

/// Delete a guild's player state row
pub async fn delete(pool: &SqlitePool, guild_id: GuildId) -> Result<()> {
    sqlx::query("DELETE FROM guild_player_state WHERE guild_id = ?")
        .bind(guild_id)
        .execute(pool)
        .await?;

    Ok(())
}

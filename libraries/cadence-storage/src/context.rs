use crate::{player_state, track_refs, tracklists};
use async_trait::async_trait;
use cadence_core::error::Result;
use cadence_core::storage::TrackStore;
use cadence_core::types::{
    CreateTrackRef, GuildId, PlayerState, TrackId, TrackRef, Tracklist, UserId,
};
use sqlx::SqlitePool;

/// SQLite-backed [`TrackStore`]
pub struct SqliteTrackStore {
    pool: SqlitePool,
}

impl SqliteTrackStore {
    /// Wrap a pool as a track store
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// The underlying pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl TrackStore for SqliteTrackStore {
    // Tracklists

    async fn load_tracklist(&self, owner_id: i64, name: &str) -> Result<Tracklist> {
        Ok(tracklists::load(&self.pool, owner_id, name).await?)
    }

    async fn save_tracklist(&self, tracklist: &Tracklist) -> Result<()> {
        Ok(tracklists::save(&self.pool, tracklist).await?)
    }

    async fn delete_tracklist(&self, owner_id: i64, name: &str) -> Result<()> {
        Ok(tracklists::delete(&self.pool, owner_id, name).await?)
    }

    // Track references

    async fn load_track_ref(&self, track_id: TrackId) -> Result<Option<TrackRef>> {
        Ok(track_refs::get_by_id(&self.pool, track_id).await?)
    }

    async fn load_track_refs(&self, track_ids: &[TrackId]) -> Result<Vec<TrackRef>> {
        Ok(track_refs::get_by_ids(&self.pool, track_ids).await?)
    }

    async fn persist_track_ref(&self, track: CreateTrackRef) -> Result<TrackRef> {
        Ok(track_refs::insert(&self.pool, track).await?)
    }

    async fn persist_track_refs(&self, tracks: Vec<CreateTrackRef>) -> Result<Vec<TrackRef>> {
        Ok(track_refs::insert_all(&self.pool, tracks).await?)
    }

    // Aggregates

    async fn sum_duration_millis(&self, guild_id: GuildId, track_ids: &[TrackId]) -> Result<i64> {
        Ok(track_refs::sum_duration_millis(&self.pool, guild_id, track_ids).await?)
    }

    async fn count_streams(&self, guild_id: GuildId, track_ids: &[TrackId]) -> Result<i64> {
        Ok(track_refs::count_streams(&self.pool, guild_id, track_ids).await?)
    }

    async fn count_non_owned_among(&self, user_id: UserId, track_ids: &[TrackId]) -> Result<i64> {
        Ok(track_refs::count_non_owned_among(&self.pool, user_id, track_ids).await?)
    }

    // Player state

    async fn load_player_state(&self, guild_id: GuildId) -> Result<PlayerState> {
        Ok(player_state::get(&self.pool, guild_id).await?)
    }

    async fn save_player_state(&self, state: &PlayerState) -> Result<()> {
        Ok(player_state::upsert(&self.pool, state).await?)
    }

    async fn delete_player_state(&self, guild_id: GuildId) -> Result<()> {
        Ok(player_state::delete(&self.pool, guild_id).await?)
    }
}

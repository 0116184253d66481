//! Persistence store trait
//!
//! Abstracts the durable store for tracklists, track references, and
//! player state so the queue engine never knows which backend is active.

use crate::error::Result;
use crate::types::{
    CreateTrackRef, GuildId, PlayerState, TrackId, TrackRef, Tracklist, UserId,
};
use async_trait::async_trait;

/// Durable storage for queue contents
///
/// All mutating queue operations write through this trait from inside the
/// guild's critical section, so implementations should expect to be called
/// frequently with small payloads.
#[async_trait]
pub trait TrackStore: Send + Sync {
    // ========================================================================
    // Tracklists
    // ========================================================================

    /// Load a tracklist, creating an empty one if absent
    async fn load_tracklist(&self, owner_id: i64, name: &str) -> Result<Tracklist>;

    /// Upsert a tracklist
    async fn save_tracklist(&self, tracklist: &Tracklist) -> Result<()>;

    /// Delete a tracklist
    async fn delete_tracklist(&self, owner_id: i64, name: &str) -> Result<()>;

    // ========================================================================
    // Track references
    // ========================================================================

    /// Load a single track reference
    async fn load_track_ref(&self, track_id: TrackId) -> Result<Option<TrackRef>>;

    /// Load several track references
    ///
    /// Missing ids are silently omitted; request order and duplicates are
    /// preserved for the ids that resolve.
    async fn load_track_refs(&self, track_ids: &[TrackId]) -> Result<Vec<TrackRef>>;

    /// Persist a new track reference, assigning its id
    async fn persist_track_ref(&self, track: CreateTrackRef) -> Result<TrackRef>;

    /// Persist several new track references, assigning their ids
    async fn persist_track_refs(&self, tracks: Vec<CreateTrackRef>) -> Result<Vec<TrackRef>>;

    // ========================================================================
    // Aggregates
    // ========================================================================

    /// Sum of `duration_millis` over the given ids within one guild
    async fn sum_duration_millis(&self, guild_id: GuildId, track_ids: &[TrackId]) -> Result<i64>;

    /// Number of live streams among the given ids within one guild
    async fn count_streams(&self, guild_id: GuildId, track_ids: &[TrackId]) -> Result<i64>;

    /// Number of the given tracks queued by someone other than `user_id`
    async fn count_non_owned_among(&self, user_id: UserId, track_ids: &[TrackId]) -> Result<i64>;

    // ========================================================================
    // Player state
    // ========================================================================

    /// Load a guild's persisted mode flags, defaults if absent
    async fn load_player_state(&self, guild_id: GuildId) -> Result<PlayerState>;

    /// Upsert a guild's persisted mode flags
    async fn save_player_state(&self, state: &PlayerState) -> Result<()>;

    /// Delete a guild's persisted mode flags
    async fn delete_player_state(&self, guild_id: GuildId) -> Result<()>;
}

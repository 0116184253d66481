/// Persisted track reference types
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{GuildId, TrackId, UserId};

/// Metadata for a clip cut out of a longer track
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitInfo {
    /// Display title of the clip
    pub title: String,

    /// Clip start inside the source track, in milliseconds
    pub start_millis: i64,

    /// Clip end inside the source track, in milliseconds
    pub end_millis: i64,
}

/// A persisted, addressable reference to one queued track
///
/// Owned by the persistence store; the queue engine only ever holds the
/// `track_id`. The payload in `encoded` is opaque to the engine and is
/// turned back into a playable track by the platform's codec.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackRef {
    /// Store-assigned identifier, unique across all guilds
    pub track_id: TrackId,

    /// User who queued the track
    pub user_id: UserId,

    /// Guild whose queue the track belongs to
    pub guild_id: GuildId,

    /// When the track was queued
    pub added_at: DateTime<Utc>,

    /// Track duration in milliseconds; 0 for live streams
    pub duration_millis: i64,

    /// Whether the track is a live stream
    pub is_stream: bool,

    /// Present if the track is a clip cut out of a longer one
    pub split: Option<SplitInfo>,

    /// Codec-encoded platform track payload
    pub encoded: Vec<u8>,
}

/// Input for persisting a new track reference
///
/// Same shape as [`TrackRef`] minus the store-assigned id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTrackRef {
    /// User who queued the track
    pub user_id: UserId,

    /// Guild whose queue the track belongs to
    pub guild_id: GuildId,

    /// When the track was queued
    pub added_at: DateTime<Utc>,

    /// Track duration in milliseconds; 0 for live streams
    pub duration_millis: i64,

    /// Whether the track is a live stream
    pub is_stream: bool,

    /// Present if the track is a clip cut out of a longer one
    pub split: Option<SplitInfo>,

    /// Codec-encoded platform track payload
    pub encoded: Vec<u8>,
}

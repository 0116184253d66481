//! Queue-facing value types

use cadence_core::types::{SplitInfo, TrackId, TrackRef, UserId};

/// A track submitted for queueing, before the store has assigned an id
#[derive(Debug, Clone)]
pub struct NewTrack<T> {
    /// User queueing the track
    pub user_id: UserId,

    /// The platform track to encode and persist
    pub track: T,

    /// Present if only a clip of the track should play
    pub split: Option<SplitInfo>,
}

impl<T> NewTrack<T> {
    /// Queue a whole track
    pub fn new(user_id: UserId, track: T) -> Self {
        Self {
            user_id,
            track,
            split: None,
        }
    }

    /// Queue a clip cut out of a longer track
    pub fn clip(user_id: UserId, track: T, split: SplitInfo) -> Self {
        Self {
            user_id,
            track,
            split: Some(split),
        }
    }
}

/// A queued track resolved back into playable form
///
/// Pairs the persisted reference with the decoded platform track.
#[derive(Debug, Clone)]
pub struct QueuedTrack<T> {
    /// The persisted reference the track was resolved from
    pub track_ref: TrackRef,

    /// The decoded platform track, ready for the audio pipeline
    pub track: T,
}

impl<T> QueuedTrack<T> {
    /// Store-assigned track id
    pub fn track_id(&self) -> TrackId {
        self.track_ref.track_id
    }

    /// User who queued the track
    pub fn user_id(&self) -> UserId {
        self.track_ref.user_id
    }

    /// Duration in milliseconds, 0 for live streams
    pub fn duration_millis(&self) -> i64 {
        self.track_ref.duration_millis
    }

    /// Whether the track is a live stream
    pub fn is_stream(&self) -> bool {
        self.track_ref.is_stream
    }
}

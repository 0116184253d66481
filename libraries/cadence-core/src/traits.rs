//! Platform-facing traits
//!
//! The queue engine never touches the chat platform's audio types
//! directly. Platforms plug in by implementing these traits.

use crate::error::Result;

/// Minimal view of a platform audio track
///
/// Just enough surface for the engine to derive persisted metadata when a
/// track is queued.
pub trait AudioTrack: Clone + Send + Sync {
    /// Track duration in milliseconds
    ///
    /// Live streams report unbounded values; the engine stores 0 for them.
    fn duration_millis(&self) -> i64;

    /// Whether the track is a live stream
    fn is_stream(&self) -> bool;
}

/// Encodes and decodes platform audio tracks to and from bytes
///
/// Owned by the surrounding audio-playback subsystem. The encoded payload
/// is opaque to the engine and the store.
pub trait TrackCodec: Send + Sync {
    /// The platform's audio track type
    type Track: AudioTrack;

    /// Encode a track into an opaque payload
    fn encode(&self, track: &Self::Track) -> Result<Vec<u8>>;

    /// Decode a payload back into a track
    ///
    /// Returns `None` if the payload is corrupt or no longer decodable;
    /// callers treat that as a skippable entry, never as a fatal error.
    fn decode(&self, bytes: &[u8]) -> Option<Self::Track>;
}

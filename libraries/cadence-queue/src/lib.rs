//! Cadence Queue
//!
//! The per-guild persistent playback queue engine.
//!
//! Each guild owns one [`TrackProvider`]. The provider keeps two persisted
//! orderings of the same logical track set - an insertion-ordered
//! tracklist and a shuffled one - decides which track plays next under
//! the configured repeat mode, and reconciles the two orderings whenever
//! shuffle mode is toggled. All queue contents are written through to a
//! [`cadence_core::TrackStore`], so a process restart picks the queue up
//! where it left off.
//!
//! # Architecture
//!
//! `cadence-queue` is platform-agnostic:
//! - The chat platform's audio track type plugs in via
//!   [`cadence_core::TrackCodec`]
//! - The storage backend plugs in via [`cadence_core::TrackStore`]
//! - One `tokio` mutex per guild guards both tracklists and the mode
//!   flags together; guilds never contend with each other
//!
//! # Example
//!
//! ```rust,ignore
//! use cadence_queue::{NewTrack, TrackProvider};
//! use cadence_core::RepeatMode;
//!
//! let provider = TrackProvider::new(guild_id, store, codec).await?;
//!
//! provider.add(NewTrack::new(user_id, track)).await?;
//! provider.set_shuffle(true).await?;
//! provider.set_repeat_mode(RepeatMode::All).await?;
//!
//! while let Some(queued) = provider.provide_audio_track().await? {
//!     // feed queued.track to the audio pipeline
//! }
//! ```

#![forbid(unsafe_code)]

mod provider;
mod types;

pub use provider::TrackProvider;
pub use types::{NewTrack, QueuedTrack};

// Re-export the mode enum so callers rarely need cadence-core directly
pub use cadence_core::types::RepeatMode;

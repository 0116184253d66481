//! Cadence Core
//!
//! Platform-agnostic core types, traits, and error handling for Cadence,
//! a per-guild music queue engine.
//!
//! This crate provides the foundational building blocks shared by the
//! queue engine and the storage backends:
//! - **Domain Types**: [`TrackRef`], [`Tracklist`], [`PlayerState`], etc.
//! - **Core Traits**: [`TrackStore`], [`TrackCodec`], [`AudioTrack`]
//! - **Error Handling**: Unified [`CadenceError`] and [`Result`] types
//!
//! # Example
//!
//! ```rust
//! use cadence_core::types::Tracklist;
//!
//! let mut list = Tracklist::new(1234567890, Tracklist::REGULAR);
//! list.append(1);
//! list.append(2);
//! assert_eq!(list.len(), 2);
//! assert_eq!(list.get(0), Some(1));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod storage;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{CadenceError, Result};
pub use storage::TrackStore;
pub use traits::{AudioTrack, TrackCodec};
pub use types::{
    CreateTrackRef, GuildId, PlayerState, RepeatMode, SplitInfo, TrackId, TrackRef, Tracklist,
    TracklistId, UserId,
};

//! Domain types for Cadence

mod ids;
mod player;
mod track;
mod tracklist;

pub use ids::{GuildId, TrackId, UserId};
pub use player::{PlayerState, RepeatMode};
pub use track::{CreateTrackRef, SplitInfo, TrackRef};
pub use tracklist::{Tracklist, TracklistId};

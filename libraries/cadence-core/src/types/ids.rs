//! ID types for Cadence entities
//!
//! Guild and user ids are platform snowflakes; track ids are assigned by
//! the persistence store on first insert.

/// Guild (chat community) identifier
pub type GuildId = i64;

/// User identifier
pub type UserId = i64;

/// Persisted track reference identifier
pub type TrackId = i64;

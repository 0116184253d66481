/// Persisted per-guild player mode state
use serde::{Deserialize, Serialize};

use super::ids::GuildId;

/// Playback continuation policy applied after a track finishes naturally
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    /// Stop when the queue ends
    #[default]
    Off,

    /// Loop the current track only
    Single,

    /// Loop the entire queue
    All,
}

impl RepeatMode {
    /// Convert to string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Single => "single",
            Self::All => "all",
        }
    }

    /// Parse from string
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "off" => Some(Self::Off),
            "single" => Some(Self::Single),
            "all" => Some(Self::All),
            _ => None,
        }
    }
}

impl std::fmt::Display for RepeatMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A guild player's persisted mode flags
///
/// Written through whenever shuffle or repeat mode changes so the queue
/// engine comes back up in the same mode after a restart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    /// Guild this state belongs to
    pub guild_id: GuildId,

    /// Whether the shuffled list is the active one
    pub shuffle_enabled: bool,

    /// Repeat mode
    pub repeat: RepeatMode,

    /// Last update timestamp (Unix epoch seconds)
    pub updated_at: i64,
}

impl PlayerState {
    /// Default state for a guild that has no persisted row yet
    pub fn new(guild_id: GuildId) -> Self {
        Self {
            guild_id,
            shuffle_enabled: false,
            repeat: RepeatMode::Off,
            updated_at: 0,
        }
    }
}

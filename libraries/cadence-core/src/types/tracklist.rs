//! Ordered, persisted track id sequences
//!
//! Two tracklists exist per guild, `"regular"` and `"shuffled"`. They hold
//! the same multiset of track ids; only their ordering differs. This type
//! is a plain value: persistence is write-through at the call sites in the
//! queue engine.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::ids::TrackId;

/// Composite identity of a tracklist: owner plus list name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TracklistId {
    /// Owner of the list, usually a guild id
    pub owner_id: i64,

    /// List name, e.g. `"regular"` or `"shuffled"`
    pub name: String,
}

impl TracklistId {
    /// Create a new tracklist identity
    pub fn new(owner_id: i64, name: impl Into<String>) -> Self {
        Self {
            owner_id,
            name: name.into(),
        }
    }
}

/// An ordered sequence of track ids scoped to an `(owner, name)` key
///
/// Duplicates are allowed and insertion order is meaningful.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tracklist {
    id: TracklistId,
    track_ids: Vec<TrackId>,
}

impl Tracklist {
    /// Name of the insertion-ordered list
    pub const REGULAR: &'static str = "regular";

    /// Name of the shuffled list
    pub const SHUFFLED: &'static str = "shuffled";

    /// Create a new empty tracklist
    pub fn new(owner_id: i64, name: impl Into<String>) -> Self {
        Self {
            id: TracklistId::new(owner_id, name),
            track_ids: Vec::new(),
        }
    }

    /// Create a tracklist with initial contents
    pub fn with_tracks(owner_id: i64, name: impl Into<String>, track_ids: Vec<TrackId>) -> Self {
        Self {
            id: TracklistId::new(owner_id, name),
            track_ids,
        }
    }

    /// The list's identity key
    pub fn id(&self) -> &TracklistId {
        &self.id
    }

    /// Owner of the list
    pub fn owner_id(&self) -> i64 {
        self.id.owner_id
    }

    /// Name of the list
    pub fn name(&self) -> &str {
        &self.id.name
    }

    /// All ids in list order
    pub fn ids(&self) -> &[TrackId] {
        &self.track_ids
    }

    /// Get the id at `index`
    pub fn get(&self, index: usize) -> Option<TrackId> {
        self.track_ids.get(index).copied()
    }

    /// Slice of ids in `[from, to)`, clamped to the list bounds
    ///
    /// An inverted or out-of-bounds range yields an empty slice.
    pub fn subrange(&self, from: usize, to: usize) -> &[TrackId] {
        let from = from.min(self.track_ids.len());
        let to = to.clamp(from, self.track_ids.len());
        &self.track_ids[from..to]
    }

    /// Append an id to the end of the list
    pub fn append(&mut self, track_id: TrackId) {
        self.track_ids.push(track_id);
    }

    /// Append several ids, preserving their order
    pub fn append_all(&mut self, track_ids: impl IntoIterator<Item = TrackId>) {
        self.track_ids.extend(track_ids);
    }

    /// Insert an id at a uniformly random position in `[0, len]`
    pub fn insert_at_random_index(&mut self, track_id: TrackId) {
        let index = rand::thread_rng().gen_range(0..=self.track_ids.len());
        self.track_ids.insert(index, track_id);
    }

    /// Remove and return the id at `index`
    pub fn remove_at(&mut self, index: usize) -> Option<TrackId> {
        if index < self.track_ids.len() {
            Some(self.track_ids.remove(index))
        } else {
            None
        }
    }

    /// Remove the first occurrence of `track_id`
    ///
    /// Returns whether an occurrence was found.
    pub fn remove_value(&mut self, track_id: TrackId) -> bool {
        if let Some(pos) = self.track_ids.iter().position(|&id| id == track_id) {
            self.track_ids.remove(pos);
            true
        } else {
            false
        }
    }

    /// Remove every occurrence of each of the given ids
    pub fn remove_all(&mut self, track_ids: &[TrackId]) {
        let to_remove: HashSet<TrackId> = track_ids.iter().copied().collect();
        self.track_ids.retain(|id| !to_remove.contains(id));
    }

    /// Remove all ids
    pub fn clear(&mut self) {
        self.track_ids.clear();
    }

    /// Shuffle the list in place (Fisher-Yates)
    pub fn shuffle(&mut self) {
        self.track_ids.shuffle(&mut rand::thread_rng());
    }

    /// Number of ids in the list
    pub fn len(&self) -> usize {
        self.track_ids.len()
    }

    /// Whether the list holds no ids
    pub fn is_empty(&self) -> bool {
        self.track_ids.is_empty()
    }
}

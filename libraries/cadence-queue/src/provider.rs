//! The per-guild queue engine
//!
//! Keeps a regular tracklist and a shuffled one around. Only the list
//! currently used to play is fully up to date; the two are reconciled
//! when switching between regular and shuffled mode. For a more
//! elaborate explanation see [`TrackProvider::sync_lists`].

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{debug, error, warn};

use cadence_core::error::Result;
use cadence_core::storage::TrackStore;
use cadence_core::traits::{AudioTrack, TrackCodec};
use cadence_core::types::{
    CreateTrackRef, GuildId, PlayerState, RepeatMode, TrackId, Tracklist, UserId,
};

use crate::types::{NewTrack, QueuedTrack};

/// The queue engine for one guild
///
/// Owns both persisted tracklists, the shuffle flag, the repeat mode, and
/// the last-delivered-track pointer. Every public operation takes the
/// guild's lock for its full duration, and every mutation is written
/// through to the store before the operation returns. Constructed once
/// per guild session; different guilds never contend.
pub struct TrackProvider<S, C>
where
    S: TrackStore,
    C: TrackCodec,
{
    guild_id: GuildId,
    store: Arc<S>,
    codec: Arc<C>,
    state: Mutex<ProviderState>,
}

/// Everything the guild lock protects, kept in one struct so no field can
/// be locked without the others
struct ProviderState {
    regular: Tracklist,
    shuffled: Tracklist,
    shuffle_enabled: bool,
    repeat: RepeatMode,
    last_track_id: Option<TrackId>,
}

impl ProviderState {
    fn active(&self) -> &Tracklist {
        if self.shuffle_enabled {
            &self.shuffled
        } else {
            &self.regular
        }
    }
}

impl<S, C> TrackProvider<S, C>
where
    S: TrackStore,
    C: TrackCodec,
{
    /// Create the provider for a guild, loading persisted queue state
    ///
    /// Both tracklists are loaded (lazily created when absent) and the
    /// guild's mode flags are restored, so a restarted process resumes
    /// where it left off.
    pub async fn new(guild_id: GuildId, store: Arc<S>, codec: Arc<C>) -> Result<Self> {
        debug!(guild_id, "constructing track provider");

        let regular = store.load_tracklist(guild_id, Tracklist::REGULAR).await?;
        let shuffled = store.load_tracklist(guild_id, Tracklist::SHUFFLED).await?;
        let player = store.load_player_state(guild_id).await?;

        Ok(Self {
            guild_id,
            store,
            codec,
            state: Mutex::new(ProviderState {
                regular,
                shuffled,
                shuffle_enabled: player.shuffle_enabled,
                repeat: player.repeat,
                last_track_id: None,
            }),
        })
    }

    /// The guild this provider belongs to
    pub fn guild_id(&self) -> GuildId {
        self.guild_id
    }

    /// Whether the shuffled list is the active one
    pub async fn shuffle_enabled(&self) -> bool {
        self.state.lock().await.shuffle_enabled
    }

    /// Switch between the regular and the shuffled ordering
    ///
    /// A real mode change reconciles the list becoming active against the
    /// one that was active before flipping the flag.
    pub async fn set_shuffle(&self, enabled: bool) -> Result<()> {
        debug!(guild_id = self.guild_id, enabled, "set_shuffle() called");

        let mut state = self.state.lock().await;
        if state.shuffle_enabled == enabled {
            return Ok(());
        }

        self.sync_lists(&mut state, enabled).await?;
        state.shuffle_enabled = enabled;
        self.save_player_state(&state).await
    }

    /// Current repeat mode
    pub async fn repeat_mode(&self) -> RepeatMode {
        self.state.lock().await.repeat
    }

    /// Set the repeat mode
    pub async fn set_repeat_mode(&self, mode: RepeatMode) -> Result<()> {
        debug!(guild_id = self.guild_id, %mode, "set_repeat_mode() called");

        let mut state = self.state.lock().await;
        if state.repeat == mode {
            return Ok(());
        }

        state.repeat = mode;
        self.save_player_state(&state).await
    }

    /// Forget the last delivered track
    ///
    /// Called when a track is skipped rather than finishing naturally, so
    /// a skip is not replayed under [`RepeatMode::All`] or
    /// [`RepeatMode::Single`].
    pub async fn skipped(&self) {
        debug!(guild_id = self.guild_id, "skipped() called");

        self.state.lock().await.last_track_id = None;
    }

    /// Return the next track to play and advance the queue
    ///
    /// Under [`RepeatMode::Single`] the last delivered track is returned
    /// again as a fresh copy without consuming anything. Under
    /// [`RepeatMode::All`] a copy of the last delivered id is pushed back
    /// onto the active list before the head is popped. A head that can no
    /// longer be resolved or decoded is logged and consumed, yielding
    /// `None` for this call; the next call moves past it.
    pub async fn provide_audio_track(&self) -> Result<Option<QueuedTrack<C::Track>>> {
        debug!(guild_id = self.guild_id, "provide_audio_track() called");

        let mut state = self.state.lock().await;

        if state.repeat == RepeatMode::Single {
            if let Some(last_id) = state.last_track_id {
                return self.resolve(last_id).await;
            }
        }

        if state.repeat == RepeatMode::All {
            // the queue is being repeated: put a fresh copy of the last
            // track back before handing out the next one
            if let Some(last_id) = state.last_track_id {
                if state.shuffle_enabled {
                    state.shuffled.insert_at_random_index(last_id);
                    self.store.save_tracklist(&state.shuffled).await?;
                } else {
                    state.regular.append(last_id);
                    self.store.save_tracklist(&state.regular).await?;
                }
            }
        }

        let next = self.pop_head(&mut state).await?;
        state.last_track_id = next.as_ref().map(QueuedTrack::track_id);
        Ok(next)
    }

    /// Report the literal next queued item without consuming it
    ///
    /// Ignores repeat-mode special-casing and never touches the
    /// last-delivered pointer.
    pub async fn peek(&self) -> Result<Option<QueuedTrack<C::Track>>> {
        debug!(guild_id = self.guild_id, "peek() called");

        let state = self.state.lock().await;
        let Some(track_id) = state.active().get(0) else {
            return Ok(None);
        };
        self.resolve(track_id).await
    }

    /// Queue one track
    ///
    /// The payload is encoded and persisted first (the store assigns the
    /// id), then the id is appended to the regular list and inserted at a
    /// random position in the shuffled list, keeping both in sync without
    /// a full reconciliation.
    pub async fn add(&self, track: NewTrack<C::Track>) -> Result<()> {
        debug!(guild_id = self.guild_id, "add() called");

        let create = self.create_ref(&track)?;

        let mut state = self.state.lock().await;
        let track_ref = self.store.persist_track_ref(create).await?;

        state.shuffled.insert_at_random_index(track_ref.track_id);
        self.store.save_tracklist(&state.shuffled).await?;
        state.regular.append(track_ref.track_id);
        self.store.save_tracklist(&state.regular).await?;

        Ok(())
    }

    /// Queue a batch of tracks
    ///
    /// Tracks whose payload cannot be encoded are logged and skipped; the
    /// remainder is persisted and enqueued in one pass.
    pub async fn add_all(&self, tracks: Vec<NewTrack<C::Track>>) -> Result<()> {
        debug!(guild_id = self.guild_id, count = tracks.len(), "add_all() called");

        let mut creates = Vec::with_capacity(tracks.len());
        for track in &tracks {
            match self.create_ref(track) {
                Ok(create) => creates.push(create),
                Err(e) => {
                    error!(guild_id = self.guild_id, error = %e, "skipping track that failed to encode");
                }
            }
        }

        let mut state = self.state.lock().await;
        let refs = self.store.persist_track_refs(creates).await?;

        for track_ref in &refs {
            state.shuffled.insert_at_random_index(track_ref.track_id);
        }
        self.store.save_tracklist(&state.shuffled).await?;
        state.regular.append_all(refs.iter().map(|r| r.track_id));
        self.store.save_tracklist(&state.regular).await?;

        Ok(())
    }

    /// Remove one track from the queue
    ///
    /// Returns whether the regular-list removal succeeded. A disagreement
    /// between the lists means the multiset invariant was already broken;
    /// it is logged and the active list remains ground truth.
    pub async fn remove(&self, track_id: TrackId) -> Result<bool> {
        debug!(guild_id = self.guild_id, track_id, "remove() called");

        let mut state = self.state.lock().await;

        let shuffled_removed = state.shuffled.remove_value(track_id);
        self.store.save_tracklist(&state.shuffled).await?;
        let regular_removed = state.regular.remove_value(track_id);
        self.store.save_tracklist(&state.regular).await?;

        if shuffled_removed != regular_removed {
            warn!(
                guild_id = self.guild_id,
                track_id, "regular and shuffled lists disagree on membership"
            );
        }

        Ok(regular_removed)
    }

    /// Remove every occurrence of each given id from both lists
    pub async fn remove_all_by_id(&self, track_ids: &[TrackId]) -> Result<()> {
        debug!(
            guild_id = self.guild_id,
            count = track_ids.len(),
            "remove_all_by_id() called"
        );

        let mut state = self.state.lock().await;

        state.shuffled.remove_all(track_ids);
        self.store.save_tracklist(&state.shuffled).await?;
        state.regular.remove_all(track_ids);
        self.store.save_tracklist(&state.regular).await?;

        Ok(())
    }

    /// Empty the queue and forget the last delivered track
    pub async fn clear(&self) -> Result<()> {
        debug!(guild_id = self.guild_id, "clear() called");

        let mut state = self.state.lock().await;
        state.last_track_id = None;

        state.shuffled.clear();
        self.store.save_tracklist(&state.shuffled).await?;
        state.regular.clear();
        self.store.save_tracklist(&state.regular).await?;

        Ok(())
    }

    /// Re-randomize the shuffled list in place
    ///
    /// The regular list is untouched; the drift is corrected by the next
    /// mode switch.
    pub async fn reshuffle(&self) -> Result<()> {
        debug!(guild_id = self.guild_id, "reshuffle() called");

        let mut state = self.state.lock().await;
        state.shuffled.shuffle();
        self.store.save_tracklist(&state.shuffled).await
    }

    /// Resolve the full queue contents in insertion order
    ///
    /// Reconciles the inactive list first so the returned view is current
    /// even while the shuffled list is the one playing.
    pub async fn get_as_list(&self) -> Result<Vec<QueuedTrack<C::Track>>> {
        debug!(guild_id = self.guild_id, "get_as_list() called");

        let mut state = self.state.lock().await;
        let opposite = !state.shuffle_enabled;
        self.sync_lists(&mut state, opposite).await?;

        let track_ids = state.regular.ids().to_vec();
        self.resolve_all(&track_ids).await
    }

    /// Resolve the full queue contents in active-list order
    pub async fn get_as_list_ordered(&self) -> Result<Vec<QueuedTrack<C::Track>>> {
        debug!(guild_id = self.guild_id, "get_as_list_ordered() called");

        let mut state = self.state.lock().await;
        let opposite = !state.shuffle_enabled;
        self.sync_lists(&mut state, opposite).await?;

        let track_ids = state.active().ids().to_vec();
        self.resolve_all(&track_ids).await
    }

    /// Resolve the active-list tracks between two indices
    ///
    /// Indices may be given in either order and are clamped to the list
    /// bounds; an out-of-range pair yields an empty list, never an error.
    pub async fn get_tracks_in_range(
        &self,
        index_a: i64,
        index_b: i64,
    ) -> Result<Vec<QueuedTrack<C::Track>>> {
        debug!(
            guild_id = self.guild_id,
            index_a, index_b, "get_tracks_in_range() called"
        );

        let state = self.state.lock().await;
        let start = index_a.min(index_b).max(0) as usize;
        let end = index_a.max(index_b).max(0) as usize;
        let track_ids = state.active().subrange(start, end).to_vec();

        self.resolve_all(&track_ids).await
    }

    /// Number of tracks in the active list
    pub async fn size(&self) -> usize {
        self.state.lock().await.active().len()
    }

    /// Whether the active list is empty
    pub async fn is_empty(&self) -> bool {
        self.state.lock().await.active().is_empty()
    }

    /// Total runtime of the queued tracks in milliseconds
    ///
    /// Answered by the store so persisted metadata stays authoritative;
    /// live streams contribute 0.
    pub async fn duration_millis_remaining(&self) -> Result<i64> {
        debug!(guild_id = self.guild_id, "duration_millis_remaining() called");

        let state = self.state.lock().await;
        self.store
            .sum_duration_millis(self.guild_id, state.active().ids())
            .await
    }

    /// Number of live streams in the queue
    pub async fn streams_count(&self) -> Result<i64> {
        debug!(guild_id = self.guild_id, "streams_count() called");

        let state = self.state.lock().await;
        self.store
            .count_streams(self.guild_id, state.active().ids())
            .await
    }

    /// Whether every one of the given tracks was queued by `user_id`
    ///
    /// An empty id collection is vacuously true: there is nothing to
    /// disprove ownership of.
    pub async fn is_sole_owner(&self, user_id: UserId, track_ids: &[TrackId]) -> Result<bool> {
        if track_ids.is_empty() {
            return Ok(true);
        }

        let non_owned = self.store.count_non_owned_among(user_id, track_ids).await?;
        Ok(non_owned == 0)
    }

    /// Drop all persisted state for this guild
    ///
    /// Deletes both tracklist rows and the player state row; used when a
    /// guild session is torn down for good.
    pub async fn prune(&self) -> Result<()> {
        debug!(guild_id = self.guild_id, "prune() called");

        let mut state = self.state.lock().await;
        state.last_track_id = None;
        state.regular.clear();
        state.shuffled.clear();

        self.store
            .delete_tracklist(self.guild_id, Tracklist::REGULAR)
            .await?;
        self.store
            .delete_tracklist(self.guild_id, Tracklist::SHUFFLED)
            .await?;
        self.store.delete_player_state(self.guild_id).await?;

        Ok(())
    }

    // Pop the head of the active list and resolve it
    async fn pop_head(&self, state: &mut ProviderState) -> Result<Option<QueuedTrack<C::Track>>> {
        let track_id = if state.shuffle_enabled {
            let Some(track_id) = state.shuffled.get(0) else {
                return Ok(None);
            };
            state.shuffled.remove_at(0);
            self.store.save_tracklist(&state.shuffled).await?;
            track_id
        } else {
            let Some(track_id) = state.regular.get(0) else {
                return Ok(None);
            };
            state.regular.remove_at(0);
            self.store.save_tracklist(&state.regular).await?;
            track_id
        };

        self.resolve(track_id).await
    }

    // Load one id from the store and decode it. Absent or undecodable
    // entries are logged and reported as None, never as an error.
    async fn resolve(&self, track_id: TrackId) -> Result<Option<QueuedTrack<C::Track>>> {
        let Some(track_ref) = self.store.load_track_ref(track_id).await? else {
            warn!(
                guild_id = self.guild_id,
                track_id, "track missing from the store, skipping"
            );
            return Ok(None);
        };

        match self.codec.decode(&track_ref.encoded) {
            Some(track) => Ok(Some(QueuedTrack { track_ref, track })),
            None => {
                error!(
                    guild_id = self.guild_id,
                    track_id, "could not decode track payload, skipping"
                );
                Ok(None)
            }
        }
    }

    // Batch form of resolve, dropping entries that fail to decode
    async fn resolve_all(&self, track_ids: &[TrackId]) -> Result<Vec<QueuedTrack<C::Track>>> {
        let refs = self.store.load_track_refs(track_ids).await?;

        let mut tracks = Vec::with_capacity(refs.len());
        for track_ref in refs {
            match self.codec.decode(&track_ref.encoded) {
                Some(track) => tracks.push(QueuedTrack { track_ref, track }),
                None => {
                    error!(
                        guild_id = self.guild_id,
                        track_id = track_ref.track_id,
                        "could not decode track payload, skipping"
                    );
                }
            }
        }
        Ok(tracks)
    }

    // Build the persistable form of a submitted track
    fn create_ref(&self, track: &NewTrack<C::Track>) -> Result<CreateTrackRef> {
        let encoded = self.codec.encode(&track.track)?;
        let is_stream = track.track.is_stream();

        // streams report unbounded durations, store 0 instead
        let duration_millis = if is_stream {
            0
        } else if let Some(split) = &track.split {
            split.end_millis - split.start_millis
        } else {
            track.track.duration_millis()
        };

        Ok(CreateTrackRef {
            user_id: track.user_id,
            guild_id: self.guild_id,
            added_at: Utc::now(),
            duration_millis,
            is_stream,
            split: track.split.clone(),
            encoded,
        })
    }

    async fn save_player_state(&self, state: &ProviderState) -> Result<()> {
        self.store
            .save_player_state(&PlayerState {
                guild_id: self.guild_id,
                shuffle_enabled: state.shuffle_enabled,
                repeat: state.repeat,
                updated_at: Utc::now().timestamp(),
            })
            .await
    }

    // While one list is playing, tracks popped from it cannot be removed
    // from a sensible position in the other: users keep adding and
    // removing songs in the meantime, so neither a saved index nor the
    // removed item's neighbours stay valid. Instead the lists are
    // reconciled once, when switching between them: ids the source no
    // longer contains are dropped from the target (preserving the
    // target's relative order for the rest), and ids the target never saw
    // are inserted - appended for the regular list, shuffled in for the
    // shuffled one.
    async fn sync_lists(&self, state: &mut ProviderState, requested_shuffle: bool) -> Result<()> {
        if requested_shuffle == state.shuffle_enabled {
            // no actual change of the shuffle mode, nothing to sync
            return Ok(());
        }

        debug!(guild_id = self.guild_id, "sync_lists() called");

        let (source, target, random_insert) = if state.shuffle_enabled {
            // syncing shuffled -> regular
            (&state.shuffled, &mut state.regular, false)
        } else {
            // syncing regular -> shuffled
            (&state.regular, &mut state.shuffled, true)
        };

        // scratch multiset of the source's contents that we can consume
        // without touching the real list
        let mut all = Tracklist::with_tracks(0, "scratch", source.ids().to_vec());

        let old_list = target.ids().to_vec();
        target.clear();

        // keep ids still present in the source, in the target's own order
        for track_id in old_list {
            if all.remove_value(track_id) {
                target.append(track_id);
            }
        }
        // bring over ids added to the source while the target was inactive
        for &leftover in all.ids() {
            if random_insert {
                target.insert_at_random_index(leftover);
            } else {
                target.append(leftover);
            }
        }

        self.store.save_tracklist(target).await
    }
}

//! Restart and durability tests against the real SQLite store
//!
//! Uses real database files (not in-memory) so the restart simulation
//! goes through the same pool setup and migrations as production.


use std::sync::Arc;

use cadence_core::types::{RepeatMode, Tracklist};
use cadence_queue::{NewTrack, TrackProvider};
use cadence_storage::SqliteTrackStore;
use tempfile::TempDir;
use test_helpers::{stream, track, TestCodec, GUILD, USER};

type Provider = TrackProvider<SqliteTrackStore, TestCodec>;

struct TestDb {
    url: String,
    _temp_dir: TempDir,
}

impl TestDb {
    fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");
        Self {
            url: format!("sqlite://{}", db_path.display()),
            _temp_dir: temp_dir,
        }
    }

    /// Fresh pool and store against the same database file, as a restarted
    /// process would create them
    async fn open_store(&self) -> Arc<SqliteTrackStore> {
        let pool = cadence_storage::create_pool(&self.url)
            .await
            .expect("Failed to create pool");
        cadence_storage::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        Arc::new(SqliteTrackStore::new(pool))
    }
}

async fn new_provider(store: &Arc<SqliteTrackStore>) -> Provider {
    TrackProvider::new(GUILD, Arc::clone(store), Arc::new(TestCodec))
        .await
        .expect("provider")
}

#[tokio::test]
async fn queue_and_modes_survive_a_restart() {
    let db = TestDb::new();

    {
        let store = db.open_store().await;
        let provider = new_provider(&store).await;
        for title in ["a", "b", "c"] {
            provider.add(NewTrack::new(USER, track(title))).await.unwrap();
        }
        provider.set_shuffle(true).await.unwrap();
        provider.set_repeat_mode(RepeatMode::All).await.unwrap();
    }

    // simulated restart: new pool, new store, new provider
    let store = db.open_store().await;
    let revived = new_provider(&store).await;

    assert_eq!(revived.size().await, 3);
    assert!(revived.shuffle_enabled().await);
    assert_eq!(revived.repeat_mode().await, RepeatMode::All);

    let titles: Vec<_> = revived
        .get_as_list()
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.track.title)
        .collect();
    assert_eq!(titles, vec!["a", "b", "c"]);
}

#[tokio::test]
async fn every_mutation_is_visible_in_storage_immediately() {
    let db = TestDb::new();
    let store = db.open_store().await;
    let provider = new_provider(&store).await;

    provider.add(NewTrack::new(USER, track("a"))).await.unwrap();
    provider.add(NewTrack::new(USER, stream("radio"))).await.unwrap();

    // read the rows through a second store handle, like an external
    // process inspecting the database mid-session
    let observer = db.open_store().await;
    let regular = cadence_storage::tracklists::load(observer.pool(), GUILD, Tracklist::REGULAR)
        .await
        .unwrap();
    let shuffled = cadence_storage::tracklists::load(observer.pool(), GUILD, Tracklist::SHUFFLED)
        .await
        .unwrap();

    assert_eq!(regular.len(), 2);
    assert_eq!(shuffled.len(), 2);

    let refs = cadence_storage::track_refs::get_by_ids(observer.pool(), regular.ids())
        .await
        .unwrap();
    assert_eq!(refs.len(), 2);
    assert!(refs.iter().any(|r| r.is_stream));
}

#[tokio::test]
async fn corrupted_payload_rows_are_skipped_not_fatal() {
    let db = TestDb::new();
    let store = db.open_store().await;
    let provider = new_provider(&store).await;

    provider.add(NewTrack::new(USER, track("bad"))).await.unwrap();
    provider.add(NewTrack::new(USER, track("good"))).await.unwrap();

    // garble the first payload behind the engine's back; the stored text
    // is valid base64 but the codec cannot make sense of the bytes
    let first_id = cadence_storage::tracklists::load(store.pool(), GUILD, Tracklist::REGULAR)
        .await
        .unwrap()
        .get(0)
        .unwrap();
    sqlx::query("UPDATE track_refs SET encoded = 'Z2FyYmFnZQ==' WHERE track_id = ?")
        .bind(first_id)
        .execute(store.pool())
        .await
        .unwrap();

    let titles: Vec<_> = provider
        .get_as_list()
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.track.title)
        .collect();
    assert_eq!(titles, vec!["good"]);
}

#[tokio::test]
async fn prune_removes_all_rows_for_the_guild() {
    let db = TestDb::new();
    let store = db.open_store().await;
    let provider = new_provider(&store).await;

    provider.add(NewTrack::new(USER, track("a"))).await.unwrap();
    provider.set_shuffle(true).await.unwrap();

    provider.prune().await.unwrap();

    let store = db.open_store().await;
    let revived = new_provider(&store).await;
    assert_eq!(revived.size().await, 0);
    assert!(!revived.shuffle_enabled().await);
    assert_eq!(revived.repeat_mode().await, RepeatMode::Off);
}

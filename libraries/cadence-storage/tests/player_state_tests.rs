//! Integration tests for the guild player state slice


use cadence_core::types::{PlayerState, RepeatMode};
use test_helpers::*;

#[tokio::test]
async fn absent_guild_gets_default_state() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let state = cadence_storage::player_state::get(pool, GUILD).await.unwrap();

    assert_eq!(state.guild_id, GUILD);
    assert!(!state.shuffle_enabled);
    assert_eq!(state.repeat, RepeatMode::Off);
}

#[tokio::test]
async fn upsert_round_trips_mode_flags() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let state = PlayerState {
        guild_id: GUILD,
        shuffle_enabled: true,
        repeat: RepeatMode::All,
        updated_at: 0,
    };
    cadence_storage::player_state::upsert(pool, &state).await.unwrap();

    let loaded = cadence_storage::player_state::get(pool, GUILD).await.unwrap();
    assert!(loaded.shuffle_enabled);
    assert_eq!(loaded.repeat, RepeatMode::All);
    assert!(loaded.updated_at > 0, "upsert should stamp the row");
}

#[tokio::test]
async fn upsert_overwrites_previous_state() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let mut state = PlayerState {
        guild_id: GUILD,
        shuffle_enabled: true,
        repeat: RepeatMode::Single,
        updated_at: 0,
    };
    cadence_storage::player_state::upsert(pool, &state).await.unwrap();

    state.shuffle_enabled = false;
    state.repeat = RepeatMode::Off;
    cadence_storage::player_state::upsert(pool, &state).await.unwrap();

    let loaded = cadence_storage::player_state::get(pool, GUILD).await.unwrap();
    assert!(!loaded.shuffle_enabled);
    assert_eq!(loaded.repeat, RepeatMode::Off);
}

#[tokio::test]
async fn states_are_independent_per_guild() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let state = PlayerState {
        guild_id: GUILD,
        shuffle_enabled: true,
        repeat: RepeatMode::All,
        updated_at: 0,
    };
    cadence_storage::player_state::upsert(pool, &state).await.unwrap();

    let other = cadence_storage::player_state::get(pool, OTHER_GUILD).await.unwrap();
    assert!(!other.shuffle_enabled);
    assert_eq!(other.repeat, RepeatMode::Off);
}

#[tokio::test]
async fn delete_resets_to_defaults() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let state = PlayerState {
        guild_id: GUILD,
        shuffle_enabled: true,
        repeat: RepeatMode::All,
        updated_at: 0,
    };
    cadence_storage::player_state::upsert(pool, &state).await.unwrap();

    cadence_storage::player_state::delete(pool, GUILD).await.unwrap();

    let loaded = cadence_storage::player_state::get(pool, GUILD).await.unwrap();
    assert!(!loaded.shuffle_enabled);
    assert_eq!(loaded.repeat, RepeatMode::Off);
}

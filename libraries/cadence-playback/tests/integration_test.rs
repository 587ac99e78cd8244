//! Integration tests for the playback engine
//!
//! Drive the engine the way a browser host does: commands from the UI,
//! notifications from the media element, session state in a store.

use cadence_core::{Catalog, CoreError, KeyValueStore, Theme, Track};
use cadence_playback::{
    Command, MemoryTransport, Notification, PlaybackConfig, PlaybackEngine, PlaybackError,
    PlaybackEvent, PlayerShell,
};
use cadence_storage::{session, MemoryStore};
use std::sync::Once;

static INIT: Once = Once::new();

// ===== Test Helpers =====

fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}

fn catalog(len: usize) -> Catalog {
    Catalog::new(
        (0..len)
            .map(|i| {
                Track::new(
                    format!("Song {}", i),
                    format!("Artist {}", i),
                    format!("songs/{}.mp4", i),
                    format!("images/{}.jpeg", i),
                )
            })
            .collect(),
    )
    .unwrap()
}

fn config() -> PlaybackConfig {
    PlaybackConfig {
        shuffle_seed: Some(42),
        ..Default::default()
    }
}

fn engine_with_store(len: usize, store: MemoryStore) -> (PlaybackEngine, MemoryTransport) {
    init_tracing();
    let transport = MemoryTransport::new();
    let engine = PlaybackEngine::restore(
        catalog(len),
        Box::new(transport.clone()),
        Box::new(store),
        config(),
    );
    (engine, transport)
}

fn engine(len: usize) -> (PlaybackEngine, MemoryTransport) {
    engine_with_store(len, MemoryStore::new())
}

/// Store whose writes always fail
struct ReadOnlyStore;

impl KeyValueStore for ReadOnlyStore {
    fn get(&self, _key: &str) -> cadence_core::Result<Option<String>> {
        Ok(None)
    }

    fn set(&mut self, _key: &str, _value: &str) -> cadence_core::Result<()> {
        Err(CoreError::storage("quota exceeded"))
    }

    fn remove(&mut self, _key: &str) -> cadence_core::Result<()> {
        Err(CoreError::storage("quota exceeded"))
    }
}

/// Store whose reads always fail
struct BrokenStore;

impl KeyValueStore for BrokenStore {
    fn get(&self, _key: &str) -> cadence_core::Result<Option<String>> {
        Err(CoreError::storage("access denied"))
    }

    fn set(&mut self, _key: &str, _value: &str) -> cadence_core::Result<()> {
        Err(CoreError::storage("access denied"))
    }

    fn remove(&mut self, _key: &str) -> cadence_core::Result<()> {
        Err(CoreError::storage("access denied"))
    }
}

// ===== Session Restore =====

#[test]
fn test_restore_from_persisted_session() {
    let store: MemoryStore = [
        (session::KEY_LAST_SONG_INDEX, "2"),
        (session::KEY_LAST_VOLUME, "0.5"),
        (session::KEY_THEME, "light"),
    ]
    .into_iter()
    .collect();

    let (engine, transport) = engine_with_store(3, store);

    assert_eq!(engine.current_index(), 2);
    assert_eq!(engine.volume(), 0.5);
    assert_eq!(engine.theme(), Theme::Light);
    assert!(!engine.is_playing(), "Restore must not autoplay");

    assert_eq!(transport.source().as_deref(), Some("songs/2.mp4"));
    assert_eq!(transport.volume(), 0.5);
    assert!(!transport.is_playing());
}

#[test]
fn test_restore_with_empty_store_uses_defaults() {
    let (engine, transport) = engine(3);

    assert_eq!(engine.current_index(), 0);
    assert_eq!(engine.volume(), 1.0);
    assert_eq!(engine.theme(), Theme::Dark);
    assert_eq!(transport.source().as_deref(), Some("songs/0.mp4"));
}

#[test]
fn test_restore_with_stale_index_falls_back_to_first_track() {
    let store: MemoryStore = [(session::KEY_LAST_SONG_INDEX, "7")].into_iter().collect();

    let (engine, _) = engine_with_store(3, store);

    assert_eq!(engine.current_index(), 0);
}

#[test]
fn test_restore_survives_unreadable_store() {
    init_tracing();
    let engine = PlaybackEngine::restore(
        catalog(2),
        Box::new(MemoryTransport::new()),
        Box::new(BrokenStore),
        config(),
    );

    assert_eq!(engine.current_index(), 0);
    assert_eq!(engine.theme(), Theme::Dark);
}

#[test]
fn test_restore_emits_initial_track() {
    let (mut engine, _) = engine(3);

    let events = engine.drain_events();
    assert!(matches!(
        events.first(),
        Some(PlaybackEvent::TrackLoaded { index: 0, .. })
    ));
    assert!(!engine.has_pending_events());
}

// ===== Persistence =====

#[test]
fn test_state_changes_are_persisted() {
    let (mut engine, _) = engine(4);

    engine.next();
    engine.next();
    engine.set_volume(0.3);
    engine.toggle_theme();

    let persisted = session::load(engine.session_store()).unwrap();
    assert_eq!(persisted.last_song_index, Some(2));
    assert_eq!(persisted.last_volume, Some(0.3));
    assert_eq!(persisted.theme, Some(Theme::Light));
}

#[test]
fn test_play_pause_persists_session() {
    let (mut engine, _) = engine(3);
    engine.load_track(1).unwrap();

    engine.toggle_play_pause();

    let persisted = session::load(engine.session_store()).unwrap();
    assert_eq!(persisted.last_song_index, Some(1));
}

#[test]
fn test_persistence_failure_does_not_block_commands() {
    init_tracing();
    let transport = MemoryTransport::new();
    let mut engine = PlaybackEngine::restore(
        catalog(3),
        Box::new(transport.clone()),
        Box::new(ReadOnlyStore),
        config(),
    );

    assert_eq!(engine.next(), 1);
    assert_eq!(engine.set_volume(0.2), 0.2);
    assert_eq!(engine.toggle_theme(), Theme::Light);
    assert!(transport.is_playing());
}

#[test]
fn test_session_round_trip_between_engines() {
    let (mut first, _) = engine(5);
    first.select_track(3).unwrap();
    first.set_volume(0.75);
    first.toggle_theme();

    let saved: MemoryStore = session::SESSION_KEYS
        .iter()
        .filter_map(|key| {
            first
                .session_store()
                .get(key)
                .unwrap()
                .map(|value| (key.to_string(), value))
        })
        .collect();

    let (second, transport) = engine_with_store(5, saved);
    assert_eq!(second.current_index(), 3);
    assert_eq!(second.volume(), 0.75);
    assert_eq!(second.theme(), Theme::Light);
    assert_eq!(transport.source().as_deref(), Some("songs/3.mp4"));
}

// ===== Navigation =====

#[test]
fn test_next_wraps_and_forces_play() {
    let (mut engine, transport) = engine(3);
    engine.load_track(2).unwrap();
    assert!(!engine.is_playing());

    assert_eq!(engine.next(), 0);
    assert!(engine.is_playing());
    assert!(transport.is_playing());
    assert_eq!(transport.source().as_deref(), Some("songs/0.mp4"));
}

#[test]
fn test_prev_wraps_and_ignores_shuffle() {
    let (mut engine, _) = engine(4);
    engine.toggle_shuffle();

    assert_eq!(engine.prev(), 3);
    assert_eq!(engine.prev(), 2);
    assert_eq!(engine.prev(), 1);
}

#[test]
fn test_shuffle_never_repeats_current_track() {
    let (mut engine, _) = engine(5);
    engine.toggle_shuffle();

    let mut previous = engine.current_index();
    for _ in 0..100 {
        let index = engine.next();
        assert_ne!(index, previous);
        assert!(index < 5);
        previous = index;
    }
}

#[test]
fn test_shuffle_with_single_track_terminates() {
    let (mut engine, _) = engine(1);
    engine.toggle_shuffle();

    assert_eq!(engine.next(), 0);
    assert!(engine.is_playing());
}

#[test]
fn test_seeded_shuffle_is_reproducible() {
    let (mut a, _) = engine(10);
    let (mut b, _) = engine(10);
    a.toggle_shuffle();
    b.toggle_shuffle();

    let order_a: Vec<_> = (0..20).map(|_| a.next()).collect();
    let order_b: Vec<_> = (0..20).map(|_| b.next()).collect();
    assert_eq!(order_a, order_b);
}

#[test]
fn test_select_track_rejects_out_of_range() {
    let (mut engine, transport) = engine(3);
    engine.drain_events();

    let err = engine.select_track(5).unwrap_err();
    assert!(matches!(err, PlaybackError::IndexOutOfBounds { index: 5, len: 3 }));
    assert_eq!(engine.current_index(), 0);
    assert!(!transport.is_playing());
    assert!(matches!(
        engine.drain_events().as_slice(),
        [PlaybackEvent::Error { .. }]
    ));
}

// ===== End of Track =====

#[test]
fn test_track_end_advances() {
    let (mut engine, transport) = engine(3);
    engine.toggle_play_pause();
    let generation = engine.generation();
    engine.on_metadata_loaded(generation, 180.0);

    assert_eq!(
        engine.on_time_update(generation, 90.0, 180.0),
        Notification::Applied
    );
    assert_eq!(
        engine.on_time_update(generation, 179.98, 180.0),
        Notification::Advanced(1)
    );

    assert_eq!(engine.current_index(), 1);
    assert_eq!(transport.source().as_deref(), Some("songs/1.mp4"));
    assert!(transport.is_playing());
    assert_eq!(engine.duration(), None, "New track has no duration yet");
}

#[test]
fn test_track_end_with_repeat_restarts() {
    let (mut engine, transport) = engine(3);
    engine.toggle_play_pause();
    engine.toggle_repeat();
    let generation = engine.generation();

    assert_eq!(
        engine.on_time_update(generation, 200.0, 200.0),
        Notification::Restarted
    );

    assert_eq!(engine.current_index(), 0);
    assert_eq!(engine.generation(), generation);
    assert_eq!(transport.seeks(), vec![0.0]);
    assert!(transport.is_playing());
}

#[test]
fn test_ended_after_time_update_end_is_ignored() {
    let (mut engine, _) = engine(3);
    engine.toggle_play_pause();
    engine.toggle_repeat();
    let generation = engine.generation();

    assert_eq!(
        engine.on_time_update(generation, 200.0, 200.0),
        Notification::Restarted
    );
    assert_eq!(engine.on_ended(generation), Notification::Discarded);
    assert_eq!(
        engine.on_time_update(generation, 199.99, 200.0),
        Notification::Applied,
        "Late update from before the restart must not restart twice"
    );

    // Playback moved on from the end, so the next end counts again
    engine.on_time_update(generation, 5.0, 200.0);
    assert_eq!(
        engine.on_time_update(generation, 200.0, 200.0),
        Notification::Restarted
    );
}

#[test]
fn test_ended_without_time_update_advances() {
    let (mut engine, _) = engine(3);
    engine.toggle_play_pause();
    let generation = engine.generation();

    assert_eq!(engine.on_ended(generation), Notification::Advanced(1));
    assert_eq!(
        engine.on_ended(generation),
        Notification::Discarded,
        "End of a replaced source"
    );
}

#[test]
fn test_track_end_with_shuffle_picks_another_track() {
    let (mut engine, transport) = engine(6);
    engine.toggle_play_pause();
    engine.toggle_shuffle();

    for _ in 0..20 {
        let current = engine.current_index();
        let generation = engine.generation();

        match engine.on_ended(generation) {
            Notification::Advanced(index) => {
                assert_ne!(index, current);
                assert!(index < 6);
                assert_eq!(engine.current_index(), index);
            }
            other => panic!("Expected an advance, got {:?}", other),
        }
        assert!(transport.is_playing());
    }
}

#[test]
fn test_pause_near_end_keeps_track_paused() {
    let (mut engine, transport) = engine(3);
    engine.toggle_play_pause();
    let generation = engine.generation();
    engine.on_metadata_loaded(generation, 180.0);
    engine.on_time_update(generation, 179.9, 180.0);
    engine.toggle_play_pause();

    // Browsers report the playhead once more when pausing
    assert_eq!(
        engine.on_time_update(generation, 179.97, 180.0),
        Notification::Applied
    );
    assert_eq!(engine.current_index(), 0);
    assert_eq!(engine.position(), 179.97);
    assert!(!engine.is_playing());
    assert!(!transport.is_playing());

    // The real end still advances
    assert_eq!(engine.on_ended(generation), Notification::Advanced(1));
}

#[test]
fn test_time_update_without_duration_never_ends_track() {
    let (mut engine, _) = engine(3);
    let generation = engine.generation();

    assert_eq!(
        engine.on_time_update(generation, 10.0, f64::NAN),
        Notification::Applied
    );
    assert_eq!(engine.current_index(), 0);
    assert_eq!(engine.view().progress, 0.0);
}

// ===== Stale Notifications =====

#[test]
fn test_stale_notifications_are_discarded() {
    let (mut engine, _) = engine(3);
    let old = engine.generation();

    engine.next();
    engine.drain_events();

    assert_eq!(engine.on_metadata_loaded(old, 120.0), Notification::Discarded);
    assert_eq!(engine.on_time_update(old, 119.99, 120.0), Notification::Discarded);
    assert_eq!(engine.on_ended(old), Notification::Discarded);

    assert_eq!(engine.current_index(), 1);
    assert_eq!(engine.duration(), None);
    assert!(!engine.has_pending_events());
}

#[test]
fn test_rapid_skips_only_honor_latest_source() {
    let (mut engine, transport) = engine(5);
    let first = engine.generation();
    engine.next();
    let second = engine.generation();
    engine.next();
    let current = engine.generation();

    // Metadata for the first two sources arrives late
    engine.on_metadata_loaded(first, 10.0);
    engine.on_metadata_loaded(second, 20.0);
    assert_eq!(engine.duration(), None);

    engine.on_metadata_loaded(current, 30.0);
    assert_eq!(engine.duration(), Some(30.0));
    assert_eq!(transport.generation(), current);
}

// ===== Events =====

#[test]
fn test_time_update_emits_progress() {
    let (mut engine, _) = engine(2);
    let generation = engine.generation();
    engine.on_metadata_loaded(generation, 240.0);
    engine.drain_events();

    engine.on_time_update(generation, 60.0, 240.0);

    assert_eq!(
        engine.drain_events(),
        vec![PlaybackEvent::Progress {
            fraction: 0.25,
            elapsed: "1:00".to_string(),
        }]
    );
}

#[test]
fn test_next_emits_state_then_track() {
    let (mut engine, _) = engine(3);
    engine.drain_events();

    engine.next();

    let events = engine.drain_events();
    assert!(matches!(
        events.as_slice(),
        [
            PlaybackEvent::StateChanged { is_playing: true },
            PlaybackEvent::TrackLoaded { index: 1, .. }
        ]
    ));
}

// ===== Shell =====

#[test]
fn test_shell_selection_closes_panel_and_moves_highlight() {
    let (engine, transport) = engine(4);
    let mut shell = PlayerShell::new(engine);

    shell.dispatch(Command::TogglePlaylistPanel).unwrap();
    assert!(shell.is_playlist_open());

    let command = shell.presenter().select(3).unwrap();
    shell.dispatch(command).unwrap();

    assert!(!shell.is_playlist_open());
    assert_eq!(shell.presenter().active_index(), 3);
    assert_eq!(shell.engine().current_index(), 3);
    assert!(transport.is_playing());
}

#[test]
fn test_shell_failed_selection_keeps_panel_open() {
    let (engine, _) = engine(2);
    let mut shell = PlayerShell::new(engine);
    shell.dispatch(Command::TogglePlaylistPanel).unwrap();

    assert!(shell.dispatch(Command::SelectTrack(9)).is_err());
    assert!(shell.is_playlist_open());
    assert_eq!(shell.presenter().active_index(), 0);
}

#[test]
fn test_shell_keyboard() {
    let (engine, transport) = engine(3);
    let mut shell = PlayerShell::new(engine);

    assert!(shell.handle_key("Space").unwrap());
    assert!(transport.is_playing());

    assert!(shell.handle_key("ArrowLeft").unwrap());
    assert_eq!(shell.engine().current_index(), 2);
    assert_eq!(shell.presenter().active_index(), 2);

    assert!(shell.handle_key("ArrowRight").unwrap());
    assert_eq!(shell.engine().current_index(), 0);

    assert!(!shell.handle_key("Enter").unwrap());
}

#[test]
fn test_shell_seek_before_metadata_is_a_no_op() {
    let (engine, transport) = engine(2);
    let mut shell = PlayerShell::new(engine);

    shell.dispatch(Command::Seek(0.5)).unwrap();
    assert!(transport.seeks().is_empty());

    assert!(matches!(
        shell.dispatch(Command::Seek(f64::NAN)),
        Err(PlaybackError::InvalidSeek(_))
    ));
}

#[test]
fn test_shell_highlight_follows_track_end() {
    let (engine, _) = engine(3);
    let mut shell = PlayerShell::new(engine);
    shell.dispatch(Command::TogglePlayPause).unwrap();
    let generation = shell.engine().generation();

    shell.on_metadata_loaded(generation, 100.0);
    shell.on_time_update(generation, 100.0, 100.0);

    assert_eq!(shell.presenter().active_index(), 1);
    assert_eq!(shell.view().index, 1);
}

#[test]
fn test_bundled_catalog_plays() {
    init_tracing();
    let transport = MemoryTransport::new();
    let mut engine = PlaybackEngine::new(
        Catalog::bundled(),
        Box::new(transport.clone()),
        Box::new(MemoryStore::new()),
        PlaybackConfig::default(),
    );

    let len = engine.catalog().len();
    assert_eq!(engine.prev(), len - 1);
    assert_eq!(
        transport.source().as_deref(),
        Some(engine.current_track().media_uri.as_str())
    );
}

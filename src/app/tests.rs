use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::{Duration, Instant};

use tempfile::TempDir;

use super::*;
use crate::audio::{DurationProber, Engine, PlayMode};
use crate::config::Settings;
use crate::download::{DownloadQueue, FetchJob, Fetcher};
use crate::events::{AppEvent, DownloadEvent, EngineEvent, EngineState};
use crate::playlist::{Playlist, Song};

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Load(PathBuf),
    Play,
    Pause,
    Seek(u64),
    Stop,
}

#[derive(Default)]
struct FakeEngine {
    calls: RefCell<Vec<Call>>,
}

impl FakeEngine {
    fn take(&self) -> Vec<Call> {
        std::mem::take(&mut *self.calls.borrow_mut())
    }
}

impl Engine for FakeEngine {
    fn load(&self, path: &Path, _generation: u64) {
        self.calls.borrow_mut().push(Call::Load(path.to_path_buf()));
    }
    fn play(&self) {
        self.calls.borrow_mut().push(Call::Play);
    }
    fn pause(&self) {
        self.calls.borrow_mut().push(Call::Pause);
    }
    fn seek(&self, position_ms: u64) {
        self.calls.borrow_mut().push(Call::Seek(position_ms));
    }
    fn stop(&self, _generation: u64) {
        self.calls.borrow_mut().push(Call::Stop);
    }
}

#[derive(Clone, Default)]
struct FakeFetcher {
    jobs: Rc<RefCell<Vec<FetchJob>>>,
}

impl Fetcher for FakeFetcher {
    fn start(&self, job: FetchJob) {
        self.jobs.borrow_mut().push(job);
    }
}

#[derive(Clone, Default)]
struct FakeProber {
    paths: Rc<RefCell<Vec<PathBuf>>>,
}

impl DurationProber for FakeProber {
    fn spawn(&self, path: PathBuf) {
        self.paths.borrow_mut().push(path);
    }
}

struct Harness {
    app: App,
    engine: FakeEngine,
    jobs: Rc<RefCell<Vec<FetchJob>>>,
    probes: Rc<RefCell<Vec<PathBuf>>>,
}

fn harness_in(playlist_dir: PathBuf) -> Harness {
    let fetcher = FakeFetcher::default();
    let jobs = fetcher.jobs.clone();
    let prober = FakeProber::default();
    let probes = prober.paths.clone();
    let queue = DownloadQueue::new(
        Box::new(fetcher),
        Duration::from_millis(500),
        Duration::from_millis(1000),
    );
    let app = App::new(&Settings::default(), playlist_dir, queue, Box::new(prober));
    Harness {
        app,
        engine: FakeEngine::default(),
        jobs,
        probes,
    }
}

impl Harness {
    /// Deliver an engine event about the track the app loaded last.
    fn engine_event(&mut self, event: EngineEvent, now: Instant) {
        let generation = self.app.engine_generation;
        self.app
            .handle_event(AppEvent::Engine { generation, event }, &self.engine, now);
    }
}

fn song(name: &str, artist: &str, path: Option<&str>, duration_ms: u64) -> Song {
    let mut s = Song::new(name, artist);
    s.path = path.map(PathBuf::from);
    s.duration_ms = duration_ms;
    s
}

/// App over an in-memory playlist; the playlist directory does not exist.
fn harness(songs: Vec<Song>) -> Harness {
    let mut h = harness_in(PathBuf::from("/nonexistent/musiclist-tests"));
    h.app.playlist = Playlist {
        label: "test".into(),
        source: None,
        songs,
    };
    h
}

fn three_songs() -> Vec<Song> {
    vec![
        song("A", "X", Some("/m/A--X.mp3"), 200_000),
        song("B", "", Some("/m/B.mp3"), 100_000),
        song("C", "Y", Some("/m/C--Y.mp3"), 150_000),
    ]
}

/// Playlist directory on disk with one `MUSICLIST_main.txt`.
fn disk_harness(lines: &str) -> (Harness, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("MUSICLIST_main.txt"), lines).unwrap();
    fs::create_dir_all(dir.path().join("music_download")).unwrap();
    let mut h = harness_in(dir.path().to_path_buf());
    h.app.load_initial(&h.engine);
    h.engine.take();
    (h, dir)
}

#[test]
fn play_song_out_of_range_is_ignored() {
    let mut h = harness(three_songs());
    h.app.play_song(3, &h.engine);
    assert!(h.engine.take().is_empty());
    assert_eq!(h.app.playback, PlaybackState::Idle);
}

#[test]
fn play_song_loads_and_resets_timeline() {
    let mut h = harness(three_songs());
    h.app.play_song(1, &h.engine);

    assert_eq!(h.engine.take(), vec![Call::Load(PathBuf::from("/m/B.mp3"))]);
    assert_eq!(h.app.playback, PlaybackState::Playing);
    assert_eq!(h.app.now_playing, Some(1));
    assert_eq!(h.app.selected, 1);
    assert_eq!(h.app.timeline.range_ms(), 100_000);
    assert_eq!(h.app.timeline.ratio(), 1.0);
}

#[test]
fn play_song_without_file_queues_download_and_stays_idle() {
    let mut h = harness(vec![song("Missing", "Z", None, 0)]);
    h.app.play_song(0, &h.engine);

    assert!(h.engine.take().is_empty());
    assert_eq!(h.app.playback, PlaybackState::Idle);
    assert_eq!(h.app.downloads.len(), 1);
    assert_eq!(h.app.downloads.head().unwrap().playlist_index, Some(0));
    assert_eq!(h.jobs.borrow()[0].song_name, "Missing");
}

#[test]
fn queueing_the_same_song_twice_reports_already_queued() {
    let mut h = harness(vec![song("Missing", "Z", None, 0)]);
    h.app.play_song(0, &h.engine);
    h.app.download_selected();

    assert_eq!(h.app.downloads.len(), 1);
    assert!(h.app.status.contains("already queued"));
}

#[test]
fn toggle_playback_cycles_states() {
    let mut h = harness(three_songs());
    h.app.selected = 2;
    h.app.toggle_playback(&h.engine);
    assert_eq!(h.app.now_playing, Some(2));
    assert_eq!(h.app.playback, PlaybackState::Playing);

    h.app.toggle_playback(&h.engine);
    assert_eq!(h.app.playback, PlaybackState::Paused);
    h.app.toggle_playback(&h.engine);
    assert_eq!(h.app.playback, PlaybackState::Playing);

    assert_eq!(
        h.engine.take(),
        vec![
            Call::Load(PathBuf::from("/m/C--Y.mp3")),
            Call::Pause,
            Call::Play
        ]
    );
}

#[test]
fn toggle_on_empty_playlist_does_nothing() {
    let mut h = harness(Vec::new());
    h.app.toggle_playback(&h.engine);
    assert!(h.engine.take().is_empty());
    assert_eq!(h.app.playback, PlaybackState::Idle);
}

#[test]
fn loop_all_advances_and_wraps() {
    let mut h = harness(three_songs());
    h.app.play_song(1, &h.engine);
    h.app.on_track_end(&h.engine);
    assert_eq!(h.app.now_playing, Some(2));
    h.app.on_track_end(&h.engine);
    assert_eq!(h.app.now_playing, Some(0));
}

#[test]
fn loop_one_restarts_same_track() {
    let mut h = harness(three_songs());
    h.app.play_mode = PlayMode::LoopOne;
    h.app.play_song(2, &h.engine);
    h.engine.take();

    h.app.on_track_end(&h.engine);
    assert_eq!(h.engine.take(), vec![Call::Seek(0), Call::Play]);
    assert_eq!(h.app.now_playing, Some(2));
    assert_eq!(h.app.display_position_ms, 0);
}

#[test]
fn next_and_previous_from_idle() {
    let mut h = harness(three_songs());
    assert_eq!(h.app.next_index(), Some(0));
    assert_eq!(h.app.prev_index(), Some(2));

    h.app.play_song(0, &h.engine);
    h.app.play_previous(&h.engine);
    assert_eq!(h.app.now_playing, Some(2));
}

#[test]
fn shuffle_never_repeats_current_index() {
    for _ in 0..500 {
        assert_ne!(shuffle_index(5, Some(3)), 3);
        assert!(shuffle_index(5, Some(3)) < 5);
    }
    assert_eq!(shuffle_index(1, Some(0)), 0);
    assert_eq!(shuffle_index(1, None), 0);

    let mut h = harness(three_songs());
    h.app.play_mode = PlayMode::Shuffle;
    h.app.play_song(1, &h.engine);
    for _ in 0..100 {
        let before = h.app.now_playing;
        h.app.on_track_end(&h.engine);
        assert_ne!(h.app.now_playing, before);
    }
}

#[test]
fn cycle_play_mode_updates_status() {
    let mut h = harness(three_songs());
    h.app.cycle_play_mode();
    assert_eq!(h.app.play_mode, PlayMode::LoopOne);
    assert!(h.app.status.contains("Repeat one"));
}

#[test]
fn engine_positions_are_scaled_to_cached_duration() {
    let mut h = harness(three_songs());
    let t0 = Instant::now();
    h.app.play_song(0, &h.engine);
    h.engine.take();

    h.engine_event(EngineEvent::DurationChanged(180_000), t0);
    h.engine_event(EngineEvent::PositionChanged(90_000), t0);
    assert_eq!(h.app.display_position_ms, 100_000);

    h.app.seek_display(100_000, &h.engine, t0);
    assert_eq!(h.engine.take(), vec![Call::Seek(90_000)]);
}

#[test]
fn position_echo_after_seek_is_ignored_briefly() {
    let mut h = harness(three_songs());
    let t0 = Instant::now();
    h.app.play_song(0, &h.engine);

    h.app.seek_display(50_000, &h.engine, t0);
    h.engine_event(EngineEvent::PositionChanged(1_000), t0 + Duration::from_millis(50));
    assert_eq!(h.app.display_position_ms, 50_000);

    h.engine_event(EngineEvent::PositionChanged(50_400), t0 + Duration::from_millis(300));
    assert_eq!(h.app.display_position_ms, 50_400);
}

#[test]
fn skip_moves_by_scaled_real_seconds_and_clamps() {
    let mut h = harness(three_songs());
    let t0 = Instant::now();
    h.app.play_song(0, &h.engine);
    h.engine_event(EngineEvent::DurationChanged(180_000), t0);
    h.engine_event(EngineEvent::PositionChanged(90_000), t0);
    h.engine.take();

    h.app.skip(1, &h.engine, t0);
    assert_eq!(h.engine.take(), vec![Call::Seek(94_500)]);

    h.app.engine_position_ms = 2_000;
    h.app.skip(-1, &h.engine, t0);
    assert_eq!(h.engine.take(), vec![Call::Seek(0)]);

    h.app.engine_position_ms = 178_000;
    h.app.skip(1, &h.engine, t0);
    assert_eq!(h.engine.take(), vec![Call::Seek(180_000)]);
}

#[test]
fn seek_without_track_is_ignored() {
    let mut h = harness(three_songs());
    h.app.skip(1, &h.engine, Instant::now());
    h.app.seek_display(1000, &h.engine, Instant::now());
    assert!(h.engine.take().is_empty());
}

#[test]
fn engine_duration_is_adopted_when_cache_is_empty() {
    let mut h = harness(vec![song("A", "", Some("/m/A.mp3"), 0)]);
    let t0 = Instant::now();
    h.app.play_song(0, &h.engine);
    h.engine_event(EngineEvent::DurationChanged(123_000), t0);

    assert_eq!(h.app.durations.get(Path::new("/m/A.mp3")), Some(123_000));
    assert_eq!(h.app.playlist.songs[0].duration_ms, 123_000);
    assert_eq!(h.app.timeline.range_ms(), 123_000);
    assert_eq!(h.app.timeline.ratio(), 1.0);
}

#[test]
fn probed_duration_fills_songs() {
    let mut h = harness(vec![
        song("A", "", Some("/m/A.mp3"), 0),
        song("B", "", Some("/m/B.mp3"), 0),
    ]);
    h.app.handle_event(
        AppEvent::DurationProbed {
            path: PathBuf::from("/m/B.mp3"),
            duration_ms: 99_000,
        },
        &h.engine,
        Instant::now(),
    );
    assert_eq!(h.app.playlist.songs[0].duration_ms, 0);
    assert_eq!(h.app.playlist.songs[1].duration_ms, 99_000);

    // a failed probe changes nothing
    h.app.handle_event(
        AppEvent::DurationProbed {
            path: PathBuf::from("/m/A.mp3"),
            duration_ms: 0,
        },
        &h.engine,
        Instant::now(),
    );
    assert!(h.app.durations.get(Path::new("/m/A.mp3")).is_none());
}

#[test]
fn engine_state_and_errors_update_playback() {
    let mut h = harness(three_songs());
    let t0 = Instant::now();
    h.app.play_song(0, &h.engine);

    h.engine_event(EngineEvent::StateChanged(EngineState::Paused), t0);
    assert_eq!(h.app.playback, PlaybackState::Paused);

    h.engine_event(EngineEvent::Error("bad file".into()), t0);
    assert_eq!(h.app.playback, PlaybackState::Idle);
    assert_eq!(h.app.now_playing, None);
    assert!(h.app.status.contains("bad file"));
}

#[test]
fn end_of_media_event_follows_play_mode() {
    let mut h = harness(three_songs());
    h.app.play_song(0, &h.engine);
    h.engine_event(EngineEvent::EndOfMedia, Instant::now());
    assert_eq!(h.app.now_playing, Some(1));
}

#[test]
fn end_of_media_from_the_previous_track_is_dropped() {
    let mut h = harness(three_songs());
    h.app.play_song(0, &h.engine);
    let first = h.app.engine_generation;
    // user skips before the first track's end event is drained
    h.app.play_next(&h.engine);
    h.engine.take();

    h.app.handle_event(
        AppEvent::Engine {
            generation: first,
            event: EngineEvent::EndOfMedia,
        },
        &h.engine,
        Instant::now(),
    );
    assert_eq!(h.app.now_playing, Some(1));
    assert!(h.engine.take().is_empty());
}

#[test]
fn stop_echo_does_not_clear_a_newer_track() {
    let mut h = harness(three_songs());
    h.app.play_song(0, &h.engine);
    h.app.stop(&h.engine);
    let stopped = h.app.engine_generation;
    h.app.play_song(1, &h.engine);

    h.app.handle_event(
        AppEvent::Engine {
            generation: stopped,
            event: EngineEvent::StateChanged(EngineState::Stopped),
        },
        &h.engine,
        Instant::now(),
    );
    assert_eq!(h.app.now_playing, Some(1));
    assert_eq!(h.app.playback, PlaybackState::Playing);

    // the same event for the current track still applies
    h.engine_event(EngineEvent::StateChanged(EngineState::Stopped), Instant::now());
    assert_eq!(h.app.now_playing, None);
    assert_eq!(h.app.playback, PlaybackState::Idle);
}

fn finish(h: &mut Harness, job: u64, result: Result<PathBuf, String>, now: Instant) {
    h.app.handle_event(
        AppEvent::Download(DownloadEvent::Finished { job, result }),
        &h.engine,
        now,
    );
}

#[test]
fn finished_download_resolves_row_and_plays_when_idle() {
    let mut h = harness(vec![song("Missing", "Z", None, 0)]);
    h.app.play_song(0, &h.engine);
    let job = h.jobs.borrow()[0].id;

    let file = PathBuf::from("/dl/Missing--Z.mp3");
    finish(&mut h, job, Ok(file.clone()), Instant::now());

    assert_eq!(h.app.playlist.len(), 1);
    assert_eq!(h.app.playlist.songs[0].path, Some(file.clone()));
    assert_eq!(h.engine.take(), vec![Call::Load(file.clone())]);
    assert_eq!(h.app.now_playing, Some(0));
    // no readable metadata, so the engine prober is asked
    assert_eq!(*h.probes.borrow(), vec![file]);
    assert!(h.app.downloads.is_empty());
}

#[test]
fn finished_download_does_not_interrupt_playback() {
    let mut songs = three_songs();
    songs.push(song("Missing", "", None, 0));
    let mut h = harness(songs);
    h.app.play_song(0, &h.engine);
    h.app.selected = 3;
    h.app.download_selected();
    h.engine.take();

    let job = h.jobs.borrow()[0].id;
    finish(&mut h, job, Ok(PathBuf::from("/dl/Missing.mp3")), Instant::now());

    assert!(h.engine.take().is_empty());
    assert_eq!(h.app.now_playing, Some(0));
    assert!(h.app.playlist.songs[3].is_resolved());
}

#[test]
fn finished_download_leaves_a_paused_track_alone() {
    let mut songs = three_songs();
    songs.push(song("Missing", "", None, 0));
    let mut h = harness(songs);
    h.app.play_song(0, &h.engine);
    h.app.toggle_playback(&h.engine);
    assert_eq!(h.app.playback, PlaybackState::Paused);
    h.app.selected = 3;
    h.app.download_selected();
    h.engine.take();

    let job = h.jobs.borrow()[0].id;
    finish(&mut h, job, Ok(PathBuf::from("/dl/Missing.mp3")), Instant::now());

    assert!(h.engine.take().is_empty());
    assert_eq!(h.app.now_playing, Some(0));
    assert_eq!(h.app.playback, PlaybackState::Paused);
    assert!(h.app.playlist.songs[3].is_resolved());
}

#[test]
fn failed_download_reports_and_moves_on() {
    let mut h = harness(vec![song("One", "", None, 0), song("Two", "", None, 0)]);
    h.app.play_song(0, &h.engine);
    h.app.play_song(1, &h.engine);
    assert_eq!(h.jobs.borrow().len(), 1);

    let t0 = Instant::now();
    let job = h.jobs.borrow()[0].id;
    finish(&mut h, job, Err("no results".into()), t0);
    assert!(h.app.status.contains("One"));
    assert_eq!(h.app.downloads.len(), 1);

    h.app.tick(t0 + Duration::from_millis(999));
    assert_eq!(h.jobs.borrow().len(), 1);
    h.app.tick(t0 + Duration::from_millis(1000));
    assert_eq!(h.jobs.borrow()[1].song_name, "Two");
}

#[test]
fn drained_queue_reports_completion() {
    let mut h = harness(vec![song("One", "", None, 0)]);
    h.app.play_song(0, &h.engine);
    let t0 = Instant::now();
    let job = h.jobs.borrow()[0].id;
    finish(&mut h, job, Ok(PathBuf::from("/dl/One.mp3")), t0);

    h.app.tick(t0 + Duration::from_millis(500));
    assert_eq!(h.app.download_status, "All downloads complete");
}

#[test]
fn stale_download_results_are_ignored() {
    let mut h = harness(vec![song("One", "", None, 0)]);
    h.app.play_song(0, &h.engine);
    let job = h.jobs.borrow()[0].id;

    finish(&mut h, job + 7, Ok(PathBuf::from("/dl/Other.mp3")), Instant::now());
    assert!(!h.app.playlist.songs[0].is_resolved());
    assert_eq!(h.app.downloads.len(), 1);
}

#[test]
fn search_plays_matching_playlist_entry() {
    let mut h = harness(three_songs());
    h.app.search_song("c--y", &h.engine);
    assert_eq!(h.app.now_playing, Some(2));
}

#[test]
fn search_submissions_are_debounced() {
    let mut h = harness(three_songs());
    let t0 = Instant::now();

    for (offset_ms, expected_loads) in [(0, 1), (100, 1), (700, 2)] {
        h.app.search.open();
        "B".chars().for_each(|c| h.app.search.push(c));
        h.app
            .submit_search(&h.engine, t0 + Duration::from_millis(offset_ms));
        assert!(!h.app.search.active);
        let loads = h
            .engine
            .calls
            .borrow()
            .iter()
            .filter(|c| matches!(c, Call::Load(_)))
            .count();
        assert_eq!(loads, expected_loads, "after {offset_ms} ms");
    }
}

#[test]
fn search_without_any_match_queues_download_without_row() {
    let mut h = harness(three_songs());
    h.app.search_song("Nowhere--Nobody", &h.engine);

    let head = h.app.downloads.head().unwrap();
    assert_eq!(head.song_name, "Nowhere");
    assert_eq!(head.artist_name, "Nobody");
    assert_eq!(head.playlist_index, None);
    assert_eq!(h.app.playlist.len(), 3);
}

#[test]
fn search_adds_library_file_to_playlist_and_file() {
    let (mut h, dir) = disk_harness("A\n");
    fs::write(dir.path().join("music_download/Fresh--Band.mp3"), b"fake").unwrap();

    h.app.search_song("fresh", &h.engine);

    assert_eq!(h.app.playlist.len(), 2);
    let added = &h.app.playlist.songs[1];
    assert_eq!(added.name, "fresh");
    assert_eq!(added.artist, "Band");
    assert!(added.is_resolved());
    assert_eq!(h.app.now_playing, Some(1));

    let text = fs::read_to_string(dir.path().join("MUSICLIST_main.txt")).unwrap();
    assert_eq!(text, "A\nfresh--Band\n");
}

#[test]
fn search_hit_in_library_does_not_replace_a_paused_track() {
    let (mut h, dir) = disk_harness("A\n");
    fs::write(dir.path().join("music_download/A.mp3"), b"fake").unwrap();
    fs::write(dir.path().join("music_download/Fresh--Band.mp3"), b"fake").unwrap();
    h.app.reload(&h.engine);
    h.app.play_song(0, &h.engine);
    h.app.toggle_playback(&h.engine);
    h.engine.take();

    h.app.search_song("fresh", &h.engine);

    assert_eq!(h.app.playlist.len(), 2);
    assert_eq!(h.app.now_playing, Some(0));
    assert!(h.engine.take().is_empty());
    assert!(h.app.status.starts_with("Added \"fresh\""));
}

#[test]
fn download_without_row_appends_song_and_reload_finds_it_last() {
    let (mut h, dir) = disk_harness("A--X\nB");
    h.app.search_song("New--Artist", &h.engine);
    let job = h.jobs.borrow()[0].id;

    let file = dir.path().join("music_download/New--Artist.mp3");
    fs::write(&file, b"fake").unwrap();
    finish(&mut h, job, Ok(file.clone()), Instant::now());
    assert_eq!(h.app.playlist.len(), 3);

    h.app.reload(&h.engine);
    assert_eq!(h.app.playlist.len(), 3);
    let last = &h.app.playlist.songs[2];
    assert_eq!((last.name.as_str(), last.artist.as_str()), ("New", "Artist"));
    assert_eq!(last.path, Some(file));
}

#[test]
fn loading_matches_files_and_marks_missing_songs() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("MUSICLIST_main.txt"), "Here\nGone--Nobody\n").unwrap();
    fs::create_dir_all(dir.path().join("music_download")).unwrap();
    fs::write(dir.path().join("music_download/Here--Someone.mp3"), b"fake").unwrap();

    let mut h = harness_in(dir.path().to_path_buf());
    h.app.load_initial(&h.engine);

    assert_eq!(h.app.current_playlist, Some(0));
    assert_eq!(h.app.playlist.songs[0].artist, "Someone");
    assert!(h.app.playlist.songs[0].is_resolved());
    assert!(!h.app.playlist.songs[1].is_resolved());
    assert!(h.app.status.contains("1 need download"));
    assert_eq!(h.probes.borrow().len(), 1);
}

#[test]
fn failed_load_keeps_previous_playlist() {
    let (mut h, dir) = disk_harness("A\nB\n");
    fs::remove_file(dir.path().join("MUSICLIST_main.txt")).unwrap();

    h.app.load_playlist(0, &h.engine);

    assert_eq!(h.app.playlist.len(), 2);
    assert_eq!(h.app.current_playlist, Some(0));
    assert!(h.app.status.starts_with("Failed to load main"));
}

#[test]
fn switching_playlists_keeps_a_shared_track_playing() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("MUSICLIST_a.txt"), "Song\n").unwrap();
    fs::write(dir.path().join("MUSICLIST_b.txt"), "Other\nSong\n").unwrap();
    fs::create_dir_all(dir.path().join("music_download")).unwrap();
    fs::write(dir.path().join("music_download/Song.mp3"), b"fake").unwrap();

    let mut h = harness_in(dir.path().to_path_buf());
    h.app.load_initial(&h.engine);
    h.app.play_song(0, &h.engine);
    h.engine.take();

    h.app.next_playlist(&h.engine);
    assert_eq!(h.app.current_playlist, Some(1));
    assert_eq!(h.app.now_playing, Some(1));
    assert!(h.engine.take().is_empty());

    // and back again
    h.app.prev_playlist(&h.engine);
    assert_eq!(h.app.now_playing, Some(0));
}

#[test]
fn progress_ratio_is_clamped() {
    let mut h = harness(three_songs());
    assert_eq!(h.app.progress_ratio(), 0.0);
    h.app.play_song(0, &h.engine);
    h.app.display_position_ms = 100_000;
    assert!((h.app.progress_ratio() - 0.5).abs() < 1e-9);
    h.app.display_position_ms = 900_000;
    assert_eq!(h.app.progress_ratio(), 1.0);
}

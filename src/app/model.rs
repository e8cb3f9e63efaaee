//! Application model: `App` and `PlaybackState`.
//!
//! `App` owns the playlist, duration cache and download queue. It is only
//! ever touched from the event loop thread; background work reports back
//! through `AppEvent`s handled in `handle_event`.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::audio::{DurationCache, DurationLookup, DurationProber, Engine, PlayMode, Timeline};
use crate::config::{LibrarySettings, Settings};
use crate::download::{DownloadQueue, EnqueueOutcome, ProcessOutcome, QueueEntry};
use crate::events::{AppEvent, DownloadEvent, EngineEvent, EngineState};
use crate::library::{MatchReport, find_song_files, list_audio_files};
use crate::playlist::{self, Playlist, PlaylistRef, Song};

use super::search::SearchInput;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Idle,
    Playing,
    Paused,
}

/// The main application model.
pub struct App {
    pub playlists: Vec<PlaylistRef>,
    pub current_playlist: Option<usize>,
    pub playlist: Playlist,
    pub selected: usize,

    pub now_playing: Option<usize>,
    pub playback: PlaybackState,
    pub play_mode: PlayMode,
    pub timeline: Timeline,
    /// Position shown by the progress bar and time label (milliseconds).
    pub display_position_ms: u64,
    pub(super) engine_position_ms: u64,
    /// Bumped on every engine load/stop; engine events from older ones are dropped.
    pub(super) engine_generation: u64,

    pub durations: DurationCache,
    pub downloads: DownloadQueue,
    pub(super) prober: Box<dyn DurationProber>,

    pub status: String,
    pub download_status: String,
    pub search: SearchInput,

    pub(super) playlist_dir: PathBuf,
    pub(super) download_dir: PathBuf,
    pub(super) library: LibrarySettings,
    pub(super) skip_ms: i64,
    pub(super) search_debounce: Duration,
}

impl App {
    pub fn new(
        settings: &Settings,
        playlist_dir: PathBuf,
        downloads: DownloadQueue,
        prober: Box<dyn DurationProber>,
    ) -> Self {
        let download_dir = settings.paths.download_dir_for(&playlist_dir);
        let playback = &settings.playback;

        Self {
            playlists: Vec::new(),
            current_playlist: None,
            playlist: Playlist::default(),
            selected: 0,

            now_playing: None,
            playback: PlaybackState::Idle,
            play_mode: playback.play_mode.into(),
            timeline: Timeline::new(
                playback.ratio_tolerance_ms,
                Duration::from_millis(playback.seek_guard_ms),
            ),
            display_position_ms: 0,
            engine_position_ms: 0,
            engine_generation: 0,

            durations: DurationCache::new(),
            downloads,
            prober,

            status: String::new(),
            download_status: String::new(),
            search: SearchInput::default(),

            playlist_dir,
            download_dir,
            library: settings.library.clone(),
            skip_ms: settings.controls.skip_seconds as i64 * 1000,
            search_debounce: Duration::from_millis(settings.ui.search_debounce_ms),
        }
    }

    pub fn playlist_dir(&self) -> &Path {
        &self.playlist_dir
    }

    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    /// A track is loaded, playing or paused. Finished downloads and search
    /// hits only start on their own when this is false.
    pub fn has_track(&self) -> bool {
        self.now_playing.is_some()
    }

    pub fn now_playing_song(&self) -> Option<&Song> {
        self.now_playing.and_then(|i| self.playlist.get(i))
    }

    /// Re-read the list of `MUSICLIST_<name>.txt` files.
    pub fn refresh_playlists(&mut self) {
        match playlist::discover(&self.playlist_dir) {
            Ok(found) => self.playlists = found,
            Err(e) => {
                log::warn!("cannot list playlists in {}: {e}", self.playlist_dir.display());
                self.status = format!("Cannot list playlists: {e}");
            }
        }
    }

    /// Load playlist `index` of `playlists`. On failure the current playlist
    /// stays as it was.
    pub fn load_playlist(&mut self, index: usize, engine: &dyn Engine) {
        let Some(r) = self.playlists.get(index).cloned() else {
            return;
        };

        let mut loaded = match playlist::load(&r) {
            Ok(pl) => pl,
            Err(e) => {
                log::warn!("{e}");
                self.status = format!("Failed to load {}: {e}", r.label);
                return;
            }
        };
        let report = self.match_library(&mut loaded);

        // Keep the current track going if the new list has it too.
        let playing_path = self.now_playing_song().and_then(|s| s.path.clone());
        let still_there = playing_path
            .and_then(|p| loaded.songs.iter().position(|s| s.path.as_ref() == Some(&p)));
        match still_there {
            Some(i) => self.now_playing = Some(i),
            None => self.stop(engine),
        }

        log::info!(
            "loaded playlist {} ({} songs, {} matched)",
            r.label,
            loaded.len(),
            report.matched
        );
        self.status = format!(
            "Loaded {}: {} songs, {} need download",
            r.label,
            loaded.len(),
            report.unresolved.len()
        );
        self.selected = self.now_playing.unwrap_or(0);
        self.playlist = loaded;
        self.current_playlist = Some(index);
    }

    /// Re-read the current playlist file and rescan the download directory.
    pub fn reload(&mut self, engine: &dyn Engine) {
        self.refresh_playlists();
        let label = self.playlist.label.clone();
        match self.playlists.iter().position(|p| p.label == label) {
            Some(i) => self.load_playlist(i, engine),
            None if !self.playlists.is_empty() => self.load_playlist(0, engine),
            None => self.status = "No playlists found".to_string(),
        }
    }

    /// Load the first playlist, if any.
    pub fn load_initial(&mut self, engine: &dyn Engine) {
        self.refresh_playlists();
        if self.playlists.is_empty() {
            self.status = format!(
                "No MUSICLIST_<name>.txt in {}",
                self.playlist_dir.display()
            );
            return;
        }
        self.load_playlist(0, engine);
    }

    pub fn next_playlist(&mut self, engine: &dyn Engine) {
        let len = self.playlists.len();
        if len == 0 {
            return;
        }
        let next = self.current_playlist.map_or(0, |i| (i + 1) % len);
        self.load_playlist(next, engine);
    }

    pub fn prev_playlist(&mut self, engine: &dyn Engine) {
        let len = self.playlists.len();
        if len == 0 {
            return;
        }
        let prev = self.current_playlist.map_or(len - 1, |i| (i + len - 1) % len);
        self.load_playlist(prev, engine);
    }

    /// Attach local files to songs of `pl`; files without duration metadata
    /// are handed to the prober.
    pub(super) fn match_library(&mut self, pl: &mut Playlist) -> MatchReport {
        let files = list_audio_files(&self.download_dir, &self.library);
        let report = find_song_files(pl, &files, &mut self.durations);
        for path in &report.needs_probe {
            self.prober.spawn(path.clone());
        }
        report
    }

    /// Move the cursor.
    pub fn select_next(&mut self) {
        if !self.playlist.is_empty() {
            self.selected = (self.selected + 1) % self.playlist.len();
        }
    }

    pub fn select_prev(&mut self) {
        let len = self.playlist.len();
        if len > 0 {
            self.selected = (self.selected + len - 1) % len;
        }
    }

    /// Queue a fetch for `(name, artist)` and report what happened.
    pub fn enqueue_download(&mut self, name: &str, artist: &str, playlist_index: Option<usize>) {
        let outcome = self
            .downloads
            .enqueue(name, artist, playlist_index, self.has_track());
        self.status = match outcome {
            EnqueueOutcome::AlreadyQueued => format!("\"{name}\" is already queued"),
            EnqueueOutcome::Queued { position } => {
                format!("Queued \"{name}\" ({position} ahead)")
            }
            EnqueueOutcome::Started => format!("Fetching \"{name}\"..."),
        };
    }

    /// Queue a download for the song under the cursor.
    pub fn download_selected(&mut self) {
        let Some(song) = self.playlist.get(self.selected) else {
            return;
        };
        let (name, artist) = (song.name.clone(), song.artist.clone());
        self.enqueue_download(&name, &artist, Some(self.selected));
    }

    /// Periodic work: run due download steps.
    pub fn tick(&mut self, now: Instant) {
        if let Some(ProcessOutcome::Idle) = self.downloads.poll(now, self.has_track()) {
            self.download_status = "All downloads complete".to_string();
        }
    }

    pub fn handle_event(&mut self, event: AppEvent, engine: &dyn Engine, now: Instant) {
        match event {
            AppEvent::Engine { generation, event } => {
                if generation == self.engine_generation {
                    self.handle_engine_event(event, engine, now);
                } else {
                    log::debug!("dropping engine event of an earlier track: {event:?}");
                }
            }
            AppEvent::Download(DownloadEvent::Progress { message, .. }) => {
                self.download_status = message;
            }
            AppEvent::Download(DownloadEvent::Finished { job, result }) => match result {
                Ok(path) => {
                    if let Some(entry) = self.downloads.complete(job, now) {
                        self.apply_download(entry, path, engine);
                    }
                }
                Err(reason) => {
                    if let Some(entry) = self.downloads.fail(job, now) {
                        self.status = format!("Download failed for \"{}\": {reason}", entry.song_name);
                        self.download_status.clear();
                    }
                }
            },
            AppEvent::DurationProbed { path, duration_ms } => {
                self.apply_duration(&path, duration_ms)
            }
        }
    }

    fn handle_engine_event(&mut self, event: EngineEvent, engine: &dyn Engine, now: Instant) {
        log::debug!("engine: {event:?}");
        match event {
            EngineEvent::DurationChanged(ms) => self.on_engine_duration(ms),
            EngineEvent::PositionChanged(ms) => {
                self.engine_position_ms = ms;
                if self.timeline.accepts_position_update(now) {
                    self.display_position_ms = self.timeline.display_position(ms);
                }
            }
            EngineEvent::StateChanged(state) => {
                if self.now_playing.is_none() {
                    return;
                }
                match state {
                    EngineState::Playing => self.playback = PlaybackState::Playing,
                    EngineState::Paused => self.playback = PlaybackState::Paused,
                    EngineState::Stopped => {
                        self.playback = PlaybackState::Idle;
                        self.now_playing = None;
                    }
                }
            }
            EngineEvent::EndOfMedia => self.on_track_end(engine),
            EngineEvent::Error(msg) => {
                self.status = format!("Playback error: {msg}");
                self.playback = PlaybackState::Idle;
                self.now_playing = None;
            }
        }
    }

    fn on_engine_duration(&mut self, engine_ms: u64) {
        if self.timeline.on_engine_duration(engine_ms) {
            log::debug!(
                "duration ratio now {:.4} (cached {} ms, engine {engine_ms} ms)",
                self.timeline.ratio(),
                self.timeline.cached_ms()
            );
        }
        if self.timeline.cached_ms() > 0 {
            return;
        }

        // No metadata length: adopt the engine's.
        let Some(i) = self.now_playing else {
            return;
        };
        let Some(path) = self.playlist.get(i).and_then(|s| s.path.clone()) else {
            return;
        };
        self.apply_duration(&path, engine_ms);
    }

    /// Record a late duration for `path` and fill it into matching songs.
    fn apply_duration(&mut self, path: &Path, ms: u64) {
        if !self.durations.record(path, ms) {
            return;
        }
        for song in &mut self.playlist.songs {
            if song.duration_ms == 0 && song.path.as_deref() == Some(path) {
                song.duration_ms = ms;
            }
        }
        let playing_this = self
            .now_playing_song()
            .is_some_and(|s| s.path.as_deref() == Some(path));
        if playing_this && self.timeline.cached_ms() == 0 {
            self.timeline.set_cached(ms);
        }
    }

    /// A fetch succeeded: attach the file to its song (or add the song), then
    /// start it unless something was playing when the fetch began.
    fn apply_download(&mut self, entry: QueueEntry, path: PathBuf, engine: &dyn Engine) {
        let duration_ms = match self.durations.resolve(&path) {
            DurationLookup::Known(ms) => ms,
            DurationLookup::Pending => {
                self.prober.spawn(path.clone());
                0
            }
        };

        let existing = entry
            .playlist_index
            .filter(|&i| {
                self.playlist
                    .get(i)
                    .is_some_and(|s| s.name.trim().eq_ignore_ascii_case(entry.song_name.trim()))
            })
            .or_else(|| self.playlist.position_of(&entry.song_name, &entry.artist_name));

        let index = match existing {
            Some(i) => {
                if let Some(song) = self.playlist.get_mut(i) {
                    song.path = Some(path.clone());
                    song.duration_ms = duration_ms;
                    if !song.has_artist() && !entry.artist_name.is_empty() {
                        song.artist = entry.artist_name.clone();
                    }
                }
                i
            }
            None => {
                let mut song = Song::new(entry.song_name.clone(), entry.artist_name.clone());
                song.path = Some(path.clone());
                song.duration_ms = duration_ms;
                self.add_song(song)
            }
        };

        log::info!("downloaded \"{}\" to {}", entry.song_name, path.display());
        self.status = format!("Downloaded \"{}\"", entry.song_name);
        if !entry.was_playing {
            self.play_song(index, engine);
        }
    }

    /// Append `song` to the playlist and its file. Returns the new index.
    pub(super) fn add_song(&mut self, song: Song) -> usize {
        if let Some(source) = self.playlist.source.clone() {
            if let Err(e) = playlist::append_entry(&source, &song.name, &song.artist) {
                log::warn!("cannot append to {}: {e}", source.display());
                self.status = format!("Could not save to playlist file: {e}");
            }
        }
        self.playlist.push(song)
    }
}

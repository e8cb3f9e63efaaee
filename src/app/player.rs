//! Playback state machine: Idle / Playing / Paused over one "now playing" slot.

use std::time::Instant;

use rand::RngExt;

use crate::audio::{Engine, PlayMode};

use super::model::{App, PlaybackState};

/// Random index in `0..len` other than `current` (0 when `len <= 1`).
pub fn shuffle_index(len: usize, current: Option<usize>) -> usize {
    if len <= 1 {
        return 0;
    }
    let mut rng = rand::rng();
    match current {
        Some(cur) if cur < len => {
            // draw from the other len - 1 slots
            let pick = rng.random_range(0..len - 1);
            if pick >= cur { pick + 1 } else { pick }
        }
        _ => rng.random_range(0..len),
    }
}

impl App {
    /// Start song `index`. Songs without a file are queued for download instead.
    pub fn play_song(&mut self, index: usize, engine: &dyn Engine) {
        let Some(song) = self.playlist.get(index) else {
            return;
        };
        let Some(path) = song.path.clone() else {
            let (name, artist) = (song.name.clone(), song.artist.clone());
            self.selected = index;
            self.enqueue_download(&name, &artist, Some(index));
            return;
        };

        self.engine_generation += 1;
        engine.load(&path, self.engine_generation);
        let cached = self.durations.get(&path).unwrap_or(song.duration_ms);
        self.status = if song.has_artist() {
            format!("Playing: {} - {}", song.name, song.artist)
        } else {
            format!("Playing: {}", song.name)
        };
        log::info!("playing {}", path.display());

        self.timeline.start(cached);
        self.now_playing = Some(index);
        self.selected = index;
        self.playback = PlaybackState::Playing;
        self.display_position_ms = 0;
        self.engine_position_ms = 0;
    }

    /// Space: pause, resume, or start from the cursor when idle.
    pub fn toggle_playback(&mut self, engine: &dyn Engine) {
        match self.playback {
            PlaybackState::Playing => {
                engine.pause();
                self.playback = PlaybackState::Paused;
            }
            PlaybackState::Paused => {
                engine.play();
                self.playback = PlaybackState::Playing;
            }
            PlaybackState::Idle => {
                if self.playlist.is_empty() {
                    return;
                }
                let start = if self.selected < self.playlist.len() {
                    self.selected
                } else {
                    0
                };
                self.play_song(start, engine);
            }
        }
    }

    pub fn next_index(&self) -> Option<usize> {
        let len = self.playlist.len();
        if len == 0 {
            return None;
        }
        Some(match self.play_mode {
            PlayMode::Shuffle => shuffle_index(len, self.now_playing),
            _ => self.now_playing.map_or(0, |i| (i + 1) % len),
        })
    }

    pub fn prev_index(&self) -> Option<usize> {
        let len = self.playlist.len();
        if len == 0 {
            return None;
        }
        Some(match self.play_mode {
            PlayMode::Shuffle => shuffle_index(len, self.now_playing),
            _ => self.now_playing.map_or(len - 1, |i| (i + len - 1) % len),
        })
    }

    pub fn play_next(&mut self, engine: &dyn Engine) {
        if let Some(i) = self.next_index() {
            self.play_song(i, engine);
        }
    }

    pub fn play_previous(&mut self, engine: &dyn Engine) {
        if let Some(i) = self.prev_index() {
            self.play_song(i, engine);
        }
    }

    pub fn cycle_play_mode(&mut self) {
        self.play_mode = self.play_mode.next();
        self.status = format!("Mode: {}", self.play_mode.label());
    }

    /// The engine reached the end of the current track.
    pub fn on_track_end(&mut self, engine: &dyn Engine) {
        match self.play_mode {
            PlayMode::LoopOne => {
                if self.now_playing.is_none() {
                    return;
                }
                engine.seek(0);
                engine.play();
                self.playback = PlaybackState::Playing;
                self.display_position_ms = 0;
                self.engine_position_ms = 0;
            }
            PlayMode::LoopAll | PlayMode::Shuffle => self.play_next(engine),
        }
    }

    pub fn stop(&mut self, engine: &dyn Engine) {
        self.engine_generation += 1;
        engine.stop(self.engine_generation);
        self.playback = PlaybackState::Idle;
        self.now_playing = None;
        self.display_position_ms = 0;
        self.engine_position_ms = 0;
    }

    /// Jump to `display_ms` on the displayed timeline (click-to-seek).
    pub fn seek_display(&mut self, display_ms: u64, engine: &dyn Engine, now: Instant) {
        if self.now_playing.is_none() {
            return;
        }
        let range = self.timeline.range_ms();
        let display_ms = if range > 0 { display_ms.min(range) } else { display_ms };

        let target = self.timeline.engine_seek_target(display_ms);
        engine.seek(target);
        self.timeline.mark_seek(now);
        self.engine_position_ms = target;
        self.display_position_ms = display_ms;
    }

    /// Seek by `direction * skip_seconds` real seconds (direction is +1 or -1).
    pub fn skip(&mut self, direction: i64, engine: &dyn Engine, now: Instant) {
        if self.now_playing.is_none() {
            return;
        }
        let step = self.timeline.scaled_skip_ms(direction * self.skip_ms);
        let mut target = (self.engine_position_ms as i64 + step).max(0) as u64;
        let engine_len = self.timeline.engine_ms();
        if engine_len > 0 {
            target = target.min(engine_len);
        }

        engine.seek(target);
        self.timeline.mark_seek(now);
        self.engine_position_ms = target;
        self.display_position_ms = self.timeline.display_position(target);
    }

    /// Ratio of `display_position_ms` to the progress bar range, for drawing.
    pub fn progress_ratio(&self) -> f64 {
        let range = self.timeline.range_ms();
        if range == 0 {
            return 0.0;
        }
        (self.display_position_ms as f64 / range as f64).clamp(0.0, 1.0)
    }
}

//! The `/` search box: find a song in the playlist, then in the download
//! directory, else fetch it.

use std::time::{Duration, Instant};

use crate::audio::{DurationLookup, Engine};
use crate::library::{find_match, list_audio_files};
use crate::playlist::{Song, split_entry};

use super::model::App;

#[derive(Debug, Default, Clone)]
pub struct SearchInput {
    pub active: bool,
    pub text: String,
    last_submit: Option<(String, Instant)>,
}

impl SearchInput {
    pub fn open(&mut self) {
        self.active = true;
        self.text.clear();
    }

    pub fn cancel(&mut self) {
        self.active = false;
        self.text.clear();
    }

    pub fn push(&mut self, c: char) {
        self.text.push(c);
    }

    pub fn pop(&mut self) {
        self.text.pop();
    }

    /// True when `text` was already submitted less than `window` ago.
    fn is_repeat(&self, text: &str, now: Instant, window: Duration) -> bool {
        self.last_submit
            .as_ref()
            .is_some_and(|(last, at)| last == text && now.saturating_duration_since(*at) < window)
    }
}

impl App {
    /// Enter in the search box. Identical submissions inside the debounce
    /// window are dropped.
    pub fn submit_search(&mut self, engine: &dyn Engine, now: Instant) {
        let text = self.search.text.trim().to_string();
        self.search.cancel();
        if text.is_empty() {
            return;
        }
        if self.search.is_repeat(&text, now, self.search_debounce) {
            log::debug!("debounced search \"{text}\"");
            return;
        }
        self.search.last_submit = Some((text.clone(), now));
        self.search_song(&text, engine);
    }

    /// Resolve `songname` or `songname--artist`: playlist entry first, then a
    /// library file, else queue a download.
    pub fn search_song(&mut self, query: &str, engine: &dyn Engine) {
        let (name, artist) = split_entry(query);
        if name.is_empty() {
            return;
        }

        if let Some(i) = self.playlist.position_of(&name, &artist) {
            self.selected = i;
            // play_song queues the download itself when the file is missing
            self.play_song(i, engine);
            return;
        }

        let files = list_audio_files(&self.download_dir, &self.library);
        if let Some(file) = find_match(&files, &name, &artist) {
            let mut song = Song::new(name.clone(), artist.clone());
            if !song.has_artist() {
                song.artist = file.artist.clone().unwrap_or_default();
            }
            song.path = Some(file.path.clone());
            song.duration_ms = match self.durations.resolve(&file.path) {
                DurationLookup::Known(ms) => ms,
                DurationLookup::Pending => {
                    self.prober.spawn(file.path.clone());
                    0
                }
            };

            let index = self.add_song(song);
            self.selected = index;
            if self.has_track() {
                self.status = format!("Added \"{name}\" to {}", self.playlist.label);
            } else {
                self.play_song(index, engine);
            }
            return;
        }

        self.enqueue_download(&name, &artist, None);
    }
}

//! Track durations in milliseconds.
//!
//! Metadata is read with `lofty`. When a file carries no usable length the
//! decoder is asked instead, on a background thread, and the answer comes back
//! as an `AppEvent::DurationProbed`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use lofty::prelude::*;

use crate::events::{AppEvent, EventSender};

use super::sink::decoder_duration;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DurationLookup {
    Known(u64),
    /// Metadata had nothing; an engine probe is needed.
    Pending,
}

/// Session-long map from file path to duration. Only positive values are kept
/// and entries are never invalidated.
#[derive(Debug, Default)]
pub struct DurationCache {
    entries: HashMap<PathBuf, u64>,
}

impl DurationCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: &Path) -> Option<u64> {
        self.entries.get(path).copied()
    }

    /// Store `ms` for `path`. Returns false (and stores nothing) for 0.
    pub fn record(&mut self, path: &Path, ms: u64) -> bool {
        if ms == 0 {
            return false;
        }
        self.entries.insert(path.to_path_buf(), ms);
        true
    }

    /// Cached value, else metadata. A positive metadata result is cached.
    pub fn resolve(&mut self, path: &Path) -> DurationLookup {
        if let Some(ms) = self.get(path) {
            return DurationLookup::Known(ms);
        }
        match metadata_duration_ms(path) {
            Some(ms) => {
                self.record(path, ms);
                DurationLookup::Known(ms)
            }
            None => DurationLookup::Pending,
        }
    }
}

fn metadata_duration_ms(path: &Path) -> Option<u64> {
    match lofty::read_from_path(path) {
        Ok(tagged) => {
            let ms = tagged.properties().duration().as_millis() as u64;
            (ms > 0).then_some(ms)
        }
        Err(e) => {
            log::debug!("no metadata duration for {}: {e}", path.display());
            None
        }
    }
}

/// Ask `probe` up to `attempts` times, sleeping `interval` in between.
/// Returns the first positive answer or 0.
pub fn poll_engine_duration<F>(mut probe: F, interval: Duration, attempts: u32) -> u64
where
    F: FnMut() -> Option<u64>,
{
    for attempt in 0..attempts {
        if let Some(ms) = probe().filter(|ms| *ms > 0) {
            return ms;
        }
        if attempt + 1 < attempts {
            thread::sleep(interval);
        }
    }
    0
}

/// Starts engine-side duration lookups without blocking the caller.
pub trait DurationProber {
    fn spawn(&self, path: PathBuf);
}

/// Probes with the rodio decoder on a short-lived thread per path.
pub struct EngineDurationProber {
    events: EventSender,
    interval: Duration,
    attempts: u32,
}

impl EngineDurationProber {
    pub fn new(events: EventSender, interval: Duration, attempts: u32) -> Self {
        Self {
            events,
            interval,
            attempts,
        }
    }
}

impl DurationProber for EngineDurationProber {
    fn spawn(&self, path: PathBuf) {
        let events = self.events.clone();
        let interval = self.interval;
        let attempts = self.attempts;
        thread::spawn(move || {
            // A freshly downloaded file may still be finalizing; keep asking.
            let duration_ms = poll_engine_duration(
                || match decoder_duration(&path) {
                    Ok(d) => d.map(|d| d.as_millis() as u64),
                    Err(_) => None,
                },
                interval,
                attempts,
            );
            if duration_ms == 0 {
                log::warn!("could not determine duration of {}", path.display());
            }
            let _ = events.send(AppEvent::DurationProbed { path, duration_ms });
        });
    }
}

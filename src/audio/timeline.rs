//! Mapping between the engine's timeline and the displayed one.
//!
//! The cached duration (from metadata) is authoritative for display. Some
//! decoders report a different length for the same file, so positions are
//! scaled by `engine / cached` whenever the two disagree by more than the
//! tolerance.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct Timeline {
    cached_ms: u64,
    engine_ms: u64,
    ratio: f64,
    tolerance_ms: u64,
    seek_guard: Duration,
    last_seek: Option<Instant>,
}

impl Timeline {
    pub fn new(tolerance_ms: u64, seek_guard: Duration) -> Self {
        Self {
            cached_ms: 0,
            engine_ms: 0,
            ratio: 1.0,
            tolerance_ms,
            seek_guard,
            last_seek: None,
        }
    }

    /// Reset for a new track.
    pub fn start(&mut self, cached_ms: u64) {
        self.cached_ms = cached_ms;
        self.engine_ms = 0;
        self.ratio = 1.0;
        self.last_seek = None;
    }

    /// Late-arriving cached duration (probe finished, engine value adopted).
    pub fn set_cached(&mut self, cached_ms: u64) {
        self.cached_ms = cached_ms;
        self.update_ratio();
    }

    /// Returns true when the ratio changed.
    pub fn on_engine_duration(&mut self, engine_ms: u64) -> bool {
        self.engine_ms = engine_ms;
        self.update_ratio()
    }

    fn update_ratio(&mut self) -> bool {
        let before = self.ratio;
        if self.cached_ms > 0
            && self.engine_ms > 0
            && self.cached_ms.abs_diff(self.engine_ms) > self.tolerance_ms
        {
            self.ratio = self.engine_ms as f64 / self.cached_ms as f64;
        }
        (self.ratio - before).abs() > f64::EPSILON
    }

    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    pub fn cached_ms(&self) -> u64 {
        self.cached_ms
    }

    pub fn engine_ms(&self) -> u64 {
        self.engine_ms
    }

    fn both_known(&self) -> bool {
        self.cached_ms > 0 && self.engine_ms > 0
    }

    pub fn display_position(&self, engine_pos_ms: u64) -> u64 {
        if !self.both_known() {
            return engine_pos_ms;
        }
        (engine_pos_ms as f64 / self.engine_ms as f64 * self.cached_ms as f64).round() as u64
    }

    pub fn engine_seek_target(&self, display_pos_ms: u64) -> u64 {
        if !self.both_known() {
            return display_pos_ms;
        }
        (display_pos_ms as f64 / self.cached_ms as f64 * self.engine_ms as f64).round() as u64
    }

    /// A skip of `step_ms` real milliseconds, expressed on the engine timeline.
    pub fn scaled_skip_ms(&self, step_ms: i64) -> i64 {
        (step_ms as f64 * self.ratio).round() as i64
    }

    /// Length of the progress bar: cached duration when known.
    pub fn range_ms(&self) -> u64 {
        if self.cached_ms > 0 {
            self.cached_ms
        } else {
            self.engine_ms
        }
    }

    pub fn mark_seek(&mut self, now: Instant) {
        self.last_seek = Some(now);
    }

    /// Position ticks right after a seek still carry the old position.
    pub fn accepts_position_update(&self, now: Instant) -> bool {
        match self.last_seek {
            Some(at) => now.saturating_duration_since(at) >= self.seek_guard,
            None => true,
        }
    }
}

//! Messages flowing from background threads into the event loop.
//!
//! The audio thread, download workers and duration probes never touch
//! playlist, queue or cache state. They send an `AppEvent` over one
//! `mpsc` channel and the event loop applies it.

use std::path::PathBuf;

/// Coarse engine state as reported by the audio thread.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EngineState {
    Stopped,
    Playing,
    Paused,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// Engine-side length of the loaded track (milliseconds).
    DurationChanged(u64),
    /// Engine-side playback position (milliseconds), emitted on every tick.
    PositionChanged(u64),
    StateChanged(EngineState),
    /// The loaded track played to its end.
    EndOfMedia,
    /// The track could not be opened or decoded.
    Error(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum DownloadEvent {
    /// Human-readable stage update for the status line.
    Progress { job: u64, message: String },
    /// Terminal result of a fetch job: final file path or error text.
    Finished {
        job: u64,
        result: Result<PathBuf, String>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// `generation` is the one of the `Load`/`Stop` command the engine last
    /// handled, so events about a replaced track can be told apart.
    Engine { generation: u64, event: EngineEvent },
    Download(DownloadEvent),
    /// Engine fallback duration lookup finished; 0 when it gave up.
    DurationProbed { path: PathBuf, duration_ms: u64 },
}

pub type EventSender = std::sync::mpsc::Sender<AppEvent>;

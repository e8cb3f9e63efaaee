//! Audio-related small types.
//!
//! This module defines the play mode and the commands understood by the
//! audio thread.

use std::path::PathBuf;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum PlayMode {
    /// Advance to the next song, wrapping at the end.
    #[default]
    LoopAll,
    /// Restart the current song when it ends.
    LoopOne,
    /// Pick a random song other than the current one.
    Shuffle,
}

impl PlayMode {
    /// Cycle `LoopAll -> LoopOne -> Shuffle -> LoopAll`.
    pub fn next(self) -> Self {
        match self {
            PlayMode::LoopAll => PlayMode::LoopOne,
            PlayMode::LoopOne => PlayMode::Shuffle,
            PlayMode::Shuffle => PlayMode::LoopAll,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PlayMode::LoopAll => "Loop all",
            PlayMode::LoopOne => "Repeat one",
            PlayMode::Shuffle => "Shuffle",
        }
    }
}

#[derive(Debug)]
pub enum AudioCmd {
    /// Open the file and start playing it from the beginning. Events for it
    /// are tagged with `generation`.
    Load { path: PathBuf, generation: u64 },
    /// Resume the loaded track.
    Play,
    Pause,
    /// Jump to an absolute engine position (milliseconds).
    Seek(u64),
    /// Stop playback and unload the track.
    Stop { generation: u64 },
    /// Quit the audio thread, optionally fading out over `fade_out_ms` milliseconds.
    Quit { fade_out_ms: u64 },
}

//! Error types shared across the player.
//!
//! Nothing in the core is fatal: callers turn these into status-line messages
//! and log entries, then keep going.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// File I/O errors
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A playlist file could not be read or written
    #[error("playlist {path}: {reason}")]
    Playlist { path: PathBuf, reason: String },

    /// Audio could not be opened or decoded
    #[error("cannot decode {path}: {reason}")]
    Decode { path: PathBuf, reason: String },

    /// Audio output device errors
    #[error("audio output error: {0}")]
    AudioOutput(String),

    /// The video search returned nothing usable
    #[error("no results for \"{0}\"")]
    NoCandidates(String),

    /// Candidates exist but none fits the requested song
    #[error("no suitable video for \"{0}\"")]
    NoSelection(String),

    /// External downloader failures
    #[error("download failed: {0}")]
    Download(String),

    /// Malformed output from an external tool
    #[error("unexpected tool output: {0}")]
    Parse(#[from] serde_json::Error),

    /// Configuration loading errors
    #[error("configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    /// Logger setup errors
    #[error("logging error: {0}")]
    Logging(String),
}

pub type Result<T> = std::result::Result<T, Error>;

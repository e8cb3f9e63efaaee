use std::path::PathBuf;

use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/musiclist/config.toml` or `~/.config/musiclist/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `MUSICLIST__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub paths: PathSettings,
    pub library: LibrarySettings,
    pub playback: PlaybackSettings,
    pub controls: ControlsSettings,
    pub download: DownloadSettings,
    pub ui: UiSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PathSettings {
    /// Directory scanned for `MUSICLIST_<name>.txt` files.
    /// Defaults to the first CLI argument, then the working directory.
    pub playlist_dir: Option<PathBuf>,
    /// Directory holding downloaded audio.
    /// Defaults to `<playlist_dir>/music_download`.
    pub download_dir: Option<PathBuf>,
}

impl PathSettings {
    /// Resolve the download directory relative to `playlist_dir`.
    pub fn download_dir_for(&self, playlist_dir: &std::path::Path) -> PathBuf {
        self.download_dir
            .clone()
            .unwrap_or_else(|| playlist_dir.join("music_download"))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to consider hidden files (dotfiles) in the download directory.
    pub include_hidden: bool,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            extensions: vec![
                "mp3".into(),
                "wav".into(),
                "ogg".into(),
                "flac".into(),
                "m4a".into(),
            ],
            include_hidden: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Play mode at startup.
    pub play_mode: PlayModeSetting,
    /// Engine/cached duration divergence that triggers a ratio update (milliseconds).
    pub ratio_tolerance_ms: u64,
    /// How long position echoes are ignored after a user seek (milliseconds).
    pub seek_guard_ms: u64,
    /// Delay between engine duration probes (milliseconds).
    pub probe_interval_ms: u64,
    /// Number of engine duration probes before giving up.
    pub probe_attempts: u32,
    /// Fade-out duration when quitting (milliseconds).
    /// Set to 0 to stop immediately.
    pub quit_fade_out_ms: u64,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            play_mode: PlayModeSetting::LoopAll,
            ratio_tolerance_ms: 1000,
            seek_guard_ms: 200,
            probe_interval_ms: 100,
            probe_attempts: 50,
            quit_fade_out_ms: 300,
        }
    }
}

#[derive(Debug, Copy, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlayModeSetting {
    #[serde(alias = "loopall", alias = "loop_all", alias = "list")]
    LoopAll,
    #[serde(alias = "loopone", alias = "loop_one", alias = "repeat-one")]
    LoopOne,
    #[serde(alias = "random")]
    Shuffle,
}

impl From<PlayModeSetting> for crate::audio::PlayMode {
    fn from(value: PlayModeSetting) -> Self {
        match value {
            PlayModeSetting::LoopAll => Self::LoopAll,
            PlayModeSetting::LoopOne => Self::LoopOne,
            PlayModeSetting::Shuffle => Self::Shuffle,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Number of real seconds to skip when pressing Left / Right.
    pub skip_seconds: u64,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self { skip_seconds: 5 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DownloadSettings {
    /// `yt-dlp` executable (name on `PATH` or absolute path).
    pub ytdlp_path: String,
    /// yt-dlp search scheme, e.g. `bilisearch` or `ytsearch`.
    pub search_prefix: String,
    /// Number of search results to consider.
    pub search_limit: usize,
    /// Page URL of a search result; `{id}` is replaced by the result id.
    pub video_url_template: String,
    /// Target audio format passed to `--audio-format`.
    pub audio_format: String,
    /// Appended to the search query when no artist is known.
    pub original_suffix: String,
    /// Pause before the next queued download after a success (milliseconds).
    pub success_delay_ms: u64,
    /// Pause before the next queued download after a failure (milliseconds).
    pub failure_delay_ms: u64,
}

impl Default for DownloadSettings {
    fn default() -> Self {
        Self {
            ytdlp_path: "yt-dlp".to_string(),
            search_prefix: "bilisearch".to_string(),
            search_limit: 10,
            video_url_template: "https://www.bilibili.com/video/{id}".to_string(),
            audio_format: "mp3".to_string(),
            original_suffix: "原唱".to_string(),
            success_delay_ms: 500,
            failure_delay_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
    /// Identical search submissions within this window are ignored (milliseconds).
    pub search_debounce_ms: u64,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " musiclist ".to_string(),
            search_debounce_ms: 500,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter when `RUST_LOG` is not set.
    pub level: String,
    /// Log file; defaults to `musiclist.log` in the system temp directory.
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

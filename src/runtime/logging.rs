use std::env;
use std::fs::{self, OpenOptions};
use std::path::PathBuf;

use env_logger::{Env, Target};

use crate::config::LoggingSettings;
use crate::error::{Error, Result};

pub fn log_file_path(settings: &LoggingSettings) -> PathBuf {
    settings
        .file
        .clone()
        .unwrap_or_else(|| env::temp_dir().join("musiclist.log"))
}

/// Send log records to a file; the terminal belongs to the UI.
/// `RUST_LOG` takes precedence over `logging.level`.
pub fn init(settings: &LoggingSettings) -> Result<PathBuf> {
    let path = log_file_path(settings);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    env_logger::Builder::from_env(Env::default().default_filter_or(settings.level.as_str()))
        .target(Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .try_init()
        .map_err(|e| Error::Logging(e.to_string()))?;
    Ok(path)
}

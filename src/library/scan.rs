use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::matcher::split_file_stem;

/// An audio file in the download directory with the song identity its name encodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryFile {
    pub path: PathBuf,
    pub name: String,
    pub artist: Option<String>,
}

impl LibraryFile {
    pub fn from_path(path: &Path) -> Option<Self> {
        let stem = path.file_stem()?.to_str()?;
        let (name, artist) = split_file_stem(stem);
        Some(Self {
            path: path.to_path_buf(),
            name,
            artist,
        })
    }
}

pub(super) fn is_audio_file(path: &Path, settings: &LibrarySettings) -> bool {
    let exts: Vec<String> = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// List the audio files directly inside `dir`, sorted by file name.
///
/// Sorting makes first-match-wins lookups deterministic across platforms.
/// A missing directory yields an empty list.
pub fn list_audio_files(dir: &Path, settings: &LibrarySettings) -> Vec<LibraryFile> {
    let mut files: Vec<LibraryFile> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_map(Result::ok)
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.is_file()
                && (settings.include_hidden || !is_hidden(path))
                && is_audio_file(path, settings)
        })
        .filter_map(|path| LibraryFile::from_path(&path))
        .collect();

    files.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));
    files
}

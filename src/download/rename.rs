use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::playlist::ARTIST_SEPARATOR;

use super::pipeline::Renamer;

/// Characters that are not allowed in file names on at least one platform.
const FORBIDDEN: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

pub fn sanitize_file_name(raw: &str) -> String {
    raw.chars()
        .filter(|c| !FORBIDDEN.contains(c) && !c.is_control())
        .collect::<String>()
        .trim()
        .to_string()
}

/// Stem the library matcher understands: `name--artist` or `name`.
pub fn library_stem(song: &str, artist: &str) -> String {
    let song = sanitize_file_name(song);
    let artist = sanitize_file_name(artist);
    if artist.is_empty() {
        song
    } else {
        format!("{song}{ARTIST_SEPARATOR}{artist}")
    }
}

/// Renames downloads to `name--artist.ext` next to where they landed,
/// adding `_1`, `_2`, ... while the target is taken.
#[derive(Debug, Default)]
pub struct FileNameRenamer;

impl FileNameRenamer {
    pub fn target_for(file: &Path, song: &str, artist: &str) -> PathBuf {
        let dir = file.parent().unwrap_or(Path::new("."));
        let stem = library_stem(song, artist);
        let ext = file
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();

        let mut target = dir.join(format!("{stem}{ext}"));
        let mut n = 1;
        while target != file && target.exists() {
            target = dir.join(format!("{stem}_{n}{ext}"));
            n += 1;
        }
        target
    }
}

impl Renamer for FileNameRenamer {
    fn rename(&self, file: &Path, song: &str, artist: &str) -> Result<PathBuf> {
        let target = Self::target_for(file, song, artist);
        if target != file {
            fs::rename(file, &target)?;
            log::info!("renamed {} -> {}", file.display(), target.display());
        }
        Ok(target)
    }
}

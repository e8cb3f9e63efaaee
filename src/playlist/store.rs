//! Reading, discovering and appending to `MUSICLIST_<name>.txt` files.

use std::fs::{self, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

use super::model::{Playlist, Song, format_entry};

const FILE_PREFIX: &str = "MUSICLIST_";
const FILE_SUFFIX: &str = ".txt";

/// A playlist file found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistRef {
    pub label: String,
    pub path: PathBuf,
}

/// List `MUSICLIST_<name>.txt` files in `dir`, sorted by label.
pub fn discover(dir: &Path) -> Result<Vec<PlaylistRef>> {
    let mut found: Vec<PlaylistRef> = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name().and_then(|s| s.to_str()) else {
            continue;
        };
        if let Some(label) = label_from_file_name(file_name) {
            found.push(PlaylistRef {
                label: label.to_string(),
                path: path.clone(),
            });
        }
    }
    found.sort_by(|a, b| a.label.cmp(&b.label));
    Ok(found)
}

fn label_from_file_name(file_name: &str) -> Option<&str> {
    file_name
        .strip_prefix(FILE_PREFIX)?
        .strip_suffix(FILE_SUFFIX)
}

/// Parse playlist text: one entry per non-blank line, in order.
pub fn parse(text: &str) -> Vec<Song> {
    text.lines().filter_map(Song::parse_entry).collect()
}

/// Read and parse a playlist file.
///
/// Nothing is touched on failure, so callers can keep their current playlist.
pub fn load(playlist: &PlaylistRef) -> Result<Playlist> {
    let text = fs::read_to_string(&playlist.path).map_err(|e| Error::Playlist {
        path: playlist.path.clone(),
        reason: e.to_string(),
    })?;
    Ok(Playlist {
        label: playlist.label.clone(),
        source: Some(playlist.path.clone()),
        songs: parse(&text),
    })
}

/// Append `name[--artist]` to `path`, making sure it starts on its own line.
pub fn append_entry(path: &Path, name: &str, artist: &str) -> Result<()> {
    let line = format!("{}\n", format_entry(name, artist));

    let mut file = OpenOptions::new()
        .read(true)
        .append(true)
        .create(true)
        .open(path)?;

    let len = file.metadata()?.len();
    if len > 0 {
        file.seek(SeekFrom::End(-1))?;
        let mut last = [0u8; 1];
        file.read_exact(&mut last)?;
        if last[0] != b'\n' {
            file.write_all(b"\n")?;
        }
    }
    file.write_all(line.as_bytes())?;
    file.flush()?;
    Ok(())
}

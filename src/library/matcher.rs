use std::path::PathBuf;

use crate::audio::{DurationCache, DurationLookup};
use crate::playlist::{ARTIST_SEPARATOR, Playlist};

use super::scan::LibraryFile;

/// Split a file stem (no extension) into `(name, artist)` on the last `--`.
pub fn split_file_stem(stem: &str) -> (String, Option<String>) {
    match stem.rsplit_once(ARTIST_SEPARATOR) {
        Some((name, artist)) => {
            let artist = artist.trim();
            let artist = (!artist.is_empty()).then(|| artist.to_string());
            (name.trim().to_string(), artist)
        }
        None => (stem.trim().to_string(), None),
    }
}

/// Decide whether a candidate file belongs to a playlist entry.
///
/// Names must be equal ignoring case. An entry without artist accepts any
/// candidate; otherwise the candidate needs an artist and one of the two
/// artist strings must contain the other, ignoring case.
pub fn is_song_match(
    entry_name: &str,
    entry_artist: &str,
    candidate_name: &str,
    candidate_artist: &str,
) -> bool {
    if entry_name.trim().to_lowercase() != candidate_name.trim().to_lowercase() {
        return false;
    }

    let wanted = entry_artist.trim().to_lowercase();
    if wanted.is_empty() {
        return true;
    }

    let found = candidate_artist.trim().to_lowercase();
    if found.is_empty() {
        return false;
    }

    wanted.contains(&found) || found.contains(&wanted)
}

/// First file in `files` matching the given entry.
pub fn find_match<'a>(files: &'a [LibraryFile], name: &str, artist: &str) -> Option<&'a LibraryFile> {
    files.iter().find(|f| {
        is_song_match(name, artist, &f.name, f.artist.as_deref().unwrap_or_default())
    })
}

/// Outcome of matching a playlist against the download directory.
#[derive(Debug, Default)]
pub struct MatchReport {
    pub matched: usize,
    /// Songs still without a file; the UI marks them for download.
    pub unresolved: Vec<usize>,
    /// Matched files whose duration metadata could not be read.
    pub needs_probe: Vec<PathBuf>,
}

/// Attach local files to every song of `playlist` that has none yet.
pub fn find_song_files(
    playlist: &mut Playlist,
    files: &[LibraryFile],
    durations: &mut DurationCache,
) -> MatchReport {
    let mut report = MatchReport::default();

    for (i, song) in playlist.songs.iter_mut().enumerate() {
        if song.is_resolved() {
            continue;
        }

        let Some(file) = find_match(files, &song.name, &song.artist) else {
            report.unresolved.push(i);
            continue;
        };

        song.path = Some(file.path.clone());
        if !song.has_artist() {
            if let Some(artist) = &file.artist {
                song.artist = artist.clone();
            }
        }
        song.duration_ms = match durations.resolve(&file.path) {
            DurationLookup::Known(ms) => ms,
            DurationLookup::Pending => {
                if !report.needs_probe.contains(&file.path) {
                    report.needs_probe.push(file.path.clone());
                }
                0
            }
        };
        report.matched += 1;
    }

    report
}

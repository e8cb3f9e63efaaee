use std::path::PathBuf;

/// Separator between song name and artist, in playlist lines and file names.
pub const ARTIST_SEPARATOR: &str = "--";

/// One logical track of a playlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Song {
    pub name: String,
    /// Empty when the playlist line named no artist.
    pub artist: String,
    /// Resolved local file, once matched or downloaded.
    pub path: Option<PathBuf>,
    /// Cached duration in milliseconds; 0 = unknown.
    pub duration_ms: u64,
}

impl Song {
    pub fn new(name: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            artist: artist.into(),
            path: None,
            duration_ms: 0,
        }
    }

    /// Parse a `name` or `name--artist` entry. Returns `None` for blank input.
    pub fn parse_entry(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        let (name, artist) = split_entry(line);
        Some(Self::new(name, artist))
    }

    pub fn has_artist(&self) -> bool {
        !self.artist.trim().is_empty()
    }

    /// Whether a local file is known for this song.
    pub fn is_resolved(&self) -> bool {
        self.path.is_some()
    }
}

/// Split `name--artist` on the first separator; both halves trimmed.
pub fn split_entry(text: &str) -> (String, String) {
    match text.split_once(ARTIST_SEPARATOR) {
        Some((name, artist)) => (name.trim().to_string(), artist.trim().to_string()),
        None => (text.trim().to_string(), String::new()),
    }
}

pub fn format_entry(name: &str, artist: &str) -> String {
    if artist.trim().is_empty() {
        name.to_string()
    } else {
        format!("{name}{ARTIST_SEPARATOR}{artist}")
    }
}

/// An ordered list of songs loaded from one playlist file.
///
/// Index is the only identity a song has.
#[derive(Debug, Clone, Default)]
pub struct Playlist {
    pub label: String,
    /// File new songs are appended to.
    pub source: Option<PathBuf>,
    pub songs: Vec<Song>,
}

impl Playlist {
    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Song> {
        self.songs.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Song> {
        self.songs.get_mut(index)
    }

    /// Append a song and return its index.
    pub fn push(&mut self, song: Song) -> usize {
        self.songs.push(song);
        self.songs.len() - 1
    }

    /// First song whose name equals `name` (case-insensitive) and whose artist
    /// equals `artist` when one is given.
    pub fn position_of(&self, name: &str, artist: &str) -> Option<usize> {
        let name = name.trim().to_lowercase();
        let artist = artist.trim().to_lowercase();
        self.songs.iter().position(|s| {
            s.name.trim().to_lowercase() == name
                && (artist.is_empty() || s.artist.trim().to_lowercase() == artist)
        })
    }
}

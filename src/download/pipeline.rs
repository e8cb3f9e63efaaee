use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// One search result.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub id: String,
    pub title: String,
    pub uploader: Option<String>,
    pub duration_secs: Option<u64>,
}

pub trait SearchProvider: Send + Sync {
    fn search(&self, query: &str) -> Result<Vec<Candidate>>;

    /// Id of the candidate that most likely is the full original song.
    fn select_best(&self, candidates: &[Candidate], song: &str, artist: &str) -> Option<String>;
}

pub trait Downloader: Send + Sync {
    /// Fetch the audio of `id` into `dir` and return the written file.
    fn download(&self, id: &str, dir: &Path) -> Result<PathBuf>;
}

pub trait Renamer: Send + Sync {
    fn rename(&self, file: &Path, song: &str, artist: &str) -> Result<PathBuf>;
}

/// `"<song> <artist>"`, or `"<song> <suffix>"` when the artist is unknown.
pub fn search_query(song: &str, artist: &str, original_suffix: &str) -> String {
    let song = song.trim();
    let artist = artist.trim();
    if artist.is_empty() {
        format!("{song} {original_suffix}").trim_end().to_string()
    } else {
        format!("{song} {artist}")
    }
}

/// Search, select, download and rename, strictly in that order.
pub struct FetchPipeline {
    search: Box<dyn SearchProvider>,
    downloader: Box<dyn Downloader>,
    renamer: Box<dyn Renamer>,
    download_dir: PathBuf,
    original_suffix: String,
}

impl FetchPipeline {
    pub fn new(
        search: Box<dyn SearchProvider>,
        downloader: Box<dyn Downloader>,
        renamer: Box<dyn Renamer>,
        download_dir: PathBuf,
        original_suffix: String,
    ) -> Self {
        Self {
            search,
            downloader,
            renamer,
            download_dir,
            original_suffix,
        }
    }

    pub fn run(&self, song: &str, artist: &str, progress: &mut dyn FnMut(String)) -> Result<PathBuf> {
        let query = search_query(song, artist, &self.original_suffix);
        progress(format!("Searching \"{query}\"..."));
        let candidates = self.search.search(&query)?;
        if candidates.is_empty() {
            return Err(Error::NoCandidates(query));
        }

        progress(format!("Choosing among {} results...", candidates.len()));
        let id = self
            .search
            .select_best(&candidates, song, artist)
            .ok_or_else(|| Error::NoSelection(song.to_string()))?;

        progress(format!("Downloading {id}..."));
        let file = self.downloader.download(&id, &self.download_dir)?;

        progress("Renaming...".to_string());
        match self.renamer.rename(&file, song, artist) {
            Ok(renamed) => Ok(renamed),
            Err(e) => {
                log::warn!("keeping {} as downloaded: {e}", file.display());
                Ok(file)
            }
        }
    }
}

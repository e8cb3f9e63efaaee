//! Search and download through the `yt-dlp` command line tool.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde::Deserialize;

use crate::config::DownloadSettings;
use crate::error::{Error, Result};

use super::pipeline::{Candidate, Downloader, SearchProvider};

/// Title fragments that point at something other than the original recording.
const PENALIZED: &[&str] = &[
    "翻唱", "cover", "live", "现场", "片段", "伴奏", "instrumental", "karaoke", "remix", "dj",
    "reaction", "教学",
];

/// Title fragments that hint at a clean full-quality upload.
const PREFERRED: &[&str] = &["无损", "hi-res", "flac", "录音棚", "官方", "official", "完整版"];

#[derive(Debug, Deserialize)]
struct FlatEntry {
    id: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    uploader: Option<String>,
    #[serde(default)]
    channel: Option<String>,
    #[serde(default)]
    duration: Option<f64>,
}

/// One `--dump-json` line as a candidate.
pub fn parse_search_line(line: &str) -> Result<Candidate> {
    let entry: FlatEntry = serde_json::from_str(line)?;
    Ok(Candidate {
        title: entry.title.unwrap_or_else(|| entry.id.clone()),
        id: entry.id,
        uploader: entry.uploader.or(entry.channel),
        duration_secs: entry.duration.filter(|d| *d > 0.0).map(|d| d.round() as u64),
    })
}

/// Parse `--dump-json` output: one JSON object per line. Lines that do not
/// parse are skipped.
pub fn parse_search_output(stdout: &str) -> Vec<Candidate> {
    stdout
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| match parse_search_line(line) {
            Ok(candidate) => Some(candidate),
            Err(e) => {
                log::debug!("skipping search line: {e}");
                None
            }
        })
        .collect()
}

/// Score a candidate for `(song, artist)`; `None` when the title does not
/// even mention the song.
pub fn score_candidate(candidate: &Candidate, song: &str, artist: &str) -> Option<i32> {
    let title = candidate.title.to_lowercase();
    let song = song.trim().to_lowercase();
    if song.is_empty() || !title.contains(&song) {
        return None;
    }

    let mut score = 10;
    let artist = artist.trim().to_lowercase();
    if !artist.is_empty() {
        let uploader = candidate.uploader.as_deref().unwrap_or_default().to_lowercase();
        if title.contains(&artist) {
            score += 5;
        } else if uploader.contains(&artist) {
            score += 3;
        }
    }

    for word in PENALIZED {
        // don't punish a song whose own name contains the keyword
        if title.contains(word) && !song.contains(word) {
            score -= 4;
        }
    }
    for word in PREFERRED {
        if title.contains(word) {
            score += 1;
        }
    }

    match candidate.duration_secs {
        Some(secs) if secs < 60 => score -= 5,
        Some(secs) if secs > 900 => score -= 3,
        _ => {}
    }

    Some(score)
}

/// Highest scoring candidate; ties keep the earlier search rank.
pub fn select_best_candidate(candidates: &[Candidate], song: &str, artist: &str) -> Option<String> {
    let mut best: Option<(i32, &Candidate)> = None;
    for candidate in candidates {
        let Some(score) = score_candidate(candidate, song, artist) else {
            continue;
        };
        if best.is_none_or(|(top, _)| score > top) {
            best = Some((score, candidate));
        }
    }
    best.map(|(_, c)| c.id.clone())
}

pub struct YtDlp {
    program: String,
    search_prefix: String,
    search_limit: usize,
    audio_format: String,
    video_url_template: String,
}

impl YtDlp {
    pub fn from_settings(settings: &DownloadSettings) -> Self {
        Self {
            program: settings.ytdlp_path.clone(),
            search_prefix: settings.search_prefix.clone(),
            search_limit: settings.search_limit,
            audio_format: settings.audio_format.clone(),
            video_url_template: settings.video_url_template.clone(),
        }
    }

    fn video_url(&self, id: &str) -> String {
        if id.starts_with("http://") || id.starts_with("https://") {
            id.to_string()
        } else {
            self.video_url_template.replace("{id}", id)
        }
    }

    fn run(&self, args: &[String]) -> Result<String> {
        let output = Command::new(&self.program)
            .args(args)
            .output()
            .map_err(|e| Error::Download(format!("cannot run {}: {e}", self.program)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let reason = stderr
                .lines()
                .rev()
                .find(|l| !l.trim().is_empty())
                .unwrap_or("exited with an error");
            return Err(Error::Download(reason.trim().to_string()));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn download_args(&self, url: &str, dir: &Path, convert: bool) -> Vec<String> {
        let mut args = vec![
            "-x".to_string(),
            "--print".to_string(),
            "after_move:filepath".to_string(),
            "-o".to_string(),
            dir.join("%(title)s-%(id)s.%(ext)s").to_string_lossy().into_owned(),
        ];
        if convert {
            args.push("--audio-format".to_string());
            args.push(self.audio_format.clone());
        }
        args.push("--audio-quality".to_string());
        args.push("0".to_string());
        args.push(url.to_string());
        args
    }
}

impl SearchProvider for YtDlp {
    fn search(&self, query: &str) -> Result<Vec<Candidate>> {
        let target = format!("{}{}:{query}", self.search_prefix, self.search_limit);
        let stdout = self.run(&[
            "--flat-playlist".to_string(),
            "--dump-json".to_string(),
            target,
        ])?;
        Ok(parse_search_output(&stdout))
    }

    fn select_best(&self, candidates: &[Candidate], song: &str, artist: &str) -> Option<String> {
        select_best_candidate(candidates, song, artist)
    }
}

impl Downloader for YtDlp {
    fn download(&self, id: &str, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let url = self.video_url(id);

        let stdout = match self.run(&self.download_args(&url, dir, true)) {
            Ok(out) => out,
            Err(e) => {
                // Conversion needs ffmpeg; fall back to the source format.
                log::warn!("converted download of {url} failed ({e}), retrying as-is");
                self.run(&self.download_args(&url, dir, false))?
            }
        };

        let path = stdout
            .lines()
            .rev()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .ok_or_else(|| Error::Download(format!("{} printed no file path", self.program)))?;
        Ok(PathBuf::from(path))
    }
}

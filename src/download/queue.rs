use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Work handed to a `Fetcher`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchJob {
    pub id: u64,
    pub song_name: String,
    pub artist_name: String,
}

/// Runs fetch jobs off the state-owning thread. The outcome comes back as a
/// `DownloadEvent::Finished` carrying the job id.
pub trait Fetcher {
    fn start(&self, job: FetchJob);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueEntry {
    pub song_name: String,
    pub artist_name: String,
    /// Row to update on success; `None` appends a new song.
    pub playlist_index: Option<usize>,
    /// Whether something was playing when this entry's fetch started.
    pub was_playing: bool,
    job: Option<u64>,
}

impl QueueEntry {
    fn same_song(&self, song: &str, artist: &str) -> bool {
        self.song_name.trim().to_lowercase() == song.trim().to_lowercase()
            && self.artist_name.trim().to_lowercase() == artist.trim().to_lowercase()
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EnqueueOutcome {
    AlreadyQueued,
    /// Waiting behind the running fetch; `position` is the queue index.
    Queued { position: usize },
    Started,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// Nothing left to do.
    Idle,
    Started,
}

/// FIFO of fetch requests with at most one fetch in flight.
///
/// The head entry stays in the queue while its fetch runs and is removed when
/// the fetch reports back. The next step is scheduled as a timestamp and run
/// from `poll`.
pub struct DownloadQueue {
    entries: VecDeque<QueueEntry>,
    fetcher: Box<dyn Fetcher>,
    in_flight: bool,
    next_job: u64,
    scheduled: Option<Instant>,
    success_delay: Duration,
    failure_delay: Duration,
}

impl DownloadQueue {
    pub fn new(fetcher: Box<dyn Fetcher>, success_delay: Duration, failure_delay: Duration) -> Self {
        Self {
            entries: VecDeque::new(),
            fetcher,
            in_flight: false,
            next_job: 1,
            scheduled: None,
            success_delay,
            failure_delay,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    pub fn is_busy(&self) -> bool {
        self.in_flight
    }

    #[cfg(test)]
    pub fn head(&self) -> Option<&QueueEntry> {
        self.entries.front()
    }

    /// Adds a request. De-duplication looks at `(song, artist)` only, so the
    /// same song requested for a different row is still "already queued".
    pub fn enqueue(
        &mut self,
        song: &str,
        artist: &str,
        playlist_index: Option<usize>,
        now_playing: bool,
    ) -> EnqueueOutcome {
        if self.entries.iter().any(|e| e.same_song(song, artist)) {
            return EnqueueOutcome::AlreadyQueued;
        }

        self.entries.push_back(QueueEntry {
            song_name: song.trim().to_string(),
            artist_name: artist.trim().to_string(),
            playlist_index,
            was_playing: false,
            job: None,
        });

        if self.in_flight {
            return EnqueueOutcome::Queued {
                position: self.entries.len() - 1,
            };
        }

        // A failed fetch may have left a step scheduled; starting now replaces it.
        self.scheduled = None;
        self.process_next(now_playing);
        EnqueueOutcome::Started
    }

    pub fn process_next(&mut self, now_playing: bool) -> ProcessOutcome {
        self.scheduled = None;

        let job_id = self.next_job;
        let Some(head) = self.entries.front_mut() else {
            self.in_flight = false;
            return ProcessOutcome::Idle;
        };

        self.next_job += 1;
        head.job = Some(job_id);
        head.was_playing = now_playing;
        self.in_flight = true;

        log::info!(
            "fetch {job_id} started: {} {}",
            head.song_name,
            head.artist_name
        );
        self.fetcher.start(FetchJob {
            id: job_id,
            song_name: head.song_name.clone(),
            artist_name: head.artist_name.clone(),
        });
        ProcessOutcome::Started
    }

    fn take_head(&mut self, job: u64) -> Option<QueueEntry> {
        match self.entries.front() {
            Some(head) if head.job == Some(job) => self.entries.pop_front(),
            _ => {
                log::debug!("ignoring result of stale fetch {job}");
                None
            }
        }
    }

    /// Removes the finished head and schedules the next step. `None` for a
    /// job that is not the running one.
    pub fn complete(&mut self, job: u64, now: Instant) -> Option<QueueEntry> {
        let entry = self.take_head(job)?;
        self.scheduled = Some(now + self.success_delay);
        Some(entry)
    }

    pub fn fail(&mut self, job: u64, now: Instant) -> Option<QueueEntry> {
        let entry = self.take_head(job)?;
        self.scheduled = Some(now + self.failure_delay);
        if self.entries.is_empty() {
            self.in_flight = false;
        }
        Some(entry)
    }

    /// Runs the scheduled step once it is due.
    pub fn poll(&mut self, now: Instant, now_playing: bool) -> Option<ProcessOutcome> {
        match self.scheduled {
            Some(at) if now >= at => Some(self.process_next(now_playing)),
            _ => None,
        }
    }
}

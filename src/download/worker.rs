use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;

use crate::error::Error;
use crate::events::{AppEvent, DownloadEvent, EventSender};

use super::pipeline::FetchPipeline;
use super::queue::{FetchJob, Fetcher};

/// Runs each fetch job on its own thread. The queue guarantees only one is
/// alive at a time.
pub struct ThreadFetcher {
    pipeline: Arc<FetchPipeline>,
    events: EventSender,
}

impl ThreadFetcher {
    pub fn new(pipeline: FetchPipeline, events: EventSender) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            events,
        }
    }
}

impl Fetcher for ThreadFetcher {
    fn start(&self, job: FetchJob) {
        let pipeline = Arc::clone(&self.pipeline);
        let events = self.events.clone();

        thread::spawn(move || {
            let mut progress = |message: String| {
                let _ = events.send(AppEvent::Download(DownloadEvent::Progress {
                    job: job.id,
                    message,
                }));
            };
            // A panicking stage must still end the job, or the queue never moves on.
            let result = panic::catch_unwind(AssertUnwindSafe(|| {
                pipeline.run(&job.song_name, &job.artist_name, &mut progress)
            }))
            .unwrap_or_else(|_| Err(Error::Download("fetch worker panicked".to_string())))
            .map_err(|e| e.to_string());

            match &result {
                Ok(path) => log::info!("fetch {} finished: {}", job.id, path.display()),
                Err(e) => log::warn!("fetch {} for {} failed: {e}", job.id, job.song_name),
            }
            let _ = events.send(AppEvent::Download(DownloadEvent::Finished {
                job: job.id,
                result,
            }));
        });
    }
}

//! Finding and fetching songs that are missing locally.
//!
//! `DownloadQueue` serializes requests so that at most one fetch runs at a
//! time. A fetch is the `FetchPipeline` (search, select, download, rename)
//! executed by a `Fetcher` off the state-owning thread.

mod pipeline;
mod queue;
mod rename;
mod worker;
mod ytdlp;

pub use pipeline::{Candidate, Downloader, FetchPipeline, Renamer, SearchProvider, search_query};
pub use queue::{DownloadQueue, EnqueueOutcome, FetchJob, Fetcher, ProcessOutcome, QueueEntry};
pub use rename::FileNameRenamer;
pub use worker::ThreadFetcher;
pub use ytdlp::YtDlp;

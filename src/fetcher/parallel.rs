use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::sync::Semaphore;
use tracing::{debug, error, info};

use crate::app::{Result, TrickleError};
use crate::config::FetchConfig;
use crate::domain::{FeedMeta, ParsedFeed, Validators};
use crate::fetcher::{FetchResult, Fetcher};
use crate::staging::EntryWriter;

/// One feed to poll.
#[derive(Debug, Clone)]
pub struct FeedJob {
    pub name: String,
    pub url: String,
    pub validators: Validators,
}

#[derive(Debug)]
pub enum FeedChange {
    Unchanged,
    Updated {
        meta: FeedMeta,
        /// Entries returned by the fetch
        new_entries: usize,
        /// Entries actually staged
        written: usize,
    },
}

#[derive(Debug)]
pub struct FeedOutcome {
    pub name: String,
    pub result: Result<FeedChange>,
}

/// Polls feeds on a bounded pool of tasks.
///
/// Each task owns a single feed from fetch through staging, so no two
/// tasks ever write into the same staging directory.
pub struct ParallelFetcher {
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    semaphore: Arc<Semaphore>,
    timeout: Duration,
}

impl ParallelFetcher {
    pub fn new(fetcher: Arc<dyn Fetcher + Send + Sync>, config: &FetchConfig) -> Self {
        Self::with_workers(fetcher, config.workers, config.timeout())
    }

    pub fn with_workers(
        fetcher: Arc<dyn Fetcher + Send + Sync>,
        workers: usize,
        timeout: Duration,
    ) -> Self {
        Self {
            fetcher,
            semaphore: Arc::new(Semaphore::new(workers.max(1))),
            timeout,
        }
    }

    /// Poll every job and wait for all of them. Outcomes come back in job
    /// order; a failed or panicked task only fails its own feed.
    pub async fn poll_all(
        &self,
        jobs: Vec<FeedJob>,
        writer: Arc<EntryWriter>,
    ) -> Vec<FeedOutcome> {
        let mut names = Vec::with_capacity(jobs.len());
        let mut handles = Vec::with_capacity(jobs.len());

        for job in jobs {
            let fetcher = self.fetcher.clone();
            let semaphore = self.semaphore.clone();
            let writer = writer.clone();
            let timeout = self.timeout;

            names.push(job.name.clone());
            handles.push(tokio::spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(e) => return Err(TrickleError::Other(e.to_string())),
                };

                poll_single_feed(&fetcher, &job, &writer, timeout).await
            }));
        }

        join_all(handles)
            .await
            .into_iter()
            .zip(names)
            .map(|(joined, name)| {
                let result = joined.unwrap_or_else(|e| {
                    error!(feed = %name, "Task join error: {}", e);
                    Err(TrickleError::Other(format!("poll task failed: {e}")))
                });
                FeedOutcome { name, result }
            })
            .collect()
    }
}

async fn poll_single_feed(
    fetcher: &Arc<dyn Fetcher + Send + Sync>,
    job: &FeedJob,
    writer: &Arc<EntryWriter>,
    timeout: Duration,
) -> Result<FeedChange> {
    let fetched = tokio::time::timeout(timeout, fetcher.fetch(&job.url, &job.validators))
        .await
        .map_err(|_| TrickleError::Fetch(format!("{} timed out after {:?}", job.url, timeout)))??;

    match fetched {
        FetchResult::Unchanged => {
            debug!(feed = %job.name, "Feed not modified");
            Ok(FeedChange::Unchanged)
        }
        FetchResult::Updated(ParsedFeed { meta, entries }) => {
            let new_entries = entries.len();

            let name = job.name.clone();
            let writer = writer.clone();
            let written = tokio::task::spawn_blocking(move || writer.write_all(&name, &entries))
                .await
                .map_err(|e| TrickleError::Other(format!("entry writer failed: {e}")))?;

            info!(feed = %job.name, new_entries, written, "Staged new entries");
            Ok(FeedChange::Updated {
                meta,
                new_entries,
                written,
            })
        }
    }
}

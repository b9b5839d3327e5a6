//! One poll cycle: load state, fetch and stage every feed, commit state.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::app::Result;
use crate::domain::feed::validate_name;
use crate::fetcher::parallel::{FeedChange, FeedJob, ParallelFetcher};
use crate::staging::EntryWriter;
use crate::store::StateStore;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedFailure {
    pub feed_name: String,
    pub reason: String,
}

/// What a cycle did, per feed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CycleReport {
    /// Entries returned by each feed that reported new content. Duplicate
    /// or unwritable entries are still counted.
    pub new_entries: BTreeMap<String, usize>,
    /// Records actually staged per updated feed. Lower than `new_entries`
    /// when writes failed; identical entries still count once each.
    pub written: BTreeMap<String, usize>,
    pub unchanged: Vec<String>,
    pub failed: Vec<FeedFailure>,
}

impl CycleReport {
    /// New entries for `feed_name`; zero for feeds that were not updated.
    pub fn count(&self, feed_name: &str) -> usize {
        self.new_entries.get(feed_name).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.new_entries.values().sum()
    }

    pub fn updated(&self) -> usize {
        self.new_entries.len()
    }
}

pub struct PollCycle<S> {
    store: S,
    fetcher: ParallelFetcher,
    writer: Arc<EntryWriter>,
}

impl<S: StateStore> PollCycle<S> {
    pub fn new(store: S, fetcher: ParallelFetcher, writer: EntryWriter) -> Self {
        Self {
            store,
            fetcher,
            writer: Arc::new(writer),
        }
    }

    /// Run the cycle.
    ///
    /// Per-feed fetch and parse failures are logged and leave that feed's
    /// state alone, as do feeds whose stored name is not a safe directory
    /// name. The store is written once, after every feed finished,
    /// and only if at least one feed changed. Errors loading or saving the
    /// store abort the cycle.
    pub async fn run(&self) -> Result<CycleReport> {
        let mut feeds = self.store.load()?;
        let mut report = CycleReport::default();

        if feeds.is_empty() {
            info!("No feeds to update");
            return Ok(report);
        }

        let mut jobs = Vec::with_capacity(feeds.len());
        for (name, feed) in &feeds {
            // Names come from a hand-editable file; never let one escape base_dir.
            if let Err(e) = validate_name(name) {
                warn!(feed = %name, error = %e, "Skipping feed with unsafe name");
                report.failed.push(FeedFailure {
                    feed_name: name.clone(),
                    reason: e.to_string(),
                });
                continue;
            }
            jobs.push(FeedJob {
                name: name.clone(),
                url: feed.url.clone(),
                validators: feed.validators(),
            });
        }

        info!(feeds = jobs.len(), "Polling feeds");
        let outcomes = self.fetcher.poll_all(jobs, self.writer.clone()).await;

        for outcome in outcomes {
            match outcome.result {
                Ok(FeedChange::Unchanged) => report.unchanged.push(outcome.name),
                Ok(FeedChange::Updated {
                    meta,
                    new_entries,
                    written,
                }) => {
                    if let Some(feed) = feeds.get_mut(&outcome.name) {
                        feed.apply(meta);
                    }
                    report.written.insert(outcome.name.clone(), written);
                    report.new_entries.insert(outcome.name, new_entries);
                }
                Err(e) => {
                    warn!(feed = %outcome.name, error = %e, "Skipping feed this cycle");
                    report.failed.push(FeedFailure {
                        feed_name: outcome.name,
                        reason: e.to_string(),
                    });
                }
            }
        }

        if report.updated() > 0 {
            self.store.save(&feeds)?;
        }

        info!(
            new_entries = report.total(),
            updated = report.updated(),
            unchanged = report.unchanged.len(),
            failed = report.failed.len(),
            "Update complete"
        );
        Ok(report)
    }
}

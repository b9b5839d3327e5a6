use std::sync::Arc;

use crate::app::error::Result;
use crate::config::Config;
use crate::fetcher::http_fetcher::HttpFetcher;
use crate::fetcher::parallel::ParallelFetcher;
use crate::fetcher::Fetcher;
use crate::poll::PollCycle;
use crate::staging::EntryWriter;
use crate::store::JsonStateStore;

pub struct AppContext {
    pub config: Config,
    pub fetcher: Arc<dyn Fetcher + Send + Sync>,
}

impl AppContext {
    pub fn new(config: Config) -> Result<Self> {
        let fetcher: Arc<dyn Fetcher + Send + Sync> = Arc::new(HttpFetcher::new(&config.fetch)?);
        Ok(Self::with_fetcher(config, fetcher))
    }

    /// Build a context around a custom fetcher.
    pub fn with_fetcher(config: Config, fetcher: Arc<dyn Fetcher + Send + Sync>) -> Self {
        Self { config, fetcher }
    }

    pub fn state_store(&self) -> JsonStateStore {
        JsonStateStore::new(&self.config.store_path)
    }

    pub fn entry_writer(&self) -> EntryWriter {
        EntryWriter::new(&self.config.base_dir)
    }

    pub fn poll_cycle(&self) -> PollCycle<JsonStateStore> {
        PollCycle::new(
            self.state_store(),
            ParallelFetcher::new(self.fetcher.clone(), &self.config.fetch),
            self.entry_writer(),
        )
    }
}

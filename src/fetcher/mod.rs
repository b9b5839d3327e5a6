pub mod http_fetcher;
pub mod parallel;

use async_trait::async_trait;

use crate::app::Result;
use crate::domain::{ParsedFeed, Validators};

#[derive(Debug)]
pub enum FetchResult {
    /// Content not modified (HTTP 304)
    Unchanged,
    /// New content fetched and parsed
    Updated(ParsedFeed),
}

#[async_trait]
pub trait Fetcher {
    /// Conditionally fetch `url`, sending whichever validators are known.
    async fn fetch(&self, url: &str, validators: &Validators) -> Result<FetchResult>;
}

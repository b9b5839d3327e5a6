//! Operations on the subscription list and staging area.

use tracing::info;

use crate::app::{AppContext, Result};
use crate::domain::{FeedConfig, FeedStore};
use crate::poll::CycleReport;
use crate::staging::{self, FeedStatus};
use crate::store::StateStore;

/// Subscribe to `url` under `name`.
pub fn add_feed(ctx: &AppContext, name: &str, url: &str) -> Result<()> {
    let store = ctx.state_store();
    let mut feeds = store.load()?;
    feeds.add(name, url)?;
    store.save(&feeds)?;

    info!(feed = name, url, "Added feed");
    Ok(())
}

/// Unsubscribe `name`. Records already staged for it stay where they are.
pub fn remove_feed(ctx: &AppContext, name: &str) -> Result<FeedConfig> {
    let store = ctx.state_store();
    let mut feeds = store.load()?;
    let removed = feeds.remove(name)?;
    store.save(&feeds)?;

    info!(feed = name, "Removed feed");
    Ok(removed)
}

/// Run one full poll cycle over every subscribed feed.
pub async fn update_all(ctx: &AppContext) -> Result<CycleReport> {
    ctx.poll_cycle().run().await
}

/// Pending record counts per feed.
pub fn get_status(ctx: &AppContext) -> Result<Vec<FeedStatus>> {
    let feeds = ctx.state_store().load()?;
    staging::status(&feeds, &ctx.config.base_dir)
}

pub fn list_feeds(ctx: &AppContext) -> Result<FeedStore> {
    ctx.state_store().load()
}

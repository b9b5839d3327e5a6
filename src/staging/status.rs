use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::Serialize;
use tracing::warn;

use crate::app::Result;
use crate::domain::feed::validate_name;
use crate::domain::FeedStore;
use crate::staging::staging_dir;
use crate::store::atomic::TEMP_PREFIX;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedStatus {
    pub feed_name: String,
    pub pending: usize,
}

/// Pending record counts for every feed in `feeds`, in store order.
/// Feeds whose names would resolve outside `base_dir` are left out.
pub fn status(feeds: &FeedStore, base_dir: &Path) -> Result<Vec<FeedStatus>> {
    let mut rows = Vec::with_capacity(feeds.len());
    for name in feeds.names() {
        if let Err(e) = validate_name(name) {
            warn!(feed = %name, error = %e, "Skipping feed with unsafe name");
            continue;
        }
        rows.push(FeedStatus {
            feed_name: name.to_string(),
            pending: pending_count(&staging_dir(base_dir, name))?,
        });
    }
    Ok(rows)
}

/// Number of staged records in `dir`. A directory that does not exist yet
/// holds nothing.
pub fn pending_count(dir: &Path) -> Result<usize> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(e.into()),
    };

    let mut count = 0;
    for entry in entries {
        let entry = entry?;
        if entry.file_name().to_string_lossy().starts_with(TEMP_PREFIX) {
            continue;
        }
        if entry.file_type()?.is_file() {
            count += 1;
        }
    }
    Ok(count)
}

//! Per-feed staging directories.
//!
//! Every feed owns `<base_dir>/<feed name>/new/`. The poll cycle drops one
//! JSON record per fetched entry in there; downstream consumers move or
//! delete records once they have processed them.

pub mod status;
pub mod writer;

use std::path::{Path, PathBuf};

pub use status::{pending_count, status, FeedStatus};
pub use writer::{derive_key, slugify, EntryWriter};

pub const PENDING_DIR: &str = "new";

pub fn staging_dir(base_dir: &Path, feed_name: &str) -> PathBuf {
    base_dir.join(feed_name).join(PENDING_DIR)
}

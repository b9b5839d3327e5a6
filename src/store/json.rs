use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::app::{Result, TrickleError};
use crate::domain::FeedStore;
use crate::store::atomic::write_atomic;
use crate::store::StateStore;

/// [`StateStore`] backed by a single pretty-printed JSON document.
#[derive(Debug, Clone)]
pub struct JsonStateStore {
    path: PathBuf,
}

impl JsonStateStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateStore for JsonStateStore {
    fn load(&self) -> Result<FeedStore> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no state file yet, starting empty");
                return Ok(FeedStore::new());
            }
            Err(e) => return Err(e.into()),
        };

        serde_json::from_str(&content).map_err(|source| TrickleError::CorruptState {
            path: self.path.clone(),
            source,
        })
    }

    fn save(&self, feeds: &FeedStore) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(feeds)?;
        write_atomic(&self.path, json.as_bytes())?;
        debug!(path = %self.path.display(), feeds = feeds.len(), "saved state");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let store = JsonStateStore::new(tmp.path().join("feeds.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_load_corrupt() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("feeds.json");
        fs::write(&path, "{ not json").unwrap();

        let err = JsonStateStore::new(&path).load().unwrap_err();
        assert!(matches!(err, TrickleError::CorruptState { .. }));
    }

    #[test]
    fn test_save_load_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let store = JsonStateStore::new(tmp.path().join("nested").join("feeds.json"));

        let mut feeds = FeedStore::new();
        feeds.add("tech", "http://example.test/feed").unwrap();
        feeds.add("news", "https://example.org/rss").unwrap();
        {
            let tech = feeds.get_mut("tech").unwrap();
            tech.title = Some("Tech".into());
            tech.etag = Some("\"abc\"".into());
            tech.last_modified = Some("Mon, 01 Jan 2024 00:00:00 GMT".into());
        }

        store.save(&feeds).unwrap();
        assert_eq!(store.load().unwrap(), feeds);
    }

    #[test]
    fn test_save_uses_original_field_names() {
        let tmp = tempfile::tempdir().unwrap();
        let store = JsonStateStore::new(tmp.path().join("feeds.json"));

        let mut feeds = FeedStore::new();
        feeds.add("tech", "http://example.test/feed").unwrap();
        feeds.get_mut("tech").unwrap().last_modified = Some("yesterday".into());
        store.save(&feeds).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw["tech"]["url"], "http://example.test/feed");
        assert_eq!(raw["tech"]["modified"], "yesterday");
    }
}

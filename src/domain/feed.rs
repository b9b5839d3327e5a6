use std::collections::btree_map;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::app::{Result, TrickleError};
use crate::domain::FeedMeta;

/// Conditional-fetch validators remembered between polls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validators {
    pub etag: Option<String>,
    pub last_modified: Option<String>,
}

/// Persisted state of one subscribed feed.
///
/// Everything except `url` is filled in by the first successful fetch.
/// Fields this version does not know about are carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedConfig {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
    #[serde(
        default,
        rename = "modified",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_modified: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl FeedConfig {
    pub fn new(url: String) -> Self {
        Self {
            url,
            title: None,
            link: None,
            description: None,
            etag: None,
            last_modified: None,
            extra: serde_json::Map::new(),
        }
    }

    pub fn validators(&self) -> Validators {
        Validators {
            etag: self.etag.clone(),
            last_modified: self.last_modified.clone(),
        }
    }

    /// Replace the stored metadata with what the latest fetch reported.
    ///
    /// Validators are taken verbatim: a validator the server stopped sending
    /// is cleared rather than kept.
    pub fn apply(&mut self, meta: FeedMeta) {
        self.title = meta.title;
        self.link = meta.link;
        self.description = meta.description;
        self.etag = meta.validators.etag;
        self.last_modified = meta.validators.last_modified;
    }

    pub fn display_title<'a>(&'a self, name: &'a str) -> &'a str {
        self.title.as_deref().unwrap_or(name)
    }
}

/// All subscribed feeds, keyed and iterated by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeedStore {
    feeds: BTreeMap<String, FeedConfig>,
}

impl FeedStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.feeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.feeds.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&FeedConfig> {
        self.feeds.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut FeedConfig> {
        self.feeds.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.feeds.contains_key(name)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, FeedConfig> {
        self.feeds.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.feeds.keys().map(String::as_str)
    }

    /// Subscribe to a new feed.
    pub fn add(&mut self, name: &str, url: &str) -> Result<()> {
        validate_name(name)?;
        validate_url(url)?;

        if self.feeds.contains_key(name) {
            return Err(TrickleError::DuplicateName(name.to_string()));
        }

        self.feeds
            .insert(name.to_string(), FeedConfig::new(url.to_string()));
        Ok(())
    }

    /// Unsubscribe, returning the removed state.
    pub fn remove(&mut self, name: &str) -> Result<FeedConfig> {
        self.feeds
            .remove(name)
            .ok_or_else(|| TrickleError::NotFound(name.to_string()))
    }
}

impl<'a> IntoIterator for &'a FeedStore {
    type Item = (&'a String, &'a FeedConfig);
    type IntoIter = btree_map::Iter<'a, String, FeedConfig>;

    fn into_iter(self) -> Self::IntoIter {
        self.feeds.iter()
    }
}

/// Feed names double as directory names under the staging base directory.
pub fn validate_name(name: &str) -> Result<()> {
    let invalid = |reason| {
        Err(TrickleError::InvalidName {
            name: name.to_string(),
            reason,
        })
    };

    if name.trim().is_empty() {
        return invalid("name is empty");
    }
    if name.starts_with('.') {
        return invalid("name must not start with '.'");
    }
    if name
        .chars()
        .any(|c| c == '/' || c == '\\' || c.is_control())
    {
        return invalid("name contains a path separator or control character");
    }

    Ok(())
}

pub fn validate_url(url: &str) -> Result<()> {
    let parsed = Url::parse(url)?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(TrickleError::UnsupportedScheme(scheme.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_remove() {
        let mut store = FeedStore::new();
        store.add("tech", "https://example.com/feed.xml").unwrap();
        assert!(store.contains("tech"));
        assert_eq!(store.get("tech").unwrap().url, "https://example.com/feed.xml");

        let removed = store.remove("tech").unwrap();
        assert_eq!(removed.url, "https://example.com/feed.xml");
        assert!(store.is_empty());
    }

    #[test]
    fn test_add_duplicate_name() {
        let mut store = FeedStore::new();
        store.add("tech", "https://example.com/a.xml").unwrap();
        let err = store.add("tech", "https://example.com/b.xml").unwrap_err();
        assert!(matches!(err, TrickleError::DuplicateName(ref n) if n == "tech"));
        assert_eq!(store.get("tech").unwrap().url, "https://example.com/a.xml");
    }

    #[test]
    fn test_remove_missing() {
        let mut store = FeedStore::new();
        let err = store.remove("nope").unwrap_err();
        assert!(matches!(err, TrickleError::NotFound(ref n) if n == "nope"));
    }

    #[test]
    fn test_rejects_path_unsafe_names() {
        for name in ["", "  ", ".", "..", ".hidden", "a/b", "a\\b", "a\0b"] {
            assert!(
                matches!(validate_name(name), Err(TrickleError::InvalidName { .. })),
                "{name:?} should be rejected"
            );
        }
        assert!(validate_name("rust-blog_2").is_ok());
        assert!(validate_name("café").is_ok());
    }

    #[test]
    fn test_rejects_bad_urls() {
        let mut store = FeedStore::new();
        assert!(matches!(
            store.add("a", "not a url"),
            Err(TrickleError::InvalidUrl(_))
        ));
        assert!(matches!(
            store.add("a", "ftp://example.com/feed"),
            Err(TrickleError::UnsupportedScheme(_))
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn test_deserialize_minimal_entry() {
        let store: FeedStore =
            serde_json::from_str(r#"{"tech": {"url": "http://example.test/feed", "etag": "abc"}}"#)
                .unwrap();
        let feed = store.get("tech").unwrap();
        assert_eq!(feed.etag.as_deref(), Some("abc"));
        assert_eq!(feed.last_modified, None);
        assert_eq!(feed.title, None);
    }

    #[test]
    fn test_deserialize_nulls_and_unknown_fields() {
        let json = r#"{"tech": {
            "url": "http://example.test/feed",
            "name": "tech",
            "title": null,
            "modified": "Mon, 01 Jan 2024 00:00:00 GMT"
        }}"#;
        let store: FeedStore = serde_json::from_str(json).unwrap();
        let feed = store.get("tech").unwrap();
        assert_eq!(feed.title, None);
        assert_eq!(
            feed.last_modified.as_deref(),
            Some("Mon, 01 Jan 2024 00:00:00 GMT")
        );

        let out = serde_json::to_value(&store).unwrap();
        assert_eq!(out["tech"]["name"], "tech");
        assert!(out["tech"].get("title").is_none());
    }

    #[test]
    fn test_apply_replaces_validators() {
        let mut feed = FeedConfig::new("http://example.test/feed".into());
        feed.etag = Some("old".into());
        feed.last_modified = Some("yesterday".into());

        feed.apply(FeedMeta {
            title: Some("Tech".into()),
            link: None,
            description: Some("News".into()),
            validators: Validators {
                etag: Some("new".into()),
                last_modified: None,
            },
        });

        assert_eq!(feed.title.as_deref(), Some("Tech"));
        assert_eq!(feed.etag.as_deref(), Some("new"));
        assert_eq!(feed.last_modified, None);
    }
}

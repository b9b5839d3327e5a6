use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::Validators;

pub const UNTITLED: &str = "Untitled";

/// Feed-level metadata reported by a fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedMeta {
    pub title: Option<String>,
    pub link: Option<String>,
    pub description: Option<String>,
    pub validators: Validators,
}

/// A parsed feed document: metadata plus entries in source order.
#[derive(Debug, Clone, Default)]
pub struct ParsedFeed {
    pub meta: FeedMeta,
    pub entries: Vec<Entry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub title: String,
    pub summary: Option<String>,
    pub link: Option<String>,
    /// RFC 3339 rendering of the parsed date. The raw source string is not
    /// kept by the parser.
    pub published: Option<String>,
    /// Same format as `published`.
    pub updated: Option<String>,
    /// Timestamp used for the staged file name only. Never used for ordering.
    pub date: NaiveDateTime,
}

impl Entry {
    pub fn new(title: Option<String>) -> Self {
        let title = title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| UNTITLED.to_string());

        Self {
            title,
            summary: None,
            link: None,
            published: None,
            updated: None,
            date: DateTime::<Utc>::UNIX_EPOCH.naive_utc(),
        }
    }

    pub fn to_record(&self) -> StagedRecord {
        StagedRecord {
            title: self.title.clone(),
            summary: self.summary.clone(),
            link: self.link.clone(),
            published: self.published.clone(),
            updated: self.updated.clone(),
        }
    }
}

/// On-disk form of an entry in a staging directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagedRecord {
    pub title: String,
    pub summary: Option<String>,
    pub link: Option<String>,
    pub published: Option<String>,
    pub updated: Option<String>,
}

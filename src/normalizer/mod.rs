use feed_rs::model::Link;
use feed_rs::parser;
use html_escape::decode_html_entities;

use crate::app::{Result, TrickleError};
use crate::domain::{Entry, FeedMeta, ParsedFeed, Validators};

#[derive(Clone)]
pub struct Normalizer;

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer {
    pub fn new() -> Self {
        Self
    }

    /// Parse an RSS, Atom or JSON Feed body.
    ///
    /// `validators` are the ones the server sent with this body; they become
    /// part of the returned metadata.
    pub fn normalize(&self, body: &[u8], validators: Validators) -> Result<ParsedFeed> {
        let feed = parser::parse(body).map_err(|e| TrickleError::Parse(e.to_string()))?;

        let meta = FeedMeta {
            title: feed.title.map(|t| decode(&t.content)),
            link: primary_link(&feed.links),
            description: feed
                .description
                .map(|d| decode(&d.content))
                .filter(|d| !d.trim().is_empty()),
            validators,
        };

        let entries = feed
            .entries
            .into_iter()
            .map(|entry| {
                let mut item = Entry::new(entry.title.map(|t| decode(&t.content)));

                item.link = primary_link(&entry.links);
                item.summary = entry
                    .summary
                    .map(|s| decode(&s.content))
                    .or_else(|| entry.content.and_then(|c| c.body).map(|b| decode(&b)));
                item.published = entry.published.map(|dt| dt.to_rfc3339());
                item.updated = entry.updated.map(|dt| dt.to_rfc3339());
                if let Some(date) = entry.published.or(entry.updated) {
                    item.date = date.naive_utc();
                }

                item
            })
            .collect();

        Ok(ParsedFeed { meta, entries })
    }
}

fn decode(s: &str) -> String {
    decode_html_entities(s).trim().to_string()
}

/// The alternate (HTML) link, falling back to whatever comes first.
fn primary_link(links: &[Link]) -> Option<String> {
    links
        .iter()
        .find(|l| matches!(l.rel.as_deref(), None | Some("alternate")))
        .or_else(|| links.first())
        .map(|l| l.href.clone())
}

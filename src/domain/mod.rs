pub mod entry;
pub mod feed;

pub use entry::{Entry, FeedMeta, ParsedFeed, StagedRecord};
pub use feed::{FeedConfig, FeedStore, Validators};

pub mod atomic;
pub mod json;

use crate::app::Result;
use crate::domain::FeedStore;

pub use json::JsonStateStore;

/// Durable home of the subscription list and per-feed fetch state.
///
/// The whole store is read at the start of a poll cycle and written back
/// wholesale at the end.
pub trait StateStore {
    /// Read the persisted feeds. A store that was never saved is empty.
    fn load(&self) -> Result<FeedStore>;

    /// Replace the persisted feeds. Readers never observe a partial write.
    fn save(&self, feeds: &FeedStore) -> Result<()>;
}

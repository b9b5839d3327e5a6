pub mod context;
pub mod error;
pub mod operations;

pub use context::AppContext;
pub use error::{Result, TrickleError};

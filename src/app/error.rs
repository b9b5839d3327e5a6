use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum TrickleError {
    #[error("Corrupt state file {path}: {source}")]
    CorruptState {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error("Feed parsing error: {0}")]
    Parse(String),

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Feed already exists: {0}")]
    DuplicateName(String),

    #[error("Feed not found: {0}")]
    NotFound(String),

    #[error("Invalid feed name {name:?}: {reason}")]
    InvalidName { name: String, reason: &'static str },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Other(String),
}

impl TrickleError {
    /// Whether this error only affects the feed being polled, leaving the
    /// rest of the cycle intact.
    pub fn is_per_feed(&self) -> bool {
        matches!(
            self,
            TrickleError::Http(_) | TrickleError::Fetch(_) | TrickleError::Parse(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, TrickleError>;

//! Configuration management for Trickle.
//!
//! Configuration is read from `~/.config/trickle/config.toml` at startup.
//! If the file doesn't exist, a default configuration with comments is created.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

pub const DEFAULT_WORKERS: usize = 10;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_USER_AGENT: &str = concat!("trickle/", env!("CARGO_PKG_VERSION"));

/// Main configuration struct.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Subscription state file.
    pub store_path: PathBuf,
    /// Root of the per-feed staging directories.
    pub base_dir: PathBuf,
    pub fetch: FetchConfig,
    pub watch: WatchConfig,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("trickle");

        Self {
            store_path: data_dir.join("feeds.json"),
            base_dir: data_dir.join("entries"),
            fetch: FetchConfig::default(),
            watch: WatchConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Per-feed fetch timeout in seconds
    pub timeout_secs: u64,
    /// Feeds polled concurrently
    pub workers: usize,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            workers: DEFAULT_WORKERS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Poll interval, e.g. "1h", "30m", "1d"
    pub interval: String,
    /// Poll immediately when the watcher starts
    pub update_on_start: bool,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            interval: "1h".to_string(),
            update_on_start: true,
        }
    }
}

impl Config {
    /// Load configuration from `path`, or from the default location.
    ///
    /// An explicitly given path must exist. At the default location a
    /// missing file is created with commented defaults.
    /// Missing fields in the config file will use default values.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let default_path = Self::default_config_path()?;
                if !default_path.exists() {
                    Self::create_default_config(&default_path)?;
                    return Ok(Self::default());
                }
                default_path
            }
        };

        let content = fs::read_to_string(&config_path).map_err(|e| ConfigError::Io {
            path: config_path.clone(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: config_path,
            source: e,
        })?;

        Ok(config)
    }

    /// Get the default config file path: `~/.config/trickle/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("trickle").join("config.toml"))
    }

    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        fs::write(path, Self::default_config_content()).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })
    }

    fn default_config_content() -> &'static str {
        r##"# Trickle configuration
#
# Paths default to the platform data directory, e.g.
# ~/.local/share/trickle/feeds.json and ~/.local/share/trickle/entries.
#
# store_path = "/path/to/feeds.json"
# base_dir = "/path/to/entries"

[fetch]
# Give up on a feed after this many seconds
timeout_secs = 30

# Number of feeds fetched concurrently
workers = 10

[watch]
# Poll interval for `trickle watch` ("45s", "30m", "1h", "1d")
interval = "1h"

# Poll once immediately when the watcher starts
update_on_start = true
"##
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid interval: {0}")]
    Interval(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_deserializes() {
        let config: Config = toml::from_str(Config::default_config_content())
            .expect("Default config should be valid TOML");

        assert_eq!(config.fetch, FetchConfig::default());
        assert_eq!(config.watch, WatchConfig::default());
    }

    #[test]
    fn test_partial_config() {
        let content = r#"
base_dir = "/srv/entries"

[fetch]
timeout_secs = 5
"#;
        let config: Config = toml::from_str(content).expect("Partial config should work");

        assert_eq!(config.base_dir, PathBuf::from("/srv/entries"));
        assert_eq!(config.fetch.timeout(), Duration::from_secs(5));
        assert_eq!(config.fetch.workers, DEFAULT_WORKERS);
        assert_eq!(config.store_path, Config::default().store_path);
    }

    #[test]
    fn test_empty_config() {
        let config: Config = toml::from_str("").expect("Empty config should work");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_explicit_path() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "store_path = \"feeds.json\"\n[watch]\ninterval = \"30m\"\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.store_path, PathBuf::from("feeds.json"));
        assert_eq!(config.watch.interval, "30m");
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let tmp = tempfile::tempdir().unwrap();
        let err = Config::load(Some(&tmp.path().join("absent.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_load_invalid_toml() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "[fetch\nworkers = ").unwrap();

        let err = Config::load(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}

pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Config;

#[derive(Parser)]
#[command(name = "trickle")]
#[command(about = "Polls web feeds and stages new entries as JSON records", long_about = None)]
pub struct Cli {
    /// Config file (default: ~/.config/trickle/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Subscription state file
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    /// Root directory of the per-feed staging areas
    #[arg(long, global = true)]
    pub base_dir: Option<PathBuf>,

    /// Number of parallel workers for fetching feeds
    #[arg(short, long, global = true)]
    pub workers: Option<usize>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Command-line flags win over the config file.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(store) = &self.store {
            config.store_path = store.clone();
        }
        if let Some(base_dir) = &self.base_dir {
            config.base_dir = base_dir.clone();
        }
        if let Some(workers) = self.workers {
            config.fetch.workers = workers;
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Subscribe to a feed
    Add {
        /// Unique feed name, also its staging directory name
        name: String,
        /// URL of the feed
        url: String,
    },
    /// Unsubscribe from a feed
    Remove {
        /// Name of the feed to remove
        name: String,
    },
    /// Poll all feeds once
    Update,
    /// Show pending entry counts per feed
    Status,
    /// List subscribed feeds
    List,
    /// Poll all feeds on a fixed interval until interrupted
    Watch {
        /// Update interval (e.g., "1h", "30m", "6h", "1d")
        #[arg(short, long)]
        interval: Option<String>,

        /// Skip the initial update on start
        #[arg(long)]
        no_initial_update: bool,
    },
}

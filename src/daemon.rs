//! Scheduled polling.
//!
//! Runs a poll cycle on a fixed interval in the foreground until the process
//! receives SIGINT or SIGTERM.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info, warn};

use crate::app::{operations, AppContext, Result};
use crate::config::{ConfigError, WatchConfig};

/// Longest accepted poll interval: one year.
pub const MAX_INTERVAL_SECS: u64 = 365 * 86400;

/// Daemon configuration
#[derive(Debug, Clone)]
pub struct DaemonConfig {
    /// Update interval in seconds
    pub update_interval_secs: u64,
    /// Whether to run an update immediately on start
    pub update_on_start: bool,
}

impl TryFrom<&WatchConfig> for DaemonConfig {
    type Error = ConfigError;

    fn try_from(watch: &WatchConfig) -> std::result::Result<Self, Self::Error> {
        Ok(Self {
            update_interval_secs: Self::parse_interval(&watch.interval)?,
            update_on_start: watch.update_on_start,
        })
    }
}

impl DaemonConfig {
    /// Parse interval string like "1h", "30m", "6h", "1d"
    pub fn parse_interval(s: &str) -> std::result::Result<u64, ConfigError> {
        let s = s.trim().to_lowercase();

        let (digits, unit) = match s.char_indices().last() {
            Some((i, c)) if c.is_ascii_alphabetic() => (&s[..i], c),
            _ => (s.as_str(), 's'),
        };

        let multiplier = match unit {
            's' => 1,
            'm' => 60,
            'h' => 3600,
            'd' => 86400,
            _ => {
                return Err(ConfigError::Interval(format!(
                    "{s}. Use format like '1h', '30m', '1d'"
                )))
            }
        };

        match digits.parse::<u64>() {
            Ok(n) if n > 0 => n
                .checked_mul(multiplier)
                .filter(|secs| *secs <= MAX_INTERVAL_SECS)
                .ok_or_else(|| ConfigError::Interval(format!("{s} is longer than 365d"))),
            _ => Err(ConfigError::Interval(format!(
                "{s}. Use format like '1h', '30m', '1d'"
            ))),
        }
    }

    /// Format interval for display
    pub fn format_interval(secs: u64) -> String {
        if secs >= 86400 && secs % 86400 == 0 {
            format!("{}d", secs / 86400)
        } else if secs >= 3600 && secs % 3600 == 0 {
            format!("{}h", secs / 3600)
        } else if secs >= 60 && secs % 60 == 0 {
            format!("{}m", secs / 60)
        } else {
            format!("{}s", secs)
        }
    }
}

/// Daemon runner
pub struct Daemon {
    ctx: Arc<AppContext>,
    config: DaemonConfig,
}

impl Daemon {
    pub fn new(ctx: Arc<AppContext>, config: DaemonConfig) -> Self {
        Self { ctx, config }
    }

    /// Poll until a shutdown signal arrives.
    pub async fn run(&self) -> Result<()> {
        let shutdown = shutdown_signal();
        tokio::pin!(shutdown);

        info!(
            interval = %DaemonConfig::format_interval(self.config.update_interval_secs),
            pid = std::process::id(),
            "Watcher started"
        );

        let mut timer = interval(Duration::from_secs(self.config.update_interval_secs));
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        timer.tick().await; // the first tick completes immediately

        if self.config.update_on_start {
            tokio::select! {
                _ = self.run_update() => {}
                _ = &mut shutdown => {
                    info!("Watcher shutting down");
                    return Ok(());
                }
            }
        }

        loop {
            tokio::select! {
                _ = timer.tick() => self.run_update().await,
                _ = &mut shutdown => break,
            }
        }

        info!("Watcher shutting down");
        Ok(())
    }

    /// Run a single update cycle. Failures are logged; the watcher keeps going.
    async fn run_update(&self) {
        let start = Instant::now();

        match operations::update_all(&self.ctx).await {
            Ok(report) => {
                for failure in &report.failed {
                    warn!(feed = %failure.feed_name, reason = %failure.reason, "Feed failed");
                }
                info!(
                    new_entries = report.total(),
                    errors = report.failed.len(),
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Scheduled update complete"
                );
            }
            Err(e) => error!(error = %e, "Scheduled update failed"),
        }
    }
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match (
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
        ) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => {},
                    _ = sigint.recv() => {},
                }
                return;
            }
            _ => warn!("Failed to install signal handlers, falling back to Ctrl-C"),
        }
    }

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}

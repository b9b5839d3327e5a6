//! # Trickle
//!
//! Polls a set of web feeds and stages every new entry as its own JSON
//! record for downstream consumers.
//!
//! ## Architecture
//!
//! ```text
//! State store → Fetcher → Normalizer → Staging → State store
//! ```
//!
//! A poll cycle loads the subscription state, conditionally fetches every
//! feed (`If-None-Match` / `If-Modified-Since`), writes each returned entry
//! to `<base_dir>/<feed>/new/`, then saves the updated state once.
//!
//! ## Quick Start
//!
//! ```bash
//! # Subscribe
//! trickle add rust https://blog.rust-lang.org/feed.xml
//!
//! # Poll all feeds once
//! trickle update
//!
//! # Pending entries per feed
//! trickle status
//!
//! # Poll every 30 minutes
//! trickle watch --interval 30m
//! ```

/// Application context, errors and the operation surface.
///
/// The [`AppContext`](app::AppContext) struct wires together configuration
/// and the fetcher.
pub mod app;

/// Command-line interface using clap.
pub mod cli;

/// Configuration loaded from `~/.config/trickle/config.toml`.
pub mod config;

/// Interval-driven polling for `trickle watch`.
pub mod daemon;

/// Core domain models.
///
/// - [`FeedStore`](domain::FeedStore): subscribed feeds by name
/// - [`FeedConfig`](domain::FeedConfig): per-feed metadata and validators
/// - [`Entry`](domain::Entry): a parsed feed entry
pub mod domain;

/// HTTP fetching with conditional request support.
///
/// - [`Fetcher`](fetcher::Fetcher): Async trait for feed fetching
/// - [`HttpFetcher`](fetcher::http_fetcher::HttpFetcher): reqwest-based implementation
/// - [`ParallelFetcher`](fetcher::parallel::ParallelFetcher): Concurrent polling with semaphore
pub mod fetcher;

/// Feed parsing and normalization.
///
/// Converts RSS 0.9x/1.0/2.0, Atom 0.3/1.0, and JSON Feed 1.0
/// into [`ParsedFeed`](domain::ParsedFeed).
pub mod normalizer;

/// The poll cycle orchestrator.
pub mod poll;

/// Staging directories: entry writer and pending counts.
pub mod staging;

/// Subscription state persistence.
///
/// - [`StateStore`](store::StateStore): load/save trait
/// - [`JsonStateStore`](store::JsonStateStore): JSON file implementation
pub mod store;

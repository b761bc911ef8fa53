//! Fairwaycache - offline cache layer for the PGG Tour league site.
//!
//! The league site is used on the course, where connectivity is spotty.
//! This crate keeps it usable offline: a fixed manifest of routes and
//! assets is precached when a new release installs, requests are served
//! from cache before touching the network, stale cache generations are
//! deleted on activation, and rounds scored offline are queued and
//! submitted when a sync signal fires.
//!
//! The entry point is [`OfflineCacheManager`], which exposes one async
//! method per lifecycle signal (install, fetch, activate, sync) and is
//! wired up from three injected capabilities:
//!
//! - [`CacheStore`]: the versioned request/response store
//!   ([`DiskStore`] for persistence, [`MemoryStore`] for tests)
//! - [`Fetcher`]: network access ([`HttpFetcher`] over reqwest)
//! - [`ScoreSyncer`]: deferred score submission ([`QueuedScoreSyncer`]
//!   draining a [`ScoreQueue`])
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use fairwaycache::{
//!     Config, DiskStore, HttpFetcher, OfflineCacheManager, QueuedScoreSyncer, ScoreQueue,
//! };
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = Config::load()?;
//! let cache_dir = config.cache_dir()?;
//!
//! let store = Arc::new(DiskStore::new(cache_dir.join("responses"))?);
//! let fetcher = Arc::new(HttpFetcher::new(&config.base_url)?);
//! let syncer = Arc::new(QueuedScoreSyncer::new(
//!     &config.base_url,
//!     ScoreQueue::new(cache_dir),
//! )?);
//!
//! let manager = OfflineCacheManager::from_config(&config, store, fetcher, syncer);
//! manager.on_install().await?;
//! manager.on_activate().await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod cache;
pub mod config;
pub mod models;
pub mod sync;

pub use api::{ApiError, Fetcher, HttpFetcher};
pub use cache::{CacheStore, DiskStore, MemoryStore, OfflineCacheManager, SCORE_SYNC_TAG};
pub use config::Config;
pub use models::{CachedResponse, PlayerScore, ScoreSubmission};
pub use sync::{QueuedScoreSyncer, ScoreQueue, ScoreSyncer};

//! Offline caching module.
//!
//! This module provides the cache layer that keeps the league site usable
//! without a network connection:
//!
//! - `OfflineCacheManager`: reacts to the four lifecycle signals
//!   (install, fetch, activate, sync) delivered by the embedding runtime
//! - `CacheStore`: the versioned request/response store seam, with
//!   `DiskStore` (persistent) and `MemoryStore` (tests, embedders without
//!   persistence) implementations
//!
//! Cache generations are named by version tag (e.g. `pgg-tour-v1`). A new
//! version installs into a fresh generation; activation deletes every
//! generation but the current one.

pub mod manager;
pub mod store;

pub use manager::{OfflineCacheManager, SCORE_SYNC_TAG};
pub use store::{CacheStore, DiskStore, MemoryStore};

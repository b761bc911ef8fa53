//! Offline cache manager.
//!
//! Reacts to the four lifecycle signals delivered by the embedding runtime:
//!
//! - **install**: precache every manifest URL into the current generation
//! - **fetch**: serve from cache, falling back to the network on a miss
//! - **activate**: delete every generation except the current one
//! - **sync**: submit queued scores when the score-sync tag fires
//!
//! Each signal maps to one async method; the embedder keeps the signal open
//! by awaiting the returned future to completion. The manager owns no state
//! of its own beyond its configuration - consistency lives in the store.

use std::sync::Arc;

use anyhow::{Context, Result};
use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::api::{ApiError, Fetcher};
use crate::cache::store::CacheStore;
use crate::config::Config;
use crate::models::CachedResponse;
use crate::sync::ScoreSyncer;

/// Sync tag that triggers deferred score submission.
/// Signals carrying any other tag are ignored.
pub const SCORE_SYNC_TAG: &str = "background-sync-scores";

pub struct OfflineCacheManager {
    store: Arc<dyn CacheStore>,
    fetcher: Arc<dyn Fetcher>,
    syncer: Arc<dyn ScoreSyncer>,
    cache_name: String,
    manifest: Vec<String>,
}

impl OfflineCacheManager {
    pub fn new(
        store: Arc<dyn CacheStore>,
        fetcher: Arc<dyn Fetcher>,
        syncer: Arc<dyn ScoreSyncer>,
        cache_name: impl Into<String>,
        manifest: Vec<String>,
    ) -> Self {
        Self {
            store,
            fetcher,
            syncer,
            cache_name: cache_name.into(),
            manifest,
        }
    }

    /// Build a manager from configuration, taking the version-tagged cache
    /// name and precache manifest from it.
    pub fn from_config(
        config: &Config,
        store: Arc<dyn CacheStore>,
        fetcher: Arc<dyn Fetcher>,
        syncer: Arc<dyn ScoreSyncer>,
    ) -> Self {
        Self::new(
            store,
            fetcher,
            syncer,
            config.cache_name(),
            config.precache_manifest.clone(),
        )
    }

    /// Name of the current cache generation.
    pub fn cache_name(&self) -> &str {
        &self.cache_name
    }

    /// Install signal: open the current generation and precache the manifest.
    ///
    /// Precaching is atomic: every manifest URL is fetched first, and
    /// entries are written only once all fetches succeeded with a success
    /// status. Any failure aborts the install with nothing persisted, so a
    /// failed install never leaves a partially populated generation that
    /// could be mistaken for a complete one. Re-installing the current
    /// generation overwrites its entries in place.
    pub async fn on_install(&self) -> Result<()> {
        info!(
            cache = %self.cache_name,
            urls = self.manifest.len(),
            "Install signal received, precaching"
        );

        self.store
            .open(&self.cache_name)
            .await
            .with_context(|| format!("Failed to open cache generation {}", self.cache_name))?;

        let mut fetched = Vec::with_capacity(self.manifest.len());
        for url in &self.manifest {
            let response = self
                .fetcher
                .fetch(url)
                .await
                .with_context(|| format!("Precache fetch failed for {}", url))?;

            if !response.is_success() {
                return Err(ApiError::from_status(response.status, &response.body_text()))
                    .with_context(|| format!("Precache fetch failed for {}", url));
            }

            fetched.push((url.as_str(), response));
        }

        for (url, response) in &fetched {
            self.store
                .put(&self.cache_name, url, response)
                .await
                .with_context(|| format!("Failed to store precached entry for {}", url))?;
        }

        info!(cache = %self.cache_name, "Precache complete");
        Ok(())
    }

    /// Fetch signal: serve `url` from cache, or forward it to the network.
    ///
    /// A hit is served from any generation without a freshness check or a
    /// network call. A miss is forwarded and the network response returned
    /// untouched; it is not written back to the cache - only install-time
    /// precaching populates the store.
    pub async fn on_fetch(&self, url: &str) -> Result<CachedResponse> {
        if let Some(cached) = self.store.lookup(url).await? {
            debug!(url, age = %cached.age_display(), "Serving from cache");
            return Ok(cached);
        }

        debug!(url, "Cache miss, forwarding to network");
        self.fetcher.fetch(url).await
    }

    /// Activate signal: delete every generation whose name is not the
    /// current one.
    ///
    /// Deletions are issued concurrently and jointly awaited. A deletion
    /// that fails is logged and does not block the others; the failed
    /// generation remains eligible on the next activate.
    pub async fn on_activate(&self) -> Result<()> {
        let names = self
            .store
            .names()
            .await
            .context("Failed to enumerate cache generations")?;

        let stale: Vec<String> = names
            .into_iter()
            .filter(|name| name != &self.cache_name)
            .collect();

        if stale.is_empty() {
            debug!(cache = %self.cache_name, "Activate signal received, no stale generations");
            return Ok(());
        }

        info!(
            cache = %self.cache_name,
            stale = stale.len(),
            "Activate signal received, deleting stale generations"
        );

        let deletions = stale.iter().map(|name| async move {
            match self.store.delete(name).await {
                Ok(_) => debug!(generation = %name, "Deleted stale generation"),
                Err(e) => warn!(generation = %name, error = %e, "Failed to delete stale generation"),
            }
        });
        join_all(deletions).await;

        Ok(())
    }

    /// Sync signal: run the score syncer if `tag` is the score-sync tag.
    /// Any other tag is a no-op.
    pub async fn on_sync(&self, tag: &str) -> Result<()> {
        if tag != SCORE_SYNC_TAG {
            debug!(tag, "Ignoring sync signal with unrecognized tag");
            return Ok(());
        }

        info!("Sync signal received, submitting queued scores");
        self.syncer.sync_scores().await
    }
}

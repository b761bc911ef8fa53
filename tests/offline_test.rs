//! End-to-end lifecycle tests for the offline cache manager over a
//! disk-backed store: install, offline serving, version rollover, and
//! stale-generation cleanup.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use fairwaycache::{
    CachedResponse, CacheStore, DiskStore, Fetcher, OfflineCacheManager, ScoreSyncer,
};

/// Fetcher serving canned bodies stamped with a release label, counting
/// every network call.
struct SiteFetcher {
    release: &'static str,
    calls: AtomicUsize,
}

impl SiteFetcher {
    fn new(release: &'static str) -> Self {
        Self {
            release,
            calls: AtomicUsize::new(0),
        }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Fetcher for SiteFetcher {
    async fn fetch(&self, url: &str) -> Result<CachedResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(CachedResponse::new(
            200,
            vec![("Content-Type".to_string(), "text/html".to_string())],
            format!("{} {}", self.release, url).into_bytes(),
        ))
    }
}

struct NoopSyncer;

#[async_trait]
impl ScoreSyncer for NoopSyncer {
    async fn sync_scores(&self) -> Result<()> {
        Ok(())
    }
}

fn manifest() -> Vec<String> {
    vec!["/".to_string(), "/scorecard".to_string()]
}

fn manager(
    store: Arc<DiskStore>,
    fetcher: Arc<SiteFetcher>,
    cache_name: &str,
) -> OfflineCacheManager {
    OfflineCacheManager::new(store, fetcher, Arc::new(NoopSyncer), cache_name, manifest())
}

#[tokio::test]
async fn test_install_then_serve_offline() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(DiskStore::new(dir.path().to_path_buf()).unwrap());
    let fetcher = Arc::new(SiteFetcher::new("v1"));

    let mgr = manager(store, fetcher.clone(), "pgg-tour-v1");
    mgr.on_install().await.unwrap();
    assert_eq!(fetcher.call_count(), 2);

    // Every manifest URL is served from cache with no further network calls.
    let scorecard = mgr.on_fetch("/scorecard").await.unwrap();
    assert_eq!(scorecard.body_text(), "v1 /scorecard");
    let home = mgr.on_fetch("/").await.unwrap();
    assert_eq!(home.body_text(), "v1 /");
    assert_eq!(fetcher.call_count(), 2);
}

#[tokio::test]
async fn test_miss_forwards_to_network_unmodified() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(DiskStore::new(dir.path().to_path_buf()).unwrap());
    let fetcher = Arc::new(SiteFetcher::new("v1"));

    let mgr = manager(store.clone(), fetcher.clone(), "pgg-tour-v1");
    mgr.on_install().await.unwrap();

    let response = mgr.on_fetch("/stats").await.unwrap();
    assert_eq!(response.body_text(), "v1 /stats");
    assert_eq!(fetcher.call_count(), 3);

    // The passthrough response was not written back to the store.
    assert!(store.lookup("/stats").await.unwrap().is_none());
}

#[tokio::test]
async fn test_version_rollover_replaces_generation() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(DiskStore::new(dir.path().to_path_buf()).unwrap());

    // Release v1 installs and activates.
    let v1_fetcher = Arc::new(SiteFetcher::new("v1"));
    let v1 = manager(store.clone(), v1_fetcher, "pgg-tour-v1");
    v1.on_install().await.unwrap();
    v1.on_activate().await.unwrap();
    assert_eq!(store.names().await.unwrap(), vec!["pgg-tour-v1"]);

    // Release v2 installs; both generations coexist until v2 activates.
    let v2_fetcher = Arc::new(SiteFetcher::new("v2"));
    let v2 = manager(store.clone(), v2_fetcher.clone(), "pgg-tour-v2");
    v2.on_install().await.unwrap();
    assert_eq!(
        store.names().await.unwrap(),
        vec!["pgg-tour-v1", "pgg-tour-v2"]
    );

    v2.on_activate().await.unwrap();
    assert_eq!(store.names().await.unwrap(), vec!["pgg-tour-v2"]);

    // Requests are now served from the v2 generation, still offline.
    let calls_before = v2_fetcher.call_count();
    let home = v2.on_fetch("/").await.unwrap();
    assert_eq!(home.body_text(), "v2 /");
    assert_eq!(v2_fetcher.call_count(), calls_before);
}

#[tokio::test]
async fn test_activate_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(DiskStore::new(dir.path().to_path_buf()).unwrap());
    let fetcher = Arc::new(SiteFetcher::new("v1"));

    let mgr = manager(store.clone(), fetcher, "pgg-tour-v1");
    mgr.on_install().await.unwrap();
    mgr.on_activate().await.unwrap();
    mgr.on_activate().await.unwrap();

    assert_eq!(store.names().await.unwrap(), vec!["pgg-tour-v1"]);
    assert!(store.lookup("/scorecard").await.unwrap().is_some());
}

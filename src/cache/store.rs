//! Versioned request/response store.
//!
//! A store holds named *generations* of cached responses, one generation per
//! release of the site. Entries are keyed by request URL. Lookup searches
//! every generation; deletion removes a whole generation at once.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::models::CachedResponse;

/// Key-addressed store of request/response pairs, grouped into named,
/// version-tagged generations.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Open the named generation, creating it if absent.
    /// Opening an existing generation is a no-op.
    async fn open(&self, name: &str) -> Result<()>;

    /// Store a response under `url` in the named generation, replacing any
    /// existing entry for that URL.
    async fn put(&self, name: &str, url: &str, response: &CachedResponse) -> Result<()>;

    /// Look `url` up across all generations. Returns the first match.
    async fn lookup(&self, url: &str) -> Result<Option<CachedResponse>>;

    /// Names of every generation currently present, in stable order.
    async fn names(&self) -> Result<Vec<String>>;

    /// Delete the named generation and all its entries.
    /// Returns false if no such generation existed.
    async fn delete(&self, name: &str) -> Result<bool>;
}

// ============================================================================
// Disk-backed store
// ============================================================================

/// Persistent store: one subdirectory per generation, one JSON file per
/// cached response. Entry file names are the SHA-256 of the request URL, so
/// arbitrary URLs map to safe, collision-free paths.
pub struct DiskStore {
    root: PathBuf,
}

impl DiskStore {
    pub fn new(root: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&root)
            .with_context(|| format!("Failed to create cache root at {}", root.display()))?;
        Ok(Self { root })
    }

    fn generation_dir(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    fn entry_path(&self, name: &str, url: &str) -> PathBuf {
        self.generation_dir(name).join(format!("{}.json", entry_key(url)))
    }
}

/// Filesystem-safe entry key for a request URL.
pub fn entry_key(url: &str) -> String {
    let digest = Sha256::digest(url.as_bytes());
    hex::encode(digest)
}

#[async_trait]
impl CacheStore for DiskStore {
    async fn open(&self, name: &str) -> Result<()> {
        let dir = self.generation_dir(name);
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to open cache generation {}", name))?;
        Ok(())
    }

    async fn put(&self, name: &str, url: &str, response: &CachedResponse) -> Result<()> {
        let path = self.entry_path(name, url);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string(response)
            .with_context(|| format!("Failed to serialize cache entry for {}", url))?;
        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write cache entry for {}", url))?;
        Ok(())
    }

    async fn lookup(&self, url: &str) -> Result<Option<CachedResponse>> {
        for name in self.names().await? {
            let path = self.entry_path(&name, url);
            if !path.exists() {
                continue;
            }

            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read cache entry for {}", url))?;

            // A corrupt entry is treated as a miss for that generation.
            match serde_json::from_str::<CachedResponse>(&contents) {
                Ok(response) => return Ok(Some(response)),
                Err(e) => {
                    warn!(url, generation = %name, error = %e, "Skipping unparseable cache entry");
                }
            }
        }
        Ok(None)
    }

    async fn names(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.root)
            .with_context(|| format!("Failed to enumerate cache root at {}", self.root.display()))?
        {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                if let Some(name) = entry.file_name().to_str() {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    async fn delete(&self, name: &str) -> Result<bool> {
        let dir = self.generation_dir(name);
        if !dir.exists() {
            return Ok(false);
        }
        std::fs::remove_dir_all(&dir)
            .with_context(|| format!("Failed to delete cache generation {}", name))?;
        debug!(generation = name, "Deleted cache generation");
        Ok(true)
    }
}

// ============================================================================
// In-memory store
// ============================================================================

/// Store for tests and embedders that do not want persistence.
/// Generation order is the BTreeMap's key order, matching DiskStore's
/// sorted enumeration.
#[derive(Default)]
pub struct MemoryStore {
    generations: RwLock<BTreeMap<String, HashMap<String, CachedResponse>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn open(&self, name: &str) -> Result<()> {
        self.generations
            .write()
            .await
            .entry(name.to_string())
            .or_default();
        Ok(())
    }

    async fn put(&self, name: &str, url: &str, response: &CachedResponse) -> Result<()> {
        self.generations
            .write()
            .await
            .entry(name.to_string())
            .or_default()
            .insert(url.to_string(), response.clone());
        Ok(())
    }

    async fn lookup(&self, url: &str) -> Result<Option<CachedResponse>> {
        let generations = self.generations.read().await;
        for entries in generations.values() {
            if let Some(response) = entries.get(url) {
                return Ok(Some(response.clone()));
            }
        }
        Ok(None)
    }

    async fn names(&self) -> Result<Vec<String>> {
        Ok(self.generations.read().await.keys().cloned().collect())
    }

    async fn delete(&self, name: &str) -> Result<bool> {
        Ok(self.generations.write().await.remove(name).is_some())
    }
}

//! Cache layer configuration.
//!
//! This module handles loading and saving the cache configuration: the
//! version tag that names the current cache generation, the precache
//! manifest, and the league server's base URL.
//!
//! Configuration is stored at `~/.config/fairwaycache/config.json`. The
//! defaults are the static literals shipped with the site, so embedders
//! that never write a config file get the stock manifest and tag.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Application name used for config/cache directory paths
const APP_NAME: &str = "fairwaycache";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Prefix shared by every cache generation name
const CACHE_NAME_PREFIX: &str = "pgg-tour";

/// Version tag baked into the current release
const DEFAULT_VERSION_TAG: &str = "v1";

/// League server base URL. The site runs on the Flask default port when
/// self-hosted; override in the config file for a deployed instance.
const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Routes and assets precached at install time, in fetch order.
const DEFAULT_PRECACHE_MANIFEST: &[&str] = &[
    "/",
    "/static/style.css",
    "/static/manifest.json",
    "/scorecard",
    "/leaderboard",
    "/stats",
    "/roster",
    "/awards",
    "/hole-in-one",
    "/schedule",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub version_tag: String,
    pub base_url: String,
    pub precache_manifest: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version_tag: DEFAULT_VERSION_TAG.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            precache_manifest: DEFAULT_PRECACHE_MANIFEST
                .iter()
                .map(|url| url.to_string())
                .collect(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory holding the disk store and the pending score queue.
    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    /// Version-tagged name of the current cache generation.
    pub fn cache_name(&self) -> String {
        format!("{}-{}", CACHE_NAME_PREFIX, self.version_tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_manifest_covers_core_routes() {
        let config = Config::default();
        assert_eq!(config.precache_manifest.first().map(String::as_str), Some("/"));
        assert!(config.precache_manifest.contains(&"/scorecard".to_string()));
        assert!(config.precache_manifest.contains(&"/leaderboard".to_string()));
        assert!(config
            .precache_manifest
            .contains(&"/static/style.css".to_string()));
    }

    #[test]
    fn test_cache_name_embeds_version_tag() {
        let mut config = Config::default();
        assert_eq!(config.cache_name(), "pgg-tour-v1");

        config.version_tag = "v2".to_string();
        assert_eq!(config.cache_name(), "pgg-tour-v2");
    }

    #[test]
    fn test_config_serde_round_trip() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.version_tag, config.version_tag);
        assert_eq!(parsed.precache_manifest, config.precache_manifest);
    }
}

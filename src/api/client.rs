//! HTTP fetcher for precache population and cache-miss fallback.
//!
//! `HttpFetcher` resolves site-relative routes like `/scorecard` against a
//! configured base URL and returns the response as an opaque
//! `CachedResponse`, error status included. Callers decide what a
//! non-success status means: precaching treats it as a failure, cache-miss
//! passthrough returns it to the requester unchanged.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::models::CachedResponse;

/// HTTP request timeout in seconds.
/// 30s allows for slow responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Network fetch capability consumed by the cache manager.
///
/// The single operation mirrors a plain GET: given a request URL, produce
/// the response. Implementations must not consult the cache; the manager
/// owns the cache-or-network decision.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<CachedResponse>;
}

/// Fetcher backed by a shared reqwest client.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
    base_url: String,
}

impl HttpFetcher {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Resolve a request URL against the base URL.
    /// Absolute URLs pass through untouched; site-relative routes are joined.
    fn resolve(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else if url.starts_with('/') {
            format!("{}{}", self.base_url, url)
        } else {
            format!("{}/{}", self.base_url, url)
        }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<CachedResponse> {
        let target = self.resolve(url);
        debug!(url = %target, "Fetching from network");

        let response = self
            .client
            .get(&target)
            .send()
            .await
            .with_context(|| format!("Failed to send GET request to {}", target))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response
            .bytes()
            .await
            .with_context(|| format!("Failed to read response body from {}", target))?
            .to_vec();

        debug!(url = %target, status, bytes = body.len(), "Fetched");
        Ok(CachedResponse::new(status, headers, body))
    }
}

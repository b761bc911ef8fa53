//! HTTP score syncer.
//!
//! Drains the persistent queue against the league server's live-scorecard
//! endpoint. A submission is removed from the queue only after the server
//! confirms receipt (success status and `"success": true` in the body).
//! The first failure stops the drain so submissions stay in play order;
//! whatever remains queued is picked up by the next sync signal.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::api::ApiError;
use crate::models::ScoreSubmission;
use crate::sync::{ScoreQueue, ScoreSyncer};

/// Endpoint accepting live scorecard submissions on the league server.
const SCORE_SYNC_ENDPOINT: &str = "/api/update-live-scorecard";

/// HTTP request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Acknowledgement body returned by the score endpoint.
#[derive(Debug, Deserialize)]
struct SyncAck {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    error: Option<String>,
}

pub struct QueuedScoreSyncer {
    client: Client,
    base_url: String,
    queue: ScoreQueue,
}

impl QueuedScoreSyncer {
    pub fn new(base_url: impl Into<String>, queue: ScoreQueue) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            queue,
        })
    }

    async fn submit(&self, submission: &ScoreSubmission) -> Result<()> {
        let url = format!("{}{}", self.base_url, SCORE_SYNC_ENDPOINT);

        let response = self
            .client
            .post(&url)
            .json(submission)
            .send()
            .await
            .with_context(|| format!("Failed to send score submission to {}", url))?;

        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();

        if !(200..300).contains(&status) {
            return Err(ApiError::from_status(status, &body).into());
        }

        let ack: SyncAck =
            serde_json::from_str(&body).context("Failed to parse score sync acknowledgement")?;
        if !ack.success {
            anyhow::bail!(
                "Server rejected score submission: {}",
                ack.error.unwrap_or_else(|| "unknown error".to_string())
            );
        }

        Ok(())
    }
}

#[async_trait]
impl ScoreSyncer for QueuedScoreSyncer {
    async fn sync_scores(&self) -> Result<()> {
        let pending = self.queue.load().context("Failed to load score queue")?;
        if pending.is_empty() {
            debug!("No queued scores to sync");
            return Ok(());
        }

        info!(count = pending.len(), "Submitting queued scores");

        let mut remaining = pending.clone();
        for submission in &pending {
            match self.submit(submission).await {
                Ok(()) => {
                    debug!(
                        course = %submission.course,
                        date = %submission.date,
                        "Score submission confirmed"
                    );
                    remaining.remove(0);
                }
                Err(e) => {
                    warn!(
                        course = %submission.course,
                        date = %submission.date,
                        error = %e,
                        "Score submission failed, leaving queued"
                    );
                    break;
                }
            }
        }

        self.queue
            .save(&remaining)
            .context("Failed to persist score queue after sync")?;

        if !remaining.is_empty() {
            anyhow::bail!("{} score submission(s) still queued after sync", remaining.len());
        }

        info!("Score queue drained");
        Ok(())
    }
}

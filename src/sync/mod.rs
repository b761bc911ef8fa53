//! Deferred score submission.
//!
//! Rounds scored while offline are queued on disk and drained when the
//! embedding runtime delivers a sync signal with the score-sync tag:
//!
//! - `ScoreSyncer`: the capability the cache manager invokes on sync
//! - `ScoreQueue`: persistent queue of pending submissions
//! - `QueuedScoreSyncer`: posts queued rounds to the league server and
//!   clears each one on confirmed receipt
//!
//! There is no retry or backoff here: a submission that fails stays queued
//! and waits for the next sync signal.

pub mod queue;
pub mod syncer;

use anyhow::Result;
use async_trait::async_trait;

pub use queue::ScoreQueue;
pub use syncer::QueuedScoreSyncer;

/// Capability invoked by the cache manager when the score-sync tag fires.
#[async_trait]
pub trait ScoreSyncer: Send + Sync {
    /// Submit queued scores, clearing each on confirmed receipt.
    async fn sync_scores(&self) -> Result<()>;
}

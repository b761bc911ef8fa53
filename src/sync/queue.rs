//! Persistent queue of score submissions awaiting sync.
//!
//! The queue is a single JSON file in the cache directory. Submissions are
//! appended in the order they were scored and drained front-first, so
//! rounds reach the server in the order they were played.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::models::ScoreSubmission;

/// Queue file name in the cache directory
const QUEUE_FILE: &str = "pending_scores.json";

pub struct ScoreQueue {
    cache_dir: PathBuf,
}

impl ScoreQueue {
    pub fn new(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    fn queue_path(&self) -> PathBuf {
        self.cache_dir.join(QUEUE_FILE)
    }

    /// All pending submissions, oldest first. An absent file is an empty
    /// queue.
    pub fn load(&self) -> Result<Vec<ScoreSubmission>> {
        let path = self.queue_path();
        if !path.exists() {
            return Ok(Vec::new());
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read score queue at {}", path.display()))?;
        serde_json::from_str(&contents).context("Failed to parse score queue")
    }

    /// Append a submission to the back of the queue.
    pub fn enqueue(&self, submission: ScoreSubmission) -> Result<()> {
        let mut pending = self.load()?;
        pending.push(submission);
        self.save(&pending)
    }

    /// Replace the queue contents. An empty slice removes the file.
    pub fn save(&self, pending: &[ScoreSubmission]) -> Result<()> {
        let path = self.queue_path();

        if pending.is_empty() {
            if path.exists() {
                std::fs::remove_file(&path)
                    .with_context(|| format!("Failed to remove score queue at {}", path.display()))?;
            }
            return Ok(());
        }

        std::fs::create_dir_all(&self.cache_dir)?;
        let contents = serde_json::to_string_pretty(pending)?;
        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write score queue at {}", path.display()))?;
        Ok(())
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.load()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.load()?.is_empty())
    }
}

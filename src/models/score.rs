//! Score submission models.
//!
//! A `ScoreSubmission` is one nine-hole round for up to four players,
//! matching the payload accepted by the league server's live-scorecard
//! endpoint. Submissions entered while offline are queued on disk and
//! drained by the score syncer when a sync signal fires.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Holes per round. The league plays nine-hole rounds only.
pub const HOLES_PER_ROUND: usize = 9;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerScore {
    pub name: String,
    #[serde(default)]
    pub mulligan: Option<String>,
    /// Points per hole, front or back nine.
    pub holes: Vec<u32>,
    pub total: u32,
}

impl PlayerScore {
    /// Build a player score, deriving the total from the hole scores.
    pub fn new(name: impl Into<String>, mulligan: Option<String>, holes: Vec<u32>) -> Self {
        let total = holes.iter().sum();
        Self {
            name: name.into(),
            mulligan,
            holes,
            total,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreSubmission {
    pub course: String,
    /// Which nine was played: "Front" or "Back".
    pub nine: String,
    pub date: NaiveDate,
    pub players: Vec<PlayerScore>,
    /// When the round was queued locally, not when the server accepted it.
    pub submitted_at: DateTime<Utc>,
}

impl ScoreSubmission {
    pub fn new(
        course: impl Into<String>,
        nine: impl Into<String>,
        date: NaiveDate,
        players: Vec<PlayerScore>,
    ) -> Self {
        Self {
            course: course.into(),
            nine: nine.into(),
            date,
            players,
            submitted_at: Utc::now(),
        }
    }

    /// Highest total in the round. The highest score wins in this league.
    pub fn high_score(&self) -> Option<u32> {
        self.players.iter().map(|p| p.total).max()
    }

    /// Names of the round's winner(s). Ties share the win.
    pub fn winners(&self) -> Vec<&str> {
        match self.high_score() {
            Some(high) if high > 0 => self
                .players
                .iter()
                .filter(|p| p.total == high)
                .map(|p| p.name.as_str())
                .collect(),
            _ => Vec::new(),
        }
    }
}

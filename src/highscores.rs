//! Session leaderboard
//!
//! Best finished runs of a session, top 10, kept in memory only. Runs rank by
//! whole points; equal points go to whoever held on longer.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::sim::GameOverCause;

/// Maximum number of runs to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single finished run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    /// Whole points at game over
    pub points: u64,
    /// Seconds from reset to game over
    pub survived_secs: f32,
    /// How the run ended (`None` if the driver cut it short)
    pub cause: Option<GameOverCause>,
}

impl RunRecord {
    /// Best first: more points, then longer survival
    fn rank_order(&self, other: &Self) -> Ordering {
        other
            .points
            .cmp(&self.points)
            .then(other.survived_secs.total_cmp(&self.survived_secs))
    }
}

/// Leaderboard, sorted best first
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub runs: Vec<RunRecord>,
}

impl HighScores {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slot a run would take; equal records keep earlier runs ahead
    fn slot(&self, record: &RunRecord) -> usize {
        self.runs
            .partition_point(|r| r.rank_order(record) != Ordering::Greater)
    }

    /// Rank (1-indexed) a run with these numbers would take right now, if any.
    ///
    /// The driver uses it as an "on pace for" readout while a run is live.
    pub fn potential_rank(&self, points: u64, survived_secs: f32) -> Option<usize> {
        if points == 0 {
            return None;
        }
        let candidate = RunRecord {
            points,
            survived_secs,
            cause: None,
        };
        let slot = self.slot(&candidate);
        (slot < MAX_HIGH_SCORES).then_some(slot + 1)
    }

    /// Record a finished run. Returns its rank (1-indexed) if it made the board.
    pub fn add_score(
        &mut self,
        points: u64,
        survived_secs: f32,
        cause: Option<GameOverCause>,
    ) -> Option<usize> {
        let rank = self.potential_rank(points, survived_secs)?;
        self.runs.insert(
            rank - 1,
            RunRecord {
                points,
                survived_secs,
                cause,
            },
        );
        self.runs.truncate(MAX_HIGH_SCORES);
        Some(rank)
    }

    pub fn best(&self) -> Option<&RunRecord> {
        self.runs.first()
    }
}

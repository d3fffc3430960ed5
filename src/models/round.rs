//! Round model: one drawn round and its pairings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Pairing, TournamentId};

/// Which stage of the tournament a round belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Preliminary,
    Elimination,
}

/// Lifecycle state of a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundStatus {
    /// Created but pairings not yet attached.
    Pending,
    /// Pairings drawn, no results yet.
    Drawn,
    /// Some but not all results recorded.
    InProgress,
    /// Every pairing has a result.
    Completed,
}

/// One round of a tournament. Owns its pairings so a round and its
/// pairings always persist as a single unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Round {
    /// Tournament this round belongs to
    pub tournament_id: TournamentId,

    /// 1-based round number, unique within the tournament
    pub number: u32,

    /// Preliminary or elimination stage
    pub stage: Stage,

    /// Lifecycle state
    pub status: RoundStatus,

    /// Ordered pairings of this round
    pub pairings: Vec<Pairing>,

    /// When the round was drawn
    pub drawn_at: DateTime<Utc>,
}

impl Round {
    /// Create a new Pending round with no pairings.
    pub fn new(tournament_id: TournamentId, number: u32, stage: Stage) -> Self {
        Self {
            tournament_id,
            number,
            stage,
            status: RoundStatus::Pending,
            pairings: Vec::new(),
            drawn_at: Utc::now(),
        }
    }

    /// Attach drawn pairings, moving the round to Drawn.
    pub fn with_pairings(mut self, pairings: Vec<Pairing>) -> Self {
        self.pairings = pairings;
        self.status = RoundStatus::Drawn;
        self
    }

    /// Recompute the status from the results recorded so far.
    /// Pending rounds stay Pending until pairings are attached.
    pub fn refresh_status(&mut self) {
        if self.pairings.is_empty() {
            return;
        }
        let recorded = self.pairings.iter().filter(|p| p.result.is_some()).count();
        self.status = if recorded == 0 {
            RoundStatus::Drawn
        } else if recorded < self.pairings.len() {
            RoundStatus::InProgress
        } else {
            RoundStatus::Completed
        };
    }

    /// Whether every pairing has a recorded result.
    pub fn is_complete(&self) -> bool {
        !self.pairings.is_empty() && self.pairings.iter().all(|p| p.result.is_some())
    }
}

//! Standing model: a team's derived rank.
//!
//! Standings are never persisted; they are recomputed from the closure
//! of recorded results each time they are needed.

use serde::{Deserialize, Serialize};

use super::TeamId;

/// One row of a standings table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standing {
    /// 1-based rank; unique because the sort order is total
    pub rank: u32,

    /// Team identifier
    pub team_id: TeamId,

    /// Team name, for display
    pub team_name: String,

    /// Debates won
    pub wins: u32,

    /// Debates lost
    pub losses: u32,

    /// Accumulated team points
    pub points: u32,
}

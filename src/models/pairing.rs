//! Pairing model: a single debate between two teams, plus its result.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AdjudicatorId, EntityId, PairingId, TeamId, TournamentId};

/// How the adjudicating panel reached its decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Unanimous,
    Split,
}

/// The recorded outcome of a pairing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairingResult {
    /// The winning team (must be one of the pairing's two teams)
    pub winner: TeamId,

    /// Panel decision type
    pub decision: Decision,

    /// Points awarded to the affirmative team
    pub affirmative_points: u32,

    /// Points awarded to the negative team
    pub negative_points: u32,

    /// When the result was recorded
    pub recorded_at: DateTime<Utc>,
}

impl PairingResult {
    /// Absolute point margin between the two sides.
    pub fn margin(&self) -> u32 {
        self.affirmative_points.abs_diff(self.negative_points)
    }
}

/// A single debate between an affirmative and a negative team.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pairing {
    /// Unique identifier
    pub id: PairingId,

    /// Tournament this pairing belongs to
    pub tournament_id: TournamentId,

    /// Round number this pairing belongs to
    pub round: u32,

    /// Room label, assigned in draw order
    pub room: String,

    /// Affirmative team
    pub affirmative: TeamId,

    /// Negative team
    pub negative: TeamId,

    /// Assigned adjudicator, if the pool could cover this pairing
    pub adjudicator: Option<AdjudicatorId>,

    /// Recorded result, at most one
    pub result: Option<PairingResult>,

    /// When this record was created
    pub created_at: DateTime<Utc>,
}

impl Pairing {
    /// Create a new Pairing with auto-generated ID.
    pub fn new(
        tournament_id: TournamentId,
        round: u32,
        room: String,
        affirmative: TeamId,
        negative: TeamId,
    ) -> Self {
        let id = EntityId::generate(&[
            tournament_id.as_str(),
            &round.to_string(),
            affirmative.as_str(),
            negative.as_str(),
        ]);

        Self {
            id,
            tournament_id,
            round,
            room,
            affirmative,
            negative,
            adjudicator: None,
            result: None,
            created_at: Utc::now(),
        }
    }

    /// Whether the given team takes part in this pairing.
    pub fn involves(&self, team: &TeamId) -> bool {
        self.affirmative == *team || self.negative == *team
    }

    /// The opponent of the given team, if the team takes part.
    pub fn opponent_of(&self, team: &TeamId) -> Option<&TeamId> {
        if self.affirmative == *team {
            Some(&self.negative)
        } else if self.negative == *team {
            Some(&self.affirmative)
        } else {
            None
        }
    }

    /// The losing team, once a result is recorded.
    pub fn loser(&self) -> Option<&TeamId> {
        let result = self.result.as_ref()?;
        self.opponent_of(&result.winner)
    }
}

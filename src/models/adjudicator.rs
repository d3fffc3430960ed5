//! Adjudicator model: the judge pool available for a tournament.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AdjudicatorId, EntityId, TournamentId};

/// A judge available to score pairings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Adjudicator {
    /// Unique identifier (derived from tournament + name)
    pub id: AdjudicatorId,

    /// Tournament this adjudicator is registered with
    pub tournament_id: TournamentId,

    /// Adjudicator name
    pub name: String,

    /// Institution affiliation, if declared.
    /// An adjudicator never judges a team from the same institution.
    pub institution: Option<String>,

    /// When this record was created
    pub created_at: DateTime<Utc>,
}

impl Adjudicator {
    /// Create a new Adjudicator with auto-generated ID.
    pub fn new(tournament_id: TournamentId, name: String) -> Self {
        let id = EntityId::generate(&[tournament_id.as_str(), "adjudicator", &name]);

        Self {
            id,
            tournament_id,
            name,
            institution: None,
            created_at: Utc::now(),
        }
    }

    /// Builder method to set the institution.
    pub fn with_institution(mut self, institution: String) -> Self {
        self.institution = Some(institution);
        self
    }
}

//! Team model: registered teams and their members.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{EntityId, TeamId, TournamentId};

/// A team member as entered at registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub name: String,
    pub email: String,
}

/// A team registered for a tournament.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    /// Unique identifier (derived from tournament + name)
    pub id: TeamId,

    /// Tournament this team belongs to
    pub tournament_id: TournamentId,

    /// Team name
    pub name: String,

    /// Institution the team represents, if declared.
    /// Used for adjudicator conflict checks.
    pub institution: Option<String>,

    /// Ordered list of members
    pub members: Vec<Member>,

    /// When this record was created
    pub created_at: DateTime<Utc>,
}

impl Team {
    /// Create a new Team with auto-generated ID.
    pub fn new(tournament_id: TournamentId, name: String, members: Vec<Member>) -> Self {
        let id = EntityId::generate(&[tournament_id.as_str(), &name]);

        Self {
            id,
            tournament_id,
            name,
            institution: None,
            members,
            created_at: Utc::now(),
        }
    }

    /// Builder method to set the institution.
    pub fn with_institution(mut self, institution: String) -> Self {
        self.institution = Some(institution);
        self
    }
}

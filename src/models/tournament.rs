//! Tournament model.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::{EntityId, TournamentId};

/// Lifecycle state of a tournament.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TournamentStatus {
    /// Created but no round drawn yet.
    Draft,
    /// At least one round has been drawn.
    Active,
    /// All rounds (preliminary and elimination) are completed.
    Completed,
}

impl std::fmt::Display for TournamentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentStatus::Draft => write!(f, "draft"),
            TournamentStatus::Active => write!(f, "active"),
            TournamentStatus::Completed => write!(f, "completed"),
        }
    }
}

/// A debate tournament.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tournament {
    /// Unique identifier (derived from name + date)
    pub id: TournamentId,

    /// Tournament name
    pub name: String,

    /// URL slug derived from the name
    pub slug: String,

    /// Date of the tournament
    pub date: NaiveDate,

    /// Scheduled start time
    pub time: NaiveTime,

    /// Number of preliminary (Swiss) rounds
    pub prelim_rounds: u32,

    /// Number of elimination rounds after the preliminaries
    pub out_rounds: u32,

    /// Required number of members per team
    pub members_per_team: u32,

    /// Identifier of the owning organizer
    pub organizer: String,

    /// Lifecycle state
    pub status: TournamentStatus,

    /// Bumped on every mutation; used for optimistic concurrency checks
    pub revision: u64,

    /// When this record was created
    pub created_at: DateTime<Utc>,
}

/// Lowercase the name and collapse whitespace runs into hyphens.
pub fn slugify(name: &str) -> String {
    name.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

impl Tournament {
    /// Create a new Tournament in Draft state with auto-generated ID.
    pub fn new(
        name: String,
        date: NaiveDate,
        time: NaiveTime,
        prelim_rounds: u32,
        out_rounds: u32,
        members_per_team: u32,
        organizer: String,
    ) -> Self {
        let id = EntityId::generate(&[&name, &date.to_string(), &organizer]);
        let slug = slugify(&name);

        Self {
            id,
            name,
            slug,
            date,
            time,
            prelim_rounds,
            out_rounds,
            members_per_team,
            organizer,
            status: TournamentStatus::Draft,
            revision: 0,
            created_at: Utc::now(),
        }
    }

    /// Total number of rounds including the elimination stage.
    pub fn total_rounds(&self) -> u32 {
        self.prelim_rounds + self.out_rounds
    }

    /// Number of teams taking part in the first elimination round.
    pub fn break_size(&self) -> u32 {
        if self.out_rounds == 0 {
            0
        } else {
            2u32.pow(self.out_rounds)
        }
    }

    /// Whether the given 1-based round number is an elimination round.
    pub fn is_out_round(&self, round_number: u32) -> bool {
        round_number > self.prelim_rounds
    }

    /// Record a mutation by bumping the revision counter.
    pub fn bump_revision(&mut self) {
        self.revision += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Tournament {
        Tournament::new(
            "National Debate Championship 2026".to_string(),
            NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            5,
            2,
            2,
            "org-1".to_string(),
        )
    }

    #[test]
    fn test_tournament_creation() {
        let t = sample();
        assert_eq!(t.status, TournamentStatus::Draft);
        assert_eq!(t.revision, 0);
        assert_eq!(t.slug, "national-debate-championship-2026");
        assert!(!t.id.as_str().is_empty());
    }

    #[test]
    fn test_tournament_id_deterministic() {
        let a = sample();
        let b = sample();
        assert_eq!(a.id, b.id);
    }

    #[test]
    fn test_slugify_collapses_whitespace() {
        assert_eq!(slugify("  Spring   Open  "), "spring-open");
        assert_eq!(slugify("Debating Championship 2026"), "debating-championship-2026");
    }

    #[test]
    fn test_total_rounds_and_break() {
        let t = sample();
        assert_eq!(t.total_rounds(), 7);
        assert_eq!(t.break_size(), 4);
        assert!(!t.is_out_round(5));
        assert!(t.is_out_round(6));
    }

    #[test]
    fn test_break_size_no_out_rounds() {
        let mut t = sample();
        t.out_rounds = 0;
        assert_eq!(t.break_size(), 0);
    }

    #[test]
    fn test_bump_revision() {
        let mut t = sample();
        t.bump_revision();
        t.bump_revision();
        assert_eq!(t.revision, 2);
    }

    #[test]
    fn test_tournament_serialization() {
        let t = sample();
        let json = serde_json::to_string(&t).unwrap();
        let back: Tournament = serde_json::from_str(&json).unwrap();
        assert_eq!(t.id, back.id);
        assert_eq!(back.status, TournamentStatus::Draft);
    }
}

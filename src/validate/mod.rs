//! Structural validation.
//!
//! Every engine command runs through these checks before any state
//! changes. Each rejection carries the round number, team name or
//! pairing id needed to act on it.

use thiserror::Error;

use crate::models::{
    Member, PairingId, Round, RoundStatus, Team, TeamId, Tournament, TournamentStatus,
};

/// Upper bound on the points one side can earn in a single debate.
pub const MAX_SIDE_POINTS: u32 = 1_000;

/// Malformed input or an operation out of order. Nothing has changed
/// when one of these is returned.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("tournament name must not be empty")]
    EmptyName,

    #[error("tournament must have at least one preliminary round")]
    NoPreliminaryRounds,

    #[error("members per team must be at least 1")]
    NoMembersPerTeam,

    #[error("team '{name}' has {got} members, expected {expected}")]
    WrongTeamSize { name: String, expected: u32, got: u32 },

    #[error("a team named '{name}' is already registered")]
    DuplicateTeamName { name: String },

    #[error("registration is closed: round 1 has already been drawn")]
    RegistrationClosed,

    #[error("tournament is {status}; no further rounds can be drawn")]
    TournamentCompleted { status: TournamentStatus },

    #[error("need at least {needed} teams, have {got}")]
    NotEnoughTeams { needed: u32, got: u32 },

    #[error("round history is inconsistent: found round {got} where round {expected} was expected")]
    RoundOutOfSequence { expected: u32, got: u32 },

    #[error("all {total} rounds have already been drawn")]
    AllRoundsDrawn { total: u32 },

    #[error("round {round} cannot be drawn until round {previous} is completed")]
    PreviousRoundIncomplete { round: u32, previous: u32 },

    #[error("no round is open for results")]
    NoOpenRound,

    #[error("pairing {pairing} is not part of the open round {round}")]
    PairingNotInOpenRound { pairing: PairingId, round: u32 },

    #[error("pairing {pairing} already has a recorded result")]
    ResultAlreadyRecorded { pairing: PairingId },

    #[error("winner {winner} is not a team in pairing {pairing}")]
    WinnerNotInPairing { winner: TeamId, pairing: PairingId },

    #[error("points {got} exceed the maximum of {max}")]
    PointsOutOfRange { got: u32, max: u32 },
}

/// Check the shape of a tournament before it is created.
pub fn validate_tournament_config(
    name: &str,
    prelim_rounds: u32,
    members_per_team: u32,
) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if prelim_rounds == 0 {
        return Err(ValidationError::NoPreliminaryRounds);
    }
    if members_per_team == 0 {
        return Err(ValidationError::NoMembersPerTeam);
    }
    Ok(())
}

/// Check a team registration against the tournament's constraints.
pub fn validate_registration(
    tournament: &Tournament,
    existing: &[Team],
    team: &Team,
    history: &[Round],
) -> Result<(), ValidationError> {
    if !history.is_empty() {
        return Err(ValidationError::RegistrationClosed);
    }
    if existing.iter().any(|t| t.name == team.name) {
        return Err(ValidationError::DuplicateTeamName {
            name: team.name.clone(),
        });
    }
    let got = team.members.len() as u32;
    if got != tournament.members_per_team {
        return Err(ValidationError::WrongTeamSize {
            name: team.name.clone(),
            expected: tournament.members_per_team,
            got,
        });
    }
    Ok(())
}

/// Check an administrative correction of a registered team.
///
/// Corrections stay subject to the registration constraints: the new
/// name must not collide with any other team, and the member list must
/// still match the tournament's members-per-team setting.
pub fn validate_correction(
    tournament: &Tournament,
    teams: &[Team],
    team_id: &TeamId,
    name: &str,
    members: &[Member],
) -> Result<(), ValidationError> {
    if teams.iter().any(|t| t.id != *team_id && t.name == name) {
        return Err(ValidationError::DuplicateTeamName {
            name: name.to_string(),
        });
    }
    let got = members.len() as u32;
    if got != tournament.members_per_team {
        return Err(ValidationError::WrongTeamSize {
            name: name.to_string(),
            expected: tournament.members_per_team,
            got,
        });
    }
    Ok(())
}

/// The round numbers in `history` must be exactly 1..=len, in order.
fn validate_sequence(history: &[Round]) -> Result<(), ValidationError> {
    for (i, round) in history.iter().enumerate() {
        let expected = i as u32 + 1;
        if round.number != expected {
            return Err(ValidationError::RoundOutOfSequence {
                expected,
                got: round.number,
            });
        }
    }
    Ok(())
}

/// Check that the next round may be drawn.
pub fn validate_draw(
    tournament: &Tournament,
    teams: &[Team],
    history: &[Round],
) -> Result<(), ValidationError> {
    if tournament.status == TournamentStatus::Completed {
        return Err(ValidationError::TournamentCompleted {
            status: tournament.status,
        });
    }
    validate_sequence(history)?;

    let next = history.len() as u32 + 1;
    if next > tournament.total_rounds() {
        return Err(ValidationError::AllRoundsDrawn {
            total: tournament.total_rounds(),
        });
    }

    if let Some(previous) = history.last() {
        if !previous.is_complete() {
            return Err(ValidationError::PreviousRoundIncomplete {
                round: next,
                previous: previous.number,
            });
        }
    }

    let needed = if tournament.is_out_round(next) {
        tournament.break_size().max(2)
    } else {
        2
    };
    if (teams.len() as u32) < needed {
        return Err(ValidationError::NotEnoughTeams {
            needed,
            got: teams.len() as u32,
        });
    }

    Ok(())
}

/// Check a result submission against the open round.
///
/// Returns the index of the pairing within the open round on success.
pub fn validate_result(
    history: &[Round],
    pairing_id: &PairingId,
    winner: &TeamId,
    affirmative_points: u32,
    negative_points: u32,
) -> Result<usize, ValidationError> {
    for points in [affirmative_points, negative_points] {
        if points > MAX_SIDE_POINTS {
            return Err(ValidationError::PointsOutOfRange {
                got: points,
                max: MAX_SIDE_POINTS,
            });
        }
    }

    let open = history
        .last()
        .filter(|r| matches!(r.status, RoundStatus::Drawn | RoundStatus::InProgress))
        .ok_or(ValidationError::NoOpenRound)?;

    let index = open
        .pairings
        .iter()
        .position(|p| p.id == *pairing_id)
        .ok_or_else(|| ValidationError::PairingNotInOpenRound {
            pairing: pairing_id.clone(),
            round: open.number,
        })?;

    let pairing = &open.pairings[index];
    if pairing.result.is_some() {
        return Err(ValidationError::ResultAlreadyRecorded {
            pairing: pairing_id.clone(),
        });
    }
    if !pairing.involves(winner) {
        return Err(ValidationError::WinnerNotInPairing {
            winner: winner.clone(),
            pairing: pairing_id.clone(),
        });
    }

    Ok(index)
}

//! Tournament engine: the command surface over the pairing engine,
//! standings calculator and validation layer.
//!
//! Every mutation of a tournament (draw, result entry, registration) is
//! serialized through a per-tournament lock, so two organizers can never
//! draw the same round or record conflicting results concurrently.
//! Reads (standings, round listings) take no lock and work from a
//! consistent on-disk snapshot.
//!
//! Mutations bump the tournament's revision counter. Draw and
//! result-entry commands may carry the revision they were based on;
//! a mismatch is rejected with [`EngineError::ConcurrentModification`]
//! so the client retries with fresh state.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::info;

use crate::calculate::compute_standings;
use crate::draw::{generate_round, DrawConfig, DrawError};
use crate::models::{
    Adjudicator, Decision, Member, PairingId, PairingResult, Round, Standing, Team, TeamId,
    Tournament, TournamentStatus,
};
use crate::storage::{StorageError, TournamentStore};
use crate::validate::{
    validate_correction, validate_draw, validate_registration, validate_result,
    validate_tournament_config, ValidationError,
};

/// Engine failures. Validation and draw errors pass through unchanged so
/// callers see the specific teams and rounds involved.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Draw(#[from] DrawError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("tournament {0} not found")]
    NotFound(String),

    #[error("a tournament with this name, date and organizer already exists")]
    AlreadyExists,

    #[error("organizer '{organizer}' does not own tournament {tournament}")]
    Forbidden {
        tournament: String,
        organizer: String,
    },

    #[error(
        "tournament {tournament} was modified (expected revision {expected}, now {actual}); \
         retry with fresh state"
    )]
    ConcurrentModification {
        tournament: String,
        expected: u64,
        actual: u64,
    },
}

/// createTournament command.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTournament {
    pub name: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub prelim_rounds: u32,
    pub out_rounds: u32,
    pub members_per_team: u32,
}

/// registerTeam command.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTeam {
    pub name: String,
    pub institution: Option<String>,
    pub members: Vec<Member>,
}

/// Adjudicator pool entry command.
#[derive(Debug, Clone, Deserialize)]
pub struct NewAdjudicator {
    pub name: String,
    pub institution: Option<String>,
}

/// recordResult command.
#[derive(Debug, Clone, Deserialize)]
pub struct NewResult {
    pub pairing_id: PairingId,
    pub winner: TeamId,
    pub decision: Decision,
    pub affirmative_points: u32,
    pub negative_points: u32,
}

/// The engine. Cheap to clone behind an `Arc` in the API state.
pub struct TournamentEngine {
    store: TournamentStore,
    draw_config: DrawConfig,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl TournamentEngine {
    pub fn new(store: TournamentStore, draw_config: DrawConfig) -> Self {
        Self {
            store,
            draw_config,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// The mutation lock for one tournament.
    async fn lock_for(&self, tournament_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks
            .entry(tournament_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    fn load_owned(
        &self,
        tournament_id: &str,
        organizer: &str,
    ) -> Result<Tournament, EngineError> {
        let tournament = self.load(tournament_id)?;
        if tournament.organizer != organizer {
            return Err(EngineError::Forbidden {
                tournament: tournament_id.to_string(),
                organizer: organizer.to_string(),
            });
        }
        Ok(tournament)
    }

    fn load(&self, tournament_id: &str) -> Result<Tournament, EngineError> {
        match self.store.load_tournament(tournament_id) {
            Ok(t) => Ok(t),
            Err(StorageError::PathNotFound(_)) => {
                Err(EngineError::NotFound(tournament_id.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn check_revision(
        tournament: &Tournament,
        expected: Option<u64>,
    ) -> Result<(), EngineError> {
        if let Some(expected) = expected {
            if expected != tournament.revision {
                return Err(EngineError::ConcurrentModification {
                    tournament: tournament.id.to_string(),
                    expected,
                    actual: tournament.revision,
                });
            }
        }
        Ok(())
    }

    /// Create a tournament in Draft state.
    pub async fn create_tournament(
        &self,
        cmd: NewTournament,
        organizer: &str,
    ) -> Result<Tournament, EngineError> {
        validate_tournament_config(&cmd.name, cmd.prelim_rounds, cmd.members_per_team)?;

        let tournament = Tournament::new(
            cmd.name,
            cmd.date,
            cmd.time,
            cmd.prelim_rounds,
            cmd.out_rounds,
            cmd.members_per_team,
            organizer.to_string(),
        );

        // Same lock as later mutations, so two concurrent creates of the
        // same tournament cannot both pass the exists check.
        let lock = self.lock_for(tournament.id.as_str()).await;
        let _guard = lock.lock().await;

        if self.store.load_tournament(tournament.id.as_str()).is_ok() {
            return Err(EngineError::AlreadyExists);
        }

        self.store.save_tournament(&tournament)?;
        info!(tournament = %tournament.id, name = %tournament.name, "created tournament");
        Ok(tournament)
    }

    pub fn get_tournament(&self, tournament_id: &str) -> Result<Tournament, EngineError> {
        self.load(tournament_id)
    }

    pub fn list_tournaments(&self) -> Result<Vec<Tournament>, EngineError> {
        Ok(self.store.list_tournaments()?)
    }

    pub fn teams(&self, tournament_id: &str) -> Result<Vec<Team>, EngineError> {
        self.load(tournament_id)?;
        Ok(self.store.read_teams(tournament_id)?)
    }

    pub fn adjudicators(&self, tournament_id: &str) -> Result<Vec<Adjudicator>, EngineError> {
        self.load(tournament_id)?;
        Ok(self.store.read_adjudicators(tournament_id)?)
    }

    pub fn rounds(&self, tournament_id: &str) -> Result<Vec<Round>, EngineError> {
        self.load(tournament_id)?;
        Ok(self.store.read_rounds(tournament_id)?)
    }

    /// Register a team. Rejected once round 1 has been drawn.
    pub async fn register_team(
        &self,
        tournament_id: &str,
        cmd: NewTeam,
        organizer: &str,
    ) -> Result<Team, EngineError> {
        let lock = self.lock_for(tournament_id).await;
        let _guard = lock.lock().await;

        let mut tournament = self.load_owned(tournament_id, organizer)?;
        let existing = self.store.read_teams(tournament_id)?;
        let history = self.store.read_rounds(tournament_id)?;

        let mut team = Team::new(tournament.id.clone(), cmd.name, cmd.members);
        if let Some(institution) = cmd.institution {
            team = team.with_institution(institution);
        }
        validate_registration(&tournament, &existing, &team, &history)?;

        self.store.append_team(&team)?;
        tournament.bump_revision();
        self.store.save_tournament(&tournament)?;

        info!(tournament = %tournament.id, team = %team.name, "registered team");
        Ok(team)
    }

    /// Administrative correction of a registered team. Allowed after the
    /// draw, but only to the owning organizer.
    pub async fn correct_team(
        &self,
        tournament_id: &str,
        team_id: &TeamId,
        cmd: NewTeam,
        organizer: &str,
    ) -> Result<Team, EngineError> {
        let lock = self.lock_for(tournament_id).await;
        let _guard = lock.lock().await;

        let mut tournament = self.load_owned(tournament_id, organizer)?;
        let mut teams = self.store.read_teams(tournament_id)?;

        validate_correction(&tournament, &teams, team_id, &cmd.name, &cmd.members)?;

        let team = teams
            .iter_mut()
            .find(|t| t.id == *team_id)
            .ok_or_else(|| EngineError::NotFound(team_id.to_string()))?;

        team.name = cmd.name;
        team.institution = cmd.institution;
        team.members = cmd.members;
        let corrected = team.clone();

        self.store.write_teams(tournament_id, &teams)?;
        tournament.bump_revision();
        self.store.save_tournament(&tournament)?;

        info!(tournament = %tournament.id, team = %corrected.id, "corrected team");
        Ok(corrected)
    }

    /// Add an adjudicator to the pool.
    pub async fn add_adjudicator(
        &self,
        tournament_id: &str,
        cmd: NewAdjudicator,
        organizer: &str,
    ) -> Result<Adjudicator, EngineError> {
        let lock = self.lock_for(tournament_id).await;
        let _guard = lock.lock().await;

        let mut tournament = self.load_owned(tournament_id, organizer)?;

        let mut adjudicator = Adjudicator::new(tournament.id.clone(), cmd.name);
        if let Some(institution) = cmd.institution {
            adjudicator = adjudicator.with_institution(institution);
        }

        self.store.append_adjudicator(&adjudicator)?;
        tournament.bump_revision();
        self.store.save_tournament(&tournament)?;

        Ok(adjudicator)
    }

    /// Draw the next round. The first successful draw moves the
    /// tournament from Draft to Active.
    pub async fn draw_round(
        &self,
        tournament_id: &str,
        organizer: &str,
        expected_revision: Option<u64>,
        seed: Option<u64>,
    ) -> Result<Round, EngineError> {
        let lock = self.lock_for(tournament_id).await;
        let _guard = lock.lock().await;

        let mut tournament = self.load_owned(tournament_id, organizer)?;
        Self::check_revision(&tournament, expected_revision)?;

        let teams = self.store.read_teams(tournament_id)?;
        let adjudicators = self.store.read_adjudicators(tournament_id)?;
        let mut history = self.store.read_rounds(tournament_id)?;

        validate_draw(&tournament, &teams, &history)?;
        let round = generate_round(
            &tournament,
            &teams,
            &adjudicators,
            &history,
            &self.draw_config,
            seed,
        )?;

        history.push(round.clone());
        self.store.write_rounds(tournament_id, &history)?;

        if tournament.status == TournamentStatus::Draft {
            tournament.status = TournamentStatus::Active;
        }
        tournament.bump_revision();
        self.store.save_tournament(&tournament)?;

        info!(
            tournament = %tournament.id,
            round = round.number,
            "round drawn and saved"
        );
        Ok(round)
    }

    /// Record a result for a pairing in the open round. Completing the
    /// final round completes the tournament.
    pub async fn record_result(
        &self,
        tournament_id: &str,
        cmd: NewResult,
        organizer: &str,
        expected_revision: Option<u64>,
    ) -> Result<Round, EngineError> {
        let lock = self.lock_for(tournament_id).await;
        let _guard = lock.lock().await;

        let mut tournament = self.load_owned(tournament_id, organizer)?;
        Self::check_revision(&tournament, expected_revision)?;

        let mut history = self.store.read_rounds(tournament_id)?;
        let index = validate_result(
            &history,
            &cmd.pairing_id,
            &cmd.winner,
            cmd.affirmative_points,
            cmd.negative_points,
        )?;

        let open = match history.last_mut() {
            Some(round) => round,
            None => return Err(ValidationError::NoOpenRound.into()),
        };
        open.pairings[index].result = Some(PairingResult {
            winner: cmd.winner,
            decision: cmd.decision,
            affirmative_points: cmd.affirmative_points,
            negative_points: cmd.negative_points,
            recorded_at: chrono::Utc::now(),
        });
        open.refresh_status();
        let updated = open.clone();

        self.store.write_rounds(tournament_id, &history)?;

        if updated.is_complete() && updated.number == tournament.total_rounds() {
            tournament.status = TournamentStatus::Completed;
            info!(tournament = %tournament.id, "tournament completed");
        }
        tournament.bump_revision();
        self.store.save_tournament(&tournament)?;

        Ok(updated)
    }

    /// Current standings, a pure recomputation over all recorded
    /// results. Lock-free; safe for any number of concurrent readers.
    pub fn standings(&self, tournament_id: &str) -> Result<Vec<Standing>, EngineError> {
        self.load(tournament_id)?;
        let teams = self.store.read_teams(tournament_id)?;
        let rounds = self.store.read_rounds(tournament_id)?;
        Ok(compute_standings(&teams, &rounds))
    }
}

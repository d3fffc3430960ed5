//! Filesystem persistence.
//!
//! Each tournament owns one directory under `<data_dir>/tournaments/`:
//! `tournament.json` (the record itself), plus `teams.jsonl`,
//! `adjudicators.jsonl` and `rounds.jsonl`. Rounds embed their pairings,
//! so a round and its pairings always persist as one unit.

mod jsonl;

pub use jsonl::{EntityType, JsonlReader, JsonlWriter};

use std::fs;
use std::path::PathBuf;

use thiserror::Error;

use crate::models::{Adjudicator, Round, Team, Tournament};

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),
}

/// Configuration for storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn tournaments_dir(&self) -> PathBuf {
        self.data_dir.join("tournaments")
    }

    pub fn tournament_dir(&self, tournament_id: &str) -> PathBuf {
        self.tournaments_dir().join(tournament_id)
    }

    fn tournament_file(&self, tournament_id: &str) -> PathBuf {
        self.tournament_dir(tournament_id).join("tournament.json")
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"))
    }
}

/// High-level store for tournament records and their owned entities.
#[derive(Debug, Clone)]
pub struct TournamentStore {
    config: StorageConfig,
}

impl TournamentStore {
    pub fn new(config: StorageConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    /// Save the tournament record, replacing it atomically.
    pub fn save_tournament(&self, tournament: &Tournament) -> Result<(), StorageError> {
        let path = self.config.tournament_file(tournament.id.as_str());
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(tournament)?)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    /// Load a tournament record by id.
    pub fn load_tournament(&self, tournament_id: &str) -> Result<Tournament, StorageError> {
        let path = self.config.tournament_file(tournament_id);
        if !path.exists() {
            return Err(StorageError::PathNotFound(path));
        }
        let bytes = fs::read(&path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// List every tournament stored on disk, newest first.
    pub fn list_tournaments(&self) -> Result<Vec<Tournament>, StorageError> {
        let dir = self.config.tournaments_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut tournaments = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            if !entry.path().is_dir() {
                continue;
            }
            let id = entry.file_name().to_string_lossy().to_string();
            match self.load_tournament(&id) {
                Ok(t) => tournaments.push(t),
                Err(e) => {
                    tracing::warn!("Skipping unreadable tournament {}: {}", id, e);
                }
            }
        }

        tournaments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(tournaments)
    }

    pub fn append_team(&self, team: &Team) -> Result<(), StorageError> {
        JsonlWriter::for_entity(&self.config, team.tournament_id.as_str(), EntityType::Team)
            .append(team)
    }

    pub fn read_teams(&self, tournament_id: &str) -> Result<Vec<Team>, StorageError> {
        JsonlReader::for_entity(&self.config, tournament_id, EntityType::Team).read_all()
    }

    /// Replace the team list, used for administrative corrections.
    pub fn write_teams(&self, tournament_id: &str, teams: &[Team]) -> Result<(), StorageError> {
        JsonlWriter::for_entity(&self.config, tournament_id, EntityType::Team)
            .write_all(teams)
            .map(|_| ())
    }

    pub fn append_adjudicator(&self, adjudicator: &Adjudicator) -> Result<(), StorageError> {
        JsonlWriter::for_entity(
            &self.config,
            adjudicator.tournament_id.as_str(),
            EntityType::Adjudicator,
        )
        .append(adjudicator)
    }

    pub fn read_adjudicators(&self, tournament_id: &str) -> Result<Vec<Adjudicator>, StorageError> {
        JsonlReader::for_entity(&self.config, tournament_id, EntityType::Adjudicator).read_all()
    }

    /// Replace the round history atomically so a drawn round and its
    /// pairings land as one unit.
    pub fn write_rounds(&self, tournament_id: &str, rounds: &[Round]) -> Result<(), StorageError> {
        JsonlWriter::for_entity(&self.config, tournament_id, EntityType::Round)
            .write_all(rounds)
            .map(|_| ())
    }

    pub fn read_rounds(&self, tournament_id: &str) -> Result<Vec<Round>, StorageError> {
        JsonlReader::for_entity(&self.config, tournament_id, EntityType::Round).read_all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EntityId, Stage};
    use chrono::{NaiveDate, NaiveTime};

    fn store(dir: &std::path::Path) -> TournamentStore {
        TournamentStore::new(StorageConfig::new(dir.to_path_buf()))
    }

    fn tournament(name: &str) -> Tournament {
        Tournament::new(
            name.to_string(),
            NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            3,
            1,
            2,
            "org-1".to_string(),
        )
    }

    #[test]
    fn test_storage_config_paths() {
        let config = StorageConfig::new(PathBuf::from("/data"));
        assert_eq!(config.tournaments_dir(), PathBuf::from("/data/tournaments"));
        assert_eq!(
            config.tournament_dir("abc"),
            PathBuf::from("/data/tournaments/abc")
        );
    }

    #[test]
    fn test_save_and_load_tournament() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store(tmp.path());
        let t = tournament("Spring Open");

        store.save_tournament(&t).unwrap();
        let loaded = store.load_tournament(t.id.as_str()).unwrap();
        assert_eq!(loaded.id, t.id);
        assert_eq!(loaded.name, "Spring Open");
    }

    #[test]
    fn test_load_missing_tournament() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store(tmp.path());
        assert!(matches!(
            store.load_tournament("missing"),
            Err(StorageError::PathNotFound(_))
        ));
    }

    #[test]
    fn test_save_tournament_overwrites() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store(tmp.path());
        let mut t = tournament("Spring Open");

        store.save_tournament(&t).unwrap();
        t.bump_revision();
        store.save_tournament(&t).unwrap();

        let loaded = store.load_tournament(t.id.as_str()).unwrap();
        assert_eq!(loaded.revision, 1);
    }

    #[test]
    fn test_list_tournaments() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store(tmp.path());

        assert!(store.list_tournaments().unwrap().is_empty());

        store.save_tournament(&tournament("First")).unwrap();
        store.save_tournament(&tournament("Second")).unwrap();

        let all = store.list_tournaments().unwrap();
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn test_rounds_roundtrip() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store(tmp.path());

        let rounds = vec![
            Round::new(EntityId::from("t-1"), 1, Stage::Preliminary),
            Round::new(EntityId::from("t-1"), 2, Stage::Preliminary),
        ];
        store.write_rounds("t-1", &rounds).unwrap();

        let loaded = store.read_rounds("t-1").unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[1].number, 2);
    }

    #[test]
    fn test_team_append_and_rewrite() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store(tmp.path());

        let team = Team::new(EntityId::from("t-1"), "Alpha".to_string(), vec![]);
        store.append_team(&team).unwrap();
        assert_eq!(store.read_teams("t-1").unwrap().len(), 1);

        let mut corrected = team.clone();
        corrected.name = "Alpha Prime".to_string();
        store.write_teams("t-1", &[corrected]).unwrap();

        let teams = store.read_teams("t-1").unwrap();
        assert_eq!(teams.len(), 1);
        assert_eq!(teams[0].name, "Alpha Prime");
    }
}

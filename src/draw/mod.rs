//! Pairing engine.
//!
//! Generates each round's pairings from the tournament's pairing history:
//!
//! - Round 1: seeded random pairing of the whole field.
//! - Later preliminary rounds: power-pairing, teams sorted by current
//!   standings and paired down the order, with a bounded backtracking
//!   search that never repeats an opponent.
//! - Out-rounds: bracket seeding from final preliminary standings.
//!
//! The search is budgeted: the engine always returns a definite success
//! or a [`DrawError`] naming the teams it could not pair. It never
//! silently violates the no-repeat rule.

mod allocation;

use std::collections::{HashMap, HashSet};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use thiserror::Error;

use crate::calculate::preliminary_standings;
use crate::models::{Adjudicator, Pairing, Round, Stage, Team, TeamId, Tournament};

/// Draw failures, surfaced to the organizer with the teams involved.
#[derive(Debug, Error)]
pub enum DrawError {
    /// No legal set of pairings exists within the search bounds.
    #[error("round {round}: no legal pairing for {}", teams.join(", "))]
    PairingInfeasible { round: u32, teams: Vec<String> },

    /// The adjudicator pool cannot cover every pairing without a conflict.
    #[error(
        "round {round}: no conflict-free adjudicator available for {affirmative} vs {negative}"
    )]
    AdjudicatorShortage {
        round: u32,
        affirmative: String,
        negative: String,
    },
}

/// Bounds on the power-pairing search.
#[derive(Debug, Clone)]
pub struct DrawConfig {
    /// How many candidate opponents below a team are considered before
    /// the neighbourhood counts as locked.
    pub search_window: usize,

    /// Total number of candidate pairings examined before the search
    /// gives up.
    pub search_budget: u32,
}

impl Default for DrawConfig {
    fn default() -> Self {
        Self {
            search_window: 6,
            search_budget: 10_000,
        }
    }
}

/// The round number the next draw will produce.
pub fn next_round_number(history: &[Round]) -> u32 {
    history.len() as u32 + 1
}

/// Opponent pairs already seen in preliminary rounds, both directions.
fn played_pairs(history: &[Round]) -> HashSet<(TeamId, TeamId)> {
    let mut played = HashSet::new();
    for round in history.iter().filter(|r| r.stage == Stage::Preliminary) {
        for pairing in &round.pairings {
            played.insert((pairing.affirmative.clone(), pairing.negative.clone()));
            played.insert((pairing.negative.clone(), pairing.affirmative.clone()));
        }
    }
    played
}

/// How often each team has held the affirmative side so far.
fn affirmative_counts(history: &[Round]) -> HashMap<TeamId, u32> {
    let mut counts = HashMap::new();
    for round in history {
        for pairing in &round.pairings {
            *counts.entry(pairing.affirmative.clone()).or_insert(0) += 1;
        }
    }
    counts
}

/// Recorded at the deepest dead end of the backtracking search so the
/// error can name the teams whose neighbourhood is locked.
struct SearchFailure {
    depth: usize,
    team: usize,
    blocked: Vec<usize>,
}

fn backtrack(
    ordered: &[&Team],
    played: &HashSet<(TeamId, TeamId)>,
    window: usize,
    used: &mut [bool],
    pairs: &mut Vec<(usize, usize)>,
    budget: &mut u32,
    failure: &mut Option<SearchFailure>,
) -> bool {
    let Some(first) = used.iter().position(|u| !u) else {
        return true;
    };

    used[first] = true;
    let mut considered = 0;
    let mut blocked = Vec::new();

    for second in first + 1..ordered.len() {
        if used[second] {
            continue;
        }
        if considered >= window || *budget == 0 {
            break;
        }
        considered += 1;
        *budget -= 1;

        if played.contains(&(ordered[first].id.clone(), ordered[second].id.clone())) {
            blocked.push(second);
            continue;
        }

        used[second] = true;
        pairs.push((first, second));
        if backtrack(ordered, played, window, used, pairs, budget, failure) {
            return true;
        }
        pairs.pop();
        used[second] = false;
    }

    used[first] = false;

    let depth = pairs.len();
    if failure.as_ref().is_none_or(|f| depth >= f.depth) {
        *failure = Some(SearchFailure {
            depth,
            team: first,
            blocked,
        });
    }
    false
}

/// Pair an ordered field of teams, skipping repeat opponents.
fn pair_field(
    ordered: &[&Team],
    played: &HashSet<(TeamId, TeamId)>,
    config: &DrawConfig,
    round: u32,
) -> Result<Vec<(TeamId, TeamId)>, DrawError> {
    let mut used = vec![false; ordered.len()];
    let mut pairs = Vec::new();
    let mut budget = config.search_budget;
    let mut failure = None;

    if backtrack(
        ordered,
        played,
        config.search_window,
        &mut used,
        &mut pairs,
        &mut budget,
        &mut failure,
    ) {
        return Ok(pairs
            .into_iter()
            .map(|(a, b)| (ordered[a].id.clone(), ordered[b].id.clone()))
            .collect());
    }

    let mut teams = Vec::new();
    if let Some(f) = failure {
        teams.push(ordered[f.team].name.clone());
        teams.extend(f.blocked.iter().map(|&i| ordered[i].name.clone()));
    }
    Err(DrawError::PairingInfeasible { round, teams })
}

/// The ordered field for a preliminary round.
fn preliminary_field<'a>(
    teams: &'a [Team],
    history: &[Round],
    round: u32,
    seed: Option<u64>,
) -> Vec<&'a Team> {
    if round == 1 {
        let mut field: Vec<&Team> = teams.iter().collect();
        // Sort first so the shuffle is a pure function of the seed.
        field.sort_by(|a, b| a.id.cmp(&b.id));
        let mut rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_os_rng(),
        };
        field.shuffle(&mut rng);
        field
    } else {
        let standings = preliminary_standings(teams, history);
        let by_id: HashMap<&TeamId, &Team> = teams.iter().map(|t| (&t.id, t)).collect();
        standings
            .iter()
            .filter_map(|s| by_id.get(&s.team_id).copied())
            .collect()
    }
}

/// Seed-order participants for an elimination round.
fn elimination_field<'a>(
    tournament: &Tournament,
    teams: &'a [Team],
    history: &[Round],
    round: u32,
) -> Vec<&'a Team> {
    let standings = preliminary_standings(teams, history);
    let seed_of: HashMap<&TeamId, u32> = standings.iter().map(|s| (&s.team_id, s.rank)).collect();
    let by_id: HashMap<&TeamId, &Team> = teams.iter().map(|t| (&t.id, t)).collect();

    let mut advancing: Vec<&TeamId> = if round == tournament.prelim_rounds + 1 {
        standings
            .iter()
            .take(tournament.break_size() as usize)
            .map(|s| &s.team_id)
            .collect()
    } else {
        // Winners of the previous elimination round, re-seeded.
        history
            .last()
            .map(|prev| {
                prev.pairings
                    .iter()
                    .filter_map(|p| p.result.as_ref().map(|r| &r.winner))
                    .collect()
            })
            .unwrap_or_default()
    };

    advancing.sort_by_key(|id| seed_of.get(id).copied().unwrap_or(u32::MAX));
    advancing
        .into_iter()
        .filter_map(|id| by_id.get(id).copied())
        .collect()
}

/// Bracket pairing: seed 1 vs seed N, 2 vs N-1, and so on.
fn bracket_pairs(field: &[&Team]) -> Vec<(TeamId, TeamId)> {
    let n = field.len();
    (0..n / 2)
        .map(|i| (field[i].id.clone(), field[n - 1 - i].id.clone()))
        .collect()
}

/// Generate the next round for a tournament.
///
/// `history` must hold every previously drawn round in order; the new
/// round's number is `history.len() + 1`. Sequencing and completeness
/// preconditions are the validation layer's job; this function only
/// fails for pairing or adjudication infeasibility.
pub fn generate_round(
    tournament: &Tournament,
    teams: &[Team],
    adjudicators: &[Adjudicator],
    history: &[Round],
    config: &DrawConfig,
    seed: Option<u64>,
) -> Result<Round, DrawError> {
    let round = next_round_number(history);
    let stage = if tournament.is_out_round(round) {
        Stage::Elimination
    } else {
        Stage::Preliminary
    };

    let (field, pairs) = match stage {
        Stage::Preliminary => {
            let field = preliminary_field(teams, history, round, seed);
            if field.len() % 2 == 1 {
                let unpaired = field.last().map(|t| t.name.clone()).into_iter().collect();
                return Err(DrawError::PairingInfeasible {
                    round,
                    teams: unpaired,
                });
            }
            let played = played_pairs(history);
            let pairs = pair_field(&field, &played, config, round)?;
            (field, pairs)
        }
        Stage::Elimination => {
            let field = elimination_field(tournament, teams, history, round);
            let pairs = bracket_pairs(&field);
            (field, pairs)
        }
    };

    // Balance sides: fewer prior affirmative appearances takes affirmative.
    let aff_counts = affirmative_counts(history);
    let sided: Vec<(TeamId, TeamId)> = pairs
        .into_iter()
        .map(|(first, second)| {
            let first_affs = aff_counts.get(&first).copied().unwrap_or(0);
            let second_affs = aff_counts.get(&second).copied().unwrap_or(0);
            if second_affs < first_affs {
                (second, first)
            } else {
                (first, second)
            }
        })
        .collect();

    let names: HashMap<&TeamId, &str> =
        field.iter().map(|t| (&t.id, t.name.as_str())).collect();
    let assignment = allocation::allocate(&sided, teams, adjudicators, history).map_err(|i| {
        DrawError::AdjudicatorShortage {
            round,
            affirmative: names
                .get(&sided[i].0)
                .map_or_else(|| sided[i].0.to_string(), |n| (*n).to_string()),
            negative: names
                .get(&sided[i].1)
                .map_or_else(|| sided[i].1.to_string(), |n| (*n).to_string()),
        }
    })?;

    let pairings: Vec<Pairing> = sided
        .into_iter()
        .zip(assignment)
        .enumerate()
        .map(|(i, ((affirmative, negative), adjudicator))| {
            let mut pairing = Pairing::new(
                tournament.id.clone(),
                round,
                format!("Room {}", i + 1),
                affirmative,
                negative,
            );
            pairing.adjudicator = Some(adjudicator);
            pairing
        })
        .collect();

    tracing::info!(
        tournament = %tournament.id,
        round,
        stage = ?stage,
        pairings = pairings.len(),
        "drew round"
    );

    Ok(Round::new(tournament.id.clone(), round, stage).with_pairings(pairings))
}

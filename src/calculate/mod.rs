//! Standings calculation engine.
//!
//! Standings are a pure function of (teams, results-so-far): every call
//! recomputes from scratch over the rounds it is given, so repeated calls
//! on the same inputs always produce identical output. The sort order is
//! total (wins descending, points descending, then team id ascending)
//! which guarantees no two teams ever share a rank.

use std::collections::HashMap;

use crate::models::{Round, Stage, Standing, Team, TeamId};

#[derive(Default)]
struct Tally {
    wins: u32,
    losses: u32,
    points: u32,
}

/// Compute ranked standings for the given teams over the given rounds.
///
/// Pairings without a recorded result contribute nothing. Teams that have
/// not debated yet appear with zero wins and points.
pub fn compute_standings(teams: &[Team], rounds: &[Round]) -> Vec<Standing> {
    let mut tallies: HashMap<&TeamId, Tally> = HashMap::new();

    for round in rounds {
        for pairing in &round.pairings {
            let Some(result) = &pairing.result else {
                continue;
            };

            let aff = tallies.entry(&pairing.affirmative).or_default();
            aff.points = aff.points.saturating_add(result.affirmative_points);
            let neg = tallies.entry(&pairing.negative).or_default();
            neg.points = neg.points.saturating_add(result.negative_points);

            tallies.entry(&result.winner).or_default().wins += 1;
            if let Some(loser) = pairing.loser() {
                tallies.entry(loser).or_default().losses += 1;
            }
        }
    }

    let mut standings: Vec<Standing> = teams
        .iter()
        .map(|team| {
            let tally = tallies.remove(&team.id).unwrap_or_default();
            Standing {
                rank: 0,
                team_id: team.id.clone(),
                team_name: team.name.clone(),
                wins: tally.wins,
                losses: tally.losses,
                points: tally.points,
            }
        })
        .collect();

    standings.sort_by(|a, b| {
        b.wins
            .cmp(&a.wins)
            .then_with(|| b.points.cmp(&a.points))
            .then_with(|| a.team_id.cmp(&b.team_id))
    });

    for (i, standing) in standings.iter_mut().enumerate() {
        standing.rank = i as u32 + 1;
    }

    standings
}

/// Compute standings over preliminary rounds only.
///
/// Power-pairing and bracket seeding use this view so elimination results
/// never feed back into seeding.
pub fn preliminary_standings(teams: &[Team], rounds: &[Round]) -> Vec<Standing> {
    let prelim: Vec<Round> = rounds
        .iter()
        .filter(|r| r.stage == Stage::Preliminary)
        .cloned()
        .collect();
    compute_standings(teams, &prelim)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Decision, EntityId, Pairing, PairingResult, Team};
    use chrono::Utc;

    fn team(name: &str) -> Team {
        Team::new(EntityId::from("t-1"), name.to_string(), vec![])
    }

    fn decided(round: u32, aff: &Team, neg: &Team, winner: &Team, aff_pts: u32, neg_pts: u32) -> Pairing {
        let mut p = Pairing::new(
            EntityId::from("t-1"),
            round,
            format!("Room {}", round),
            aff.id.clone(),
            neg.id.clone(),
        );
        p.result = Some(PairingResult {
            winner: winner.id.clone(),
            decision: Decision::Unanimous,
            affirmative_points: aff_pts,
            negative_points: neg_pts,
            recorded_at: Utc::now(),
        });
        p
    }

    fn round_of(number: u32, stage: Stage, pairings: Vec<Pairing>) -> Round {
        Round::new(EntityId::from("t-1"), number, stage).with_pairings(pairings)
    }

    #[test]
    fn test_standings_empty_rounds() {
        let teams = vec![team("Alpha"), team("Beta")];
        let standings = compute_standings(&teams, &[]);

        assert_eq!(standings.len(), 2);
        assert!(standings.iter().all(|s| s.wins == 0 && s.points == 0));
        assert_eq!(standings[0].rank, 1);
        assert_eq!(standings[1].rank, 2);
    }

    #[test]
    fn test_standings_orders_by_wins_then_points() {
        let a = team("Alpha");
        let b = team("Beta");
        let c = team("Gamma");
        let d = team("Delta");

        let r1 = round_of(
            1,
            Stage::Preliminary,
            vec![decided(1, &a, &b, &a, 78, 72), decided(1, &c, &d, &c, 74, 70)],
        );

        let teams = vec![a.clone(), b.clone(), c.clone(), d.clone()];
        let standings = compute_standings(&teams, &[r1]);

        // A and C both on 1 win; A ahead on points.
        assert_eq!(standings[0].team_id, a.id);
        assert_eq!(standings[1].team_id, c.id);
        assert_eq!(standings[0].wins, 1);
        assert_eq!(standings[0].points, 78);
        // B (72 pts) ahead of D (70 pts) on zero wins.
        assert_eq!(standings[2].team_id, b.id);
        assert_eq!(standings[3].team_id, d.id);
    }

    #[test]
    fn test_standings_tie_broken_by_team_id() {
        let a = team("Alpha");
        let b = team("Beta");
        let r1 = round_of(
            1,
            Stage::Preliminary,
            // Drawn points; winner decides wins only.
            vec![decided(1, &a, &b, &a, 75, 75)],
        );

        let mut teams = vec![a.clone(), b.clone()];
        // Input order must not matter.
        teams.reverse();
        let standings = compute_standings(&teams, &[r1.clone()]);

        assert_eq!(standings[0].team_id, a.id);
        assert_eq!(standings[0].rank, 1);
        assert_eq!(standings[1].rank, 2);

        // Two zero-win teams with equal points: ordered by id, deterministically.
        let c = team("Gamma");
        let d = team("Delta");
        let standings = compute_standings(&[c.clone(), d.clone()], &[]);
        let expected_first = if c.id < d.id { &c } else { &d };
        assert_eq!(standings[0].team_id, expected_first.id);
    }

    #[test]
    fn test_standings_idempotent() {
        let a = team("Alpha");
        let b = team("Beta");
        let r1 = round_of(1, Stage::Preliminary, vec![decided(1, &a, &b, &b, 70, 77)]);

        let teams = vec![a, b];
        let first = compute_standings(&teams, std::slice::from_ref(&r1));
        let second = compute_standings(&teams, std::slice::from_ref(&r1));
        assert_eq!(first, second);
    }

    #[test]
    fn test_standings_saturate_on_extreme_points() {
        let a = team("Alpha");
        let b = team("Beta");
        let r1 = round_of(
            1,
            Stage::Preliminary,
            vec![decided(1, &a, &b, &a, u32::MAX, 70)],
        );
        let r2 = round_of(
            2,
            Stage::Preliminary,
            vec![decided(2, &a, &b, &a, u32::MAX, 70)],
        );

        let standings = compute_standings(&[a.clone(), b], &[r1, r2]);
        assert_eq!(standings[0].team_id, a.id);
        assert_eq!(standings[0].points, u32::MAX);
    }

    #[test]
    fn test_standings_ignore_unrecorded_pairings() {
        let a = team("Alpha");
        let b = team("Beta");
        let open = Pairing::new(
            EntityId::from("t-1"),
            1,
            "Room 1".to_string(),
            a.id.clone(),
            b.id.clone(),
        );
        let r1 = round_of(1, Stage::Preliminary, vec![open]);

        let standings = compute_standings(&[a, b], &[r1]);
        assert!(standings.iter().all(|s| s.wins == 0 && s.points == 0));
    }

    #[test]
    fn test_preliminary_standings_exclude_elimination() {
        let a = team("Alpha");
        let b = team("Beta");
        let prelim = round_of(1, Stage::Preliminary, vec![decided(1, &a, &b, &a, 76, 70)]);
        let elim = round_of(2, Stage::Elimination, vec![decided(2, &b, &a, &b, 80, 75)]);

        let teams = vec![a.clone(), b.clone()];
        let standings = preliminary_standings(&teams, &[prelim, elim]);

        // Elimination win for B must not count here.
        assert_eq!(standings[0].team_id, a.id);
        assert_eq!(standings[0].wins, 1);
        assert_eq!(standings[1].wins, 0);
    }
}

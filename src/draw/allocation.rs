//! Adjudicator allocation.
//!
//! Assigns one adjudicator to every pairing of a round via maximum
//! bipartite matching (Kuhn's augmenting paths) over conflict-free edges.
//! A conflict is a shared institution with either team, or having judged
//! either team in an earlier round of the same tournament.

use std::collections::{HashMap, HashSet};

use crate::models::{Adjudicator, AdjudicatorId, Round, Team, TeamId};

/// Pairs of (adjudicator, team) seen together in earlier rounds.
fn judged_pairs(history: &[Round]) -> HashSet<(AdjudicatorId, TeamId)> {
    let mut seen = HashSet::new();
    for round in history {
        for pairing in &round.pairings {
            if let Some(adj) = &pairing.adjudicator {
                seen.insert((adj.clone(), pairing.affirmative.clone()));
                seen.insert((adj.clone(), pairing.negative.clone()));
            }
        }
    }
    seen
}

fn conflicts_with(
    adjudicator: &Adjudicator,
    team: &Team,
    judged: &HashSet<(AdjudicatorId, TeamId)>,
) -> bool {
    if let (Some(a), Some(b)) = (&adjudicator.institution, &team.institution) {
        if a == b {
            return true;
        }
    }
    judged.contains(&(adjudicator.id.clone(), team.id.clone()))
}

fn augment(
    pairing: usize,
    eligible: &[Vec<usize>],
    visited: &mut [bool],
    matched_adj: &mut [Option<usize>],
) -> bool {
    for &adj in &eligible[pairing] {
        if visited[adj] {
            continue;
        }
        visited[adj] = true;

        let free = match matched_adj[adj] {
            None => true,
            Some(holder) => augment(holder, eligible, visited, matched_adj),
        };
        if free {
            matched_adj[adj] = Some(pairing);
            return true;
        }
    }
    false
}

/// Assign one adjudicator to each pairing, avoiding all conflicts.
///
/// `pairs` holds the (affirmative, negative) team ids of the round being
/// drawn. On success returns one adjudicator id per pairing, in order.
/// On failure returns the index of the first pairing the pool cannot
/// cover without a conflict.
pub fn allocate(
    pairs: &[(TeamId, TeamId)],
    teams: &[Team],
    adjudicators: &[Adjudicator],
    history: &[Round],
) -> Result<Vec<AdjudicatorId>, usize> {
    let by_id: HashMap<&TeamId, &Team> = teams.iter().map(|t| (&t.id, t)).collect();
    let judged = judged_pairs(history);

    // Conflict-free edges pairing -> adjudicator indices.
    let eligible: Vec<Vec<usize>> = pairs
        .iter()
        .map(|(aff, neg)| {
            adjudicators
                .iter()
                .enumerate()
                .filter(|(_, adj)| {
                    let aff_ok = by_id
                        .get(aff)
                        .is_some_and(|team| !conflicts_with(adj, team, &judged));
                    let neg_ok = by_id
                        .get(neg)
                        .is_some_and(|team| !conflicts_with(adj, team, &judged));
                    aff_ok && neg_ok
                })
                .map(|(i, _)| i)
                .collect()
        })
        .collect();

    let mut matched_adj: Vec<Option<usize>> = vec![None; adjudicators.len()];
    for pairing in 0..pairs.len() {
        let mut visited = vec![false; adjudicators.len()];
        if !augment(pairing, &eligible, &mut visited, &mut matched_adj) {
            return Err(pairing);
        }
    }

    // Invert the matching back to pairing order. Every pairing index is
    // held by exactly one adjudicator once all augmentations succeed.
    let mut assignment: Vec<Option<AdjudicatorId>> = vec![None; pairs.len()];
    for (adj, pairing) in matched_adj.iter().enumerate() {
        if let Some(p) = pairing {
            assignment[*p] = Some(adjudicators[adj].id.clone());
        }
    }

    assignment
        .into_iter()
        .enumerate()
        .map(|(i, a)| a.ok_or(i))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EntityId, Pairing, Stage};

    fn team(name: &str, institution: Option<&str>) -> Team {
        let mut t = Team::new(EntityId::from("t-1"), name.to_string(), vec![]);
        t.institution = institution.map(str::to_string);
        t
    }

    fn adjudicator(name: &str, institution: Option<&str>) -> Adjudicator {
        let mut a = Adjudicator::new(EntityId::from("t-1"), name.to_string());
        a.institution = institution.map(str::to_string);
        a
    }

    #[test]
    fn test_allocate_simple() {
        let teams = vec![team("A", None), team("B", None), team("C", None), team("D", None)];
        let adjudicators = vec![adjudicator("J1", None), adjudicator("J2", None)];
        let pairs = vec![
            (teams[0].id.clone(), teams[1].id.clone()),
            (teams[2].id.clone(), teams[3].id.clone()),
        ];

        let assignment = allocate(&pairs, &teams, &adjudicators, &[]).unwrap();
        assert_eq!(assignment.len(), 2);
        assert_ne!(assignment[0], assignment[1]);
    }

    #[test]
    fn test_allocate_avoids_institution_conflict() {
        let teams = vec![team("A", Some("Oxford")), team("B", None)];
        let adjudicators = vec![
            adjudicator("Oxonian", Some("Oxford")),
            adjudicator("Neutral", None),
        ];
        let pairs = vec![(teams[0].id.clone(), teams[1].id.clone())];

        let assignment = allocate(&pairs, &teams, &adjudicators, &[]).unwrap();
        assert_eq!(assignment[0], adjudicators[1].id);
    }

    #[test]
    fn test_allocate_avoids_prior_judging() {
        let teams = vec![team("A", None), team("B", None)];
        let adjudicators = vec![adjudicator("J1", None), adjudicator("J2", None)];

        // J1 already judged team A in round 1.
        let mut earlier = Pairing::new(
            EntityId::from("t-1"),
            1,
            "Room 1".to_string(),
            teams[0].id.clone(),
            teams[1].id.clone(),
        );
        earlier.adjudicator = Some(adjudicators[0].id.clone());
        let history =
            vec![Round::new(EntityId::from("t-1"), 1, Stage::Preliminary).with_pairings(vec![earlier])];

        let pairs = vec![(teams[0].id.clone(), teams[1].id.clone())];
        let assignment = allocate(&pairs, &teams, &adjudicators, &history).unwrap();
        assert_eq!(assignment[0], adjudicators[1].id);
    }

    #[test]
    fn test_allocate_reassigns_via_augmenting_path() {
        // J2 is the only judge legal for pairing 2, so pairing 1 must take J1
        // even if a greedy pass would have grabbed J2 first.
        let teams = vec![
            team("A", None),
            team("B", None),
            team("C", Some("Oxford")),
            team("D", None),
        ];
        let adjudicators = vec![
            adjudicator("J1", Some("Oxford")),
            adjudicator("J2", None),
        ];
        let pairs = vec![
            (teams[0].id.clone(), teams[1].id.clone()),
            (teams[2].id.clone(), teams[3].id.clone()),
        ];

        let assignment = allocate(&pairs, &teams, &adjudicators, &[]).unwrap();
        assert_eq!(assignment[0], adjudicators[0].id);
        assert_eq!(assignment[1], adjudicators[1].id);
    }

    #[test]
    fn test_allocate_shortage_reports_pairing() {
        let teams = vec![team("A", Some("Oxford")), team("B", None)];
        let adjudicators = vec![adjudicator("Oxonian", Some("Oxford"))];
        let pairs = vec![(teams[0].id.clone(), teams[1].id.clone())];

        let err = allocate(&pairs, &teams, &adjudicators, &[]).unwrap_err();
        assert_eq!(err, 0);
    }

    #[test]
    fn test_allocate_empty_pool() {
        let teams = vec![team("A", None), team("B", None)];
        let pairs = vec![(teams[0].id.clone(), teams[1].id.clone())];

        assert_eq!(allocate(&pairs, &teams, &[], &[]), Err(0));
    }
}

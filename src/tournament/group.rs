//! Round robin groups.
use std::collections::HashSet;

use rand::Rng;
use tracing::{debug, trace};

use crate::core::{Match, Stage, Team, TeamId};

use super::error::{Result, TournamentError};
use super::knockout::Qualifier;
use super::simulator::MatchSimulator;
use super::standings::{Standing, compute_standings};

/// A group before it's played. Teams are in seeding order.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub name: String,
    pub teams: Vec<TeamId>,
}

impl Group {
    pub fn new(name: impl Into<String>, teams: Vec<TeamId>) -> Self {
        Self {
            name: name.into(),
            teams,
        }
    }

    /// Every pairing of the group exactly once. The better seeded team is at
    /// home.
    pub fn fixtures(&self) -> Vec<(TeamId, TeamId)> {
        let mut fixtures = Vec::with_capacity(self.teams.len() * self.teams.len() / 2);
        for (i, &home) in self.teams.iter().enumerate() {
            for &away in &self.teams[i + 1..] {
                fixtures.push((home, away));
            }
        }
        fixtures
    }
}

/// A finished group.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct GroupResult {
    pub name: String,
    /// Teams in seeding order.
    pub teams: Vec<TeamId>,
    pub matches: Vec<Match>,
    /// Final table, best first.
    pub standings: Vec<Standing>,
}

impl GroupResult {
    /// The top `k` of the table.
    pub fn qualifiers(&self, k: usize) -> &[Standing] {
        &self.standings[..k.min(self.standings.len())]
    }

    pub fn winner(&self) -> Option<TeamId> {
        self.standings.first().map(|s| s.team)
    }

    /// Finishing position of `team`, starting at 1.
    pub fn position_of(&self, team: TeamId) -> Option<usize> {
        self.standings
            .iter()
            .position(|s| s.team == team)
            .map(|idx| idx + 1)
    }

    pub fn standing(&self, team: TeamId) -> Option<&Standing> {
        self.standings.iter().find(|s| s.team == team)
    }
}

/// Plays groups with a match simulator.
#[derive(Debug)]
pub struct GroupStage<'a, S> {
    teams: &'a [Team],
    simulator: &'a S,
}

impl<'a, S: MatchSimulator> GroupStage<'a, S> {
    pub fn new(teams: &'a [Team], simulator: &'a S) -> Self {
        Self { teams, simulator }
    }

    /// Play every fixture of the group and build its table.
    pub fn simulate_group<R: Rng + ?Sized>(
        &self,
        group: &Group,
        rng: &mut R,
    ) -> Result<GroupResult> {
        self.validate(group)?;

        let mut matches = Vec::with_capacity(group.teams.len() * group.teams.len() / 2);
        for (home, away) in group.fixtures() {
            let home = &self.teams[home.index()];
            let away = &self.teams[away.index()];
            let score = self.simulator.play(home, away, rng)?;
            trace!(
                group = group.name.as_str(),
                home = home.name.as_str(),
                away = away.name.as_str(),
                score = %score,
                "Group match played"
            );
            matches.push(Match::new(
                home.id,
                away.id,
                Stage::Group(group.name.clone()),
                score,
            ));
        }

        let standings = compute_standings(&group.teams, &matches);
        debug!(
            group = group.name.as_str(),
            matches = matches.len(),
            winner = standings
                .first()
                .map(|s| self.teams[s.team.index()].name.as_str()),
            "Group complete"
        );

        Ok(GroupResult {
            name: group.name.clone(),
            teams: group.teams.clone(),
            matches,
            standings,
        })
    }

    /// Play the groups one after the other.
    pub fn simulate_all<R: Rng + ?Sized>(
        &self,
        groups: &[Group],
        rng: &mut R,
    ) -> Result<Vec<GroupResult>> {
        groups
            .iter()
            .map(|group| self.simulate_group(group, rng))
            .collect()
    }

    fn validate(&self, group: &Group) -> Result<()> {
        if group.teams.len() < 2 {
            return Err(TournamentError::config(format!(
                "group {} needs at least 2 teams, it has {}",
                group.name,
                group.teams.len()
            )));
        }

        let mut seen = HashSet::with_capacity(group.teams.len());
        for &team in &group.teams {
            if team.index() >= self.teams.len() {
                return Err(TournamentError::config(format!(
                    "group {} refers to unknown team {}",
                    group.name, team
                )));
            }
            if !seen.insert(team) {
                return Err(TournamentError::config(format!(
                    "{} is in group {} twice",
                    self.teams[team.index()].name,
                    group.name
                )));
            }
        }
        Ok(())
    }
}

/// Pick and seed the teams that go through to the knockout stage.
///
/// The top `per_group` of every group qualify. Seeds go by finishing
/// position first, so all group winners are seeded ahead of all runners-up,
/// and by group order within a position. Then the `best_placed` best teams
/// finishing just below the qualifying places across all groups go through
/// too, compared on points, goal difference and goals, then group order.
pub fn select_qualifiers(
    results: &[GroupResult],
    per_group: usize,
    best_placed: usize,
) -> Result<Vec<Qualifier>> {
    let mut qualifiers = Vec::with_capacity(results.len() * per_group + best_placed);

    for position in 0..per_group {
        for group in results {
            let standing = group.standings.get(position).ok_or_else(|| {
                TournamentError::config(format!(
                    "group {} has no team in position {}",
                    group.name,
                    position + 1
                ))
            })?;
            qualifiers.push(Qualifier::from_group(
                standing.team,
                group.name.as_str(),
                position + 1,
            ));
        }
    }

    if best_placed > 0 {
        let mut candidates: Vec<(usize, &GroupResult, &Standing)> = results
            .iter()
            .enumerate()
            .filter_map(|(idx, group)| group.standings.get(per_group).map(|s| (idx, group, s)))
            .collect();
        if candidates.len() < best_placed {
            return Err(TournamentError::config(format!(
                "only {} teams finished in position {}, {} are needed",
                candidates.len(),
                per_group + 1,
                best_placed
            )));
        }
        candidates.sort_by(|a, b| b.2.sort_key().cmp(&a.2.sort_key()).then(a.0.cmp(&b.0)));
        for (_, group, standing) in candidates.into_iter().take(best_placed) {
            qualifiers.push(Qualifier::from_group(
                standing.team,
                group.name.as_str(),
                per_group + 1,
            ));
        }
    }

    Ok(qualifiers
        .into_iter()
        .enumerate()
        .map(|(idx, q)| q.with_seed(idx + 1))
        .collect())
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::tournament::simulator::MatchModel;
    use crate::tournament::test_util::{
        ScriptedSimulator, StrongerWins, assert_valid_group_result,
    };

    fn teams(strengths: &[f64]) -> Vec<Team> {
        strengths
            .iter()
            .enumerate()
            .map(|(i, &s)| Team::new(TeamId(i), format!("Team{}", i), s))
            .collect()
    }

    fn group(name: &str, ids: &[usize]) -> Group {
        Group::new(name, ids.iter().map(|&i| TeamId(i)).collect())
    }

    #[test]
    fn test_fixtures_round_robin() {
        let g = group("A", &[0, 1, 2, 3]);
        let fixtures = g.fixtures();
        assert_eq!(fixtures.len(), 6);
        assert_eq!(fixtures[0], (TeamId(0), TeamId(1)));
        assert_eq!(fixtures[5], (TeamId(2), TeamId(3)));
        assert_eq!(group("B", &[4, 5, 6]).fixtures().len(), 3);
    }

    #[test_log::test]
    fn test_strengths_end_to_end() {
        let all = teams(&[90.0, 70.0, 50.0, 30.0]);
        let model = MatchModel::default();
        let stage = GroupStage::new(&all, &model);
        let mut rng = StdRng::seed_from_u64(2022);
        let result = stage.simulate_group(&group("A", &[0, 1, 2, 3]), &mut rng).unwrap();

        assert_eq!(result.matches.len(), 6);
        assert_valid_group_result(&result);

        let top = &result.standings[0];
        for other in &result.standings[1..] {
            assert!(top.points() >= other.points());
            if top.points() == other.points() {
                assert!(top.goal_difference() >= other.goal_difference());
            }
        }
    }

    #[test]
    fn test_many_groups_hold_invariants() {
        let all = teams(&[88.0, 71.0, 64.0, 12.0, 50.0, 50.0, 50.0, 50.0]);
        let model = MatchModel::default();
        let stage = GroupStage::new(&all, &model);
        let mut rng = StdRng::seed_from_u64(77);
        for _ in 0..200 {
            let results = stage
                .simulate_all(
                    &[group("A", &[0, 1, 2, 3]), group("B", &[4, 5, 6, 7])],
                    &mut rng,
                )
                .unwrap();
            for result in &results {
                assert_valid_group_result(result);
            }
        }
    }

    #[test]
    fn test_stronger_always_wins_orders_by_strength() {
        let all = teams(&[30.0, 90.0, 50.0, 70.0]);
        let stage = GroupStage::new(&all, &StrongerWins);
        let mut rng = StdRng::seed_from_u64(0);
        let result = stage.simulate_group(&group("A", &[0, 1, 2, 3]), &mut rng).unwrap();
        let order: Vec<TeamId> = result.standings.iter().map(|s| s.team).collect();
        assert_eq!(order, vec![TeamId(1), TeamId(3), TeamId(2), TeamId(0)]);
        assert_eq!(result.winner(), Some(TeamId(1)));
        assert_eq!(result.position_of(TeamId(0)), Some(4));
        assert_eq!(result.qualifiers(2).len(), 2);
    }

    #[test]
    fn test_head_to_head_winner_ranks_first() {
        // 0 and 1 finish level on points, goal difference and goals but 1
        // won the match between them.
        let scripted = ScriptedSimulator::new()
            .with_score(0, 1, 0, 1)
            .with_score(0, 2, 3, 0)
            .with_score(0, 3, 1, 0)
            .with_score(1, 2, 0, 1)
            .with_score(1, 3, 3, 0);
        let all = teams(&[50.0; 4]);
        let stage = GroupStage::new(&all, &scripted);
        let mut rng = StdRng::seed_from_u64(0);
        let result = stage.simulate_group(&group("A", &[0, 1, 2, 3]), &mut rng).unwrap();
        assert_valid_group_result(&result);
        assert_eq!(result.standings[0].team, TeamId(1));
        assert_eq!(result.standings[1].team, TeamId(0));
    }

    #[test]
    fn test_rejects_small_and_bad_groups() {
        let all = teams(&[50.0; 4]);
        let model = MatchModel::default();
        let stage = GroupStage::new(&all, &model);
        let mut rng = StdRng::seed_from_u64(0);
        for bad in [
            group("A", &[0]),
            group("A", &[]),
            group("A", &[0, 9]),
            group("A", &[0, 0]),
        ] {
            assert!(matches!(
                stage.simulate_group(&bad, &mut rng),
                Err(TournamentError::Configuration(_))
            ));
        }
    }

    fn played_groups() -> Vec<GroupResult> {
        let all = teams(&[90.0, 70.0, 50.0, 30.0, 85.0, 65.0, 45.0, 25.0, 80.0, 60.0, 40.0, 20.0]);
        let stage = GroupStage::new(&all, &StrongerWins);
        let mut rng = StdRng::seed_from_u64(0);
        stage
            .simulate_all(
                &[
                    group("A", &[0, 1, 2, 3]),
                    group("B", &[4, 5, 6, 7]),
                    group("C", &[8, 9, 10, 11]),
                ],
                &mut rng,
            )
            .unwrap()
    }

    #[test]
    fn test_select_qualifiers_seeds_winners_first() {
        let results = played_groups();
        let qualifiers = select_qualifiers(&results[..2], 2, 0).unwrap();
        let ids: Vec<TeamId> = qualifiers.iter().map(|q| q.team).collect();
        assert_eq!(ids, vec![TeamId(0), TeamId(4), TeamId(1), TeamId(5)]);
        let seeds: Vec<usize> = qualifiers.iter().map(|q| q.seed).collect();
        assert_eq!(seeds, vec![1, 2, 3, 4]);
        assert_eq!(qualifiers[1].group.as_deref(), Some("B"));
        assert_eq!(qualifiers[2].group_position, 2);
    }

    #[test]
    fn test_select_best_placed() {
        // Every third placed team has 3 points, -1 and 1 goal, so group
        // order decides.
        let results = played_groups();
        let qualifiers = select_qualifiers(&results, 2, 2).unwrap();
        assert_eq!(qualifiers.len(), 8);
        assert_eq!(qualifiers[6].team, TeamId(2));
        assert_eq!(qualifiers[7].team, TeamId(6));
        assert_eq!(qualifiers[7].group_position, 3);
        assert_eq!(qualifiers[7].seed, 8);

        assert!(select_qualifiers(&results, 2, 4).is_err());
        assert!(select_qualifiers(&results, 5, 0).is_err());
    }
}

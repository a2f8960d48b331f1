use std::collections::HashMap;

use crate::core::{KnockoutRound, Match, TeamId};

use super::group::GroupResult;
use super::knockout::Bracket;
use super::result::TournamentResult;

/// One row per team, in team order.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct TeamSummary {
    pub team: TeamId,
    pub name: String,
    pub strength: f64,
    pub group: Option<String>,
    /// Finishing position in the group, starting at 1
    pub group_position: Option<usize>,
    /// Points earned in the group stage
    pub group_points: u32,
    /// Matches played over the whole tournament
    pub played: u32,
    /// Goals scored over the whole tournament, extra time included
    pub goals_for: u32,
    /// Goals conceded over the whole tournament, extra time included
    pub goals_against: u32,
    /// Round the team went out in. None for the champion and for teams
    /// that didn't reach the knockout stage.
    pub eliminated_in: Option<KnockoutRound>,
    /// Final placing, see [`TournamentResult::final_position`]
    pub final_position: Option<usize>,
}

/// Aggregate numbers for a finished tournament.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct TournamentStats {
    /// Number of matches played
    pub matches: usize,
    /// Matches played in the group stage
    pub group_matches: usize,
    /// Matches played in the knockout stage, third place included
    pub knockout_matches: usize,
    /// Goals scored in all matches, shootouts excluded
    pub total_goals: u32,
    /// Average goals per match
    pub average_goals: f64,
    /// Group matches that ended level
    pub draws: usize,
    /// Knockout matches that needed extra time
    pub extra_time: usize,
    /// Knockout matches decided on penalties
    pub shootouts: usize,
    /// Biggest winning margin, ties keep the earliest match
    pub biggest_win: Option<Match>,
    pub teams: Vec<TeamSummary>,
}

impl TournamentStats {
    pub fn from_result(result: &TournamentResult) -> Self {
        let matches = result.all_matches();
        let group_matches = matches.iter().filter(|m| !m.stage.is_knockout()).count();
        let total_goals: u32 = matches.iter().map(|m| m.total_goals()).sum();
        let average_goals = if matches.is_empty() {
            0.0
        } else {
            f64::from(total_goals) / matches.len() as f64
        };

        let mut biggest_win: Option<&Match> = None;
        for m in matches.iter().copied() {
            let margin = m.home_goals().abs_diff(m.away_goals());
            if margin > biggest_win.map_or(0, |b| b.home_goals().abs_diff(b.away_goals())) {
                biggest_win = Some(m);
            }
        }

        Self {
            matches: matches.len(),
            group_matches,
            knockout_matches: matches.len() - group_matches,
            total_goals,
            average_goals,
            draws: matches.iter().filter(|m| m.is_draw()).count(),
            extra_time: matches.iter().filter(|m| m.extra_time.is_some()).count(),
            shootouts: matches.iter().filter(|m| m.penalties.is_some()).count(),
            biggest_win: biggest_win.cloned(),
            teams: team_summaries(result, &matches),
        }
    }

    /// Team summaries ordered by goals scored, most first.
    pub fn top_scorers(&self) -> Vec<&TeamSummary> {
        let mut teams: Vec<&TeamSummary> = self.teams.iter().collect();
        teams.sort_by(|a, b| b.goals_for.cmp(&a.goals_for).then(a.team.cmp(&b.team)));
        teams
    }
}

fn team_summaries(result: &TournamentResult, matches: &[&Match]) -> Vec<TeamSummary> {
    let group_of: HashMap<TeamId, &GroupResult> = result
        .groups()
        .iter()
        .flat_map(|g| g.teams.iter().map(move |&t| (t, g)))
        .collect();
    let bracket: &Bracket = result.bracket();

    result
        .teams()
        .iter()
        .map(|team| {
            let (played, goals_for, goals_against) = matches
                .iter()
                .filter_map(|m| m.goals_for_against(team.id))
                .fold((0, 0, 0), |(p, f, a), (gf, ga)| (p + 1, f + gf, a + ga));
            let group = group_of.get(&team.id);
            TeamSummary {
                team: team.id,
                name: team.name.clone(),
                strength: team.strength,
                group: group.map(|g| g.name.clone()),
                group_position: group.and_then(|g| g.position_of(team.id)),
                group_points: group
                    .and_then(|g| g.standing(team.id))
                    .map_or(0, |s| s.points()),
                played,
                goals_for,
                goals_against,
                eliminated_in: bracket.eliminated_in(team.id),
                final_position: result.final_position(team.id),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranking::StrengthMap;
    use crate::tournament::TournamentBuilder;
    use crate::tournament::test_util::{ScriptedSimulator, assert_valid_stats};

    fn scripted_result() -> TournamentResult {
        // Group A: Brazil 3 : 0 Ghana. Group B: Japan 1 : 1 Spain, Japan
        // goes through on seeding. Final Brazil 0 : 0 Japan, Brazil on
        // penalties.
        let scripted = ScriptedSimulator::new()
            .with_score(0, 1, 3, 0)
            .with_score(2, 3, 1, 1);
        TournamentBuilder::new()
            .add_team_in_group("Brazil", "A")
            .add_team_in_group("Ghana", "A")
            .add_team_in_group("Japan", "B")
            .add_team_in_group("Spain", "B")
            .qualifiers_per_group(1)
            .rankings(StrengthMap::from_iter([("Brazil", 95.0), ("Spain", 90.0)]))
            .seed(3)
            .build()
            .unwrap()
            .run_with(&scripted)
            .unwrap()
    }

    #[test]
    fn test_totals() {
        let result = scripted_result();
        let stats = result.stats();
        assert_valid_stats(&result, &stats);
        assert_eq!(stats.matches, 3);
        assert_eq!(stats.group_matches, 2);
        assert_eq!(stats.knockout_matches, 1);
        assert_eq!(stats.total_goals, 5);
        assert_eq!(stats.draws, 1);
        assert_eq!(stats.extra_time, 0);
        assert_eq!(stats.shootouts, 1);
        assert_eq!(
            stats.biggest_win.as_ref().map(|m| (m.home, m.away)),
            Some((TeamId(0), TeamId(1)))
        );
    }

    #[test]
    fn test_team_rows() {
        let stats = scripted_result().stats();
        let brazil = &stats.teams[0];
        assert_eq!(brazil.name, "Brazil");
        assert_eq!(brazil.group.as_deref(), Some("A"));
        assert_eq!(brazil.group_position, Some(1));
        assert_eq!(brazil.group_points, 3);
        assert_eq!(brazil.played, 2);
        assert_eq!((brazil.goals_for, brazil.goals_against), (3, 0));
        assert_eq!(brazil.final_position, Some(1));
        assert_eq!(brazil.eliminated_in, None);

        let japan = &stats.teams[2];
        assert_eq!(japan.group_points, 1);
        assert_eq!(japan.group_position, Some(1));
        assert_eq!(japan.final_position, Some(2));
        assert_eq!(japan.eliminated_in, Some(KnockoutRound::Final));

        let ghana = &stats.teams[1];
        assert_eq!(ghana.final_position, None);
        assert_eq!(ghana.goals_against, 3);

        let top = stats.top_scorers();
        assert_eq!(top[0].name, "Brazil");
    }
}

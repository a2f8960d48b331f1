use std::collections::{HashMap, HashSet};

use approx::assert_abs_diff_eq;
use rand::Rng;

use crate::core::{KnockoutRound, Score, Team, TeamId};

use super::error::Result;
use super::group::GroupResult;
use super::knockout::Bracket;
use super::result::TournamentResult;
use super::simulator::MatchSimulator;
use super::standings::{POINTS_FOR_DRAW, POINTS_FOR_WIN};
use super::stats::TournamentStats;

/// The stronger team wins 1 : 0, equal teams draw 0 : 0. Level knockout
/// matches go to the home side on penalties.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrongerWins;

impl MatchSimulator for StrongerWins {
    fn play<R: Rng + ?Sized>(&self, home: &Team, away: &Team, _rng: &mut R) -> Result<Score> {
        Ok(if home.strength > away.strength {
            Score::new(1, 0)
        } else if away.strength > home.strength {
            Score::new(0, 1)
        } else {
            Score::new(0, 0)
        })
    }

    fn shootout<R: Rng + ?Sized>(&self, _home: &Team, _away: &Team, _rng: &mut R) -> Result<Score> {
        Ok(Score::new(5, 4))
    }
}

/// Plays back fixed scores. Pairs without a script end 0 : 0 and level
/// knockout matches go to the home side on penalties.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSimulator {
    scores: HashMap<(TeamId, TeamId), Score>,
}

impl ScriptedSimulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the result of `home` against `away`. The same result, seen
    /// from the other side, is used if the teams meet the other way round.
    pub fn with_score(mut self, home: usize, away: usize, home_goals: u8, away_goals: u8) -> Self {
        self.scores
            .insert((TeamId(home), TeamId(away)), Score::new(home_goals, away_goals));
        self
    }
}

impl MatchSimulator for ScriptedSimulator {
    fn play<R: Rng + ?Sized>(&self, home: &Team, away: &Team, _rng: &mut R) -> Result<Score> {
        if let Some(score) = self.scores.get(&(home.id, away.id)) {
            return Ok(*score);
        }
        Ok(self
            .scores
            .get(&(away.id, home.id))
            .map(Score::swapped)
            .unwrap_or_default())
    }

    fn shootout<R: Rng + ?Sized>(&self, _home: &Team, _away: &Team, _rng: &mut R) -> Result<Score> {
        Ok(Score::new(4, 3))
    }
}

pub fn assert_valid_group_result(group: &GroupResult) {
    let n = group.teams.len();
    assert_eq!(group.standings.len(), n);
    assert_eq!(group.matches.len(), n * (n - 1) / 2);

    // Every pair meets exactly once.
    let mut pairs = HashSet::new();
    for m in &group.matches {
        assert_ne!(m.home, m.away);
        assert!(group.teams.contains(&m.home));
        assert!(group.teams.contains(&m.away));
        let key = if m.home < m.away {
            (m.home, m.away)
        } else {
            (m.away, m.home)
        };
        assert!(pairs.insert(key), "{:?} played twice", key);
        assert!(m.extra_time.is_none());
        assert!(m.penalties.is_none());
    }

    // Points add up to 3 per decisive match and 2 per draw.
    let draws = group.matches.iter().filter(|m| m.is_draw()).count() as u32;
    let decisive = group.matches.len() as u32 - draws;
    let total_points: u32 = group.standings.iter().map(|s| s.points()).sum();
    assert_eq!(total_points, POINTS_FOR_WIN * decisive + 2 * POINTS_FOR_DRAW * draws);

    for standing in &group.standings {
        assert_eq!(standing.played as usize, n - 1);
        assert_eq!(
            standing.won + standing.drawn + standing.lost,
            standing.played
        );

        // Goals recomputed from the match log.
        let (scored, conceded) = group
            .matches
            .iter()
            .filter_map(|m| m.goals_for_against(standing.team))
            .fold((0, 0), |(f, a), (gf, ga)| (f + gf, a + ga));
        assert_eq!(standing.goals_for, scored);
        assert_eq!(standing.goals_against, conceded);
        assert_eq!(
            standing.goal_difference(),
            i64::from(scored) - i64::from(conceded)
        );
    }

    // Ordered by the primary keys and every team listed once.
    for pair in group.standings.windows(2) {
        assert!(pair[0].sort_key() >= pair[1].sort_key());
    }
    let listed: HashSet<TeamId> = group.standings.iter().map(|s| s.team).collect();
    assert_eq!(listed.len(), n);
}

pub fn assert_valid_bracket(bracket: &Bracket) {
    let rounds = bracket.rounds();
    assert!(!rounds.is_empty());

    let first = rounds[0].num_teams();
    assert!(first.is_power_of_two());
    assert_eq!(rounds.len() as u32, first.trailing_zeros());
    assert_eq!(bracket.eliminated().len(), first - 1);

    for (idx, round) in rounds.iter().enumerate() {
        assert_eq!(round.num_teams(), first >> idx);
        for tie in &round.ties {
            assert_ne!(tie.winner, tie.loser());
            assert_eq!(tie.played.winner(), Some(tie.winner));
            if tie.played.penalties.is_some() {
                assert_eq!(tie.played.home_goals(), tie.played.away_goals());
            }
        }

        // Winners of adjacent ties meet in the next round.
        if let Some(next) = rounds.get(idx + 1) {
            let winners = round.winners();
            for (pair, tie) in winners.chunks(2).zip(next.ties.iter()) {
                assert_eq!(pair[0], tie.home());
                assert_eq!(pair[1], tie.away());
            }
        }
    }

    let last = &rounds[rounds.len() - 1];
    assert_eq!(last.round, KnockoutRound::Final);
    assert_eq!(last.ties.len(), 1);
    assert_eq!(last.ties[0].winner, bracket.champion());
    assert!(bracket.eliminated_in(bracket.champion()).is_none());

    if let Some(third) = bracket.third_place() {
        assert_eq!(
            bracket.eliminated_in(third.home()),
            Some(KnockoutRound::SemiFinal)
        );
        assert_eq!(
            bracket.eliminated_in(third.away()),
            Some(KnockoutRound::SemiFinal)
        );
    }
}

pub fn assert_valid_stats(result: &TournamentResult, stats: &TournamentStats) {
    let matches = result.all_matches();
    assert_eq!(stats.matches, matches.len());

    let goals: u32 = matches.iter().map(|m| m.total_goals()).sum();
    assert_eq!(stats.total_goals, goals);

    if stats.matches > 0 {
        assert_abs_diff_eq!(
            stats.average_goals,
            f64::from(goals) / stats.matches as f64,
            epsilon = 1e-9
        );
    }

    let team_goals: u32 = stats.teams.iter().map(|t| t.goals_for).sum();
    assert_eq!(team_goals, goals);
    assert_eq!(stats.teams.len(), result.teams().len());
}

pub fn assert_valid_tournament(result: &TournamentResult) {
    for group in result.groups() {
        assert_valid_group_result(group);
    }
    assert_valid_bracket(result.bracket());

    let champion = result.champion();
    assert_eq!(result.final_position(champion), Some(1));
    if let Some(runner_up) = result.runner_up() {
        assert_ne!(runner_up, champion);
        assert_eq!(result.final_position(runner_up), Some(2));
    }

    let stats = result.stats();
    assert_valid_stats(result, &stats);
}

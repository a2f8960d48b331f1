//! Group tables.
//!
//! Standings are ordered by points, goal difference and goals scored. Teams
//! still level after that are separated by a table of only the matches
//! played between them (for two teams that's simply their head to head
//! result). Teams that table still can't split get their own smaller table,
//! and finally their seeding order in the group decides.
use std::cmp::Ordering;

use crate::core::{Match, TeamId};

pub const POINTS_FOR_WIN: u32 = 3;
pub const POINTS_FOR_DRAW: u32 = 1;

/// A team's record in a group.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Standing {
    pub team: TeamId,
    pub played: u32,
    pub won: u32,
    pub drawn: u32,
    pub lost: u32,
    pub goals_for: u32,
    pub goals_against: u32,
}

impl Standing {
    pub fn new(team: TeamId) -> Self {
        Self {
            team,
            played: 0,
            won: 0,
            drawn: 0,
            lost: 0,
            goals_for: 0,
            goals_against: 0,
        }
    }

    /// Add one result to the record.
    pub fn record(&mut self, goals_for: u32, goals_against: u32) {
        self.played += 1;
        self.goals_for += goals_for;
        self.goals_against += goals_against;
        match goals_for.cmp(&goals_against) {
            Ordering::Greater => self.won += 1,
            Ordering::Less => self.lost += 1,
            Ordering::Equal => self.drawn += 1,
        }
    }

    /// Add a match to the record if this team played in it.
    pub fn record_match(&mut self, played: &Match) {
        if let Some((goals_for, goals_against)) = played.goals_for_against(self.team) {
            self.record(goals_for, goals_against);
        }
    }

    pub fn points(&self) -> u32 {
        self.won * POINTS_FOR_WIN + self.drawn * POINTS_FOR_DRAW
    }

    pub fn goal_difference(&self) -> i64 {
        i64::from(self.goals_for) - i64::from(self.goals_against)
    }

    /// Points, goal difference, goals scored. Bigger is better.
    pub fn sort_key(&self) -> (u32, i64, u32) {
        (self.points(), self.goal_difference(), self.goals_for)
    }
}

/// Build the ordered table for `teams` from the matches of their group.
///
/// `teams` must be in seeding order, it's the last tie-break. Matches that
/// involve a team outside of `teams` are ignored.
pub fn compute_standings(teams: &[TeamId], matches: &[Match]) -> Vec<Standing> {
    let standings = build_table(teams, matches);
    rank_standings(standings, matches)
}

fn build_table(teams: &[TeamId], matches: &[Match]) -> Vec<Standing> {
    let mut standings: Vec<Standing> = teams.iter().map(|&t| Standing::new(t)).collect();
    for played in matches
        .iter()
        .filter(|m| teams.contains(&m.home) && teams.contains(&m.away))
    {
        for standing in standings.iter_mut() {
            standing.record_match(played);
        }
    }
    standings
}

/// Sort standings that are in seeding order.
pub fn rank_standings(standings: Vec<Standing>, matches: &[Match]) -> Vec<Standing> {
    // Remember the seeding position, it's the final tie-break.
    let mut seeded: Vec<(usize, Standing)> = standings.into_iter().enumerate().collect();
    seeded.sort_by(|a, b| compare(&a.1, &b.1).then(a.0.cmp(&b.0)));

    let mut start = 0;
    while start < seeded.len() {
        let key = seeded[start].1.sort_key();
        let end = seeded[start..]
            .iter()
            .position(|(_, s)| s.sort_key() != key)
            .map_or(seeded.len(), |offset| start + offset);

        if end - start > 1 {
            break_tie(&mut seeded[start..end], matches);
        }
        start = end;
    }

    seeded.into_iter().map(|(_, s)| s).collect()
}

/// Order a run of teams level on points, goal difference and goals using
/// only the matches among them.
///
/// When the mini-table splits the run but leaves some teams level, those
/// teams get a fresh mini-table of their own matches. A mini-table that
/// separates nobody falls back to seeding.
fn break_tie(tied: &mut [(usize, Standing)], matches: &[Match]) {
    let teams: Vec<TeamId> = tied.iter().map(|(_, s)| s.team).collect();
    let mini = build_table(&teams, matches);
    let mini_key = |team: TeamId| {
        mini.iter()
            .find(|s| s.team == team)
            .map(Standing::sort_key)
            .unwrap_or_default()
    };
    tied.sort_by(|a, b| {
        mini_key(b.1.team)
            .cmp(&mini_key(a.1.team))
            .then(a.0.cmp(&b.0))
    });

    let keys: Vec<(u32, i64, u32)> = tied.iter().map(|(_, s)| mini_key(s.team)).collect();
    let mut start = 0;
    while start < keys.len() {
        let end = keys[start..]
            .iter()
            .position(|k| *k != keys[start])
            .map_or(keys.len(), |offset| start + offset);

        if end - start > 1 && end - start < keys.len() {
            break_tie(&mut tied[start..end], matches);
        }
        start = end;
    }
}

fn compare(a: &Standing, b: &Standing) -> Ordering {
    b.sort_key().cmp(&a.sort_key())
}

//! Single elimination bracket.
//!
//! Qualifiers are paired best seed against worst remaining seed, avoiding a
//! rematch of two teams from the same group when possible. The first round
//! ties are then laid out in the usual bracket order so that seeds one and
//! two can only meet in the final. Every later round pairs the winners of
//! adjacent ties.
use std::collections::HashSet;

use rand::Rng;
use tracing::{debug, event};

use crate::core::{KnockoutRound, Match, Stage, Team, TeamId};

use super::error::{Result, TournamentError};
use super::simulator::MatchSimulator;

/// A team that made it out of the group stage.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Qualifier {
    pub team: TeamId,
    /// Group the team qualified from. None for teams entered straight into
    /// the bracket.
    pub group: Option<String>,
    /// Finishing position in the group, starting at 1.
    pub group_position: usize,
    /// Seed for the bracket, 1 is the best.
    pub seed: usize,
}

impl Qualifier {
    pub fn new(team: TeamId, seed: usize) -> Self {
        Self {
            team,
            group: None,
            group_position: 1,
            seed,
        }
    }

    pub fn from_group(team: TeamId, group: impl Into<String>, group_position: usize) -> Self {
        Self {
            team,
            group: Some(group.into()),
            group_position,
            seed: 0,
        }
    }

    pub fn with_seed(mut self, seed: usize) -> Self {
        self.seed = seed;
        self
    }

    fn same_group(&self, other: &Qualifier) -> bool {
        match (&self.group, &other.group) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

/// One knockout pairing and its result.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Tie {
    pub played: Match,
    pub winner: TeamId,
}

impl Tie {
    fn from_match(played: Match) -> Result<Self> {
        let winner = played.winner().ok_or_else(|| {
            TournamentError::InvalidMatchResult(format!(
                "knockout match {} v {} has no winner",
                played.home, played.away
            ))
        })?;
        Ok(Self { played, winner })
    }

    pub fn home(&self) -> TeamId {
        self.played.home
    }

    pub fn away(&self) -> TeamId {
        self.played.away
    }

    pub fn loser(&self) -> TeamId {
        if self.winner == self.played.home {
            self.played.away
        } else {
            self.played.home
        }
    }
}

/// All ties of one knockout round, in bracket order.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Round {
    pub round: KnockoutRound,
    pub ties: Vec<Tie>,
}

impl Round {
    pub fn winners(&self) -> Vec<TeamId> {
        self.ties.iter().map(|t| t.winner).collect()
    }

    pub fn num_teams(&self) -> usize {
        self.ties.len() * 2
    }
}

/// The complete knockout stage.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Bracket {
    rounds: Vec<Round>,
    third_place: Option<Tie>,
    champion: TeamId,
    /// Every beaten team with the round it went out in, in elimination
    /// order.
    eliminated: Vec<(TeamId, KnockoutRound)>,
}

impl Bracket {
    /// Rounds from the first round to the final.
    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    pub fn third_place(&self) -> Option<&Tie> {
        self.third_place.as_ref()
    }

    pub fn champion(&self) -> TeamId {
        self.champion
    }

    pub fn final_tie(&self) -> Option<&Tie> {
        self.rounds.last().and_then(|r| r.ties.first())
    }

    pub fn runner_up(&self) -> Option<TeamId> {
        self.final_tie().map(Tie::loser)
    }

    /// Winner of the third place play-off, if one was played.
    pub fn third(&self) -> Option<TeamId> {
        self.third_place.as_ref().map(|t| t.winner)
    }

    pub fn eliminated(&self) -> &[(TeamId, KnockoutRound)] {
        &self.eliminated
    }

    /// The round a team was knocked out in. None for the champion and for
    /// teams that never entered the bracket.
    pub fn eliminated_in(&self, team: TeamId) -> Option<KnockoutRound> {
        self.eliminated
            .iter()
            .find(|(t, _)| *t == team)
            .map(|(_, round)| *round)
    }

    /// Every knockout match in the order they were played.
    pub fn matches(&self) -> Vec<&Match> {
        let mut out = Vec::new();
        for round in &self.rounds {
            if round.round == KnockoutRound::Final {
                if let Some(third) = &self.third_place {
                    out.push(&third.played);
                }
            }
            out.extend(round.ties.iter().map(|t| &t.played));
        }
        out
    }
}

/// Plays a single elimination bracket.
#[derive(Debug)]
pub struct KnockoutStage<'a, S> {
    teams: &'a [Team],
    simulator: &'a S,
    third_place_playoff: bool,
}

impl<'a, S: MatchSimulator> KnockoutStage<'a, S> {
    pub fn new(teams: &'a [Team], simulator: &'a S) -> Self {
        Self {
            teams,
            simulator,
            third_place_playoff: false,
        }
    }

    /// Play a match between the losing semi-finalists.
    pub fn with_third_place_playoff(mut self, play: bool) -> Self {
        self.third_place_playoff = play;
        self
    }

    /// Play the whole bracket.
    ///
    /// The number of qualifiers must be a power of two and at least 2.
    /// Nothing is played when the qualifiers are rejected.
    pub fn run<R: Rng + ?Sized>(&self, qualifiers: &[Qualifier], rng: &mut R) -> Result<Bracket> {
        self.validate(qualifiers)?;

        let mut seeded = qualifiers.to_vec();
        seeded.sort_by_key(|q| q.seed);
        let mut alive = first_round_order(seeded);

        event!(
            tracing::Level::DEBUG,
            num_teams = alive.len(),
            third_place_playoff = self.third_place_playoff,
            "Starting knockout stage"
        );

        let mut rounds = Vec::new();
        let mut eliminated = Vec::with_capacity(alive.len() - 1);
        let mut third_place = None;

        while alive.len() > 1 {
            let label = KnockoutRound::for_teams(alive.len());
            let mut ties = Vec::with_capacity(alive.len() / 2);
            for pair in alive.chunks(2) {
                let tie = self.play_tie(pair[0], pair[1], label, rng)?;
                eliminated.push((tie.loser(), label));
                ties.push(tie);
            }
            debug!(round = %label, ties = ties.len(), "Knockout round complete");

            alive = ties.iter().map(|t| t.winner).collect();

            if label == KnockoutRound::SemiFinal && self.third_place_playoff {
                let tie = self.play_tie(
                    ties[0].loser(),
                    ties[1].loser(),
                    KnockoutRound::ThirdPlace,
                    rng,
                )?;
                debug!(winner = %tie.winner, "Third place decided");
                third_place = Some(tie);
            }

            rounds.push(Round { round: label, ties });
        }

        let champion = alive.first().copied().ok_or_else(|| {
            TournamentError::InvalidMatchResult("bracket finished without a champion".to_string())
        })?;

        Ok(Bracket {
            rounds,
            third_place,
            champion,
            eliminated,
        })
    }

    fn validate(&self, qualifiers: &[Qualifier]) -> Result<()> {
        let count = qualifiers.len();
        if count < 2 || !count.is_power_of_two() {
            return Err(TournamentError::config(format!(
                "a knockout bracket needs a power of two of at least 2 teams, got {}",
                count
            )));
        }

        let mut seen = HashSet::with_capacity(count);
        for q in qualifiers {
            if q.team.index() >= self.teams.len() {
                return Err(TournamentError::config(format!(
                    "qualifier {} is not a team of this tournament",
                    q.team
                )));
            }
            if !seen.insert(q.team) {
                return Err(TournamentError::config(format!(
                    "{} qualified more than once",
                    self.teams[q.team.index()].name
                )));
            }
        }
        Ok(())
    }

    fn play_tie<R: Rng + ?Sized>(
        &self,
        home: TeamId,
        away: TeamId,
        round: KnockoutRound,
        rng: &mut R,
    ) -> Result<Tie> {
        let played = self.simulator.play_knockout(
            &self.teams[home.index()],
            &self.teams[away.index()],
            Stage::Knockout(round),
            rng,
        )?;
        Tie::from_match(played)
    }
}

/// Pair the seeds and lay the pairs out in bracket order. `seeded` must be
/// sorted best seed first and have a power of two length.
fn first_round_order(seeded: Vec<Qualifier>) -> Vec<TeamId> {
    let pairs = pair_seeds(seeded);
    let mut slots = Vec::with_capacity(pairs.len() * 2);
    for idx in bracket_positions(pairs.len()) {
        let (home, away) = pairs[idx];
        slots.push(home);
        slots.push(away);
    }
    slots
}

/// Best remaining seed against the worst remaining seed from another group.
/// Pairs come out ordered by their best seed.
fn pair_seeds(mut remaining: Vec<Qualifier>) -> Vec<(TeamId, TeamId)> {
    let mut pairs = Vec::with_capacity(remaining.len() / 2);
    while remaining.len() >= 2 {
        let top = remaining.remove(0);
        let idx = remaining
            .iter()
            .rposition(|q| !q.same_group(&top))
            .unwrap_or(remaining.len() - 1);
        let opponent = remaining.remove(idx);
        pairs.push((top.team, opponent.team));
    }
    pairs
}

/// Order in which `n` ranked pairs (`n` a power of two) fill the bracket so
/// that the two best never meet before the last round.
///
/// For 4 pairs this is `[0, 3, 1, 2]`, for 8 `[0, 7, 3, 4, 1, 6, 2, 5]`.
fn bracket_positions(n: usize) -> Vec<usize> {
    let mut order = vec![0];
    while order.len() < n {
        let size = order.len() * 2;
        order = order
            .iter()
            .flat_map(|&pos| [pos, size - 1 - pos])
            .collect();
    }
    order
}

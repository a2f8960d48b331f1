//! Match simulation.
//!
//! A [`MatchSimulator`] turns two teams into a score. The default simulator
//! is [`MatchModel`]: each side's goals are drawn from a Poisson
//! distribution whose mean grows with that side's share of the combined
//! strength.
//!
//! Knockout matches can't end level. [`MatchSimulator::play_knockout`]
//! plays extra time when the model allows it and then a penalty shootout
//! until one side is ahead.
use rand::Rng;
use rand_distr::{Distribution, Poisson};
use tracing::trace;

use crate::core::{Match, Score, Stage, Team};

use super::error::{Result, TournamentError};

/// Strength used for teams with a zero, negative or NaN strength.
pub const MIN_STRENGTH: f64 = 0.01;
/// Lower bound of a side's expected goals.
pub const MIN_EXPECTED_GOALS: f64 = 0.05;
/// Upper bound of a side's expected goals.
pub const MAX_EXPECTED_GOALS: f64 = 6.0;
/// Extra time is a third of regulation.
const EXTRA_TIME_FRACTION: f64 = 1.0 / 3.0;
/// Kicks per side before sudden death.
const SHOOTOUT_KICKS: u8 = 5;
/// Sudden death rounds before the shootout is settled with a coin toss.
const MAX_SUDDEN_DEATH_ROUNDS: u8 = 200;

/// Something that can play football matches.
///
/// Only [`MatchSimulator::play`] is required. The knockout helpers have
/// default implementations built on top of it.
pub trait MatchSimulator {
    /// Play ninety minutes and return the score.
    fn play<R: Rng + ?Sized>(&self, home: &Team, away: &Team, rng: &mut R) -> Result<Score>;

    /// Play extra time after a level knockout match. Returns the goals
    /// scored in extra time, or None when extra time isn't played.
    fn extra_time<R: Rng + ?Sized>(
        &self,
        _home: &Team,
        _away: &Team,
        _rng: &mut R,
    ) -> Result<Option<Score>> {
        Ok(None)
    }

    /// Take penalties until one side is ahead.
    fn shootout<R: Rng + ?Sized>(&self, home: &Team, away: &Team, rng: &mut R) -> Result<Score>;

    /// Play a match that must produce a winner.
    fn play_knockout<R: Rng + ?Sized>(
        &self,
        home: &Team,
        away: &Team,
        stage: Stage,
        rng: &mut R,
    ) -> Result<Match> {
        let score = self.play(home, away, rng)?;
        let mut played = Match::new(home.id, away.id, stage, score);

        if played.home_goals() == played.away_goals() {
            played.extra_time = self.extra_time(home, away, rng)?;
        }

        if played.home_goals() == played.away_goals() {
            let penalties = self.shootout(home, away, rng)?;
            if penalties.is_level() {
                return Err(TournamentError::InvalidMatchResult(format!(
                    "shootout between {} and {} ended level at {}",
                    home.name, away.name, penalties
                )));
            }
            played.penalties = Some(penalties);
        }

        trace!(
            home = home.name.as_str(),
            away = away.name.as_str(),
            score = %played.score,
            extra_time = played.extra_time.is_some(),
            penalties = played.penalties.is_some(),
            "Knockout match played"
        );
        Ok(played)
    }
}

/// Poisson goal model driven by team strength.
///
/// A side's expected goals are `goals_per_match * share` where
/// `share = s^k / (s^k + o^k)` for own strength `s`, opponent strength `o`
/// and `k = strength_exponent`. Two equal teams therefore expect half of
/// `goals_per_match` each.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct MatchModel {
    /// Expected total goals in a match between equal teams
    pub goals_per_match: f64,
    /// How strongly the strength difference skews the goals
    pub strength_exponent: f64,
    /// Most goals one side can score in ninety minutes
    pub max_goals: u8,
    /// Play thirty minutes of extra time before penalties
    pub extra_time: bool,
    /// Probability of scoring a penalty for equal teams
    pub penalty_conversion: f64,
    /// How much the strength share moves the penalty conversion
    pub penalty_skill_weight: f64,
}

impl Default for MatchModel {
    fn default() -> Self {
        Self {
            goals_per_match: 2.6,
            strength_exponent: 1.0,
            max_goals: 10,
            extra_time: true,
            penalty_conversion: 0.75,
            penalty_skill_weight: 0.2,
        }
    }
}

impl MatchModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn validate(&self) -> Result<()> {
        if !self.goals_per_match.is_finite() || self.goals_per_match <= 0.0 {
            return Err(TournamentError::config("goals_per_match must be positive"));
        }

        if !self.strength_exponent.is_finite() || self.strength_exponent < 0.0 {
            return Err(TournamentError::config("strength_exponent must be non-negative"));
        }

        if self.max_goals == 0 {
            return Err(TournamentError::config("max_goals must be greater than 0"));
        }

        if !(0.0..=1.0).contains(&self.penalty_conversion) {
            return Err(TournamentError::config("penalty_conversion must be between 0 and 1"));
        }

        if !self.penalty_skill_weight.is_finite() || self.penalty_skill_weight < 0.0 {
            return Err(TournamentError::config("penalty_skill_weight must be non-negative"));
        }

        Ok(())
    }

    /// Share of the combined strength that belongs to `strength`. In `[0, 1]`.
    pub fn strength_share(&self, strength: f64, opponent: f64) -> f64 {
        let own = sanitize_strength(strength).ln();
        let other = sanitize_strength(opponent).ln();
        // s^k / (s^k + o^k) written so large exponents can't overflow.
        1.0 / (1.0 + (self.strength_exponent * (other - own)).exp())
    }

    /// Mean goals a team of `strength` scores against `opponent` in ninety
    /// minutes.
    pub fn expected_goals(&self, strength: f64, opponent: f64) -> f64 {
        (self.goals_per_match * self.strength_share(strength, opponent))
            .clamp(MIN_EXPECTED_GOALS, MAX_EXPECTED_GOALS)
    }

    fn sample_goals<R: Rng + ?Sized>(&self, lambda: f64, rng: &mut R) -> Result<u8> {
        let poisson = Poisson::new(lambda).map_err(|e| {
            TournamentError::InvalidMatchResult(format!("bad expected goals {}: {}", lambda, e))
        })?;
        let goals: f64 = poisson.sample(rng);
        if !goals.is_finite() || goals < 0.0 || goals.fract() != 0.0 {
            return Err(TournamentError::InvalidMatchResult(format!(
                "sampled goal count {} is not a non-negative integer",
                goals
            )));
        }
        Ok(goals.min(f64::from(self.max_goals)) as u8)
    }

    fn play_fraction<R: Rng + ?Sized>(
        &self,
        home: &Team,
        away: &Team,
        fraction: f64,
        rng: &mut R,
    ) -> Result<Score> {
        let home_lambda = self.expected_goals(home.strength, away.strength) * fraction;
        let away_lambda = self.expected_goals(away.strength, home.strength) * fraction;
        Ok(Score::new(
            self.sample_goals(home_lambda, rng)?,
            self.sample_goals(away_lambda, rng)?,
        ))
    }

    fn penalty_probability(&self, strength: f64, opponent: f64) -> f64 {
        let share = self.strength_share(strength, opponent);
        (self.penalty_conversion + self.penalty_skill_weight * (share - 0.5)).clamp(0.05, 0.95)
    }
}

impl MatchSimulator for MatchModel {
    fn play<R: Rng + ?Sized>(&self, home: &Team, away: &Team, rng: &mut R) -> Result<Score> {
        self.play_fraction(home, away, 1.0, rng)
    }

    fn extra_time<R: Rng + ?Sized>(
        &self,
        home: &Team,
        away: &Team,
        rng: &mut R,
    ) -> Result<Option<Score>> {
        if !self.extra_time {
            return Ok(None);
        }
        self.play_fraction(home, away, EXTRA_TIME_FRACTION, rng).map(Some)
    }

    fn shootout<R: Rng + ?Sized>(&self, home: &Team, away: &Team, rng: &mut R) -> Result<Score> {
        let p_home = self.penalty_probability(home.strength, away.strength);
        let p_away = self.penalty_probability(away.strength, home.strength);

        let mut score = Score::default();
        for _ in 0..SHOOTOUT_KICKS {
            score.home += u8::from(rng.random_bool(p_home));
            score.away += u8::from(rng.random_bool(p_away));
        }

        let mut rounds = 0;
        while score.is_level() {
            if rounds == MAX_SUDDEN_DEATH_ROUNDS {
                // Nobody can separate them, toss a coin.
                if rng.random_bool(0.5) {
                    score.home += 1;
                } else {
                    score.away += 1;
                }
                break;
            }
            score.home += u8::from(rng.random_bool(p_home));
            score.away += u8::from(rng.random_bool(p_away));
            rounds += 1;
        }

        Ok(score)
    }
}

/// NaN and anything below [`MIN_STRENGTH`] is floored, infinity is capped at
/// the largest finite value.
fn sanitize_strength(strength: f64) -> f64 {
    if strength.is_nan() || strength <= MIN_STRENGTH {
        MIN_STRENGTH
    } else {
        strength.min(f64::MAX)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::core::{KnockoutRound, TeamId};

    fn team(id: usize, strength: f64) -> Team {
        Team::new(TeamId(id), format!("Team{}", id), strength)
    }

    #[test]
    fn test_default_model_is_valid() {
        assert!(MatchModel::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_models() {
        let bad = [
            MatchModel {
                goals_per_match: 0.0,
                ..Default::default()
            },
            MatchModel {
                goals_per_match: f64::NAN,
                ..Default::default()
            },
            MatchModel {
                strength_exponent: -1.0,
                ..Default::default()
            },
            MatchModel {
                max_goals: 0,
                ..Default::default()
            },
            MatchModel {
                penalty_conversion: 1.5,
                ..Default::default()
            },
        ];
        for model in bad.iter() {
            assert!(
                matches!(model.validate(), Err(TournamentError::Configuration(_))),
                "{:?} should be invalid",
                model
            );
        }
    }

    #[test]
    fn test_equal_teams_split_goals() {
        let model = MatchModel::default();
        assert_relative_eq!(model.strength_share(50.0, 50.0), 0.5);
        assert_relative_eq!(model.expected_goals(50.0, 50.0), 1.3);
    }

    #[test]
    fn test_expected_goals_monotonic() {
        let model = MatchModel::default();
        let mut last = 0.0;
        for strength in [1.0, 10.0, 30.0, 50.0, 70.0, 90.0] {
            let goals = model.expected_goals(strength, 50.0);
            assert!(goals > last, "{} should beat {}", goals, last);
            last = goals;
        }
    }

    #[test]
    fn test_exponent_zero_ignores_strength() {
        let model = MatchModel {
            strength_exponent: 0.0,
            ..Default::default()
        };
        assert_relative_eq!(model.strength_share(99.0, 1.0), 0.5);
    }

    #[test]
    fn test_bad_strengths_are_floored() {
        let model = MatchModel::default();
        let share = model.strength_share(-5.0, f64::NAN);
        assert_relative_eq!(share, 0.5);
        let goals = model.expected_goals(0.0, 100.0);
        assert!(goals >= MIN_EXPECTED_GOALS);
    }

    #[test]
    fn test_infinite_strength_is_strongest() {
        let model = MatchModel::default();
        let infinite = model.expected_goals(f64::INFINITY, 50.0);
        let weak = model.expected_goals(1.0, 50.0);
        assert!(infinite > weak);
        assert!(infinite >= model.expected_goals(f64::MAX, 50.0));
        assert!(model.strength_share(f64::INFINITY, 50.0) > 0.5);
        assert_relative_eq!(
            model.strength_share(f64::NEG_INFINITY, 50.0),
            model.strength_share(MIN_STRENGTH, 50.0)
        );
    }

    #[test]
    fn test_huge_exponent_does_not_overflow() {
        let model = MatchModel {
            strength_exponent: 1_000.0,
            ..Default::default()
        };
        assert_relative_eq!(model.strength_share(100.0, 1.0), 1.0);
        assert_relative_eq!(model.strength_share(1.0, 100.0), 0.0);
    }

    #[test]
    fn test_goals_never_negative_or_above_cap() {
        let model = MatchModel::default();
        let mut rng = StdRng::seed_from_u64(1234);
        for i in 0..10_000 {
            // Ratios from 0.01 to 100 on a log scale
            let exponent = (i % 401) as f64 / 100.0 - 2.0;
            let ratio = 10f64.powf(exponent);
            let home = team(0, 10.0 * ratio);
            let away = team(1, 10.0);
            let score = model.play(&home, &away, &mut rng).unwrap();
            assert!(score.home <= model.max_goals);
            assert!(score.away <= model.max_goals);
        }
    }

    #[test]
    fn test_stronger_team_scores_more() {
        let model = MatchModel::default();
        let mut rng = StdRng::seed_from_u64(99);
        let strong = team(0, 90.0);
        let weak = team(1, 30.0);
        let (mut strong_goals, mut weak_goals) = (0u32, 0u32);
        for _ in 0..2_000 {
            let score = model.play(&strong, &weak, &mut rng).unwrap();
            strong_goals += u32::from(score.home);
            weak_goals += u32::from(score.away);
        }
        assert!(strong_goals > weak_goals * 2);
    }

    #[test]
    fn test_same_seed_same_scores() {
        let model = MatchModel::default();
        let a = team(0, 70.0);
        let b = team(1, 60.0);
        let run = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..50)
                .map(|_| model.play(&a, &b, &mut rng).unwrap())
                .collect::<Vec<_>>()
        };
        assert_eq!(run(5), run(5));
    }

    #[test]
    fn test_shootout_always_has_winner() {
        let model = MatchModel::default();
        let mut rng = StdRng::seed_from_u64(7);
        let a = team(0, 50.0);
        let b = team(1, 50.0);
        for _ in 0..1_000 {
            let score = model.shootout(&a, &b, &mut rng).unwrap();
            assert!(!score.is_level());
        }
    }

    #[test]
    fn test_knockout_never_draws() {
        let model = MatchModel::default();
        let mut rng = StdRng::seed_from_u64(2024);
        let a = team(0, 60.0);
        let b = team(1, 58.0);
        let mut went_to_penalties = 0;
        for _ in 0..1_000 {
            let played = model
                .play_knockout(&a, &b, Stage::Knockout(KnockoutRound::Final), &mut rng)
                .unwrap();
            assert!(played.winner().is_some());
            if played.penalties.is_some() {
                went_to_penalties += 1;
                assert!(played.extra_time.is_some());
                assert_eq!(played.home_goals(), played.away_goals());
            }
        }
        assert!(went_to_penalties > 0);
    }

    #[test]
    fn test_knockout_without_extra_time() {
        let model = MatchModel {
            extra_time: false,
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(11);
        let a = team(0, 50.0);
        let b = team(1, 50.0);
        for _ in 0..500 {
            let played = model
                .play_knockout(&a, &b, Stage::Knockout(KnockoutRound::SemiFinal), &mut rng)
                .unwrap();
            assert!(played.extra_time.is_none());
            assert!(played.winner().is_some());
        }
    }
}

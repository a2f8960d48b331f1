use rand::{SeedableRng, rngs::StdRng};
use tracing::event;

use crate::core::Team;

use super::config::TournamentConfig;
use super::error::Result;
use super::group::{Group, GroupStage, select_qualifiers};
use super::knockout::KnockoutStage;
use super::result::TournamentResult;
use super::simulator::MatchSimulator;

/// A tournament ready to be played.
///
/// Owns the teams, with their strengths already resolved, the groups and
/// the seed. Running it twice replays the exact same tournament.
#[derive(Debug, Clone)]
pub struct Tournament {
    config: TournamentConfig,
    seed: u64,
    teams: Vec<Team>,
    groups: Vec<Group>,
}

impl Tournament {
    /// Create a new Tournament (internal - use TournamentBuilder instead)
    pub(crate) fn new(
        config: TournamentConfig,
        seed: u64,
        teams: Vec<Team>,
        groups: Vec<Group>,
    ) -> Self {
        Self {
            config,
            seed,
            teams,
            groups,
        }
    }

    pub fn config(&self) -> &TournamentConfig {
        &self.config
    }

    /// The seed used for the group draw and every match
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Number of teams that will reach the knockout stage
    pub fn num_qualifiers(&self) -> usize {
        self.config.total_qualifiers(self.groups.len())
    }

    /// Play the tournament with the configured match model
    pub fn run(&self) -> Result<TournamentResult> {
        self.run_with(&self.config.model)
    }

    /// Play the tournament with any match simulator
    pub fn run_with<S: MatchSimulator>(&self, simulator: &S) -> Result<TournamentResult> {
        event!(
            tracing::Level::INFO,
            num_teams = self.teams.len(),
            num_groups = self.groups.len(),
            num_qualifiers = self.num_qualifiers(),
            seed = self.seed,
            "Starting tournament"
        );

        let mut rng = StdRng::seed_from_u64(self.seed);

        let group_results =
            GroupStage::new(&self.teams, simulator).simulate_all(&self.groups, &mut rng)?;

        let qualifiers = select_qualifiers(
            &group_results,
            self.config.qualifiers_per_group,
            self.config.best_placed_qualifiers,
        )?;
        event!(
            tracing::Level::DEBUG,
            qualifiers = ?qualifiers
                .iter()
                .map(|q| self.teams[q.team.index()].name.as_str())
                .collect::<Vec<_>>(),
            "Group stage complete"
        );

        let bracket = KnockoutStage::new(&self.teams, simulator)
            .with_third_place_playoff(self.config.third_place_playoff)
            .run(&qualifiers, &mut rng)?;

        event!(
            tracing::Level::INFO,
            champion = self.teams[bracket.champion().index()].name.as_str(),
            "Tournament complete"
        );

        Ok(TournamentResult::new(
            self.seed,
            self.config.clone(),
            self.teams.clone(),
            group_results,
            qualifiers,
            bracket,
        ))
    }
}

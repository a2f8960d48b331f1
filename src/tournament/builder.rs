use std::collections::HashSet;
use std::fmt;

use rand::seq::SliceRandom;
use rand::{SeedableRng, rngs::StdRng};
use tracing::{debug, warn};

use crate::core::{Team, TeamId};
use crate::ranking::{RankingProvider, StrengthLookup, StrengthMap, normalize_country_name};

use super::config::TournamentConfig;
use super::error::{Result, TournamentError};
use super::group::Group;
use super::runner::Tournament;
use super::simulator::MatchModel;

/// A team as entered by the caller.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamSpec {
    pub name: String,
    /// Country used for the ranking lookup when it differs from the name
    pub country: Option<String>,
    /// Group to put the team in. Either every team has a group or none
    /// does, in which case groups are drawn at random.
    pub group: Option<String>,
}

impl TeamSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            country: None,
            group: None,
        }
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }
}

/// Builder for constructing [`Tournament`] instances
///
/// # Example
///
/// ```
/// use cup_sim::ranking::{RankingEntry, RankingTable};
/// use cup_sim::tournament::TournamentBuilder;
///
/// let ranking = RankingTable::new(vec![
///     RankingEntry::new(1, "Argentina", 1867.0),
///     RankingEntry::new(2, "France", 1859.0),
///     RankingEntry::new(5, "England", 1800.0),
///     RankingEntry::new(8, "Netherlands", 1731.0),
/// ]);
///
/// // No groups given, so the teams are drawn into groups of two.
/// let tournament = TournamentBuilder::new()
///     .add_teams(["Argentyna", "Francja", "Anglia", "Holandia"])
///     .group_size(2)
///     .qualifiers_per_group(1)
///     .rankings(ranking)
///     .seed(2022)
///     .build()
///     .unwrap();
///
/// assert_eq!(tournament.groups().len(), 2);
/// assert_eq!(tournament.teams()[0].country, "Argentina");
/// ```
#[derive(Default)]
pub struct TournamentBuilder {
    teams: Vec<TeamSpec>,
    rankings: Option<Box<dyn RankingProvider>>,
    config: TournamentConfig,
}

impl fmt::Debug for TournamentBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TournamentBuilder")
            .field("teams", &self.teams)
            .field("has_rankings", &self.rankings.is_some())
            .field("config", &self.config)
            .finish()
    }
}

impl TournamentBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a team to be drawn into a group at random
    pub fn add_team(self, name: impl Into<String>) -> Self {
        self.add_team_spec(TeamSpec::new(name))
    }

    /// Add a team to a named group
    pub fn add_team_in_group(self, name: impl Into<String>, group: impl Into<String>) -> Self {
        self.add_team_spec(TeamSpec::new(name).with_group(group))
    }

    pub fn add_team_spec(mut self, spec: TeamSpec) -> Self {
        self.teams.push(spec);
        self
    }

    /// Add several teams to be drawn into groups at random
    pub fn add_teams<I, N>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        self.teams.extend(names.into_iter().map(TeamSpec::new));
        self
    }

    /// Set where team strengths come from. Without one every team gets the
    /// same baseline strength.
    pub fn rankings(mut self, rankings: impl RankingProvider + 'static) -> Self {
        self.rankings = Some(Box::new(rankings));
        self
    }

    /// Replace the whole configuration
    pub fn config(mut self, config: TournamentConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the number of teams per randomly drawn group
    pub fn group_size(mut self, group_size: usize) -> Self {
        self.config.group_size = group_size;
        self
    }

    /// Set how many teams from the top of every group qualify
    pub fn qualifiers_per_group(mut self, qualifiers_per_group: usize) -> Self {
        self.config.qualifiers_per_group = qualifiers_per_group;
        self
    }

    /// Set how many of the best teams below the qualifying places also go
    /// through
    pub fn best_placed_qualifiers(mut self, best_placed: usize) -> Self {
        self.config.best_placed_qualifiers = best_placed;
        self
    }

    pub fn third_place_playoff(mut self, play: bool) -> Self {
        self.config.third_place_playoff = play;
        self
    }

    /// Set the match model parameters
    pub fn model(mut self, model: MatchModel) -> Self {
        self.config.model = model;
        self
    }

    /// Set the random seed for reproducibility
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Build the Tournament
    ///
    /// Strengths are looked up here, once. Returns an error if the teams or
    /// the configuration can't make a tournament.
    pub fn build(self) -> Result<Tournament> {
        self.config.validate()?;

        if self.teams.is_empty() {
            return Err(TournamentError::config(
                "No teams configured. Use add_team(), add_team_in_group() or add_team_spec()",
            ));
        }
        self.validate_names()?;

        let assigned = self.teams.iter().filter(|t| t.group.is_some()).count();
        if assigned != 0 && assigned != self.teams.len() {
            return Err(TournamentError::config(format!(
                "{} of {} teams have a group, either all or none must",
                assigned,
                self.teams.len()
            )));
        }

        let seed = self.config.seed.unwrap_or_else(rand::random::<u64>);
        let mut teams = self.resolve_teams();

        let groups = if assigned == 0 {
            // Use a derived seed for the draw to keep it separate from the
            // match RNG
            let mut rng = StdRng::seed_from_u64(seed.wrapping_add(1));
            draw_groups(&teams, self.config.group_size, &mut rng)?
        } else {
            explicit_groups(&self.teams)
        };
        for group in &groups {
            for &id in &group.teams {
                teams[id.index()].group = Some(group.name.clone());
            }
        }

        let sizes: Vec<usize> = groups.iter().map(|g| g.teams.len()).collect();
        self.config.validate_groups(&sizes)?;

        debug!(
            num_teams = teams.len(),
            num_groups = groups.len(),
            seed,
            "Tournament built"
        );

        Ok(Tournament::new(self.config, seed, teams, groups))
    }

    fn validate_names(&self) -> Result<()> {
        let mut seen = HashSet::with_capacity(self.teams.len());
        for spec in &self.teams {
            let name = spec.name.trim();
            if name.is_empty() {
                return Err(TournamentError::config("team names can't be empty"));
            }
            if !seen.insert(name.to_lowercase()) {
                return Err(TournamentError::config(format!(
                    "team {} was added more than once",
                    name
                )));
            }
            if spec.group.as_deref().is_some_and(|g| g.trim().is_empty()) {
                return Err(TournamentError::config(format!(
                    "team {} has an empty group name",
                    name
                )));
            }
        }
        Ok(())
    }

    /// Create the teams with their strength.
    fn resolve_teams(&self) -> Vec<Team> {
        let fallback = StrengthMap::new();
        let provider: &dyn RankingProvider = match &self.rankings {
            Some(rankings) => rankings.as_ref(),
            None => &fallback,
        };

        self.teams
            .iter()
            .enumerate()
            .map(|(idx, spec)| {
                let name = spec.name.trim();
                let lookup = provider.strength(name, spec.country.as_deref());
                if let StrengthLookup::Baseline(strength) = lookup {
                    warn!(
                        team = name,
                        country = spec.country.as_deref(),
                        strength,
                        "Team not found in rankings, using baseline strength"
                    );
                }
                let country = normalize_country_name(spec.country.as_deref().unwrap_or(name));
                Team::new(TeamId(idx), name, lookup.value()).with_country(country)
            })
            .collect()
    }
}

/// Groups in order of first appearance, teams in the order they were added.
fn explicit_groups(specs: &[TeamSpec]) -> Vec<Group> {
    let mut groups: Vec<Group> = Vec::new();
    for (idx, spec) in specs.iter().enumerate() {
        let Some(name) = spec.group.as_deref().map(str::trim) else {
            continue;
        };
        match groups.iter_mut().find(|g| g.name == name) {
            Some(group) => group.teams.push(TeamId(idx)),
            None => groups.push(Group::new(name, vec![TeamId(idx)])),
        }
    }
    groups
}

/// Shuffle the teams into groups of `group_size`. Within a group the
/// strongest team is seeded first.
fn draw_groups<R: rand::Rng + ?Sized>(
    teams: &[Team],
    group_size: usize,
    rng: &mut R,
) -> Result<Vec<Group>> {
    if teams.len() % group_size != 0 {
        return Err(TournamentError::config(format!(
            "{} teams can't be drawn evenly into groups of {}",
            teams.len(),
            group_size
        )));
    }

    let mut ids: Vec<TeamId> = teams.iter().map(|t| t.id).collect();
    ids.shuffle(rng);

    Ok(ids
        .chunks(group_size)
        .enumerate()
        .map(|(idx, chunk)| {
            let mut members = chunk.to_vec();
            members.sort_by(|a, b| {
                teams[b.index()]
                    .strength
                    .total_cmp(&teams[a.index()].strength)
            });
            Group::new(group_name(idx), members)
        })
        .collect())
}

/// A, B, ... Z, then AA, AB, ...
fn group_name(idx: usize) -> String {
    let letter = |i: usize| char::from(b'A' + (i % 26) as u8);
    if idx < 26 {
        letter(idx).to_string()
    } else {
        format!("{}{}", letter(idx / 26 - 1), letter(idx))
    }
}

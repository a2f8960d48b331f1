use super::error::{Result, TournamentError};
use super::simulator::MatchModel;

/// Configuration for running a tournament
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct TournamentConfig {
    /// Number of teams per group when teams are drawn into groups randomly
    pub group_size: usize,
    /// Number of teams from the top of every group that qualify
    pub qualifiers_per_group: usize,
    /// Number of extra qualifiers taken from the best teams finishing just
    /// below the automatic qualifying places
    pub best_placed_qualifiers: usize,
    /// Play a match between the semi-final losers
    pub third_place_playoff: bool,
    /// Parameters of the match simulator
    pub model: MatchModel,
    /// Optional random seed for reproducibility
    pub seed: Option<u64>,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            group_size: 4,
            qualifiers_per_group: 2,
            best_placed_qualifiers: 0,
            third_place_playoff: true,
            model: MatchModel::default(),
            seed: None,
        }
    }
}

impl TournamentConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from JSON. Missing fields use the defaults.
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the values that don't depend on the teams.
    pub fn validate(&self) -> Result<()> {
        if self.group_size < 2 {
            return Err(TournamentError::config("group_size must be at least 2"));
        }

        if self.qualifiers_per_group == 0 {
            return Err(TournamentError::config("qualifiers_per_group must be greater than 0"));
        }

        self.model.validate()
    }

    /// Validate against the actual group sizes.
    pub fn validate_groups(&self, group_sizes: &[usize]) -> Result<()> {
        if group_sizes.is_empty() {
            return Err(TournamentError::config("at least one group is required"));
        }

        if let Some(&smallest) = group_sizes.iter().min() {
            if smallest < 2 {
                return Err(TournamentError::config(format!(
                    "every group needs at least 2 teams, smallest has {}",
                    smallest
                )));
            }
            if self.qualifiers_per_group > smallest {
                return Err(TournamentError::config(format!(
                    "qualifiers_per_group ({}) cannot exceed the smallest group ({})",
                    self.qualifiers_per_group, smallest
                )));
            }
            if self.best_placed_qualifiers > 0 && self.qualifiers_per_group >= smallest {
                return Err(TournamentError::config(
                    "best_placed_qualifiers needs every group to have a team below the qualifying places",
                ));
            }
        }

        if self.best_placed_qualifiers > group_sizes.len() {
            return Err(TournamentError::config(format!(
                "best_placed_qualifiers ({}) cannot exceed the number of groups ({})",
                self.best_placed_qualifiers,
                group_sizes.len()
            )));
        }

        let total = self.total_qualifiers(group_sizes.len());
        if total < 2 || !total.is_power_of_two() {
            return Err(TournamentError::config(format!(
                "{} qualifiers can't form a knockout bracket, the count must be a power of two",
                total
            )));
        }

        Ok(())
    }

    /// Number of teams reaching the knockout stage.
    pub fn total_qualifiers(&self, num_groups: usize) -> usize {
        self.qualifiers_per_group * num_groups + self.best_placed_qualifiers
    }
}

//! Team strength from external rankings.
//!
//! The tournament engine never talks to the ranking site. Instead every
//! team's strength is resolved once, up front, through a [`RankingProvider`].
//! Providers never fail: a team that can't be found gets a baseline
//! strength and the lookup says so, letting the caller log it.
//!
//! Two providers ship with the crate:
//!
//! - [`RankingTable`] a snapshot of a published ranking (rank, country,
//!   points). Country spellings are normalized before lookup.
//! - [`StrengthMap`] a plain map from team name to strength, for callers
//!   that already computed strengths.
use std::collections::HashMap;

mod errors;
mod normalize;
mod table;

pub use errors::RankingError;
pub use normalize::normalize_country_name;
pub use table::{DEFAULT_WORST_RANK, RankingEntry, RankingTable, strength_for_rank};

/// Strength given to unknown teams when nothing better is known.
///
/// This is the strength of the last place of a full ranking.
pub const BASELINE_STRENGTH: f64 = 100.0 / DEFAULT_WORST_RANK as f64;

/// The outcome of a strength lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StrengthLookup {
    /// The team was found in the ranking.
    Found(f64),
    /// The team wasn't found, this is the substituted baseline.
    Baseline(f64),
}

impl StrengthLookup {
    pub fn value(&self) -> f64 {
        match self {
            StrengthLookup::Found(v) | StrengthLookup::Baseline(v) => *v,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, StrengthLookup::Found(_))
    }
}

/// Anything that can turn a team into a strength score.
pub trait RankingProvider {
    /// Look up the strength of a team.
    ///
    /// `country` is the nation the team represents when it differs from the
    /// team's display name. Implementations must normalize spelling
    /// variants and must return [`StrengthLookup::Baseline`] rather than
    /// failing on unknown teams.
    fn strength(&self, team_name: &str, country: Option<&str>) -> StrengthLookup;
}

impl<P: RankingProvider + ?Sized> RankingProvider for Box<P> {
    fn strength(&self, team_name: &str, country: Option<&str>) -> StrengthLookup {
        (**self).strength(team_name, country)
    }
}

/// Pre-computed strengths keyed by normalized team name.
#[derive(Debug, Clone)]
pub struct StrengthMap {
    strengths: HashMap<String, f64>,
    baseline: f64,
}

impl Default for StrengthMap {
    fn default() -> Self {
        Self {
            strengths: HashMap::new(),
            baseline: BASELINE_STRENGTH,
        }
    }
}

impl StrengthMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the strength returned for unknown teams.
    pub fn with_baseline(mut self, baseline: f64) -> Self {
        self.baseline = baseline;
        self
    }

    pub fn insert(&mut self, name: impl AsRef<str>, strength: f64) {
        self.strengths.insert(key(name.as_ref()), strength);
    }

    pub fn len(&self) -> usize {
        self.strengths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strengths.is_empty()
    }

    fn get(&self, name: &str) -> Option<f64> {
        self.strengths.get(&key(name)).copied()
    }
}

impl<K: AsRef<str>> FromIterator<(K, f64)> for StrengthMap {
    fn from_iter<T: IntoIterator<Item = (K, f64)>>(iter: T) -> Self {
        let mut map = StrengthMap::default();
        for (name, strength) in iter {
            map.insert(name, strength);
        }
        map
    }
}

impl RankingProvider for StrengthMap {
    fn strength(&self, team_name: &str, country: Option<&str>) -> StrengthLookup {
        country
            .and_then(|c| self.get(c))
            .or_else(|| self.get(team_name))
            .map(StrengthLookup::Found)
            .unwrap_or(StrengthLookup::Baseline(self.baseline))
    }
}

fn key(name: &str) -> String {
    normalize_country_name(name).to_lowercase()
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn test_strength_map_lookup() {
        let map = StrengthMap::from_iter([("Poland", 61.0), ("Germany", 88.0)]);
        assert_eq!(map.len(), 2);
        assert_eq!(map.strength("Poland", None), StrengthLookup::Found(61.0));
        // Alias and case are normalized on both sides.
        assert_eq!(map.strength("polska", None), StrengthLookup::Found(61.0));
        assert_eq!(map.strength("NIEMCY", None), StrengthLookup::Found(88.0));
    }

    #[test]
    fn test_strength_map_prefers_country() {
        let map = StrengthMap::from_iter([("Germany", 88.0), ("Die Mannschaft", 10.0)]);
        let lookup = map.strength("Die Mannschaft", Some("Germany"));
        assert_eq!(lookup, StrengthLookup::Found(88.0));
    }

    #[test]
    fn test_strength_map_baseline() {
        let map = StrengthMap::from_iter([("Poland", 61.0)]).with_baseline(25.0);
        let lookup = map.strength("Atlantis", None);
        assert!(!lookup.is_found());
        assert_relative_eq!(lookup.value(), 25.0);
    }

    #[test]
    fn test_default_baseline_is_last_rank() {
        let map = StrengthMap::new();
        assert!(map.is_empty());
        assert_relative_eq!(
            map.strength("Nowhere", None).value(),
            strength_for_rank(DEFAULT_WORST_RANK, DEFAULT_WORST_RANK)
        );
    }

    #[test]
    fn test_boxed_provider() {
        let boxed: Box<dyn RankingProvider> = Box::new(StrengthMap::from_iter([("Spain", 90.0)]));
        assert_eq!(boxed.strength("Hiszpania", None), StrengthLookup::Found(90.0));
    }
}

#[cfg(feature = "serde")]
use std::path::Path;

use tracing::trace;

#[cfg(feature = "serde")]
use super::errors::RankingError;
use super::normalize::normalize_country_name;
use super::{RankingProvider, StrengthLookup};

/// Number of nations in a full world ranking. Unknown teams are treated as
/// if they were ranked last.
pub const DEFAULT_WORST_RANK: u32 = 211;

/// Shortest query that is allowed to match part of a country name.
const MIN_PARTIAL_MATCH_LEN: usize = 3;

/// Convert a rank into a strength in `(0, 100]`.
///
/// Rank 1 is 100, the worst rank is `100 / worst_rank`. Ranks outside
/// `1..=worst_rank` are clamped.
pub fn strength_for_rank(rank: u32, worst_rank: u32) -> f64 {
    let worst = worst_rank.max(1);
    let rank = rank.clamp(1, worst);
    100.0 * (f64::from(worst) - f64::from(rank) + 1.0) / f64::from(worst)
}

/// One row of a published ranking.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct RankingEntry {
    pub rank: u32,
    pub country: String,
    pub points: f64,
}

impl RankingEntry {
    pub fn new(rank: u32, country: impl Into<String>, points: f64) -> Self {
        Self {
            rank,
            country: country.into(),
            points,
        }
    }
}

/// A snapshot of a national team ranking.
///
/// Lookups normalize the requested country, then try an exact (case
/// insensitive) match, then a partial match where one name contains the
/// other. Partial matches prefer the best ranked country.
#[derive(Debug, Clone)]
pub struct RankingTable {
    /// Sorted by rank, best first.
    entries: Vec<RankingEntry>,
    /// Lower cased normalized country names, parallel to `entries`.
    keys: Vec<String>,
    worst_rank: u32,
}

impl RankingTable {
    pub fn new(mut entries: Vec<RankingEntry>) -> Self {
        entries.sort_by_key(|e| e.rank);
        let keys = entries
            .iter()
            .map(|e| normalize_country_name(&e.country).to_lowercase())
            .collect();
        let worst_rank = entries
            .iter()
            .map(|e| e.rank)
            .max()
            .unwrap_or(DEFAULT_WORST_RANK)
            .max(1);
        Self {
            entries,
            keys,
            worst_rank,
        }
    }

    /// Parse a JSON array of `{"rank", "country", "points"}` objects.
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self, RankingError> {
        let entries: Vec<RankingEntry> = serde_json::from_str(json)?;
        if let Some(bad) = entries.iter().find(|e| e.rank == 0) {
            return Err(RankingError::InvalidEntry(format!(
                "rank must start at 1, got 0 for {}",
                bad.country
            )));
        }
        Ok(Self::new(entries))
    }

    /// Read a ranking snapshot saved as JSON.
    #[cfg(feature = "serde")]
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, RankingError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&contents)
    }

    pub fn entries(&self) -> &[RankingEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn worst_rank(&self) -> u32 {
        self.worst_rank
    }

    /// Find the ranking row for a country.
    pub fn find(&self, country: &str) -> Option<&RankingEntry> {
        let query = normalize_country_name(country).to_lowercase();
        if query.is_empty() {
            return None;
        }

        if let Some(idx) = self.keys.iter().position(|k| *k == query) {
            return Some(&self.entries[idx]);
        }

        if query.chars().count() < MIN_PARTIAL_MATCH_LEN {
            return None;
        }
        let idx = self
            .keys
            .iter()
            .position(|k| k.contains(query.as_str()) || query.contains(k.as_str()))?;
        trace!(
            query = country,
            matched = self.entries[idx].country.as_str(),
            "Partial ranking match"
        );
        Some(&self.entries[idx])
    }

    /// The rank of a country, or the worst rank if it isn't listed.
    pub fn rank_of(&self, country: &str) -> u32 {
        self.find(country).map_or(self.worst_rank, |e| e.rank)
    }

    pub fn baseline_strength(&self) -> f64 {
        strength_for_rank(self.worst_rank, self.worst_rank)
    }
}

impl RankingProvider for RankingTable {
    fn strength(&self, team_name: &str, country: Option<&str>) -> StrengthLookup {
        let entry = country
            .and_then(|c| self.find(c))
            .or_else(|| self.find(team_name));
        match entry {
            Some(e) => StrengthLookup::Found(strength_for_rank(e.rank, self.worst_rank)),
            None => StrengthLookup::Baseline(self.baseline_strength()),
        }
    }
}

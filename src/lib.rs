#![deny(clippy::all)]
//! # cup_sim
//!
//! `cup_sim` is a library to simulate football tournaments. Teams get a
//! strength from a ranking table, matches are played with a Poisson goal
//! model, groups are ranked with the usual tie-break chain and qualifiers are
//! seeded into a single elimination bracket until a champion remains.
//!
//! ## Core
//!
//! The core module holds the plain data: [`core::Team`], [`core::Match`] and
//! the stage labels used to tag every match.
//!
//! ## Ranking
//!
//! The ranking module turns a ranking snapshot into team strengths. Country
//! names are normalized before lookup and unknown teams fall back to a
//! baseline strength instead of failing.
//!
//! ```
//! use cup_sim::ranking::{RankingEntry, RankingProvider, RankingTable};
//!
//! let table = RankingTable::new(vec![
//!     RankingEntry::new(1, "Argentina", 1867.25),
//!     RankingEntry::new(2, "France", 1859.78),
//!     RankingEntry::new(3, "Poland", 1530.0),
//! ]);
//!
//! // Aliases are collapsed before lookup.
//! let poland = table.strength("Polska", None);
//! assert!(poland.is_found());
//!
//! // Unknown teams get the baseline.
//! let unknown = table.strength("Atlantis", None);
//! assert!(!unknown.is_found());
//! ```
//!
//! ## Tournament
//!
//! The tournament module runs the whole competition. Build it with a
//! [`tournament::TournamentBuilder`], run it and inspect the
//! [`tournament::TournamentResult`].
//!
//! ```
//! use cup_sim::ranking::StrengthMap;
//! use cup_sim::tournament::TournamentBuilder;
//!
//! let strengths = StrengthMap::from_iter([
//!     ("Brazil", 95.0),
//!     ("Germany", 90.0),
//!     ("Japan", 70.0),
//!     ("Ghana", 55.0),
//! ]);
//!
//! let tournament = TournamentBuilder::new()
//!     .add_team_in_group("Brazil", "A")
//!     .add_team_in_group("Ghana", "A")
//!     .add_team_in_group("Germany", "B")
//!     .add_team_in_group("Japan", "B")
//!     .qualifiers_per_group(1)
//!     .rankings(strengths)
//!     .seed(7)
//!     .build()
//!     .unwrap();
//!
//! let result = tournament.run().unwrap();
//! assert_eq!(result.bracket().rounds().len(), 1);
//! println!("Champion: {}", result.team(result.champion()).name);
//! ```

/// Plain tournament data: teams, matches and stages.
pub mod core;
/// Team strength lookups from external rankings.
pub mod ranking;
/// Group stage, knockout and the tournament driver.
pub mod tournament;

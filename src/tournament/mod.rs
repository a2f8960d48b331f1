//! Tournament engine
//!
//! A tournament is played in two stages. Every group plays a single round
//! robin and is ranked by points, goal difference, goals scored, the
//! results between tied teams and finally seeding order. The best teams of
//! each group are then seeded into a single elimination bracket that is
//! played round by round until one champion is left.
//!
//! # Example
//!
//! ```
//! use cup_sim::ranking::StrengthMap;
//! use cup_sim::tournament::{TournamentBuilder, TournamentConfig};
//!
//! let strengths = StrengthMap::from_iter([
//!     ("Poland", 61.0),
//!     ("Germany", 88.0),
//!     ("Spain", 90.0),
//!     ("Brazil", 95.0),
//!     ("France", 93.0),
//!     ("England", 89.0),
//!     ("Japan", 72.0),
//!     ("Mexico", 70.0),
//! ]);
//!
//! // Eight teams drawn into two groups of four, the top two of each
//! // play the semi-finals.
//! let tournament = TournamentBuilder::new()
//!     .add_teams(["Polska", "Niemcy", "Hiszpania", "Brazylia"])
//!     .add_teams(["Francja", "Anglia", "Japonia", "Meksyk"])
//!     .config(TournamentConfig::default())
//!     .rankings(strengths)
//!     .seed(42)
//!     .build()
//!     .unwrap();
//!
//! let result = tournament.run().unwrap();
//! let stats = result.stats();
//! assert_eq!(stats.matches, 16);
//!
//! // Generate a markdown report
//! println!("{}", result.to_markdown());
//! ```

mod builder;
mod config;
mod error;
mod group;
mod knockout;
mod result;
mod runner;
mod simulator;
mod standings;
mod stats;

#[cfg(any(test, feature = "tournament-test-util"))]
pub mod test_util;

pub use builder::{TeamSpec, TournamentBuilder};
pub use config::TournamentConfig;
pub use error::{Result, TournamentError};
pub use group::{Group, GroupResult, GroupStage, select_qualifiers};
pub use knockout::{Bracket, KnockoutStage, Qualifier, Round, Tie};
pub use result::TournamentResult;
pub use runner::Tournament;
pub use simulator::{
    MAX_EXPECTED_GOALS, MIN_EXPECTED_GOALS, MIN_STRENGTH, MatchModel, MatchSimulator,
};
pub use standings::{
    POINTS_FOR_DRAW, POINTS_FOR_WIN, Standing, compute_standings, rank_standings,
};
pub use stats::{TeamSummary, TournamentStats};

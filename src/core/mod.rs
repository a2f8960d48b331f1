mod matches;
mod team;

pub use matches::{KnockoutRound, Match, Score, Stage};
pub use team::{Team, TeamId};

use std::fmt;

use super::TeamId;

/// Goals for each side of a match.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Score {
    pub home: u8,
    pub away: u8,
}

impl Score {
    pub fn new(home: u8, away: u8) -> Self {
        Self { home, away }
    }

    pub fn is_level(&self) -> bool {
        self.home == self.away
    }

    pub fn total(&self) -> u32 {
        u32::from(self.home) + u32::from(self.away)
    }

    /// The same score seen from the other side.
    pub fn swapped(&self) -> Self {
        Self {
            home: self.away,
            away: self.home,
        }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} : {}", self.home, self.away)
    }
}

/// Named knockout rounds.
///
/// Rounds are named after the number of teams still alive when the round
/// starts, so a sixteen team bracket starts with `RoundOf(16)`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnockoutRound {
    RoundOf(usize),
    QuarterFinal,
    SemiFinal,
    ThirdPlace,
    Final,
}

impl KnockoutRound {
    /// The round played by `num_teams` teams.
    pub fn for_teams(num_teams: usize) -> Self {
        match num_teams {
            2 => KnockoutRound::Final,
            4 => KnockoutRound::SemiFinal,
            8 => KnockoutRound::QuarterFinal,
            n => KnockoutRound::RoundOf(n),
        }
    }
}

impl fmt::Display for KnockoutRound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KnockoutRound::RoundOf(n) => write!(f, "Round of {}", n),
            KnockoutRound::QuarterFinal => write!(f, "Quarter-finals"),
            KnockoutRound::SemiFinal => write!(f, "Semi-finals"),
            KnockoutRound::ThirdPlace => write!(f, "Third place play-off"),
            KnockoutRound::Final => write!(f, "Final"),
        }
    }
}

/// Where in the tournament a match was played.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Stage {
    /// A round robin match inside the named group.
    Group(String),
    Knockout(KnockoutRound),
}

impl Stage {
    pub fn is_knockout(&self) -> bool {
        matches!(self, Stage::Knockout(_))
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Group(name) => write!(f, "Group {}", name),
            Stage::Knockout(round) => write!(f, "{}", round),
        }
    }
}

/// A played match.
///
/// `score` is the regulation time result. Knockout matches that were level
/// after ninety minutes can also carry the goals scored in extra time and
/// the penalty shootout result. Shootout goals never count as match goals.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    pub home: TeamId,
    pub away: TeamId,
    pub stage: Stage,
    pub score: Score,
    pub extra_time: Option<Score>,
    pub penalties: Option<Score>,
}

impl Match {
    pub fn new(home: TeamId, away: TeamId, stage: Stage, score: Score) -> Self {
        Self {
            home,
            away,
            stage,
            score,
            extra_time: None,
            penalties: None,
        }
    }

    /// Goals scored by the home side including extra time.
    pub fn home_goals(&self) -> u32 {
        u32::from(self.score.home) + self.extra_time.map_or(0, |s| u32::from(s.home))
    }

    /// Goals scored by the away side including extra time.
    pub fn away_goals(&self) -> u32 {
        u32::from(self.score.away) + self.extra_time.map_or(0, |s| u32::from(s.away))
    }

    pub fn total_goals(&self) -> u32 {
        self.home_goals() + self.away_goals()
    }

    pub fn involves(&self, team: TeamId) -> bool {
        self.home == team || self.away == team
    }

    /// Goals scored and conceded by `team`, or None if it didn't play.
    pub fn goals_for_against(&self, team: TeamId) -> Option<(u32, u32)> {
        if team == self.home {
            Some((self.home_goals(), self.away_goals()))
        } else if team == self.away {
            Some((self.away_goals(), self.home_goals()))
        } else {
            None
        }
    }

    /// The winner of the match. A level match with a shootout is decided
    /// by the shootout, a level match without one is a draw and has no
    /// winner.
    pub fn winner(&self) -> Option<TeamId> {
        let (home, away) = (self.home_goals(), self.away_goals());
        if home > away {
            Some(self.home)
        } else if away > home {
            Some(self.away)
        } else {
            match self.penalties {
                Some(p) if p.home > p.away => Some(self.home),
                Some(p) if p.away > p.home => Some(self.away),
                _ => None,
            }
        }
    }

    pub fn loser(&self) -> Option<TeamId> {
        self.winner()
            .map(|w| if w == self.home { self.away } else { self.home })
    }

    pub fn is_draw(&self) -> bool {
        self.winner().is_none()
    }

    /// One line description of the match given the names of both sides.
    pub fn summary(&self, home_name: &str, away_name: &str) -> String {
        let mut out = format!(
            "[{}] {} {} : {} {}",
            self.stage,
            home_name,
            self.home_goals(),
            self.away_goals(),
            away_name
        );
        if self.extra_time.is_some() {
            out.push_str(" (a.e.t.)");
        }
        if let Some(p) = self.penalties {
            out.push_str(&format!(" (pens {} - {})", p.home, p.away));
        }
        out
    }
}

#[cfg(feature = "serde")]
use std::path::Path;

use crate::core::{KnockoutRound, Match, Team, TeamId};

use super::config::TournamentConfig;
#[cfg(feature = "serde")]
use super::error::{Result, TournamentError};
use super::group::GroupResult;
use super::knockout::{Bracket, Qualifier};
use super::stats::TournamentStats;

/// Everything that happened in one tournament run
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct TournamentResult {
    /// Unique id of this run
    id: uuid::Uuid,
    /// The seed the run was played with. Running the same tournament with
    /// this seed replays it exactly.
    seed: u64,
    config: TournamentConfig,
    teams: Vec<Team>,
    groups: Vec<GroupResult>,
    qualifiers: Vec<Qualifier>,
    bracket: Bracket,
}

impl TournamentResult {
    pub(crate) fn new(
        seed: u64,
        config: TournamentConfig,
        teams: Vec<Team>,
        groups: Vec<GroupResult>,
        qualifiers: Vec<Qualifier>,
        bracket: Bracket,
    ) -> Self {
        Self {
            id: uuid::Uuid::now_v7(),
            seed,
            config,
            teams,
            groups,
            qualifiers,
            bracket,
        }
    }

    pub fn id(&self) -> uuid::Uuid {
        self.id
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn config(&self) -> &TournamentConfig {
        &self.config
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    /// Look up a team of this tournament.
    ///
    /// # Panics
    ///
    /// Panics if `id` isn't a team of this tournament. Every id found in
    /// the result is.
    pub fn team(&self, id: TeamId) -> &Team {
        &self.teams[id.index()]
    }

    pub fn team_by_name(&self, name: &str) -> Option<&Team> {
        self.teams.iter().find(|t| t.name == name)
    }

    pub fn groups(&self) -> &[GroupResult] {
        &self.groups
    }

    pub fn group(&self, name: &str) -> Option<&GroupResult> {
        self.groups.iter().find(|g| g.name == name)
    }

    /// Teams that reached the knockout stage, by seed.
    pub fn qualifiers(&self) -> &[Qualifier] {
        &self.qualifiers
    }

    pub fn bracket(&self) -> &Bracket {
        &self.bracket
    }

    pub fn champion(&self) -> TeamId {
        self.bracket.champion()
    }

    pub fn runner_up(&self) -> Option<TeamId> {
        self.bracket.runner_up()
    }

    /// Winner of the third place play-off, if it was played.
    pub fn third_place(&self) -> Option<TeamId> {
        self.bracket.third()
    }

    /// Every match in the order it was played, groups first.
    pub fn all_matches(&self) -> Vec<&Match> {
        self.groups
            .iter()
            .flat_map(|g| g.matches.iter())
            .chain(self.bracket.matches())
            .collect()
    }

    /// Matches played by one team.
    pub fn matches_of(&self, team: TeamId) -> Vec<&Match> {
        self.all_matches()
            .into_iter()
            .filter(|m| m.involves(team))
            .collect()
    }

    /// Final placing of a team.
    ///
    /// 1 for the champion and 2 for the runner-up. With a third place
    /// play-off its winner is 3 and its loser 4, otherwise both losing
    /// semi-finalists share 3. Teams knocked out earlier share the first
    /// place below the teams still alive after their round, so quarter-final
    /// losers are all 5. Teams that went out in the group stage have no
    /// placing.
    pub fn final_position(&self, team: TeamId) -> Option<usize> {
        if team == self.bracket.champion() {
            return Some(1);
        }
        if Some(team) == self.bracket.runner_up() {
            return Some(2);
        }
        if let Some(third) = self.bracket.third_place() {
            if team == third.winner {
                return Some(3);
            }
            if team == third.loser() {
                return Some(4);
            }
        }
        self.bracket
            .eliminated_in(team)
            .and_then(teams_in_round)
            .map(|teams| teams / 2 + 1)
    }

    pub fn stats(&self) -> TournamentStats {
        TournamentStats::from_result(self)
    }

    /// Format the result as Markdown
    pub fn to_markdown(&self) -> String {
        let mut output = String::new();

        output.push_str("# Tournament Results\n\n");

        output.push_str("## Configuration\n\n");
        output.push_str(&format!("- **Teams**: {}\n", self.teams.len()));
        output.push_str(&format!("- **Groups**: {}\n", self.groups.len()));
        output.push_str(&format!(
            "- **Qualifiers per Group**: {}\n",
            self.config.qualifiers_per_group
        ));
        if self.config.best_placed_qualifiers > 0 {
            output.push_str(&format!(
                "- **Best Placed Qualifiers**: {}\n",
                self.config.best_placed_qualifiers
            ));
        }
        output.push_str(&format!("- **Random Seed**: {}\n", self.seed));
        output.push_str(&format!("- **Run Id**: {}\n", self.id));
        output.push('\n');

        output.push_str("## Podium\n\n");
        output.push_str(&format!(
            "1. **{}**\n",
            self.team(self.champion()).name
        ));
        if let Some(runner_up) = self.runner_up() {
            output.push_str(&format!("2. {}\n", self.team(runner_up).name));
        }
        if let Some(third) = self.third_place() {
            output.push_str(&format!("3. {}\n", self.team(third).name));
        }
        output.push('\n');

        output.push_str("## Group Stage\n\n");
        for group in &self.groups {
            output.push_str(&format!("### Group {}\n\n", group.name));
            output.push_str("| # | Team | P | W | D | L | GF | GA | GD | Pts |\n");
            output.push_str("|---|------|---|---|---|---|----|----|----|-----|\n");
            for (pos, s) in group.standings.iter().enumerate() {
                output.push_str(&format!(
                    "| {} | {} | {} | {} | {} | {} | {} | {} | {:+} | {} |\n",
                    pos + 1,
                    self.team(s.team).name,
                    s.played,
                    s.won,
                    s.drawn,
                    s.lost,
                    s.goals_for,
                    s.goals_against,
                    s.goal_difference(),
                    s.points()
                ));
            }
            output.push('\n');
            for m in &group.matches {
                output.push_str(&format!("- {}\n", self.describe(m)));
            }
            output.push('\n');
        }

        output.push_str("## Knockout Stage\n\n");
        for m in self.bracket.matches() {
            output.push_str(&format!("- {}\n", self.describe(m)));
        }
        output.push('\n');

        let stats = self.stats();
        output.push_str("## Statistics\n\n");
        output.push_str("| Metric | Value |\n");
        output.push_str("|--------|-------|\n");
        output.push_str(&format!("| Matches | {} |\n", stats.matches));
        output.push_str(&format!("| Goals | {} |\n", stats.total_goals));
        output.push_str(&format!(
            "| Goals per Match | {:.2} |\n",
            stats.average_goals
        ));
        output.push_str(&format!("| Draws | {} |\n", stats.draws));
        output.push_str(&format!("| Extra Time | {} |\n", stats.extra_time));
        output.push_str(&format!("| Penalty Shootouts | {} |\n", stats.shootouts));
        if let Some(m) = &stats.biggest_win {
            output.push_str(&format!("| Biggest Win | {} |\n", self.describe(m)));
        }

        output
    }

    fn describe(&self, m: &Match) -> String {
        m.summary(&self.team(m.home).name, &self.team(m.away).name)
    }

    /// Serialize the full result to JSON
    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(TournamentError::from)
    }

    /// Save `result.json`, `summary.json` and `summary.md` to a directory
    #[cfg(feature = "serde")]
    pub fn save_to_dir(&self, output_dir: &Path) -> Result<()> {
        std::fs::create_dir_all(output_dir)?;

        std::fs::write(output_dir.join("result.json"), self.to_json()?)?;

        let summary = serde_json::to_string_pretty(&self.stats())?;
        std::fs::write(output_dir.join("summary.json"), summary)?;

        std::fs::write(output_dir.join("summary.md"), self.to_markdown())?;

        Ok(())
    }
}

fn teams_in_round(round: KnockoutRound) -> Option<usize> {
    match round {
        KnockoutRound::RoundOf(n) => Some(n),
        KnockoutRound::QuarterFinal => Some(8),
        KnockoutRound::SemiFinal => Some(4),
        KnockoutRound::Final => Some(2),
        KnockoutRound::ThirdPlace => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranking::StrengthMap;
    use crate::tournament::TournamentBuilder;
    use crate::tournament::test_util::{StrongerWins, assert_valid_tournament};

    fn eight_team_result(third_place: bool) -> TournamentResult {
        let strengths = StrengthMap::from_iter([
            ("Brazil", 95.0),
            ("Ghana", 55.0),
            ("Serbia", 70.0),
            ("Cameroon", 50.0),
            ("France", 92.0),
            ("Denmark", 80.0),
            ("Tunisia", 45.0),
            ("Australia", 60.0),
        ]);
        TournamentBuilder::new()
            .add_team_in_group("Brazil", "A")
            .add_team_in_group("Ghana", "A")
            .add_team_in_group("Serbia", "A")
            .add_team_in_group("Cameroon", "A")
            .add_team_in_group("France", "B")
            .add_team_in_group("Denmark", "B")
            .add_team_in_group("Tunisia", "B")
            .add_team_in_group("Australia", "B")
            .rankings(strengths)
            .third_place_playoff(third_place)
            .seed(99)
            .build()
            .unwrap()
            .run_with(&StrongerWins)
            .unwrap()
    }

    #[test]
    fn test_final_positions() {
        let result = eight_team_result(true);
        assert_valid_tournament(&result);
        let pos = |name: &str| result.final_position(result.team_by_name(name).unwrap().id);

        // A1 Brazil, A2 Serbia, B1 France, B2 Denmark. Brazil v Denmark and
        // France v Serbia in the semi-finals.
        assert_eq!(pos("Brazil"), Some(1));
        assert_eq!(pos("France"), Some(2));
        assert_eq!(pos("Denmark"), Some(3));
        assert_eq!(pos("Serbia"), Some(4));
        assert_eq!(pos("Ghana"), None);
    }

    #[test]
    fn test_semi_final_losers_share_third_without_playoff() {
        let result = eight_team_result(false);
        let pos = |name: &str| result.final_position(result.team_by_name(name).unwrap().id);
        assert_eq!(pos("Denmark"), Some(3));
        assert_eq!(pos("Serbia"), Some(3));
        assert!(result.third_place().is_none());
    }

    #[test]
    fn test_all_matches_in_order() {
        let result = eight_team_result(true);
        let matches = result.all_matches();
        // Two groups of six, two semi-finals, third place and the final.
        assert_eq!(matches.len(), 16);
        assert!(!matches[11].stage.is_knockout());
        assert!(matches[12].stage.is_knockout());
        assert_eq!(matches[15].stage.to_string(), "Final");
        assert_eq!(result.matches_of(result.champion()).len(), 5);
    }

    #[test]
    fn test_to_markdown() {
        let result = eight_team_result(true);
        let markdown = result.to_markdown();
        assert!(markdown.contains("# Tournament Results"));
        assert!(markdown.contains("1. **Brazil**"));
        assert!(markdown.contains("### Group A"));
        assert!(markdown.contains("### Group B"));
        assert!(markdown.contains("[Final] Brazil 1 : 0 France"));
        assert!(markdown.contains("| Matches | 16 |"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_json_round_trip() {
        let result = eight_team_result(true);
        let json = result.to_json().unwrap();
        let back: TournamentResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id(), result.id());
        assert_eq!(back.seed(), 99);
        assert_eq!(back.teams(), result.teams());
        assert_eq!(back.groups(), result.groups());
        assert_eq!(back.bracket(), result.bracket());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_save_to_dir() {
        let result = eight_team_result(true);
        let dir = tempfile::TempDir::new().unwrap();
        let out = dir.path().join("run");
        result.save_to_dir(&out).unwrap();
        assert!(out.join("result.json").exists());
        assert!(out.join("summary.md").exists());

        let summary = std::fs::read_to_string(out.join("summary.json")).unwrap();
        let stats: TournamentStats = serde_json::from_str(&summary).unwrap();
        assert_eq!(stats.total_goals, result.stats().total_goals);
    }
}

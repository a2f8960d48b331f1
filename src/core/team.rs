use std::fmt;

/// Index of a team inside a tournament.
///
/// Every match, standing and tie refers to teams by id so the
/// tournament owns the only copy of each [`Team`].
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TeamId(pub usize);

impl TeamId {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A team taking part in a tournament.
///
/// The strength is resolved once from a ranking provider when the
/// tournament is built and never changes afterwards.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Team {
    pub id: TeamId,
    /// Display name as given by the caller.
    pub name: String,
    /// Country used for the ranking lookup, in canonical spelling.
    pub country: String,
    /// Strength score, higher is better.
    pub strength: f64,
    /// Name of the group the team was drawn into, if any.
    pub group: Option<String>,
}

impl Team {
    pub fn new(id: TeamId, name: impl Into<String>, strength: f64) -> Self {
        let name = name.into();
        Self {
            id,
            country: name.clone(),
            name,
            strength,
            group: None,
        }
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = country.into();
        self
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (strength {:.1})", self.name, self.strength)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_team_uses_name_as_country() {
        let team = Team::new(TeamId(3), "Poland", 82.5);
        assert_eq!(team.country, "Poland");
        assert_eq!(team.id.index(), 3);
        assert!(team.group.is_none());
    }

    #[test]
    fn test_builder_style_setters() {
        let team = Team::new(TeamId(0), "Les Bleus", 90.0)
            .with_country("France")
            .with_group("C");
        assert_eq!(team.name, "Les Bleus");
        assert_eq!(team.country, "France");
        assert_eq!(team.group.as_deref(), Some("C"));
    }

    #[test]
    fn test_display() {
        let team = Team::new(TeamId(1), "Brazil", 95.0);
        assert_eq!(team.to_string(), "Brazil (strength 95.0)");
    }
}

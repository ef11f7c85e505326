//! Players, teams, and the read-only roster snapshots fed into a simulation.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{
    ATTRIBUTE_SCALE, DEFAULT_OPTIONAL_ATTRIBUTE, WEIGHT_ADAPTABILITY, WEIGHT_CONSISTENCY,
    WEIGHT_FORM, WEIGHT_GAME_KNOWLEDGE, WEIGHT_MECHANICAL, WEIGHT_TEAM_COMMUNICATION,
};

/// Stable player identity (account key, mint, or any opaque string).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub String);

impl PlayerId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stable team identity.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(pub String);

impl TeamId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which side of a match a team plays on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TeamSide {
    #[serde(rename = "teamA")]
    A,
    #[serde(rename = "teamB")]
    B,
}

impl TeamSide {
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }
}

impl fmt::Display for TeamSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => write!(f, "team A"),
            Self::B => write!(f, "team B"),
        }
    }
}

/// In-game role of a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Top,
    Jungle,
    Mid,
    Carry,
    Support,
    #[default]
    Other,
}

impl Position {
    /// Parse a free-text roster label such as `"AD Carry"` or `"Mid Laner"`.
    ///
    /// Unrecognized labels resolve to [`Position::Other`].
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        let lower = label.trim().to_ascii_lowercase();
        if lower.contains("carry") || lower == "adc" || lower.contains("marksman") {
            Self::Carry
        } else if lower.contains("mid") {
            Self::Mid
        } else if lower.contains("jungle") {
            Self::Jungle
        } else if lower.contains("support") || lower == "sup" {
            Self::Support
        } else if lower.contains("top") {
            Self::Top
        } else {
            Self::Other
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Top => "Top Laner",
            Self::Jungle => "Jungler",
            Self::Mid => "Mid Laner",
            Self::Carry => "AD Carry",
            Self::Support => "Support",
            Self::Other => "Flex",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Rated player attributes, conventionally in `[0, 100]`.
///
/// Values are not validated here; input layers are expected to clamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerAttributes {
    pub mechanical: f64,
    pub game_knowledge: f64,
    pub team_communication: f64,
    #[serde(default)]
    pub adaptability: Option<f64>,
    pub consistency: f64,
    #[serde(default)]
    pub form: Option<f64>,
}

impl PlayerAttributes {
    /// Every attribute set to the same value.
    #[must_use]
    pub const fn uniform(value: f64) -> Self {
        Self {
            mechanical: value,
            game_knowledge: value,
            team_communication: value,
            adaptability: Some(value),
            consistency: value,
            form: Some(value),
        }
    }

    #[must_use]
    pub fn adaptability_or_default(&self) -> f64 {
        self.adaptability.unwrap_or(DEFAULT_OPTIONAL_ATTRIBUTE)
    }

    #[must_use]
    pub fn form_or_default(&self) -> f64 {
        self.form.unwrap_or(DEFAULT_OPTIONAL_ATTRIBUTE)
    }

    /// Weighted rating on the attribute scale (0..=100 for in-range inputs).
    #[must_use]
    pub fn weighted_rating(&self) -> f64 {
        self.mechanical * WEIGHT_MECHANICAL
            + self.game_knowledge * WEIGHT_GAME_KNOWLEDGE
            + self.team_communication * WEIGHT_TEAM_COMMUNICATION
            + self.adaptability_or_default() * WEIGHT_ADAPTABILITY
            + self.consistency * WEIGHT_CONSISTENCY
            + self.form_or_default() * WEIGHT_FORM
    }

    /// Weighted rating normalized to `0..=1`.
    #[must_use]
    pub fn normalized_rating(&self) -> f64 {
        self.weighted_rating() / ATTRIBUTE_SCALE
    }
}

impl Default for PlayerAttributes {
    fn default() -> Self {
        Self::uniform(DEFAULT_OPTIONAL_ATTRIBUTE)
    }
}

/// A player snapshot as supplied by the roster provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    #[serde(default)]
    pub position: Position,
    pub attributes: PlayerAttributes,
}

impl Player {
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        position: Position,
        attributes: PlayerAttributes,
    ) -> Self {
        Self {
            id: PlayerId::new(id),
            name: name.into(),
            position,
            attributes,
        }
    }

    #[must_use]
    pub fn to_ref(&self) -> PlayerRef {
        PlayerRef {
            id: self.id.clone(),
            name: self.name.clone(),
            position: self.position,
        }
    }
}

/// Lightweight reference to a player, used for MVP slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRef {
    pub id: PlayerId,
    pub name: String,
    pub position: Position,
}

/// A team snapshot as supplied by the roster provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    /// Historical cohesion, 0..=100.
    pub synergy_score: f64,
    #[serde(default)]
    pub roster: Vec<PlayerId>,
}

impl Team {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, synergy_score: f64) -> Self {
        Self {
            id: TeamId::new(id),
            name: name.into(),
            synergy_score,
            roster: Vec::new(),
        }
    }

    /// Attach roster membership from the given players.
    #[must_use]
    pub fn with_roster(mut self, players: &[Player]) -> Self {
        self.roster = players.iter().map(|p| p.id.clone()).collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_labels_resolve_to_roles() {
        assert_eq!(Position::from_label("AD Carry"), Position::Carry);
        assert_eq!(Position::from_label("Mid Laner"), Position::Mid);
        assert_eq!(Position::from_label("Jungler"), Position::Jungle);
        assert_eq!(Position::from_label("support"), Position::Support);
        assert_eq!(Position::from_label("Top Laner"), Position::Top);
        assert_eq!(Position::from_label("Coach"), Position::Other);
        assert_eq!(Position::from_label(""), Position::Other);
    }

    #[test]
    fn missing_optional_attributes_default_to_fifty() {
        let attrs = PlayerAttributes {
            mechanical: 80.0,
            game_knowledge: 80.0,
            team_communication: 80.0,
            adaptability: None,
            consistency: 80.0,
            form: None,
        };
        assert!((attrs.adaptability_or_default() - 50.0).abs() < f64::EPSILON);
        let expected = 80.0 * 0.80 + 50.0 * 0.20;
        assert!((attrs.weighted_rating() - expected).abs() < 1e-9);
    }

    #[test]
    fn uniform_rating_matches_value() {
        let attrs = PlayerAttributes::uniform(70.0);
        assert!((attrs.weighted_rating() - 70.0).abs() < 1e-9);
        assert!((attrs.normalized_rating() - 0.7).abs() < 1e-9);
    }

    #[test]
    fn player_deserializes_with_defaults() {
        let json = r#"{
            "id": "p1",
            "name": "Faker",
            "attributes": {
                "mechanical": 90,
                "game_knowledge": 95,
                "team_communication": 85,
                "consistency": 88
            }
        }"#;
        let player: Player = serde_json::from_str(json).unwrap();
        assert_eq!(player.position, Position::Other);
        assert!(player.attributes.form.is_none());
        assert_eq!(player.id.as_str(), "p1");
    }

    #[test]
    fn team_side_serializes_like_wire_names() {
        assert_eq!(serde_json::to_string(&TeamSide::A).unwrap(), "\"teamA\"");
        assert_eq!(TeamSide::B.opponent(), TeamSide::A);
    }
}

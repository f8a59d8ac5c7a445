//! League and entity-type tags shared by every layer of the client.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AsaError;
use crate::utils::naming::pluralize;

/// Leagues served by the ASA API
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum League {
    NWSL,
    MLS,
    USLC,
    USL1,
    NASL,
}

impl League {
    /// All leagues, in the order the API documents them
    pub const ALL: [League; 5] = [
        League::NWSL,
        League::MLS,
        League::USLC,
        League::USL1,
        League::NASL,
    ];

    /// Path segment used in request URLs
    pub fn as_str(&self) -> &'static str {
        match self {
            League::NWSL => "nwsl",
            League::MLS => "mls",
            League::USLC => "uslc",
            League::USL1 => "usl1",
            League::NASL => "nasl",
        }
    }
}

impl fmt::Display for League {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for League {
    type Err = AsaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        League::ALL
            .iter()
            .copied()
            .find(|l| l.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                AsaError::Validation(format!(
                    "leagues must be one of {}, got {}",
                    League::ALL.map(|l| l.as_str()).join(", "),
                    s
                ))
            })
    }
}

/// Kinds of entity that have their own collection endpoint
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Player,
    Manager,
    Stadium,
    Referee,
    Team,
}

impl EntityType {
    pub const ALL: [EntityType; 5] = [
        EntityType::Player,
        EntityType::Manager,
        EntityType::Stadium,
        EntityType::Referee,
        EntityType::Team,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Player => "player",
            EntityType::Manager => "manager",
            EntityType::Stadium => "stadium",
            EntityType::Referee => "referee",
            EntityType::Team => "team",
        }
    }

    /// Collection name, e.g. `players` or `stadia`
    pub fn plural(&self) -> String {
        pluralize(self.as_str())
    }

    /// Record field holding the display name (`player_name`)
    pub fn name_field(&self) -> String {
        format!("{}_name", self.as_str())
    }

    /// Record field holding the canonical id (`player_id`)
    pub fn id_field(&self) -> String {
        format!("{}_id", self.as_str())
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw record returned by the API. Fields are passed through untouched.
pub type EntityRecord = serde_json::Map<String, serde_json::Value>;

/// Ids resolved for one league.
///
/// Serializes as `{"league": "mls", "players": ["..."]}`, with the list keyed
/// by the plural entity type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeagueIds {
    pub league: League,
    pub entity_type: EntityType,
    pub ids: Vec<String>,
}

impl LeagueIds {
    pub fn empty(league: League, entity_type: EntityType) -> Self {
        Self {
            league,
            entity_type,
            ids: Vec::new(),
        }
    }

    /// JSON form with the id list under the plural entity key
    pub fn to_json(&self) -> serde_json::Value {
        let mut obj = serde_json::Map::new();
        obj.insert(
            "league".to_string(),
            serde_json::Value::String(self.league.as_str().to_string()),
        );
        obj.insert(
            self.entity_type.plural(),
            serde_json::Value::from(self.ids.clone()),
        );
        serde_json::Value::Object(obj)
    }
}

impl Serialize for LeagueIds {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_league_parse_case_insensitive() {
        assert_eq!("MLS".parse::<League>().unwrap(), League::MLS);
        assert_eq!(" nwsl ".parse::<League>().unwrap(), League::NWSL);
    }

    #[test]
    fn test_league_parse_unknown() {
        let err = "la liga".parse::<League>().unwrap_err();
        assert!(matches!(err, AsaError::Validation(_)));
        assert!(err
            .to_string()
            .contains("nwsl, mls, uslc, usl1, nasl, got la liga"));
    }

    #[test]
    fn test_entity_fields() {
        assert_eq!(EntityType::Player.name_field(), "player_name");
        assert_eq!(EntityType::Stadium.id_field(), "stadium_id");
        assert_eq!(EntityType::Stadium.plural(), "stadia");
    }

    #[test]
    fn test_league_ids_json_shape() {
        let ids = LeagueIds {
            league: League::MLS,
            entity_type: EntityType::Player,
            ids: vec!["a".to_string()],
        };
        assert_eq!(
            serde_json::to_value(&ids).unwrap(),
            serde_json::json!({"league": "mls", "players": ["a"]})
        );
    }
}

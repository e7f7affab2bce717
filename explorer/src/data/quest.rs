use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use super::poi::{Coordinate, POI};

/// Quest identifier. Upstream records use either integer or string keys,
/// both are normalised to a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct QuestId(String);

impl QuestId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for QuestId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Int(i64),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Int(n) => QuestId(n.to_string()),
            RawId::Text(s) => QuestId(s),
        })
    }
}

impl From<&str> for QuestId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<u64> for QuestId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for QuestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A point of interest with an experience reward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quest {
    pub id: QuestId,
    #[serde(alias = "title")]
    pub name: String,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
    #[serde(default)]
    pub xp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rarity: Option<String>,
}

impl Quest {
    pub fn new(id: impl Into<QuestId>, name: impl Into<String>, lat: f64, lng: f64, xp: i64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            lat: Some(lat),
            lng: Some(lng),
            xp,
            description: None,
            kind: None,
            rarity: None,
        }
    }

    /// A quest with no map position. It can never be discovered.
    pub fn unplaced(id: impl Into<QuestId>, name: impl Into<String>, xp: i64) -> Self {
        Self {
            lat: None,
            lng: None,
            ..Self::new(id, name, 0.0, 0.0, xp)
        }
    }

    /// Both axes must be present and finite.
    pub fn location(&self) -> Option<Coordinate> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) if lat.is_finite() && lng.is_finite() => {
                Some(Coordinate::new(lat, lng))
            }
            _ => None,
        }
    }

    pub fn is_placed(&self) -> bool {
        self.location().is_some()
    }

    pub fn popup_text(&self) -> String {
        format!("{}\n+{} XP", self.name, self.xp)
    }
}

impl POI for Quest {
    fn get_coordinate(&self) -> Option<Coordinate> {
        self.location()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_popup_text() {
        let quest = Quest::new("a", "Virupaksha Temple", 15.335, 76.46, 50);
        assert_eq!(quest.popup_text(), "Virupaksha Temple\n+50 XP");
    }

    #[test]
    fn test_location_requires_both_axes() {
        let mut quest = Quest::new(1u64, "Half placed", 15.0, 76.0, 10);
        assert!(quest.is_placed());
        quest.lng = None;
        assert!(quest.location().is_none());
        quest.lng = Some(f64::INFINITY);
        assert!(quest.location().is_none());
    }

    #[test]
    fn test_deserialize_admin_record() {
        let json = r#"{"id": 7, "title": "Stepwell", "lat": null, "lng": 76.4, "xp": 120, "type": "discovery", "rarity": "rare"}"#;
        let quest: Quest = serde_json::from_str(json).unwrap();
        assert_eq!(quest.id, QuestId::new("7"));
        assert_eq!(quest.name, "Stepwell");
        assert_eq!(quest.kind.as_deref(), Some("discovery"));
        assert!(!quest.is_placed());
    }

    #[test]
    fn test_string_ids_kept() {
        let json = r#"{"id": "b2c1", "name": "Lotus Mahal", "lat": 15.3198, "lng": 76.471}"#;
        let quest: Quest = serde_json::from_str(json).unwrap();
        assert_eq!(quest.id.as_str(), "b2c1");
        assert_eq!(quest.xp, 0);
    }
}

//! Playable leader characters and their resource modifiers.

use serde::{Deserialize, Serialize};

use crate::resources::{ResourceKind, ResourceSet};

const DEFAULT_CHARACTER_DATA: &str = include_str!("../assets/data/characters.json");

const fn default_factor() -> f32 {
    1.0
}

/// Multiplicative scaling applied to raw option deltas, per resource.
/// Unspecified factors default to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CharacterMods {
    #[serde(default = "default_factor")]
    pub popularity: f32,
    #[serde(default = "default_factor")]
    pub stability: f32,
    #[serde(default = "default_factor")]
    pub media: f32,
    #[serde(default = "default_factor")]
    pub economy: f32,
}

impl Default for CharacterMods {
    fn default() -> Self {
        Self {
            popularity: 1.0,
            stability: 1.0,
            media: 1.0,
            economy: 1.0,
        }
    }
}

impl CharacterMods {
    #[must_use]
    pub const fn factor(&self, kind: ResourceKind) -> f32 {
        match kind {
            ResourceKind::Popularity => self.popularity,
            ResourceKind::Stability => self.stability,
            ResourceKind::Media => self.media,
            ResourceKind::Economy => self.economy,
        }
    }
}

/// A playable leader. Selected once per session; immutable thereafter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub id: String,
    pub name: String,
    pub desc: String,
    #[serde(default)]
    pub start: ResourceSet,
    #[serde(default)]
    pub mods: CharacterMods,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
struct CharacterNoId {
    pub name: String,
    pub desc: String,
    #[serde(default)]
    pub start: ResourceSet,
    #[serde(default)]
    pub mods: CharacterMods,
}

impl Character {
    fn with_id(id: String, c: CharacterNoId) -> Self {
        Self {
            id,
            name: c.name,
            desc: c.desc,
            start: c.start,
            mods: c.mods,
        }
    }
}

/// Roster of selectable characters, in fixed display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CharacterList(pub Vec<Character>);

impl CharacterList {
    #[must_use]
    pub const fn empty() -> Self {
        Self(vec![])
    }

    /// Load characters from an id-keyed JSON map.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into valid character data.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let map: std::collections::HashMap<String, CharacterNoId> = serde_json::from_str(json)?;
        let order = ["populist", "technocrat", "general", "celebrity", "insider"];
        let mut v = Vec::with_capacity(order.len());
        for id in order {
            if let Some(c) = map.get(id) {
                v.push(Character::with_id(id.to_string(), c.clone()));
            }
        }
        Ok(Self(v))
    }

    /// Load the bundled character roster.
    #[must_use]
    pub fn load_from_static() -> Self {
        Self::from_json(DEFAULT_CHARACTER_DATA).unwrap_or_default()
    }

    #[must_use]
    pub fn get_by_id(&self, id: &str) -> Option<&Character> {
        self.0.iter().find(|c| c.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Character> {
        self.0.iter()
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a CharacterList {
    type Item = &'a Character;
    type IntoIter = std::slice::Iter<'a, Character>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn character_json_parsing_defaults_mods() {
        let json = r#"{
            "technocrat": {
                "name": "The Technocrat",
                "desc": "Spreadsheets.",
                "start": { "popularity": 40, "stability": 60, "media": 45, "economy": 65 },
                "mods": { "economy": 1.3, "media": 0.8 }
            }
        }"#;

        let roster = CharacterList::from_json(json).unwrap();
        assert_eq!(roster.len(), 1);

        let technocrat = roster.get_by_id("technocrat").unwrap();
        assert_eq!(technocrat.start.economy, 65);
        assert!((technocrat.mods.factor(ResourceKind::Economy) - 1.3).abs() < f32::EPSILON);
        assert!(
            (technocrat.mods.factor(ResourceKind::Popularity) - 1.0).abs() < f32::EPSILON,
            "unspecified factor defaults to 1.0"
        );
    }

    #[test]
    fn roster_orders_and_filters_entries() {
        let json = r#"{
            "celebrity": { "name": "C", "desc": "d" },
            "populist": { "name": "P", "desc": "d" },
            "unknown": { "name": "U", "desc": "d" }
        }"#;

        let roster = CharacterList::from_json(json).unwrap();
        let ids: Vec<_> = roster.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["populist", "celebrity"]);
        assert!(roster.get_by_id("unknown").is_none());
    }

    #[test]
    fn bundled_roster_loads_with_valid_starts() {
        let roster = CharacterList::load_from_static();
        assert!(!roster.is_empty());
        for character in &roster {
            let s = character.start;
            for value in [s.popularity, s.stability, s.media, s.economy] {
                assert!((0..=100).contains(&value), "{} start invalid", character.id);
            }
        }
    }
}

//! Celestial catalog: the names the telescope understands

use serde::{Deserialize, Serialize};
use std::fmt;

/// A solar-system body the ephemeris can place
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Body {
    Sun,
    Moon,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
}

impl Body {
    pub const ALL: [Body; 9] = [
        Body::Sun,
        Body::Moon,
        Body::Mercury,
        Body::Venus,
        Body::Mars,
        Body::Jupiter,
        Body::Saturn,
        Body::Uranus,
        Body::Neptune,
    ];

    /// Lower-case key used in the catalog and in elements files
    pub fn key(&self) -> &'static str {
        match self {
            Body::Sun => "sun",
            Body::Moon => "moon",
            Body::Mercury => "mercury",
            Body::Venus => "venus",
            Body::Mars => "mars",
            Body::Jupiter => "jupiter",
            Body::Saturn => "saturn",
            Body::Uranus => "uranus",
            Body::Neptune => "neptune",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Body::Sun => "Sun",
            Body::Moon => "Moon",
            Body::Mercury => "Mercury",
            Body::Venus => "Venus",
            Body::Mars => "Mars",
            Body::Jupiter => "Jupiter",
            Body::Saturn => "Saturn",
            Body::Uranus => "Uranus",
            Body::Neptune => "Neptune",
        }
    }

    pub fn from_key(key: &str) -> Option<Body> {
        Body::ALL.iter().copied().find(|b| b.key() == key)
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Ordered name → body map. Order decides which name wins when several appear in
/// one utterance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CelestialCatalog {
    entries: Vec<(String, Body)>,
}

impl Default for CelestialCatalog {
    fn default() -> Self {
        Self::new(
            [
                Body::Moon,
                Body::Sun,
                Body::Mars,
                Body::Jupiter,
                Body::Saturn,
                Body::Venus,
                Body::Mercury,
                Body::Uranus,
                Body::Neptune,
            ]
            .into_iter()
            .map(|b| (b.key().to_string(), b)),
        )
    }
}

impl CelestialCatalog {
    /// Build a catalog; names are stored lower-cased and later duplicates ignored
    pub fn new(entries: impl IntoIterator<Item = (String, Body)>) -> Self {
        let mut kept: Vec<(String, Body)> = Vec::new();
        for (name, body) in entries {
            let name = name.trim().to_lowercase();
            if name.is_empty() || kept.iter().any(|(n, _)| *n == name) {
                continue;
            }
            kept.push((name, body));
        }
        Self { entries: kept }
    }

    /// Exact lookup of a normalized name
    pub fn lookup(&self, name: &str) -> Option<Body> {
        let name = name.trim().to_lowercase();
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, b)| *b)
    }

    /// First catalog name (in catalog order) contained in `text`
    pub fn find_in(&self, text: &str) -> Option<(&str, Body)> {
        let text = text.to_lowercase();
        self.entries
            .iter()
            .find(|(n, _)| text.contains(n.as_str()))
            .map(|(n, b)| (n.as_str(), *b))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_order() {
        let catalog = CelestialCatalog::default();
        let names: Vec<&str> = catalog.names().collect();
        assert_eq!(
            names,
            vec!["moon", "sun", "mars", "jupiter", "saturn", "venus", "mercury", "uranus", "neptune"]
        );
    }

    #[test]
    fn test_find_in_respects_order() {
        let catalog = CelestialCatalog::default();
        // "mars" appears first in the text but "moon" precedes it in the catalog
        let hit = catalog.find_in("mars or the moon");
        assert_eq!(hit, Some(("moon", Body::Moon)));
        assert_eq!(catalog.find_in("Show me SATURN"), Some(("saturn", Body::Saturn)));
        assert_eq!(catalog.find_in("pluto"), None);
    }

    #[test]
    fn test_lookup_normalizes() {
        let catalog = CelestialCatalog::default();
        assert_eq!(catalog.lookup("  Jupiter "), Some(Body::Jupiter));
        assert_eq!(catalog.lookup("pluto"), None);
    }

    #[test]
    fn test_custom_catalog_aliases() {
        let catalog = CelestialCatalog::new(vec![
            ("red planet".to_string(), Body::Mars),
            ("Red Planet".to_string(), Body::Jupiter),
        ]);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.lookup("red planet"), Some(Body::Mars));
    }
}

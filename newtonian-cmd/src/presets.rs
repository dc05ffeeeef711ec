//! Named pointing presets

use serde::{Deserialize, Serialize};

/// A trigger phrase and the direction it stands for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    pub trigger: String,
    pub label: String,
    pub azimuth: f64,
    pub elevation: f64,
}

impl Preset {
    pub fn new(trigger: &str, label: &str, azimuth: f64, elevation: f64) -> Self {
        Self {
            trigger: trigger.to_lowercase(),
            label: label.to_string(),
            azimuth,
            elevation,
        }
    }
}

/// Ordered preset table; the first trigger found in the text wins
#[derive(Debug, Clone, PartialEq)]
pub struct PresetTable {
    presets: Vec<Preset>,
}

impl Default for PresetTable {
    fn default() -> Self {
        Self::new(vec![
            Preset::new("polaris", "Polaris", 0.0, 45.0),
            Preset::new("north star", "the North Star", 0.0, 45.0),
            Preset::new("zenith", "the zenith", 0.0, 90.0),
            Preset::new("straight up", "the zenith", 0.0, 90.0),
            Preset::new("horizon north", "the northern horizon", 0.0, 0.0),
            Preset::new("horizon east", "the eastern horizon", 90.0, 0.0),
            Preset::new("horizon south", "the southern horizon", 180.0, 0.0),
            Preset::new("horizon west", "the western horizon", 270.0, 0.0),
        ])
    }
}

impl PresetTable {
    pub fn new(presets: Vec<Preset>) -> Self {
        Self { presets }
    }

    /// First preset whose trigger is a substring of the lower-cased text
    pub fn find_in(&self, text: &str) -> Option<&Preset> {
        let text = text.to_lowercase();
        self.presets
            .iter()
            .find(|p| !p.trigger.is_empty() && text.contains(p.trigger.as_str()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Preset> {
        self.presets.iter()
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }
}

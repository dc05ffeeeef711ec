//! Approximate Keplerian orbital elements (JPL, valid 1800-2050)

use crate::error::EphemerisError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Key for the Earth-Moon barycentre
pub const EARTH: &str = "earth";

/// Mean elements at J2000 plus their rates per Julian century.
///
/// Angles in degrees, semi-major axis in AU.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanetElements {
    pub a: f64,
    pub e: f64,
    pub i: f64,
    /// Mean longitude
    pub l: f64,
    /// Longitude of perihelion
    pub long_peri: f64,
    /// Longitude of the ascending node
    pub long_node: f64,
    #[serde(default)]
    pub a_rate: f64,
    #[serde(default)]
    pub e_rate: f64,
    #[serde(default)]
    pub i_rate: f64,
    #[serde(default)]
    pub l_rate: f64,
    #[serde(default)]
    pub long_peri_rate: f64,
    #[serde(default)]
    pub long_node_rate: f64,
}

/// Elements evaluated at one instant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OsculatingElements {
    pub a: f64,
    pub e: f64,
    pub i: f64,
    pub l: f64,
    pub long_peri: f64,
    pub long_node: f64,
}

impl PlanetElements {
    #[allow(clippy::too_many_arguments)]
    const fn new(
        a: f64,
        e: f64,
        i: f64,
        l: f64,
        long_peri: f64,
        long_node: f64,
        a_rate: f64,
        e_rate: f64,
        i_rate: f64,
        l_rate: f64,
        long_peri_rate: f64,
        long_node_rate: f64,
    ) -> Self {
        Self {
            a,
            e,
            i,
            l,
            long_peri,
            long_node,
            a_rate,
            e_rate,
            i_rate,
            l_rate,
            long_peri_rate,
            long_node_rate,
        }
    }

    /// Evaluate at `t` Julian centuries past J2000
    pub fn at(&self, t: f64) -> OsculatingElements {
        OsculatingElements {
            a: self.a + self.a_rate * t,
            e: self.e + self.e_rate * t,
            i: self.i + self.i_rate * t,
            l: self.l + self.l_rate * t,
            long_peri: self.long_peri + self.long_peri_rate * t,
            long_node: self.long_node + self.long_node_rate * t,
        }
    }

    fn validate(&self, key: &str) -> Result<(), EphemerisError> {
        let values = [
            self.a,
            self.e,
            self.i,
            self.l,
            self.long_peri,
            self.long_node,
            self.a_rate,
            self.e_rate,
            self.i_rate,
            self.l_rate,
            self.long_peri_rate,
            self.long_node_rate,
        ];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(EphemerisError::InvalidElements(format!(
                "{}: elements must be finite",
                key
            )));
        }
        if self.a <= 0.0 {
            return Err(EphemerisError::InvalidElements(format!(
                "{}: semi-major axis must be positive",
                key
            )));
        }
        if !(0.0..1.0).contains(&self.e) {
            return Err(EphemerisError::InvalidElements(format!(
                "{}: eccentricity must be in [0, 1)",
                key
            )));
        }
        Ok(())
    }
}

const MERCURY: PlanetElements = PlanetElements::new(
    0.38709927, 0.20563593, 7.00497902, 252.25032350, 77.45779628, 48.33076593,
    0.00000037, 0.00001906, -0.00594749, 149472.67411175, 0.16047689, -0.12534081,
);
const VENUS: PlanetElements = PlanetElements::new(
    0.72333566, 0.00677672, 3.39467605, 181.97909950, 131.60246718, 76.67984255,
    0.00000390, -0.00004107, -0.00078890, 58517.81538729, 0.00268329, -0.27769418,
);
const EARTH_MOON_BARYCENTRE: PlanetElements = PlanetElements::new(
    1.00000261, 0.01671123, -0.00001531, 100.46457166, 102.93768193, 0.0,
    0.00000562, -0.00004392, -0.01294668, 35999.37244981, 0.32327364, 0.0,
);
const MARS: PlanetElements = PlanetElements::new(
    1.52371034, 0.09339410, 1.84969142, -4.55343205, -23.94362959, 49.55953891,
    0.00001847, 0.00007882, -0.00813131, 19140.30268499, 0.44441088, -0.29257343,
);
const JUPITER: PlanetElements = PlanetElements::new(
    5.20288700, 0.04838624, 1.30439695, 34.39644051, 14.72847983, 100.47390909,
    -0.00011607, -0.00013253, -0.00183714, 3034.74612775, 0.21252668, 0.20469106,
);
const SATURN: PlanetElements = PlanetElements::new(
    9.53667594, 0.05386179, 2.48599187, 49.95424423, 92.59887831, 113.66242448,
    -0.00125060, -0.00050991, 0.00193609, 1222.49362201, -0.41897216, -0.28867794,
);
const URANUS: PlanetElements = PlanetElements::new(
    19.18916464, 0.04725744, 0.77263783, 313.23810451, 170.95427630, 74.01692503,
    -0.00196176, -0.00004397, -0.00242939, 428.48202785, 0.40805281, 0.04240589,
);
const NEPTUNE: PlanetElements = PlanetElements::new(
    30.06992276, 0.00859048, 1.77004347, -55.12002969, 44.96476227, 131.78422574,
    0.00026291, 0.00005105, 0.00035372, 218.45945325, -0.32241464, -0.00508664,
);

/// Elements for the eight planets (Earth as the Earth-Moon barycentre)
#[derive(Debug, Clone, PartialEq)]
pub struct ElementsTable {
    entries: BTreeMap<String, PlanetElements>,
}

impl Default for ElementsTable {
    fn default() -> Self {
        let entries = [
            ("mercury", MERCURY),
            ("venus", VENUS),
            (EARTH, EARTH_MOON_BARYCENTRE),
            ("mars", MARS),
            ("jupiter", JUPITER),
            ("saturn", SATURN),
            ("uranus", URANUS),
            ("neptune", NEPTUNE),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
        Self { entries }
    }
}

impl ElementsTable {
    pub fn get(&self, key: &str) -> Option<&PlanetElements> {
        self.entries.get(key)
    }

    /// Read a TOML file of `[planet]` tables
    pub fn read_overrides(path: &Path) -> Result<BTreeMap<String, PlanetElements>, EphemerisError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_overrides(&content)
    }

    pub fn parse_overrides(content: &str) -> Result<BTreeMap<String, PlanetElements>, EphemerisError> {
        toml::from_str(content).map_err(|e| EphemerisError::Parse(e.to_string()))
    }

    /// Replace entries; every key must name a known planet
    pub fn apply_overrides(
        &mut self,
        overrides: BTreeMap<String, PlanetElements>,
    ) -> Result<(), EphemerisError> {
        for (key, elements) in overrides {
            let key = key.to_lowercase();
            match self.entries.get_mut(&key) {
                Some(slot) => *slot = elements,
                None => {
                    return Err(EphemerisError::InvalidElements(format!(
                        "unknown planet '{}'",
                        key
                    )))
                }
            }
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), EphemerisError> {
        for (key, elements) in &self.entries {
            elements.validate(key)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_is_valid() {
        let table = ElementsTable::default();
        assert!(table.validate().is_ok());
        assert!(table.get(EARTH).is_some());
        assert!(table.get("pluto").is_none());
    }

    #[test]
    fn test_at_applies_rates() {
        let e = MARS.at(1.0);
        assert!((e.a - (1.52371034 + 0.00001847)).abs() < 1e-12);
        assert!((e.l - (-4.55343205 + 19140.30268499)).abs() < 1e-9);
    }

    #[test]
    fn test_overrides() {
        let mut table = ElementsTable::default();
        let overrides = ElementsTable::parse_overrides(
            r#"
            [mars]
            a = 1.6
            e = 0.1
            i = 1.8
            l = 0.0
            long_peri = 0.0
            long_node = 49.0
            "#,
        )
        .unwrap();
        table.apply_overrides(overrides).unwrap();
        let mars = table.get("mars").unwrap();
        assert_eq!(mars.a, 1.6);
        assert_eq!(mars.l_rate, 0.0);

        let unknown = ElementsTable::parse_overrides(
            "[pluto]\na = 39.5\ne = 0.25\ni = 17.0\nl = 0.0\nlong_peri = 0.0\nlong_node = 0.0\n",
        )
        .unwrap();
        assert!(table.apply_overrides(unknown).is_err());
    }

    #[test]
    fn test_invalid_eccentricity() {
        let mut table = ElementsTable::default();
        let overrides = ElementsTable::parse_overrides(
            "[venus]\na = 0.7\ne = 1.2\ni = 3.4\nl = 0.0\nlong_peri = 0.0\nlong_node = 0.0\n",
        )
        .unwrap();
        table.apply_overrides(overrides).unwrap();
        assert!(matches!(
            table.validate(),
            Err(EphemerisError::InvalidElements(_))
        ));
    }
}

//! Core value types: where the observer stands and where the mount points

use serde::{Deserialize, Serialize};

/// Observer position on Earth, in degrees (east longitude positive).
///
/// Set once at startup and read-only afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObserverLocation {
    pub latitude: f64,
    pub longitude: f64,
}

impl Default for ObserverLocation {
    fn default() -> Self {
        Self {
            latitude: 0.0,
            longitude: 0.0,
        }
    }
}

impl ObserverLocation {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Validate that both coordinates are finite and in range
    pub fn validate(&self) -> Result<(), String> {
        if !self.latitude.is_finite() || !self.longitude.is_finite() {
            return Err("Observer coordinates must be finite".to_string());
        }

        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(format!(
                "Latitude must be between -90 and 90 degrees (got {})",
                self.latitude
            ));
        }

        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(format!(
                "Longitude must be between -180 and 180 degrees (got {})",
                self.longitude
            ));
        }

        Ok(())
    }
}

/// Mount pointing direction in degrees.
///
/// Azimuth is measured clockwise from north, elevation above the horizon.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Orientation {
    pub azimuth: f64,
    pub elevation: f64,
}

/// Whole degrees plus arcminutes, as shown on the mount's dials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DegreesMinutes {
    pub degrees: u32,
    pub minutes: u32,
}

impl std::fmt::Display for DegreesMinutes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}°{:02}′", self.degrees, self.minutes)
    }
}

impl Orientation {
    pub const MIN_ELEVATION: f64 = 0.0;
    pub const MAX_ELEVATION: f64 = 90.0;

    pub fn new(azimuth: f64, elevation: f64) -> Self {
        Self { azimuth, elevation }
    }

    /// Wrap azimuth into [0, 360) and clamp elevation into [0, 90].
    pub fn normalized(&self) -> Self {
        Self {
            azimuth: wrap_azimuth(self.azimuth),
            elevation: self
                .elevation
                .clamp(Self::MIN_ELEVATION, Self::MAX_ELEVATION),
        }
    }

    /// Cartesian pointing vector of the given length (x east-ish, z up).
    pub fn direction_vector(&self, length: f64) -> (f64, f64, f64) {
        let el = self.elevation.to_radians();
        let az = self.azimuth.to_radians();
        (
            length * el.cos() * az.cos(),
            length * el.cos() * az.sin(),
            length * el.sin(),
        )
    }

    /// Split both axes of the normalized orientation into degrees and arcminutes.
    pub fn to_degrees_minutes(&self) -> (DegreesMinutes, DegreesMinutes) {
        let n = self.normalized();
        let az = split_minutes(n.azimuth);
        let el = split_minutes(n.elevation);
        (
            DegreesMinutes {
                degrees: az.degrees % 360,
                minutes: az.minutes,
            },
            el,
        )
    }
}

/// Wrap any finite azimuth into [0, 360).
pub fn wrap_azimuth(azimuth: f64) -> f64 {
    let wrapped = azimuth.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

fn split_minutes(value: f64) -> DegreesMinutes {
    let total_minutes = (value * 60.0).round().max(0.0) as u32;
    DegreesMinutes {
        degrees: total_minutes / 60,
        minutes: total_minutes % 60,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observer_validation() {
        assert!(ObserverLocation::new(51.5, -0.12).validate().is_ok());
        assert!(ObserverLocation::new(91.0, 0.0).validate().is_err());
        assert!(ObserverLocation::new(0.0, -181.0).validate().is_err());
        assert!(ObserverLocation::new(f64::NAN, 0.0).validate().is_err());
    }

    #[test]
    fn test_normalized_wraps_and_clamps() {
        let o = Orientation::new(-90.0, 120.0).normalized();
        assert_eq!(o.azimuth, 270.0);
        assert_eq!(o.elevation, 90.0);

        let o = Orientation::new(720.0, -5.0).normalized();
        assert_eq!(o.azimuth, 0.0);
        assert_eq!(o.elevation, 0.0);
    }

    #[test]
    fn test_wrap_azimuth_never_returns_360() {
        assert_eq!(wrap_azimuth(360.0), 0.0);
        let tiny = wrap_azimuth(-1e-15);
        assert!(tiny < 360.0);
    }

    #[test]
    fn test_direction_vector() {
        let (x, y, z) = Orientation::new(0.0, 90.0).direction_vector(5.0);
        assert!(x.abs() < 1e-9);
        assert!(y.abs() < 1e-9);
        assert!((z - 5.0).abs() < 1e-9);

        let (x, y, z) = Orientation::new(90.0, 0.0).direction_vector(2.0);
        assert!(x.abs() < 1e-9);
        assert!((y - 2.0).abs() < 1e-9);
        assert!(z.abs() < 1e-9);
    }

    #[test]
    fn test_degrees_minutes() {
        let (az, el) = Orientation::new(123.5, 45.25).to_degrees_minutes();
        assert_eq!(az, DegreesMinutes { degrees: 123, minutes: 30 });
        assert_eq!(el, DegreesMinutes { degrees: 45, minutes: 15 });

        // 359.999 rounds up to a full turn and wraps
        let (az, _) = Orientation::new(359.999, 0.0).to_degrees_minutes();
        assert_eq!(az, DegreesMinutes { degrees: 0, minutes: 0 });
        assert_eq!(format!("{}", el), "45°15′");
    }
}

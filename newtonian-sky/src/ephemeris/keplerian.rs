//! Built-in ephemeris from mean orbital elements
//!
//! Planets use two-body Keplerian orbits from the JPL approximate elements, the Sun
//! is the reflection of the Earth-Moon barycentre, and the Moon uses a truncated
//! lunar theory with the largest periodic terms plus topocentric parallax. Accuracy
//! is at the arcminute-to-degree level, enough to aim a visual telescope.

use super::elements::{ElementsTable, OsculatingElements, EARTH};
use super::{EphemerisProvider, HorizontalPosition};
use crate::catalog::Body;
use crate::error::EphemerisError;
use crate::time::{centuries_since_j2000, julian_day, local_sidereal_degrees, normalize_degrees};
use chrono::{DateTime, Utc};
use newtonian_core::ObserverLocation;

/// Mean obliquity of the ecliptic at J2000, degrees
const OBLIQUITY_J2000: f64 = 23.439_28;

/// Equatorial coordinates in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Equatorial {
    pub right_ascension: f64,
    pub declination: f64,
}

pub struct KeplerianEphemeris {
    elements: ElementsTable,
}

impl Default for KeplerianEphemeris {
    fn default() -> Self {
        Self::new(ElementsTable::default())
    }
}

impl KeplerianEphemeris {
    pub fn new(elements: ElementsTable) -> Self {
        Self { elements }
    }

    /// Geocentric right ascension and declination
    pub fn equatorial(&self, body: Body, jd: f64) -> Result<Equatorial, EphemerisError> {
        match body {
            Body::Moon => Ok(moon_position(jd).equatorial),
            Body::Sun => {
                let earth = self.heliocentric(EARTH, jd)?;
                Ok(ecliptic_to_equatorial(
                    [-earth[0], -earth[1], -earth[2]],
                    OBLIQUITY_J2000,
                ))
            }
            planet => {
                let earth = self.heliocentric(EARTH, jd)?;
                let p = self.heliocentric(planet.key(), jd)?;
                Ok(ecliptic_to_equatorial(
                    [p[0] - earth[0], p[1] - earth[1], p[2] - earth[2]],
                    OBLIQUITY_J2000,
                ))
            }
        }
    }

    /// Heliocentric ecliptic J2000 coordinates in AU
    fn heliocentric(&self, key: &str, jd: f64) -> Result<[f64; 3], EphemerisError> {
        let elements = self
            .elements
            .get(key)
            .ok_or_else(|| EphemerisError::UnknownBody(key.to_string()))?;
        Ok(orbit_position(&elements.at(centuries_since_j2000(jd))))
    }
}

impl EphemerisProvider for KeplerianEphemeris {
    fn position(
        &self,
        body: Body,
        observer: &ObserverLocation,
        instant: DateTime<Utc>,
    ) -> Result<HorizontalPosition, EphemerisError> {
        let jd = julian_day(instant);
        let lst = local_sidereal_degrees(jd, observer.longitude);

        if body == Body::Moon {
            let moon = moon_position(jd);
            let mut pos = to_horizontal(moon.equatorial, observer.latitude, lst);
            // Distance is in Earth radii, so parallax is large enough to matter
            let parallax = (1.0 / moon.distance).asin().to_degrees();
            pos.elevation -= parallax * pos.elevation.to_radians().cos();
            return Ok(pos);
        }

        let eq = self.equatorial(body, jd)?;
        Ok(to_horizontal(eq, observer.latitude, lst))
    }

    fn name(&self) -> &str {
        "keplerian"
    }
}

/// Solve Kepler's equation `M = E - e sin E` (radians)
fn eccentric_anomaly(mean_anomaly: f64, e: f64) -> f64 {
    let mut ecc = mean_anomaly + e * mean_anomaly.sin();
    for _ in 0..30 {
        let delta = (ecc - e * ecc.sin() - mean_anomaly) / (1.0 - e * ecc.cos());
        ecc -= delta;
        if delta.abs() < 1e-12 {
            break;
        }
    }
    ecc
}

fn orbit_position(el: &OsculatingElements) -> [f64; 3] {
    let omega = (el.long_peri - el.long_node).to_radians();
    let node = el.long_node.to_radians();
    let inc = el.i.to_radians();

    let mut m = normalize_degrees(el.l - el.long_peri);
    if m > 180.0 {
        m -= 360.0;
    }
    let ecc = eccentric_anomaly(m.to_radians(), el.e);

    let xp = el.a * (ecc.cos() - el.e);
    let yp = el.a * (1.0 - el.e * el.e).sqrt() * ecc.sin();

    let (so, co) = omega.sin_cos();
    let (sn, cn) = node.sin_cos();
    let (si, ci) = inc.sin_cos();

    [
        (co * cn - so * sn * ci) * xp + (-so * cn - co * sn * ci) * yp,
        (co * sn + so * cn * ci) * xp + (-so * sn + co * cn * ci) * yp,
        (so * si) * xp + (co * si) * yp,
    ]
}

fn ecliptic_to_equatorial(v: [f64; 3], obliquity: f64) -> Equatorial {
    let (se, ce) = obliquity.to_radians().sin_cos();
    let x = v[0];
    let y = v[1] * ce - v[2] * se;
    let z = v[1] * se + v[2] * ce;
    Equatorial {
        right_ascension: normalize_degrees(y.atan2(x).to_degrees()),
        declination: z.atan2((x * x + y * y).sqrt()).to_degrees(),
    }
}

fn to_horizontal(eq: Equatorial, latitude: f64, lst: f64) -> HorizontalPosition {
    let h = (lst - eq.right_ascension).to_radians();
    let dec = eq.declination.to_radians();
    let lat = latitude.to_radians();

    let sin_alt = lat.sin() * dec.sin() + lat.cos() * dec.cos() * h.cos();
    let elevation = sin_alt.clamp(-1.0, 1.0).asin().to_degrees();
    let azimuth = (-dec.cos() * h.sin())
        .atan2(dec.sin() * lat.cos() - dec.cos() * lat.sin() * h.cos())
        .to_degrees();

    HorizontalPosition {
        azimuth: normalize_degrees(azimuth),
        elevation,
    }
}

struct MoonPosition {
    equatorial: Equatorial,
    /// Earth radii
    distance: f64,
}

fn moon_position(jd: f64) -> MoonPosition {
    let d = jd - 2_451_543.5;

    let node = normalize_degrees(125.1228 - 0.052_953_808_3 * d);
    let inc = 5.1454_f64;
    let peri = normalize_degrees(318.0634 + 0.164_357_322_3 * d);
    let a = 60.2666;
    let e = 0.054_900;
    let m = normalize_degrees(115.3654 + 13.064_992_950_9 * d);

    let ecc = eccentric_anomaly(m.to_radians(), e);
    let xv = a * (ecc.cos() - e);
    let yv = a * (1.0 - e * e).sqrt() * ecc.sin();
    let v = yv.atan2(xv).to_degrees();
    let r = (xv * xv + yv * yv).sqrt();

    let (sn, cn) = node.to_radians().sin_cos();
    let (svw, cvw) = (v + peri).to_radians().sin_cos();
    let ci = inc.to_radians().cos();
    let si = inc.to_radians().sin();

    let xh = r * (cn * cvw - sn * svw * ci);
    let yh = r * (sn * cvw + cn * svw * ci);
    let zh = r * svw * si;

    let mut lon = yh.atan2(xh).to_degrees();
    let mut lat = zh.atan2((xh * xh + yh * yh).sqrt()).to_degrees();
    let mut dist = r;

    // Largest periodic perturbations
    let ms = normalize_degrees(356.0470 + 0.985_600_258_5 * d);
    let ws = 282.9404 + 4.709_35e-5 * d;
    let ls = ms + ws;
    let lm = node + peri + m;
    let dm = lm - ls;
    let f = lm - node;

    let sind = |deg: f64| deg.to_radians().sin();
    let cosd = |deg: f64| deg.to_radians().cos();

    lon += -1.274 * sind(m - 2.0 * dm)
        + 0.658 * sind(2.0 * dm)
        - 0.186 * sind(ms)
        - 0.059 * sind(2.0 * m - 2.0 * dm)
        - 0.057 * sind(m - 2.0 * dm + ms)
        + 0.053 * sind(m + 2.0 * dm)
        + 0.046 * sind(2.0 * dm - ms)
        + 0.041 * sind(m - ms)
        - 0.035 * sind(dm)
        - 0.031 * sind(m + ms)
        - 0.015 * sind(2.0 * f - 2.0 * dm)
        + 0.011 * sind(m - 4.0 * dm);
    lat += -0.173 * sind(f - 2.0 * dm) - 0.055 * sind(m - f - 2.0 * dm)
        - 0.046 * sind(m + f - 2.0 * dm)
        + 0.033 * sind(f + 2.0 * dm)
        + 0.017 * sind(2.0 * m + f);
    dist += -0.58 * cosd(m - 2.0 * dm) - 0.46 * cosd(2.0 * dm);

    let (slat, clat) = lat.to_radians().sin_cos();
    let (slon, clon) = lon.to_radians().sin_cos();
    let ecliptic = [clat * clon, clat * slon, slat];
    let obliquity = 23.4393 - 3.563e-7 * d;

    MoonPosition {
        equatorial: ecliptic_to_equatorial(ecliptic, obliquity),
        distance: dist,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_kepler_solver() {
        let m = 1.0_f64;
        let e = 0.2;
        let ecc = eccentric_anomaly(m, e);
        assert!((ecc - e * ecc.sin() - m).abs() < 1e-10);
        assert_eq!(eccentric_anomaly(0.0, 0.5), 0.0);
    }

    #[test]
    fn test_sun_declination_at_june_solstice() {
        let eph = KeplerianEphemeris::default();
        let jd = julian_day(Utc.with_ymd_and_hms(2024, 6, 20, 21, 0, 0).unwrap());
        let eq = eph.equatorial(Body::Sun, jd).unwrap();
        assert!((eq.declination - 23.44).abs() < 0.3, "dec {}", eq.declination);
        assert!((eq.right_ascension - 90.0).abs() < 1.0, "ra {}", eq.right_ascension);
    }

    #[test]
    fn test_moon_distance_in_range() {
        let moon = moon_position(julian_day(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()));
        assert!(moon.distance > 55.0 && moon.distance < 64.5);
        assert!(moon.equatorial.declination.abs() < 30.0);
    }

    #[test]
    fn test_horizontal_meridian_transit() {
        // Object on the meridian at the celestial equator, seen from the equator
        let pos = to_horizontal(
            Equatorial {
                right_ascension: 100.0,
                declination: 0.0,
            },
            0.0,
            100.0,
        );
        assert!((pos.elevation - 90.0).abs() < 1e-9);

        // Seen from 40N, it culminates due south at 50 degrees
        let pos = to_horizontal(
            Equatorial {
                right_ascension: 100.0,
                declination: 0.0,
            },
            40.0,
            100.0,
        );
        assert!((pos.elevation - 50.0).abs() < 1e-9);
        assert!((pos.azimuth - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_rising_object_is_east() {
        // Hour angle -6h: rising in the east
        let pos = to_horizontal(
            Equatorial {
                right_ascension: 190.0,
                declination: 0.0,
            },
            30.0,
            100.0,
        );
        assert!(pos.elevation.abs() < 1e-9);
        assert!((pos.azimuth - 90.0).abs() < 1e-9);
    }
}

//! Sanity checks for the built-in ephemeris and loader

use chrono::{TimeZone, Utc};
use newtonian_core::{LogAnnouncer, ObserverLocation};
use newtonian_sky::{
    Body, BuiltinLoader, CelestialCatalog, CelestialResolver, EphemerisLoader, EphemerisProvider,
    KeplerianEphemeris, ResolverFailure,
};
use std::io::Write;
use std::sync::Arc;

fn equator() -> ObserverLocation {
    ObserverLocation::new(0.0, 0.0)
}

#[test]
fn test_sun_high_at_local_noon() {
    let eph = KeplerianEphemeris::default();
    let noon = Utc.with_ymd_and_hms(2024, 3, 20, 12, 0, 0).unwrap();
    let pos = eph.position(Body::Sun, &equator(), noon).unwrap();
    assert!(pos.elevation > 80.0, "elevation {}", pos.elevation);
}

#[test]
fn test_sun_below_horizon_at_local_midnight() {
    let eph = KeplerianEphemeris::default();
    let midnight = Utc.with_ymd_and_hms(2024, 3, 20, 0, 0, 0).unwrap();
    let pos = eph.position(Body::Sun, &equator(), midnight).unwrap();
    assert!(pos.elevation < -80.0, "elevation {}", pos.elevation);
}

#[test]
fn test_sun_north_at_june_noon_on_equator() {
    let eph = KeplerianEphemeris::default();
    let noon = Utc.with_ymd_and_hms(2024, 6, 21, 12, 0, 0).unwrap();
    let pos = eph.position(Body::Sun, &equator(), noon).unwrap();
    assert!((pos.elevation - 66.5).abs() < 2.0, "elevation {}", pos.elevation);
    assert!(pos.azimuth < 10.0 || pos.azimuth > 350.0, "azimuth {}", pos.azimuth);
}

#[test]
fn test_every_body_in_range() {
    let eph = KeplerianEphemeris::default();
    let instant = Utc.with_ymd_and_hms(2025, 11, 5, 3, 30, 0).unwrap();
    let observer = ObserverLocation::new(51.48, -0.0015);
    for body in Body::ALL {
        let pos = eph.position(body, &observer, instant).unwrap();
        assert!((0.0..360.0).contains(&pos.azimuth), "{} az {}", body, pos.azimuth);
        assert!((-90.0..=90.0).contains(&pos.elevation), "{} el {}", body, pos.elevation);
    }
}

#[test]
fn test_builtin_loader_without_file() {
    let provider = BuiltinLoader::default().load().unwrap();
    assert_eq!(provider.name(), "keplerian");
}

#[test]
fn test_loader_reads_elements_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "[neptune]\na = 30.07\ne = 0.0086\ni = 1.77\nl = -55.12\nlong_peri = 44.96\nlong_node = 131.78\nl_rate = 218.46"
    )
    .unwrap();

    let loader = BuiltinLoader::new(Some(file.path().to_path_buf()));
    assert!(loader.load().is_ok());
}

#[test]
fn test_bad_elements_file_disables_resolver() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "this is not toml [").unwrap();

    let resolver = CelestialResolver::new(
        Arc::new(CelestialCatalog::default()),
        Box::new(BuiltinLoader::new(Some(file.path().to_path_buf()))),
        Arc::new(LogAnnouncer),
    );

    assert_eq!(
        resolver.resolve("mars", &equator()),
        Err(ResolverFailure::ProviderUnavailable)
    );
    assert_eq!(
        resolver.resolve("moon", &equator()),
        Err(ResolverFailure::ProviderUnavailable)
    );
    assert!(resolver.is_disabled());
}

#[test]
fn test_missing_elements_file_is_load_failure() {
    let loader = BuiltinLoader::new(Some("/nonexistent/newtonian/elements.toml".into()));
    assert!(loader.load().is_err());
}

//! newtonian-sky: Where things are in the sky
//!
//! Resolves catalog names (moon, sun, planets) to the azimuth and elevation an
//! observer would point at. Positions come from an [`EphemerisProvider`] that is
//! loaded lazily on first use; the built-in provider evaluates approximate
//! Keplerian elements and a truncated lunar theory.

pub mod catalog;
pub mod ephemeris;
pub mod error;
pub mod resolver;
pub mod time;

pub use catalog::{Body, CelestialCatalog};
pub use ephemeris::{
    BuiltinLoader, EphemerisLoader, EphemerisProvider, HorizontalPosition, KeplerianEphemeris,
};
pub use error::{EphemerisError, ResolverFailure};
pub use resolver::{CelestialResolver, Resolution};

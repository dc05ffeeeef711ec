//! Ephemeris providers and loaders

pub mod elements;
pub mod keplerian;

pub use elements::{ElementsTable, PlanetElements};
pub use keplerian::KeplerianEphemeris;

use crate::catalog::Body;
use crate::error::EphemerisError;
use chrono::{DateTime, Utc};
use newtonian_core::ObserverLocation;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Apparent topocentric position in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HorizontalPosition {
    /// Clockwise from north, [0, 360)
    pub azimuth: f64,
    /// Above the horizon; negative when the body has set
    pub elevation: f64,
}

/// Computes where a body appears for an observer at an instant
pub trait EphemerisProvider: Send + Sync {
    fn position(
        &self,
        body: Body,
        observer: &ObserverLocation,
        instant: DateTime<Utc>,
    ) -> Result<HorizontalPosition, EphemerisError>;

    fn name(&self) -> &str;
}

/// Produces the ephemeris provider on first use
pub trait EphemerisLoader: Send + Sync {
    fn load(&self) -> Result<Arc<dyn EphemerisProvider>, EphemerisError>;
}

/// Loads the built-in Keplerian ephemeris, optionally overriding elements from a
/// TOML file
#[derive(Debug, Clone, Default)]
pub struct BuiltinLoader {
    elements_path: Option<PathBuf>,
}

impl BuiltinLoader {
    pub fn new(elements_path: Option<PathBuf>) -> Self {
        Self { elements_path }
    }
}

impl EphemerisLoader for BuiltinLoader {
    fn load(&self) -> Result<Arc<dyn EphemerisProvider>, EphemerisError> {
        let mut table = ElementsTable::default();
        if let Some(path) = &self.elements_path {
            let overrides = ElementsTable::read_overrides(path)?;
            info!(
                "Loaded {} orbital element overrides from {}",
                overrides.len(),
                path.display()
            );
            table.apply_overrides(overrides)?;
        }
        table.validate()?;
        Ok(Arc::new(KeplerianEphemeris::new(table)))
    }
}

//! Celestial resolver: catalog name to azimuth/elevation

use crate::catalog::{Body, CelestialCatalog};
use crate::ephemeris::{EphemerisLoader, EphemerisProvider};
use crate::error::ResolverFailure;
use chrono::{DateTime, Utc};
use newtonian_core::{Announcer, ObserverLocation};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A successfully placed body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub body: Body,
    pub azimuth: f64,
    pub elevation: f64,
    pub below_horizon: bool,
}

enum ProviderState {
    NotLoaded,
    Ready(Arc<dyn EphemerisProvider>),
    /// Load failed; never retried
    Failed,
}

pub struct CelestialResolver {
    catalog: Arc<CelestialCatalog>,
    loader: Box<dyn EphemerisLoader>,
    state: Mutex<ProviderState>,
    announcer: Arc<dyn Announcer>,
}

impl CelestialResolver {
    pub fn new(
        catalog: Arc<CelestialCatalog>,
        loader: Box<dyn EphemerisLoader>,
        announcer: Arc<dyn Announcer>,
    ) -> Self {
        Self {
            catalog,
            loader,
            state: Mutex::new(ProviderState::NotLoaded),
            announcer,
        }
    }

    pub fn catalog(&self) -> &CelestialCatalog {
        &self.catalog
    }

    /// Position of `name` right now
    pub fn resolve(
        &self,
        name: &str,
        observer: &ObserverLocation,
    ) -> Result<Resolution, ResolverFailure> {
        self.resolve_at(name, observer, Utc::now())
    }

    pub fn resolve_at(
        &self,
        name: &str,
        observer: &ObserverLocation,
        instant: DateTime<Utc>,
    ) -> Result<Resolution, ResolverFailure> {
        let normalized = name.trim().to_lowercase();
        let Some(body) = self.catalog.lookup(&normalized) else {
            debug!("'{}' is not in the catalog", normalized);
            self.announcer
                .announce(&format!("Object '{}' is not recognised.", normalized));
            return Err(ResolverFailure::UnsupportedObject(normalized));
        };

        let provider = match self.provider() {
            Some(p) => p,
            None => {
                self.announcer.announce("Sky positions are unavailable.");
                return Err(ResolverFailure::ProviderUnavailable);
            }
        };

        let position = match provider.position(body, observer, instant) {
            Ok(p) => p,
            Err(e) => {
                warn!("Ephemeris failed for {}: {}", body, e);
                self.announcer.announce("Sky positions are unavailable.");
                return Err(ResolverFailure::ProviderUnavailable);
            }
        };

        info!(
            "{}: Az={:.2}°, El={:.2}°",
            body, position.azimuth, position.elevation
        );

        Ok(Resolution {
            body,
            azimuth: position.azimuth,
            elevation: position.elevation,
            below_horizon: position.elevation < 0.0,
        })
    }

    /// True once a load attempt has failed
    pub fn is_disabled(&self) -> bool {
        matches!(*self.state.lock(), ProviderState::Failed)
    }

    fn provider(&self) -> Option<Arc<dyn EphemerisProvider>> {
        let mut state = self.state.lock();
        match &*state {
            ProviderState::Ready(p) => Some(p.clone()),
            ProviderState::Failed => None,
            ProviderState::NotLoaded => match self.loader.load() {
                Ok(p) => {
                    info!("Ephemeris '{}' loaded", p.name());
                    *state = ProviderState::Ready(p.clone());
                    Some(p)
                }
                Err(e) => {
                    warn!("Ephemeris failed to load, sky positions disabled: {}", e);
                    *state = ProviderState::Failed;
                    None
                }
            },
        }
    }
}

//! Error types for newtonian-sky

use newtonian_core::Error as CoreError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a name could not be turned into a sky position
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", content = "object", rename_all = "snake_case")]
pub enum ResolverFailure {
    #[error("Object '{0}' is not recognised")]
    UnsupportedObject(String),

    /// The ephemeris could not be loaded; stays this way for the process lifetime
    #[error("Sky positions are unavailable")]
    ProviderUnavailable,
}

/// Ephemeris loading and evaluation errors
#[derive(Error, Debug)]
pub enum EphemerisError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid orbital elements: {0}")]
    InvalidElements(String),

    #[error("No position model for {0}")]
    UnknownBody(String),
}

impl From<ResolverFailure> for CoreError {
    fn from(err: ResolverFailure) -> Self {
        CoreError::Sky(err.to_string())
    }
}

impl From<EphemerisError> for CoreError {
    fn from(err: EphemerisError) -> Self {
        CoreError::Sky(err.to_string())
    }
}

//! Error types for newtonian-cmd

use newtonian_core::Error as CoreError;
use newtonian_sky::ResolverFailure;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a phrase produced no target
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum ParseUnresolved {
    /// Empty input
    #[error("Nothing to parse")]
    NoMatch,

    /// No rule matched and no AI classifier is configured
    #[error("Command not recognised and AI disambiguation is unavailable")]
    AiUnavailable,

    /// The classifier answered "unknown" or failed
    #[error("AI could not identify a celestial object")]
    AiUnknown,

    #[error(transparent)]
    Resolver(ResolverFailure),
}

/// Parser construction errors
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
}

impl From<ParseUnresolved> for CoreError {
    fn from(err: ParseUnresolved) -> Self {
        CoreError::Command(err.to_string())
    }
}

impl From<CommandError> for CoreError {
    fn from(err: CommandError) -> Self {
        CoreError::Command(err.to_string())
    }
}

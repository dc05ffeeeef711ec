//! Error types for newtonian-spk

use newtonian_core::Error as CoreError;
use thiserror::Error;

/// Speech feedback errors
#[derive(Error, Debug)]
pub enum SpeechError {
    /// No usable voice engine; feedback falls back to the log sink
    #[error("Voice engine unavailable: {0}")]
    EngineUnavailable(String),

    #[error("Engine error: {0}")]
    Engine(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<SpeechError> for CoreError {
    fn from(err: SpeechError) -> Self {
        CoreError::Feedback(err.to_string())
    }
}

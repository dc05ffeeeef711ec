//! Error types for newtonian-sc

use newtonian_core::Error as CoreError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a listen attempt produced no text
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecognitionFailure {
    #[error("No speech detected")]
    NoSpeech,

    #[error("Speech could not be understood")]
    Unintelligible,

    #[error("Speech service error: {0}")]
    ServiceError(String),

    #[error("Microphone error: {0}")]
    MicError(String),

    /// Another listen attempt is already running
    #[error("Already listening")]
    Busy,
}

impl RecognitionFailure {
    /// Spoken feedback for this failure; a busy gateway stays silent
    pub fn announcement(&self) -> Option<&'static str> {
        match self {
            RecognitionFailure::NoSpeech => Some("No speech detected."),
            RecognitionFailure::Unintelligible => Some("Sorry, I could not understand that."),
            RecognitionFailure::ServiceError(_) => Some("Speech service is unavailable."),
            RecognitionFailure::MicError(_) => Some("Microphone error."),
            RecognitionFailure::Busy => None,
        }
    }
}

/// Audio capture and encoding errors
#[derive(Error, Debug)]
pub enum AudioError {
    #[error("Audio capture error: {0}")]
    Capture(String),

    #[error("Audio device error: {0}")]
    Device(String),

    #[error("Audio format error: {0}")]
    Format(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<AudioError> for RecognitionFailure {
    fn from(err: AudioError) -> Self {
        RecognitionFailure::MicError(err.to_string())
    }
}

impl From<RecognitionFailure> for CoreError {
    fn from(err: RecognitionFailure) -> Self {
        CoreError::Recognition(err.to_string())
    }
}

impl From<AudioError> for CoreError {
    fn from(err: AudioError) -> Self {
        CoreError::Recognition(format!("Audio error: {}", err))
    }
}

use thiserror::Error;

/// Workspace-wide error type. Crate-specific errors convert into this one.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Speech recognition error: {0}")]
    Recognition(String),

    #[error("Command error: {0}")]
    Command(String),

    #[error("Sky resolution error: {0}")]
    Sky(String),

    #[error("Feedback error: {0}")]
    Feedback(String),

    #[error("Mount error: {0}")]
    Mount(String),
}

pub type Result<T> = std::result::Result<T, Error>;

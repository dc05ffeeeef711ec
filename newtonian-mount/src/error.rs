//! Error types for newtonian-mount

use newtonian_core::Error as CoreError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MountError {
    #[error("Invalid target: {0}")]
    InvalidTarget(String),
}

impl From<MountError> for CoreError {
    fn from(err: MountError) -> Self {
        CoreError::Mount(err.to_string())
    }
}

//! newtonian-core: shared building blocks for the telescope simulator
//!
//! Holds the pieces every other crate agrees on:
//! - Observer location and mount orientation types
//! - The `Announcer` seam used to report status to the user
//! - Workspace-wide configuration loading
//! - The core error type other crates convert into

pub mod types;
pub mod error;
pub mod config;
pub mod feedback;

pub use error::{Error, Result};
pub use types::{DegreesMinutes, ObserverLocation, Orientation};
pub use config::{
    AiConfig, AnimationConfig, ConfigError, EphemerisConfig, ListenConfig, TelescopeConfig,
    WakeWordConfig,
};
pub use feedback::{Announcer, LogAnnouncer};

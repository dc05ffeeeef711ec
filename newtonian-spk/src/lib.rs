//! newtonian-spk: Spoken feedback for the telescope
//!
//! Provides the feedback channel every component reports through:
//! - Fire-and-forget announcements that never block the caller
//! - One announcement rendered at a time by a single worker
//! - Native voice engines (espeak-ng on Linux, `say` on macOS)
//! - Automatic degradation to a log sink when no voice is available

pub mod error;
pub mod config;
pub mod engines;
pub mod feedback;

pub use error::SpeechError;
pub use config::{SpeechConfig, VoiceBackend, VoiceConfig};
pub use engines::VoiceEngine;
pub use feedback::FeedbackChannel;

//! newtonian-llm: AI disambiguation for telescope commands
//!
//! When a phrase names no preset, angle or catalog object, the parser asks a chat
//! model which celestial object the speaker meant ("the red planet" → `mars`).

pub mod cache;
pub mod classifier;
pub mod config;
pub mod error;
pub mod providers;

pub use cache::ResponseCache;
pub use classifier::{normalize_token, ObjectClassifier, OpenAiClassifier, UNKNOWN_OBJECT};
pub use config::*;
pub use error::*;
pub use providers::{ChatProvider, OpenAIProvider};

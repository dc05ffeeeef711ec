//! Voice engine implementations

pub mod native;
pub mod log;

use crate::config::VoiceConfig;
use crate::error::SpeechError;
use async_trait::async_trait;

/// Trait for voice engines that render an announcement
#[async_trait]
pub trait VoiceEngine: Send + Sync {
    /// Render text; returns once rendering has finished
    async fn speak(&self, text: &str, voice: &VoiceConfig) -> Result<(), SpeechError>;

    /// Check if engine is available
    fn is_available(&self) -> bool;

    /// Get engine name
    fn name(&self) -> &str;
}

//! Log sink engine: the textual fallback for every announcement

use crate::config::VoiceConfig;
use crate::engines::VoiceEngine;
use crate::error::SpeechError;
use async_trait::async_trait;
use tracing::info;

/// Writes announcements to the log instead of speaking them
#[derive(Debug, Default, Clone, Copy)]
pub struct LogVoiceEngine;

impl LogVoiceEngine {
    pub fn new() -> Self {
        Self
    }

    /// Synchronous form used when the worker is gone
    pub fn write(text: &str) {
        info!("announce: {}", text);
    }
}

#[async_trait]
impl VoiceEngine for LogVoiceEngine {
    async fn speak(&self, text: &str, _voice: &VoiceConfig) -> Result<(), SpeechError> {
        Self::write(text);
        Ok(())
    }

    fn is_available(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "log"
    }
}

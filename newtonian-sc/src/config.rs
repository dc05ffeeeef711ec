//! Configuration for microphone capture and transcription

use serde::{Deserialize, Serialize};

/// Microphone capture configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Device name (None = default input device)
    pub device_name: Option<String>,

    /// Transcription service settings
    pub transcription: TranscriptionConfig,
}

/// Speech-to-text service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptionConfig {
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            device_name: None,
            transcription: TranscriptionConfig::default(),
        }
    }
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "whisper-1".to_string(),
            timeout_secs: 30,
        }
    }
}

impl CaptureConfig {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(ref name) = self.device_name {
            if name.is_empty() {
                return Err("Device name cannot be empty if provided".to_string());
            }
            if name.len() > 256 {
                return Err("Device name too long (max 256 chars)".to_string());
            }
        }
        self.transcription.validate()
    }
}

impl TranscriptionConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !self.base_url.starts_with("https://") {
            return Err("Transcription base URL must use https".to_string());
        }
        if self.model.is_empty() {
            return Err("Transcription model cannot be empty".to_string());
        }
        if self.timeout_secs == 0 || self.timeout_secs > 300 {
            return Err("Transcription timeout must be between 1 and 300 seconds".to_string());
        }
        Ok(())
    }
}

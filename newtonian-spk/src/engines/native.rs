//! Native platform voice engine

use crate::config::VoiceConfig;
use crate::engines::VoiceEngine;
use crate::error::SpeechError;
use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info, warn};

const MAX_TEXT_LENGTH: usize = 10_000;

/// Native voice engine (espeak-ng on Linux, `say` on macOS)
pub struct NativeVoiceEngine {
    program: Option<&'static str>,
    rate: u32,
    volume: f32,
    pitch: f32,
}

impl NativeVoiceEngine {
    /// Look up the platform speech program. A missing program is reported through
    /// `is_available`, not as an error.
    pub fn new_with_config(rate: u32, volume: f32, pitch: f32) -> Result<Self, SpeechError> {
        let program = Self::detect();
        match program {
            Some(p) => info!("Native voice engine initialized ({})", p),
            None => warn!("No native voice program found on this platform"),
        }

        Ok(Self {
            program,
            rate,
            volume,
            pitch,
        })
    }

    #[cfg(target_os = "linux")]
    fn detect() -> Option<&'static str> {
        std::process::Command::new("espeak-ng")
            .arg("--version")
            .output()
            .ok()
            .filter(|o| o.status.success())
            .map(|_| "espeak-ng")
    }

    #[cfg(target_os = "macos")]
    fn detect() -> Option<&'static str> {
        std::process::Command::new("say")
            .arg("-v")
            .arg("?")
            .output()
            .ok()
            .filter(|o| o.status.success())
            .map(|_| "say")
    }

    #[cfg(not(any(target_os = "linux", target_os = "macos")))]
    fn detect() -> Option<&'static str> {
        None
    }

    fn build_command(&self, program: &str, text: &str, voice: &VoiceConfig) -> Command {
        let mut cmd = Command::new(program);

        if program == "say" {
            cmd.arg("-r").arg(self.rate.min(500).to_string());
            if let Some(name) = voice.name.as_deref().map(sanitize_voice_name) {
                if !name.is_empty() {
                    cmd.arg("-v").arg(name);
                }
            }
        } else {
            // espeak-ng: volume 0-200 (100 normal), pitch 0-99 (50 normal)
            let amplitude = ((self.volume * 200.0).round() as u32).min(200);
            let pitch = ((50.0 + self.pitch * 49.0).round().max(0.0) as u32).min(99);
            cmd.arg("-s").arg(self.rate.to_string());
            cmd.arg("-a").arg(amplitude.to_string());
            cmd.arg("-p").arg(pitch.to_string());
            let voice_name = voice
                .name
                .as_deref()
                .map(sanitize_voice_name)
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| voice.language.to_lowercase());
            cmd.arg("-v").arg(voice_name);
        }

        // Arguments are passed directly, never through a shell
        cmd.arg(text);
        cmd
    }
}

#[async_trait]
impl VoiceEngine for NativeVoiceEngine {
    async fn speak(&self, text: &str, voice: &VoiceConfig) -> Result<(), SpeechError> {
        let program = self
            .program
            .ok_or_else(|| SpeechError::EngineUnavailable("no native voice program".to_string()))?;

        let sanitized: String = text
            .chars()
            .filter(|c| !c.is_control())
            .take(MAX_TEXT_LENGTH)
            .collect();
        if sanitized.trim().is_empty() {
            return Ok(());
        }

        debug!("Speaking with {}: {}", program, sanitized);
        let output = self
            .build_command(program, &sanitized, voice)
            .output()
            .await
            .map_err(|e| SpeechError::Engine(format!("Failed to run {}: {}", program, e)))?;

        if !output.status.success() {
            return Err(SpeechError::Engine(format!(
                "{} failed: {}",
                program,
                String::from_utf8_lossy(&output.stderr)
            )));
        }

        Ok(())
    }

    fn is_available(&self) -> bool {
        self.program.is_some()
    }

    fn name(&self) -> &str {
        "native"
    }
}

fn sanitize_voice_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric() || *c == ' ' || *c == '-' || *c == '_')
        .take(256)
        .collect()
}

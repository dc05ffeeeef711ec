// Settings for the newtonian binary
// One file feeds every section; flags override the environment, which overrides the file.

use anyhow::{Context, Result};
use newtonian_core::config::parse_str;
use newtonian_core::TelescopeConfig;
use newtonian_sc::CaptureConfig;
use newtonian_spk::SpeechConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Sections owned by the speech crates, read from the same file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct DeviceSections {
    speech: SpeechConfig,
    capture: CaptureConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub telescope: TelescopeConfig,
    pub speech: SpeechConfig,
    pub capture: CaptureConfig,
}

/// Command line overrides, applied last
#[derive(Debug, Clone, Copy, Default)]
pub struct Overrides {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub no_wake_word: bool,
}

impl Settings {
    /// Load from `path`, else the default config file when present, else defaults
    pub fn load(path: Option<&Path>, overrides: Overrides) -> Result<Self> {
        let content = match path {
            Some(p) => Some(
                std::fs::read_to_string(p)
                    .with_context(|| format!("Failed to read config {}", p.display()))?,
            ),
            None => match TelescopeConfig::default_path() {
                Some(p) if p.exists() => Some(
                    std::fs::read_to_string(&p)
                        .with_context(|| format!("Failed to read config {}", p.display()))?,
                ),
                _ => None,
            },
        };

        let mut settings = match content {
            Some(content) => Self::from_str(&content)?,
            None => Self::default(),
        };
        settings.telescope.apply_env();
        settings.apply(overrides);
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_str(content: &str) -> Result<Self> {
        let telescope: TelescopeConfig = parse_str(content).context("Invalid telescope config")?;
        let devices: DeviceSections = parse_str(content).context("Invalid speech config")?;
        Ok(Self {
            telescope,
            speech: devices.speech,
            capture: devices.capture,
        })
    }

    pub fn apply(&mut self, overrides: Overrides) {
        if let Some(lat) = overrides.latitude {
            self.telescope.observer.latitude = lat;
        }
        if let Some(lon) = overrides.longitude {
            self.telescope.observer.longitude = lon;
        }
        if overrides.no_wake_word {
            self.telescope.wake_word.required = false;
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.telescope.validate()?;
        self.speech
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid speech config: {}", e))?;
        self.capture
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid capture config: {}", e))?;
        Ok(())
    }
}

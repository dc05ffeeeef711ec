// Configuration for the telescope simulator
// Defaults work out of the box; a TOML/YAML file and environment variables override them.

use crate::types::{ObserverLocation, Orientation};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable holding the AI/transcription credential
pub const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const LATITUDE_VAR: &str = "NEWTONIAN_LATITUDE";
pub const LONGITUDE_VAR: &str = "NEWTONIAN_LONGITUDE";
pub const WAKE_WORD_VAR: &str = "NEWTONIAN_WAKE_WORD";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<ConfigError> for crate::Error {
    fn from(err: ConfigError) -> Self {
        crate::Error::Configuration(err.to_string())
    }
}

/// Top-level telescope configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TelescopeConfig {
    pub observer: ObserverLocation,
    pub wake_word: WakeWordConfig,
    pub listen: ListenConfig,
    pub animation: AnimationConfig,
    pub ai: AiConfig,
    pub ephemeris: EphemerisConfig,
}

/// Wake-word gate settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WakeWordConfig {
    /// The word that must open every spoken command
    pub word: String,
    /// Reject utterances that do not start with the wake word
    pub required: bool,
    /// Accept an optional "hey" before the wake word
    pub allow_hey_prefix: bool,
}

/// Microphone listening settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ListenConfig {
    /// How long to wait for speech to start
    pub timeout_secs: u64,
    /// Longest phrase that will be recorded
    pub phrase_limit_secs: u64,
    /// Ambient noise sampling before each capture
    pub calibration_ms: u64,
    /// Silence that ends a phrase
    pub pause_threshold_ms: u64,
    /// Lowest RMS energy (i16 scale) counted as speech
    pub min_energy_threshold: f32,
    /// Multiplier applied to ambient energy during calibration
    pub dynamic_energy_ratio: f32,
    /// Language hint for transcription
    pub language: String,
}

/// Mount animation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub total_steps: u32,
    pub tick_interval_ms: u64,
    /// Whether the visualization draws reference axes
    pub show_axes: bool,
    /// Where the mount points at startup
    pub start: Orientation,
}

/// AI disambiguation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub enabled: bool,
    /// Credential; normally taken from `OPENAI_API_KEY`
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
    pub cache_capacity: usize,
    pub cache_ttl_secs: u64,
}

/// Ephemeris provider settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EphemerisConfig {
    /// Optional orbital elements file replacing the built-in table
    pub elements_path: Option<PathBuf>,
}

impl Default for WakeWordConfig {
    fn default() -> Self {
        Self {
            word: "telescope".to_string(),
            required: true,
            allow_hey_prefix: true,
        }
    }
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 5,
            phrase_limit_secs: 10,
            calibration_ms: 500,
            pause_threshold_ms: 1000,
            min_energy_threshold: 300.0,
            dynamic_energy_ratio: 1.5,
            language: "en".to_string(),
        }
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            total_steps: 30,
            tick_interval_ms: 20,
            show_axes: true,
            start: Orientation::new(0.0, 5.0),
        }
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            temperature: 0.3,
            max_tokens: 20,
            timeout_secs: 15,
            cache_capacity: 128,
            cache_ttl_secs: 3600,
        }
    }
}

impl AiConfig {
    /// True when AI disambiguation can actually be used
    pub fn is_available(&self) -> bool {
        self.enabled && self.api_key.as_deref().map_or(false, |k| !k.trim().is_empty())
    }
}

impl TelescopeConfig {
    /// Default config file location (`<config dir>/newtonian/config.toml`)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("newtonian").join("config.toml"))
    }

    /// Load from an explicit path, else the default path if it exists, else defaults.
    /// Environment overrides are applied afterwards and the result is validated.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => match Self::default_path() {
                Some(p) if p.exists() => Self::from_file(&p)?,
                _ => Self::default(),
            },
        };
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        parse_file(path)
    }

    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        parse_str(content)
    }

    /// Apply overrides from the process environment
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(lat) = lookup(LATITUDE_VAR).and_then(|v| v.trim().parse::<f64>().ok()) {
            self.observer.latitude = lat;
        }

        if let Some(lon) = lookup(LONGITUDE_VAR).and_then(|v| v.trim().parse::<f64>().ok()) {
            self.observer.longitude = lon;
        }

        if let Some(word) = lookup(WAKE_WORD_VAR) {
            let word = word.trim().to_lowercase();
            if !word.is_empty() {
                self.wake_word.word = word;
            }
        }

        if let Some(key) = lookup(OPENAI_API_KEY_VAR) {
            if !key.trim().is_empty() {
                self.ai.api_key = Some(key.trim().to_string());
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.observer.validate().map_err(ConfigError::Validation)?;

        let word = self.wake_word.word.trim();
        if word.is_empty() {
            return Err(ConfigError::Validation("Wake word cannot be empty".to_string()));
        }
        if word.len() > 64 {
            return Err(ConfigError::Validation("Wake word too long (max 64 chars)".to_string()));
        }

        if self.listen.timeout_secs == 0 || self.listen.timeout_secs > 60 {
            return Err(ConfigError::Validation(
                "Listen timeout must be between 1 and 60 seconds".to_string(),
            ));
        }
        if self.listen.phrase_limit_secs == 0 || self.listen.phrase_limit_secs > 120 {
            return Err(ConfigError::Validation(
                "Phrase limit must be between 1 and 120 seconds".to_string(),
            ));
        }
        if self.listen.calibration_ms > 5_000 {
            return Err(ConfigError::Validation(
                "Calibration too long (max 5000 ms)".to_string(),
            ));
        }
        if self.listen.dynamic_energy_ratio < 1.0 {
            return Err(ConfigError::Validation(
                "Dynamic energy ratio must be at least 1.0".to_string(),
            ));
        }

        if self.animation.total_steps == 0 || self.animation.total_steps > 10_000 {
            return Err(ConfigError::Validation(
                "Animation steps must be between 1 and 10000".to_string(),
            ));
        }
        let start = self.animation.start;
        if !start.azimuth.is_finite()
            || !(Orientation::MIN_ELEVATION..=Orientation::MAX_ELEVATION).contains(&start.elevation)
        {
            return Err(ConfigError::Validation(
                "Start orientation needs a finite azimuth and elevation between 0 and 90".to_string(),
            ));
        }
        if self.animation.tick_interval_ms == 0 {
            return Err(ConfigError::Validation(
                "Tick interval must be greater than 0".to_string(),
            ));
        }

        if !self.ai.base_url.starts_with("https://") {
            return Err(ConfigError::Validation("AI endpoint must use HTTPS".to_string()));
        }
        if self.ai.timeout_secs == 0 || self.ai.timeout_secs > 300 {
            return Err(ConfigError::Validation(
                "AI timeout must be between 1 and 300 seconds".to_string(),
            ));
        }
        if self.ai.cache_capacity == 0 {
            return Err(ConfigError::Validation(
                "AI cache capacity must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Read and parse any config section from a file
pub fn parse_file<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
    parse_str(&content)
}

/// Parse TOML first, then YAML
pub fn parse_str<T: DeserializeOwned>(content: &str) -> Result<T, ConfigError> {
    let toml_err = match toml::from_str::<T>(content) {
        Ok(config) => return Ok(config),
        Err(e) => e,
    };

    match serde_yaml::from_str::<T>(content) {
        Ok(config) => Ok(config),
        Err(_) => Err(ConfigError::Parse(toml_err.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = TelescopeConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.animation.total_steps, 30);
        assert_eq!(config.animation.tick_interval_ms, 20);
        assert_eq!(config.animation.start, Orientation::new(0.0, 5.0));
        assert_eq!(config.wake_word.word, "telescope");
        assert!(!config.ai.is_available());
    }

    #[test]
    fn test_from_toml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[observer]\nlatitude = 48.85\nlongitude = 2.35\n\n[animation]\ntotal_steps = 60"
        )
        .unwrap();

        let config = TelescopeConfig::from_file(file.path()).unwrap();
        assert_eq!(config.observer.latitude, 48.85);
        assert_eq!(config.animation.total_steps, 60);
        // Untouched sections keep defaults
        assert_eq!(config.animation.tick_interval_ms, 20);
    }

    #[test]
    fn test_from_yaml_str() {
        let yaml = "observer:\n  latitude: -33.9\n  longitude: 18.4\nwake_word:\n  word: mount\n";
        let config = TelescopeConfig::from_str(yaml).unwrap();
        assert_eq!(config.observer.latitude, -33.9);
        assert_eq!(config.wake_word.word, "mount");
    }

    #[test]
    fn test_unparseable_config() {
        let result = TelescopeConfig::from_str("observer = [[[");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            (LATITUDE_VAR, "40.7"),
            (LONGITUDE_VAR, "-74.0"),
            (WAKE_WORD_VAR, "  Jarvis "),
            (OPENAI_API_KEY_VAR, "sk-test"),
        ]
        .into_iter()
        .collect();

        let mut config = TelescopeConfig::default();
        config.apply_env_from(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.observer.latitude, 40.7);
        assert_eq!(config.observer.longitude, -74.0);
        assert_eq!(config.wake_word.word, "jarvis");
        assert!(config.ai.is_available());
    }

    #[test]
    fn test_env_ignores_garbage() {
        let mut config = TelescopeConfig::default();
        config.apply_env_from(|k| match k {
            LATITUDE_VAR => Some("north".to_string()),
            OPENAI_API_KEY_VAR => Some("   ".to_string()),
            _ => None,
        });
        assert_eq!(config.observer.latitude, 0.0);
        assert!(config.ai.api_key.is_none());
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = TelescopeConfig::default();
        config.animation.total_steps = 0;
        assert!(config.validate().is_err());

        let mut config = TelescopeConfig::default();
        config.observer.latitude = 100.0;
        assert!(config.validate().is_err());

        let mut config = TelescopeConfig::default();
        config.ai.base_url = "http://example.com".to_string();
        assert!(config.validate().is_err());

        let mut config = TelescopeConfig::default();
        config.wake_word.word = "  ".to_string();
        assert!(config.validate().is_err());

        let mut config = TelescopeConfig::default();
        config.animation.start = Orientation::new(0.0, 95.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_start_orientation_from_toml() {
        let config = TelescopeConfig::from_str(
            "[animation.start]\nazimuth = 180.0\nelevation = 20.0\n",
        )
        .unwrap();
        assert_eq!(config.animation.start, Orientation::new(180.0, 20.0));
        assert_eq!(config.animation.total_steps, 30);
    }
}

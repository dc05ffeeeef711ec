//! Command parser

use crate::command::Command;
use crate::error::{CommandError, ParseUnresolved};
use crate::presets::PresetTable;
use chrono::{DateTime, Utc};
use newtonian_core::types::wrap_azimuth;
use newtonian_core::{Announcer, ObserverLocation};
use newtonian_llm::{normalize_token, ObjectClassifier, UNKNOWN_OBJECT};
use newtonian_sky::{CelestialResolver, Resolution};
use regex::Regex;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct CommandParser {
    presets: PresetTable,
    resolver: Arc<CelestialResolver>,
    classifier: Option<Arc<dyn ObjectClassifier>>,
    announcer: Arc<dyn Announcer>,
    azimuth_pattern: Regex,
    elevation_pattern: Regex,
}

impl CommandParser {
    pub fn new(
        presets: PresetTable,
        resolver: Arc<CelestialResolver>,
        classifier: Option<Arc<dyn ObjectClassifier>>,
        announcer: Arc<dyn Announcer>,
    ) -> Result<Self, CommandError> {
        Ok(Self {
            presets,
            resolver,
            classifier,
            announcer,
            azimuth_pattern: Regex::new(r"azimuth\s+(\d+)")?,
            elevation_pattern: Regex::new(r"elevation\s+(\d+)")?,
        })
    }

    pub fn presets(&self) -> &PresetTable {
        &self.presets
    }

    /// Interpret `text` for an observer, using sky positions for right now.
    ///
    /// Announces the outcome through the feedback channel.
    pub async fn parse(&self, text: &str, observer: &ObserverLocation) -> Command {
        self.parse_at(text, observer, Utc::now()).await
    }

    pub async fn parse_at(
        &self,
        text: &str,
        observer: &ObserverLocation,
        instant: DateTime<Utc>,
    ) -> Command {
        let command = self.interpret(text, observer, instant).await;
        info!("Parsed '{}' as {}", text.trim(), command.kind());
        if let Some(message) = command.announcement() {
            self.announcer.announce(&message);
        }
        command
    }

    async fn interpret(
        &self,
        text: &str,
        observer: &ObserverLocation,
        instant: DateTime<Utc>,
    ) -> Command {
        let lowered = text.trim().to_lowercase();
        if lowered.is_empty() {
            return Command::unresolved(ParseUnresolved::NoMatch);
        }

        if let Some(preset) = self.presets.find_in(&lowered) {
            debug!("Preset '{}' matched", preset.trigger);
            return Command::Preset {
                label: preset.label.clone(),
                azimuth: preset.azimuth,
                elevation: preset.elevation,
            };
        }

        if let Some(command) = self.manual(&lowered) {
            return command;
        }

        let direct = self
            .resolver
            .catalog()
            .find_in(&lowered)
            .map(|(name, _)| name.to_string());
        if let Some(name) = direct {
            return self.celestial(&name, observer, instant);
        }

        let Some(classifier) = &self.classifier else {
            debug!("No rule matched and AI is not configured");
            return Command::unresolved(ParseUnresolved::AiUnavailable);
        };

        let token = match classifier.classify(text.trim()).await {
            Ok(token) => normalize_token(&token),
            Err(e) => {
                warn!("AI classification failed: {}", e);
                return Command::unresolved(ParseUnresolved::AiUnknown);
            }
        };

        if token.is_empty() || token == UNKNOWN_OBJECT {
            return Command::unresolved(ParseUnresolved::AiUnknown);
        }

        self.celestial(&token, observer, instant)
    }

    fn manual(&self, lowered: &str) -> Option<Command> {
        // First occurrence whose digits fit in a u32
        let capture = |pattern: &Regex| {
            pattern
                .captures_iter(lowered)
                .filter_map(|c| c.get(1))
                .find_map(|m| parse_digits(m.as_str()))
                .map(f64::from)
        };

        let azimuth = capture(&self.azimuth_pattern).map(wrap_azimuth);
        let elevation = capture(&self.elevation_pattern);

        if azimuth.is_none() && elevation.is_none() {
            return None;
        }
        Some(Command::Manual { azimuth, elevation })
    }

    fn celestial(&self, name: &str, observer: &ObserverLocation, instant: DateTime<Utc>) -> Command {
        match self.resolver.resolve_at(name, observer, instant) {
            Ok(Resolution {
                body,
                azimuth,
                elevation,
                below_horizon,
            }) => Command::Celestial {
                label: name.to_string(),
                display_name: body.display_name().to_string(),
                azimuth,
                elevation,
                below_horizon,
            },
            Err(failure) => Command::unresolved(ParseUnresolved::Resolver(failure)),
        }
    }
}

/// Zero code points of the decimal digit blocks accepted in spoken numbers
const DIGIT_ZEROS: &[u32] = &[
    0x0030, 0x0660, 0x06F0, 0x07C0, 0x0966, 0x09E6, 0x0A66, 0x0AE6, 0x0B66, 0x0BE6, 0x0C66,
    0x0CE6, 0x0D66, 0x0DE6, 0x0E50, 0x0ED0, 0x0F20, 0x1040, 0x1090, 0x17E0, 0x1810, 0xFF10,
];

fn digit_value(c: char) -> Option<u32> {
    let code = c as u32;
    DIGIT_ZEROS
        .iter()
        .find(|&&zero| (zero..zero + 10).contains(&code))
        .map(|zero| code - zero)
}

/// Decimal value of a run of digits from any supported script; `None` on overflow
fn parse_digits(digits: &str) -> Option<u32> {
    digits.chars().try_fold(0u32, |acc, c| {
        acc.checked_mul(10)?.checked_add(digit_value(c)?)
    })
}

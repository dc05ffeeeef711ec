//! Parsed telescope commands

use crate::error::ParseUnresolved;
use newtonian_sky::ResolverFailure;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandKind {
    Preset,
    Manual,
    Celestial,
    Unresolved,
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CommandKind::Preset => "preset",
            CommandKind::Manual => "manual",
            CommandKind::Celestial => "celestial",
            CommandKind::Unresolved => "unresolved",
        };
        f.write_str(s)
    }
}

/// Result of interpreting one phrase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Command {
    Preset {
        label: String,
        azimuth: f64,
        elevation: f64,
    },
    /// Axes left out keep their previous target
    Manual {
        azimuth: Option<f64>,
        elevation: Option<f64>,
    },
    /// Elevation is as computed; negative means the body has set
    Celestial {
        label: String,
        display_name: String,
        azimuth: f64,
        elevation: f64,
        below_horizon: bool,
    },
    Unresolved {
        reason: ParseUnresolved,
    },
}

impl Command {
    pub fn unresolved(reason: ParseUnresolved) -> Self {
        Command::Unresolved { reason }
    }

    pub fn kind(&self) -> CommandKind {
        match self {
            Command::Preset { .. } => CommandKind::Preset,
            Command::Manual { .. } => CommandKind::Manual,
            Command::Celestial { .. } => CommandKind::Celestial,
            Command::Unresolved { .. } => CommandKind::Unresolved,
        }
    }

    pub fn azimuth(&self) -> Option<f64> {
        match self {
            Command::Preset { azimuth, .. } | Command::Celestial { azimuth, .. } => Some(*azimuth),
            Command::Manual { azimuth, .. } => *azimuth,
            Command::Unresolved { .. } => None,
        }
    }

    pub fn elevation(&self) -> Option<f64> {
        match self {
            Command::Preset { elevation, .. } | Command::Celestial { elevation, .. } => {
                Some(*elevation)
            }
            Command::Manual { elevation, .. } => *elevation,
            Command::Unresolved { .. } => None,
        }
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            Command::Preset { label, .. } | Command::Celestial { label, .. } => Some(label),
            _ => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        !matches!(self, Command::Unresolved { .. })
    }

    /// What to tell the user; `None` where the resolver has already spoken
    pub fn announcement(&self) -> Option<String> {
        match self {
            Command::Preset { label, .. } => Some(format!("Pointing to {}.", label)),
            Command::Manual { azimuth, elevation } => {
                let parts: Vec<String> = [
                    azimuth.map(|a| format!("azimuth {}", a)),
                    elevation.map(|e| format!("elevation {}", e)),
                ]
                .into_iter()
                .flatten()
                .collect();
                Some(format!("Moving to {}.", parts.join(", ")))
            }
            Command::Celestial {
                display_name,
                below_horizon: false,
                ..
            } => Some(format!("Now tracking {}.", display_name)),
            Command::Celestial {
                display_name,
                below_horizon: true,
                ..
            } => Some(format!(
                "{} is below the horizon. Rotating to its position; it will be visible when it rises.",
                display_name
            )),
            Command::Unresolved {
                reason: ParseUnresolved::Resolver(ResolverFailure::UnsupportedObject(_)),
            }
            | Command::Unresolved {
                reason: ParseUnresolved::Resolver(ResolverFailure::ProviderUnavailable),
            } => None,
            Command::Unresolved { .. } => {
                Some("Sorry, I did not recognise that command.".to_string())
            }
        }
    }
}

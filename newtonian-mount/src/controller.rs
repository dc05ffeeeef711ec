//! Applies parsed commands to the animator

use crate::animator::{Frame, OrientationAnimator, TargetRequest};
use crate::error::MountError;
use newtonian_cmd::Command;
use newtonian_core::{AnimationConfig, Orientation};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ApplyOutcome {
    /// Animation started towards this (normalized) target
    Started(Orientation),
    /// An animation is already running
    Rejected,
    /// The command carried no target
    Ignored,
}

pub struct MountController {
    animator: OrientationAnimator,
    show_axes: bool,
}

impl MountController {
    pub fn new(animator: OrientationAnimator, show_axes: bool) -> Self {
        Self { animator, show_axes }
    }

    pub fn from_config(config: &AnimationConfig) -> Self {
        Self::new(
            OrientationAnimator::from_config(config, config.start.normalized()),
            config.show_axes,
        )
    }

    pub fn animator(&self) -> &OrientationAnimator {
        &self.animator
    }

    pub fn current(&self) -> Orientation {
        self.animator.current()
    }

    pub fn is_animating(&self) -> bool {
        self.animator.is_animating()
    }

    pub fn show_axes(&self) -> bool {
        self.show_axes
    }

    pub fn set_show_axes(&mut self, show: bool) {
        self.show_axes = show;
    }

    /// Point at whatever `command` names. Axes a manual command leaves out keep the
    /// previous target.
    pub fn apply(&mut self, command: &Command) -> Result<ApplyOutcome, MountError> {
        if !command.is_resolved() {
            debug!("Unresolved command leaves the mount where it is");
            return Ok(ApplyOutcome::Ignored);
        }

        let previous = self.animator.target();
        let azimuth = command.azimuth().unwrap_or(previous.azimuth);
        let elevation = command.elevation().unwrap_or(previous.elevation);
        self.goto(azimuth, elevation)
    }

    /// Start an animation to the given angles after wrapping azimuth and clamping
    /// elevation
    pub fn goto(&mut self, azimuth: f64, elevation: f64) -> Result<ApplyOutcome, MountError> {
        if !azimuth.is_finite() || !elevation.is_finite() {
            return Err(MountError::InvalidTarget(format!(
                "azimuth {} / elevation {}",
                azimuth, elevation
            )));
        }

        let target = Orientation::new(azimuth, elevation).normalized();
        match self.animator.request_target(target) {
            TargetRequest::Accepted => {
                info!(
                    "Slewing to Az={:.2}°, El={:.2}°",
                    target.azimuth, target.elevation
                );
                Ok(ApplyOutcome::Started(target))
            }
            TargetRequest::Rejected => Ok(ApplyOutcome::Rejected),
        }
    }

    pub fn tick(&mut self) -> Option<Frame> {
        self.animator.tick()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use newtonian_cmd::ParseUnresolved;

    fn finish(controller: &mut MountController) {
        while controller.tick().is_some() {}
    }

    #[test]
    fn test_starts_at_configured_orientation() {
        let controller = MountController::from_config(&AnimationConfig::default());
        assert_eq!(controller.current(), Orientation::new(0.0, 5.0));

        let controller = MountController::from_config(&AnimationConfig {
            start: Orientation::new(-90.0, 30.0),
            ..Default::default()
        });
        assert_eq!(controller.current(), Orientation::new(270.0, 30.0));
        assert!(!controller.is_animating());
    }

    #[test]
    fn test_manual_keeps_missing_axis() {
        let mut controller = MountController::from_config(&AnimationConfig::default());
        controller.goto(120.0, 40.0).unwrap();
        finish(&mut controller);

        let outcome = controller
            .apply(&Command::Manual {
                azimuth: None,
                elevation: Some(10.0),
            })
            .unwrap();
        assert_eq!(outcome, ApplyOutcome::Started(Orientation::new(120.0, 10.0)));
    }

    #[test]
    fn test_celestial_below_horizon_clamped() {
        let mut controller = MountController::from_config(&AnimationConfig::default());
        let outcome = controller
            .apply(&Command::Celestial {
                label: "mars".to_string(),
                display_name: "Mars".to_string(),
                azimuth: 123.45,
                elevation: -6.78,
                below_horizon: true,
            })
            .unwrap();
        assert_eq!(outcome, ApplyOutcome::Started(Orientation::new(123.45, 0.0)));
    }

    #[test]
    fn test_unresolved_is_ignored() {
        let mut controller = MountController::from_config(&AnimationConfig::default());
        let before = controller.animator().snapshot();
        let outcome = controller
            .apply(&Command::unresolved(ParseUnresolved::AiUnknown))
            .unwrap();
        assert_eq!(outcome, ApplyOutcome::Ignored);
        assert_eq!(controller.animator().snapshot(), before);
    }

    #[test]
    fn test_goto_wraps_and_rejects_nan() {
        let mut controller = MountController::from_config(&AnimationConfig::default());
        assert_eq!(
            controller.goto(-90.0, 120.0).unwrap(),
            ApplyOutcome::Started(Orientation::new(270.0, 90.0))
        );
        assert_eq!(controller.goto(10.0, 10.0).unwrap(), ApplyOutcome::Rejected);
        assert!(controller.goto(f64::NAN, 0.0).is_err());
    }
}

//! Orientation animator
//!
//! Two states. While idle a target request starts an animation from the current
//! orientation; while animating further requests are rejected. Each tick advances
//! one step along a smoothstep curve and the last step lands exactly on target.

use newtonian_core::{AnimationConfig, Orientation};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Ease-in/ease-out curve on [0, 1]
pub fn smoothstep(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnimatorState {
    Idle,
    Animating,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetRequest {
    Accepted,
    /// An animation is already running; nothing changed
    Rejected,
}

/// Snapshot of the animator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrientationState {
    pub current_azimuth: f64,
    pub current_elevation: f64,
    pub target_azimuth: f64,
    pub target_elevation: f64,
    pub step_index: u32,
    pub total_steps: u32,
    pub is_animating: bool,
}

/// One rendered tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub orientation: Orientation,
    pub step_index: u32,
    pub total_steps: u32,
    /// True on the tick that reached the target
    pub finished: bool,
}

#[derive(Debug, Clone)]
pub struct OrientationAnimator {
    state: OrientationState,
    start: Orientation,
}

impl OrientationAnimator {
    pub const DEFAULT_TOTAL_STEPS: u32 = 30;

    pub fn new(total_steps: u32, initial: Orientation) -> Self {
        Self {
            state: OrientationState {
                current_azimuth: initial.azimuth,
                current_elevation: initial.elevation,
                target_azimuth: initial.azimuth,
                target_elevation: initial.elevation,
                step_index: 0,
                total_steps: total_steps.max(1),
                is_animating: false,
            },
            start: initial,
        }
    }

    pub fn from_config(config: &AnimationConfig, initial: Orientation) -> Self {
        Self::new(config.total_steps, initial)
    }

    pub fn state(&self) -> AnimatorState {
        if self.state.is_animating {
            AnimatorState::Animating
        } else {
            AnimatorState::Idle
        }
    }

    pub fn is_animating(&self) -> bool {
        self.state.is_animating
    }

    pub fn snapshot(&self) -> OrientationState {
        self.state
    }

    pub fn current(&self) -> Orientation {
        Orientation::new(self.state.current_azimuth, self.state.current_elevation)
    }

    pub fn target(&self) -> Orientation {
        Orientation::new(self.state.target_azimuth, self.state.target_elevation)
    }

    /// Start moving towards `target`. Interpolation uses the raw difference on each
    /// axis, so 350 → 10 sweeps back through 180.
    pub fn request_target(&mut self, target: Orientation) -> TargetRequest {
        if self.state.is_animating {
            debug!(
                "Target ({:.2}, {:.2}) rejected, animation in progress",
                target.azimuth, target.elevation
            );
            return TargetRequest::Rejected;
        }

        self.start = self.current();
        self.state.target_azimuth = target.azimuth;
        self.state.target_elevation = target.elevation;
        self.state.step_index = 0;
        self.state.is_animating = true;
        TargetRequest::Accepted
    }

    /// Advance one step. Returns `None` while idle.
    pub fn tick(&mut self) -> Option<Frame> {
        if !self.state.is_animating {
            return None;
        }

        self.state.step_index += 1;
        let finished = self.state.step_index >= self.state.total_steps;

        if finished {
            self.state.step_index = self.state.total_steps;
            self.state.current_azimuth = self.state.target_azimuth;
            self.state.current_elevation = self.state.target_elevation;
            self.state.is_animating = false;
        } else {
            let t = self.state.step_index as f64 / self.state.total_steps as f64;
            let eased = smoothstep(t);
            self.state.current_azimuth =
                self.start.azimuth + (self.state.target_azimuth - self.start.azimuth) * eased;
            self.state.current_elevation =
                self.start.elevation + (self.state.target_elevation - self.start.elevation) * eased;
        }

        Some(Frame {
            orientation: self.current(),
            step_index: self.state.step_index,
            total_steps: self.state.total_steps,
            finished,
        })
    }
}

impl Default for OrientationAnimator {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TOTAL_STEPS, Orientation::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smoothstep_endpoints() {
        assert_eq!(smoothstep(0.0), 0.0);
        assert_eq!(smoothstep(0.5), 0.5);
        assert_eq!(smoothstep(1.0), 1.0);
        assert_eq!(smoothstep(2.0), 1.0);
    }

    #[test]
    fn test_idle_tick_does_nothing() {
        let mut animator = OrientationAnimator::default();
        assert!(animator.tick().is_none());
        assert_eq!(animator.state(), AnimatorState::Idle);
    }

    #[test]
    fn test_reaches_target_in_exact_steps() {
        let mut animator = OrientationAnimator::new(30, Orientation::new(0.0, 0.0));
        assert_eq!(
            animator.request_target(Orientation::new(90.0, 45.0)),
            TargetRequest::Accepted
        );

        let mut frames = Vec::new();
        while let Some(frame) = animator.tick() {
            frames.push(frame);
        }

        assert_eq!(frames.len(), 30);
        assert!(frames[..29].iter().all(|f| !f.finished));
        let last = frames[29];
        assert!(last.finished);
        assert_eq!(last.orientation, Orientation::new(90.0, 45.0));
        assert_eq!(animator.snapshot().step_index, 30);

        // Halfway through the eased curve is exactly halfway in space
        assert!((frames[14].orientation.azimuth - 45.0).abs() < 1e-9);
    }

    #[test]
    fn test_every_step_follows_smoothstep() {
        let mut animator = OrientationAnimator::new(30, Orientation::new(0.0, 0.0));
        animator.request_target(Orientation::new(180.0, 90.0));

        for k in 1..30u32 {
            let frame = animator.tick().unwrap();
            let t = k as f64 / 30.0;
            let s = t * t * (3.0 - 2.0 * t);
            assert_eq!(frame.step_index, k);
            assert!(!frame.finished);
            assert!((frame.orientation.azimuth - 180.0 * s).abs() < 1e-9, "step {}", k);
            assert!((frame.orientation.elevation - 90.0 * s).abs() < 1e-9, "step {}", k);
        }

        let last = animator.tick().unwrap();
        assert!(last.finished);
        assert_eq!(last.step_index, 30);
        assert_eq!(last.orientation, Orientation::new(180.0, 90.0));
        assert!(animator.tick().is_none());
    }

    #[test]
    fn test_request_while_animating_rejected() {
        let mut animator = OrientationAnimator::new(10, Orientation::new(0.0, 0.0));
        animator.request_target(Orientation::new(100.0, 50.0));
        animator.tick();
        let before = animator.snapshot();

        assert_eq!(
            animator.request_target(Orientation::new(200.0, 10.0)),
            TargetRequest::Rejected
        );
        assert_eq!(animator.snapshot(), before);
    }

    #[test]
    fn test_no_shortest_arc() {
        let mut animator = OrientationAnimator::new(2, Orientation::new(350.0, 0.0));
        animator.request_target(Orientation::new(10.0, 0.0));
        let mid = animator.tick().unwrap();
        assert!((mid.orientation.azimuth - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_stationary_request_still_animates() {
        let mut animator = OrientationAnimator::new(3, Orientation::new(20.0, 30.0));
        assert_eq!(
            animator.request_target(Orientation::new(20.0, 30.0)),
            TargetRequest::Accepted
        );
        assert!(animator.is_animating());
        assert_eq!(std::iter::from_fn(|| animator.tick()).count(), 3);
    }

    #[test]
    fn test_zero_steps_treated_as_one() {
        let mut animator = OrientationAnimator::new(0, Orientation::default());
        animator.request_target(Orientation::new(5.0, 5.0));
        let frame = animator.tick().unwrap();
        assert!(frame.finished);
        assert!(!animator.is_animating());
    }
}

//! Tick pacing and the visualization seam

use crate::animator::Frame;
use crate::controller::MountController;
use newtonian_core::Orientation;
use std::time::Duration;
use tokio::time::{interval, Interval, MissedTickBehavior};
use tracing::debug;

/// Receives the mount orientation after every tick; never writes back
pub trait OrientationSink: Send + Sync {
    fn show(&self, orientation: Orientation, show_axes: bool);
}

/// Sink that writes each frame to the debug log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl OrientationSink for LogSink {
    fn show(&self, orientation: Orientation, show_axes: bool) {
        let (x, y, z) = orientation.direction_vector(1.0);
        debug!(
            "Mount Az={:.2}°, El={:.2}° pointing ({:.3}, {:.3}, {:.3}) (axes {})",
            orientation.azimuth,
            orientation.elevation,
            x,
            y,
            z,
            if show_axes { "on" } else { "off" }
        );
    }
}

pub struct AnimationDriver {
    period: Duration,
}

impl AnimationDriver {
    pub fn new(period: Duration) -> Self {
        Self {
            period: period.max(Duration::from_millis(1)),
        }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Interval for a caller's own `select!` loop
    pub fn ticker(&self) -> Interval {
        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker
    }

    /// Advance one tick and show the resulting frame
    pub fn step(controller: &mut MountController, sink: &dyn OrientationSink) -> Option<Frame> {
        let frame = controller.tick()?;
        sink.show(frame.orientation, controller.show_axes());
        Some(frame)
    }

    /// Tick until the current animation finishes; returns the frames shown
    pub async fn run_until_idle(
        &self,
        controller: &mut MountController,
        sink: &dyn OrientationSink,
    ) -> Vec<Frame> {
        let mut ticker = self.ticker();
        let mut frames = Vec::new();
        while controller.is_animating() {
            ticker.tick().await;
            if let Some(frame) = Self::step(controller, sink) {
                frames.push(frame);
            }
        }
        frames
    }
}

impl Default for AnimationDriver {
    fn default() -> Self {
        Self::from_millis(20)
    }
}

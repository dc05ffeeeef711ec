//! newtonian-mount: Moving the telescope
//!
//! The animator eases the mount from its current orientation to a target over a
//! fixed number of ticks. The controller turns parsed commands into targets and
//! the driver paces ticks and hands each frame to the visualization sink.

pub mod animator;
pub mod controller;
pub mod driver;
pub mod error;

pub use animator::{smoothstep, AnimatorState, Frame, OrientationAnimator, OrientationState, TargetRequest};
pub use controller::{ApplyOutcome, MountController};
pub use driver::{AnimationDriver, LogSink, OrientationSink};
pub use error::MountError;

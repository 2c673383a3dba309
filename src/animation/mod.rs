//! Per-frame style transitions: easing curves and per-element queues.

pub mod easing;
pub mod queue;

pub use easing::EasingFunction;
pub use queue::{build, AnimationCommand, AnimationQueue, TransitionTiming};

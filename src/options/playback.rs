use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use web_time::Duration;

use crate::animation::{EasingFunction, TransitionTiming};

/// What happens to in-flight transitions when playback pauses.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum PauseMode {
    /// Stop transitions where they are; the index stays on the last
    /// completed frame.
    #[default]
    Truncate,
    /// Snap in-flight transitions to their targets and commit the frame
    /// they were heading to.
    FinishInFlight,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Playback", inline)]
#[serde(default)]
/// Transition timing and transport behavior.
pub struct PlaybackOptions {
    /// Duration of one frame's transition in milliseconds.
    #[schemars(
        title = "Frame Duration (ms)",
        range(min = 0, max = 10_000),
        extend("step" = 50)
    )]
    pub frame_duration_ms: u64,
    /// Pause behavior.
    #[schemars(title = "Pause Mode")]
    pub pause_mode: PauseMode,
    /// Easing curve of each transition.
    #[schemars(title = "Easing")]
    pub easing: EasingFunction,
}

impl Default for PlaybackOptions {
    fn default() -> Self {
        Self {
            frame_duration_ms: 1000,
            pause_mode: PauseMode::Truncate,
            easing: EasingFunction::Linear,
        }
    }
}

impl PlaybackOptions {
    /// Per-frame transition timing.
    #[must_use]
    pub fn timing(&self) -> TransitionTiming {
        TransitionTiming {
            duration: Duration::from_millis(self.frame_duration_ms),
            easing: self.easing,
        }
    }
}

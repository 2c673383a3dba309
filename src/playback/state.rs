//! Playback cursor and generation tokens.

use std::fmt;

/// Monotonic token invalidating callbacks issued before a discontinuity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Generation(u64);

impl Generation {
    /// The following generation.
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    /// Raw counter value.
    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "g{}", self.0)
    }
}

/// Where playback stands. The index is always the last fully rendered
/// frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// Stopped on a frame.
    Idle(usize),
    /// Advancing; the index is the last committed frame.
    Playing(usize),
}

impl PlaybackState {
    /// Current frame index.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::Idle(i) | Self::Playing(i) => i,
        }
    }

    /// Whether playback is advancing.
    #[must_use]
    pub fn is_playing(self) -> bool {
        matches!(self, Self::Playing(_))
    }
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::Idle(0)
    }
}

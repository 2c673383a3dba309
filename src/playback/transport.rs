//! The transport vocabulary and the readout it displays.
//!
//! Every transport interaction (play button, reset button, slider release,
//! programmatic call) is a [`TransportCommand`] passed to
//! [`Scheduler::execute`](super::Scheduler::execute). The scheduler answers
//! through [`Transport::render_state`]; no logic lives on the transport side.

/// A control action on the playback scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportCommand {
    /// Start or resume playback.
    Play,
    /// Pause playback.
    Pause,
    /// Play when idle, pause when playing (the single play/pause button).
    TogglePlayback,
    /// Return to frame 0.
    Reset,
    /// Jump to a frame (slider release).
    Scrub {
        /// Target frame index.
        index: usize,
    },
}

/// State shown by the transport after every committed change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportReadout {
    /// Slider position.
    pub index: usize,
    /// Formatted time of `index`.
    pub time_label: String,
    /// Play/pause icon state.
    pub is_playing: bool,
    /// Number of frames (slider range is `0..frame_count`).
    pub frame_count: usize,
}

/// Control surface the scheduler reports to.
pub trait Transport {
    /// Reflect the scheduler state (icon, slider, time text).
    fn render_state(&mut self, readout: &TransportReadout);

    /// Show a visible notice, e.g. after a failed trajectory load.
    fn show_notice(&mut self, message: &str) {
        log::warn!("{message}");
    }
}

/// Transport that only logs; used by headless drivers.
#[derive(Debug, Clone, Default)]
pub struct LogTransport {
    last: Option<TransportReadout>,
}

impl LogTransport {
    /// The last rendered readout.
    #[must_use]
    pub fn last(&self) -> Option<&TransportReadout> {
        self.last.as_ref()
    }
}

impl Transport for LogTransport {
    fn render_state(&mut self, readout: &TransportReadout) {
        log::info!(
            "[{}] frame {}/{} t={}",
            if readout.is_playing { "playing" } else { "paused" },
            readout.index,
            readout.frame_count.saturating_sub(1),
            readout.time_label
        );
        self.last = Some(readout.clone());
    }
}

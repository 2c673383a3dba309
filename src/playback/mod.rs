//! Trajectory playback.
//!
//! The [`Scheduler`] owns the playback cursor and turns transport commands
//! into timed transitions on a [`Scene`](crate::scene::Scene). Frames are
//! committed in order, one at a time; a pass never skips or repeats an
//! index, and every jump (reset, scrub, selection change) renders its
//! target instantly.
//!
//! ```text
//!          play                    clock commits last frame
//!   Idle(i) ─────▶ Playing(i) ──────────────────────────────▶ Idle(N-1)
//!      ▲              │  clock commits k: Playing(k)
//!      └──────────────┘
//!       pause / reset / scrub / select
//! ```

mod scheduler;
mod state;
mod transport;

pub use scheduler::{Completion, Scheduler};
pub use state::{Generation, PlaybackState};
pub use transport::{
    LogTransport, Transport, TransportCommand, TransportReadout,
};

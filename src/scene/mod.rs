//! The scene the scheduler drives.
//!
//! [`Scene`] is the narrow capability the playback core needs from a graph
//! renderer: look elements up, write styles instantly, start timed
//! transitions, stop everything, and manage tooltip overlays. Transitions
//! are fire-and-forget; the renderer reports each finished one by handing
//! its [`TransitionTicket`] back to
//! [`Scheduler::on_transition_complete`](crate::playback::Scheduler::on_transition_complete).

mod memory;

pub use memory::{MemoryScene, SceneElement, SceneEvent};
use web_time::Duration;

use crate::animation::AnimationCommand;
use crate::playback::Generation;
use crate::style::VisualStyle;
use crate::trajectory::ElementId;

/// What a transition animates.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Track {
    /// The scheduler's own pacing clock; animates nothing.
    Clock,
    /// A graph element.
    Element(ElementId),
}

/// Receipt for a started transition, returned on completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionTicket {
    /// Scheduler generation the transition was issued under.
    pub generation: Generation,
    /// Frame the transition ends on.
    pub frame: usize,
    /// Animated track.
    pub track: Track,
}

/// Graph renderer capability driven by the playback scheduler.
pub trait Scene {
    /// Whether `id` is currently present and animatable (not hidden inside
    /// a collapsed compound node).
    fn contains(&self, id: &ElementId) -> bool;

    /// Apply `style` immediately, without a transition.
    fn set_style(&mut self, id: &ElementId, style: &VisualStyle);

    /// Start a timed transition of `command.element` towards
    /// `command.target`. Its completion must be reported with `ticket`.
    /// A transition already running on the same element is replaced and
    /// reports no completion.
    fn transition(&mut self, command: &AnimationCommand, ticket: TransitionTicket);

    /// Start a style-less timer of `duration` whose completion is reported
    /// with `ticket`, like any transition.
    fn start_clock(&mut self, duration: Duration, ticket: TransitionTicket);

    /// Stop every in-flight transition. With `jump_to_end` the targets are
    /// applied; otherwise styles stay where the interpolation left them.
    /// Stopped transitions report no completion.
    fn stop_all(&mut self, jump_to_end: bool);

    /// Elements with an open tooltip overlay.
    fn open_tooltips(&self) -> Vec<ElementId>;

    /// Open the tooltip of `id`, or replace its text if already open.
    fn set_tooltip(&mut self, id: &ElementId, text: &str);

    /// Close the tooltip of `id`, if open.
    fn close_tooltip(&mut self, id: &ElementId);

    /// Whether `id` has an open tooltip.
    fn has_tooltip(&self, id: &ElementId) -> bool {
        self.open_tooltips().contains(id)
    }
}

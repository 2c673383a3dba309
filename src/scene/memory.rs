//! Headless scene that interpolates styles in memory.
//!
//! Time only moves when [`MemoryScene::update`] is called, which makes the
//! scene deterministic under test and lets the driver binary replay a
//! trajectory as fast as it likes.

use rustc_hash::FxHashMap;
use web_time::{Duration, Instant};

use super::{Scene, Track, TransitionTicket};
use crate::animation::{AnimationCommand, EasingFunction};
use crate::style::VisualStyle;
use crate::trajectory::{ElementId, Trajectory};

/// Live state of one element.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneElement {
    /// Current (possibly mid-transition) style.
    pub style: VisualStyle,
    /// Open tooltip text.
    pub tooltip: Option<String>,
    /// False while hidden inside a collapsed compound node.
    pub visible: bool,
}

/// A write to the scene, kept in the journal.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneEvent {
    /// Instant style write.
    SetStyle {
        /// Element written.
        element: ElementId,
        /// Style applied.
        style: VisualStyle,
    },
    /// Timed transition started.
    Transition {
        /// Element animated.
        element: ElementId,
        /// Frame the transition ends on.
        frame: usize,
        /// Target style.
        target: VisualStyle,
    },
    /// Pacing clock started.
    Clock {
        /// Frame the clock ends on.
        frame: usize,
    },
    /// All transitions stopped.
    StopAll {
        /// Whether targets were applied.
        jump_to_end: bool,
    },
    /// Tooltip opened, updated (`Some`) or closed (`None`).
    Tooltip {
        /// Element whose tooltip changed.
        element: ElementId,
        /// New text.
        text: Option<String>,
    },
}

#[derive(Debug)]
struct ActiveTransition {
    ticket: TransitionTicket,
    from: Option<VisualStyle>,
    to: Option<VisualStyle>,
    start: Instant,
    duration: Duration,
    easing: EasingFunction,
}

impl ActiveTransition {
    fn progress(&self, now: Instant) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.start);
        (elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }

    fn element(&self) -> Option<&ElementId> {
        match &self.ticket.track {
            Track::Element(id) => Some(id),
            Track::Clock => None,
        }
    }
}

/// In-memory [`Scene`] with explicit time.
pub struct MemoryScene {
    elements: FxHashMap<ElementId, SceneElement>,
    active: Vec<ActiveTransition>,
    now: Instant,
    journal: Vec<SceneEvent>,
}

impl MemoryScene {
    /// Empty scene whose clock starts now.
    #[must_use]
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    /// Empty scene whose clock starts at `now`.
    #[must_use]
    pub fn starting_at(now: Instant) -> Self {
        Self {
            elements: FxHashMap::default(),
            active: Vec::new(),
            now,
            journal: Vec::new(),
        }
    }

    /// Scene holding every element of `trajectory`, styled as frame 0.
    #[must_use]
    pub fn from_trajectory(trajectory: &Trajectory, now: Instant) -> Self {
        let mut scene = Self::starting_at(now);
        for track in trajectory.record().tracks() {
            if let Some(attrs) = track.frames.get(0) {
                scene.insert(track.id.clone(), attrs.style());
            }
        }
        scene
    }

    /// Add or replace an element.
    pub fn insert(&mut self, id: ElementId, style: VisualStyle) {
        let _ = self.elements.insert(
            id,
            SceneElement {
                style,
                tooltip: None,
                visible: true,
            },
        );
    }

    /// Show or hide an element (e.g. when its compound parent collapses).
    pub fn set_visible(&mut self, id: &ElementId, visible: bool) {
        if let Some(element) = self.elements.get_mut(id) {
            element.visible = visible;
        }
    }

    /// Live state of `id`.
    #[must_use]
    pub fn element(&self, id: &ElementId) -> Option<&SceneElement> {
        self.elements.get(id)
    }

    /// Current style of `id`.
    #[must_use]
    pub fn style(&self, id: &ElementId) -> Option<VisualStyle> {
        self.elements.get(id).map(|e| e.style)
    }

    /// Open tooltip text of `id`.
    #[must_use]
    pub fn tooltip(&self, id: &ElementId) -> Option<&str> {
        self.elements.get(id)?.tooltip.as_deref()
    }

    /// Scene time of the last update.
    #[must_use]
    pub fn now(&self) -> Instant {
        self.now
    }

    /// Number of in-flight transitions, clock included.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Writes recorded since the last [`take_journal`](Self::take_journal).
    #[must_use]
    pub fn journal(&self) -> &[SceneEvent] {
        &self.journal
    }

    /// Drain the journal.
    pub fn take_journal(&mut self) -> Vec<SceneEvent> {
        std::mem::take(&mut self.journal)
    }

    /// Advance scene time to `now`, interpolating every in-flight
    /// transition, and return the tickets of those that finished, in the
    /// order they were started.
    pub fn update(&mut self, now: Instant) -> Vec<TransitionTicket> {
        self.now = self.now.max(now);
        let mut completed = Vec::new();
        let mut still_active = Vec::with_capacity(self.active.len());

        for anim in std::mem::take(&mut self.active) {
            let t = anim.progress(self.now);
            if let (Some(id), Some(from), Some(to)) =
                (anim.element(), anim.from, anim.to)
            {
                if let Some(element) = self.elements.get_mut(id) {
                    element.style = from.lerp(&to, anim.easing.evaluate(t));
                }
            }
            if t >= 1.0 {
                completed.push(anim.ticket);
            } else {
                still_active.push(anim);
            }
        }

        self.active = still_active;
        completed
    }
}

impl Default for MemoryScene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene for MemoryScene {
    fn contains(&self, id: &ElementId) -> bool {
        self.elements.get(id).is_some_and(|e| e.visible)
    }

    fn set_style(&mut self, id: &ElementId, style: &VisualStyle) {
        if let Some(element) = self.elements.get_mut(id) {
            element.style = *style;
            self.journal.push(SceneEvent::SetStyle {
                element: id.clone(),
                style: *style,
            });
        }
    }

    fn transition(&mut self, command: &AnimationCommand, ticket: TransitionTicket) {
        let Some(element) = self.elements.get(&command.element) else {
            return;
        };
        let from = element.style;
        // A newer transition on the same element replaces the old one.
        self.active
            .retain(|a| a.element() != Some(&command.element));
        self.journal.push(SceneEvent::Transition {
            element: command.element.clone(),
            frame: command.frame,
            target: command.target,
        });
        self.active.push(ActiveTransition {
            ticket,
            from: Some(from),
            to: Some(command.target),
            start: self.now,
            duration: command.duration,
            easing: command.easing,
        });
    }

    fn start_clock(&mut self, duration: Duration, ticket: TransitionTicket) {
        self.active.retain(|a| a.ticket.track != Track::Clock);
        self.journal.push(SceneEvent::Clock {
            frame: ticket.frame,
        });
        self.active.push(ActiveTransition {
            ticket,
            from: None,
            to: None,
            start: self.now,
            duration,
            easing: EasingFunction::Linear,
        });
    }

    fn stop_all(&mut self, jump_to_end: bool) {
        for anim in std::mem::take(&mut self.active) {
            if !jump_to_end {
                continue;
            }
            if let (Some(id), Some(to)) = (anim.element(), anim.to) {
                if let Some(element) = self.elements.get_mut(id) {
                    element.style = to;
                }
            }
        }
        self.journal.push(SceneEvent::StopAll { jump_to_end });
    }

    fn open_tooltips(&self) -> Vec<ElementId> {
        let mut open: Vec<ElementId> = self
            .elements
            .iter()
            .filter(|(_, e)| e.tooltip.is_some())
            .map(|(id, _)| id.clone())
            .collect();
        open.sort();
        open
    }

    fn set_tooltip(&mut self, id: &ElementId, text: &str) {
        if let Some(element) = self.elements.get_mut(id) {
            element.tooltip = Some(text.to_owned());
            self.journal.push(SceneEvent::Tooltip {
                element: id.clone(),
                text: Some(text.to_owned()),
            });
        }
    }

    fn close_tooltip(&mut self, id: &ElementId) {
        if let Some(element) = self.elements.get_mut(id) {
            if element.tooltip.take().is_some() {
                self.journal.push(SceneEvent::Tooltip {
                    element: id.clone(),
                    text: None,
                });
            }
        }
    }

    fn has_tooltip(&self, id: &ElementId) -> bool {
        self.elements.get(id).is_some_and(|e| e.tooltip.is_some())
    }
}

impl std::fmt::Debug for MemoryScene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryScene")
            .field("elements", &self.elements.len())
            .field("active", &self.active.len())
            .field("journal_len", &self.journal.len())
            .finish_non_exhaustive()
    }
}

//! Per-element animation queues.
//!
//! One queue holds the remaining frames of one element for one play pass,
//! as ready-to-issue [`AnimationCommand`]s in increasing frame order.

use std::collections::VecDeque;

use web_time::Duration;

use super::easing::EasingFunction;
use crate::style::VisualStyle;
use crate::trajectory::{ElementId, TrajectoryRecord};

/// How long each per-frame transition takes and how it is eased.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionTiming {
    /// Duration of one frame's transition.
    pub duration: Duration,
    /// Easing curve of each transition.
    pub easing: EasingFunction,
}

impl TransitionTiming {
    /// Zero-duration timing used for jump renders.
    pub const INSTANT: Self = Self {
        duration: Duration::ZERO,
        easing: EasingFunction::Linear,
    };
}

impl Default for TransitionTiming {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(1000),
            easing: EasingFunction::Linear,
        }
    }
}

/// One style transition of one element towards one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationCommand {
    /// Animated element.
    pub element: ElementId,
    /// Frame the transition ends on.
    pub frame: usize,
    /// Style at the end of the transition.
    pub target: VisualStyle,
    /// Tooltip value for `frame`; applied by the scheduler, never animated.
    pub tooltip: f64,
    /// Transition duration.
    pub duration: Duration,
    /// Transition easing.
    pub easing: EasingFunction,
}

/// Remaining commands of one element, front first.
#[derive(Debug, Clone, Default)]
pub struct AnimationQueue {
    commands: VecDeque<AnimationCommand>,
}

impl AnimationQueue {
    /// Remove and return the next command.
    pub fn pop(&mut self) -> Option<AnimationCommand> {
        self.commands.pop_front()
    }

    /// Frame of the next command.
    #[must_use]
    pub fn next_frame(&self) -> Option<usize> {
        self.commands.front().map(|c| c.frame)
    }

    /// Drop every command for a frame before `frame`.
    pub fn skip_to(&mut self, frame: usize) {
        while self.next_frame().is_some_and(|next| next < frame) {
            let _ = self.commands.pop_front();
        }
    }

    /// Number of remaining commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether no commands remain.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl Iterator for AnimationQueue {
    type Item = AnimationCommand;

    fn next(&mut self) -> Option<AnimationCommand> {
        self.pop()
    }
}

/// Build the commands for `element` covering frames `[start_frame, N)`.
///
/// Elements without a track, and start frames past the end, yield an empty
/// queue.
#[must_use]
pub fn build(
    record: &TrajectoryRecord,
    element: &ElementId,
    start_frame: usize,
    timing: TransitionTiming,
) -> AnimationQueue {
    let Some(track) = record.track(element) else {
        return AnimationQueue::default();
    };

    let commands = (start_frame..track.frames.len())
        .filter_map(|frame| {
            let attrs = track.frames.get(frame)?;
            Some(AnimationCommand {
                element: element.clone(),
                frame,
                target: attrs.style(),
                tooltip: attrs.tooltip(),
                duration: timing.duration,
                easing: timing.easing,
            })
        })
        .collect();

    AnimationQueue { commands }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Color;
    use crate::trajectory::{EdgeFrame, ElementFrames, ElementTrack};

    fn record() -> TrajectoryRecord {
        let frames = ["#000", "#f00", "#0f0"]
            .iter()
            .enumerate()
            .map(|(i, c)| EdgeFrame {
                color: Color::parse(c).unwrap(),
                width: i as f32 + 1.0,
                tooltip: i as f64 * 10.0,
            })
            .collect();
        TrajectoryRecord::new(
            vec![ElementTrack {
                id: ElementId::edge("A", "B"),
                frames: ElementFrames::Edge(frames),
            }],
            3,
        )
        .unwrap()
    }

    #[test]
    fn builds_remaining_frames_in_order() {
        let queue = build(
            &record(),
            &ElementId::edge("A", "B"),
            1,
            TransitionTiming::default(),
        );
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.next_frame(), Some(1));

        let commands: Vec<_> = queue.collect();
        assert_eq!(commands[0].frame, 1);
        assert_eq!(
            commands[0].target,
            VisualStyle::Edge {
                color: Color::rgb(255, 0, 0),
                width: 2.0,
            }
        );
        assert_eq!(commands[0].tooltip, 10.0);
        assert_eq!(commands[0].duration, Duration::from_millis(1000));
        assert_eq!(commands[1].frame, 2);
    }

    #[test]
    fn skip_to_drops_earlier_frames() {
        let mut queue = build(
            &record(),
            &ElementId::edge("A", "B"),
            0,
            TransitionTiming::default(),
        );
        queue.skip_to(2);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.next_frame(), Some(2));
        queue.skip_to(1);
        assert_eq!(queue.next_frame(), Some(2));
    }

    #[test]
    fn unknown_element_yields_empty_queue() {
        let queue = build(
            &record(),
            &ElementId::node("ghost"),
            0,
            TransitionTiming::default(),
        );
        assert!(queue.is_empty());
    }

    #[test]
    fn start_past_end_yields_empty_queue() {
        let queue = build(
            &record(),
            &ElementId::edge("A", "B"),
            3,
            TransitionTiming::INSTANT,
        );
        assert!(queue.is_empty());
        assert_eq!(queue.next_frame(), None);
    }
}

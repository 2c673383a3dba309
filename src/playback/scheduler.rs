//! The playback state machine.
//!
//! A play pass issues one transition per element per frame and one pacing
//! clock per frame. Element chains run independently: an element's next
//! command goes out when its previous transition completes, unless the
//! clock has not yet started that frame, in which case the element is
//! parked until it does. Only the clock commits the shared index, so a
//! slow or empty element never holds playback back.
//!
//! Every discontinuity (play, pause, reset, scrub, natural completion,
//! selection change) moves to a new [`Generation`]; tickets from older
//! generations are dropped on arrival.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::state::{Generation, PlaybackState};
use super::transport::{Transport, TransportCommand, TransportReadout};
use crate::animation::{self, AnimationQueue};
use crate::error::PlayerError;
use crate::options::{Options, PauseMode};
use crate::scene::{Scene, Track, TransitionTicket};
use crate::trajectory::{
    ElementId, SimulationSelection, Trajectory, TrajectoryStore,
};

/// What a completed ticket did to the scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// Issued under an older generation; dropped.
    Stale,
    /// Current generation but no pass is running; dropped.
    Ignored,
    /// The element's next frame was issued.
    Advanced(ElementId),
    /// The element waits for the clock before its next frame.
    Parked(ElementId),
    /// The element has no frames left in this pass.
    Drained(ElementId),
    /// The clock committed this frame and moved on.
    Committed(usize),
    /// The clock committed the last frame; playback is idle.
    Finished(usize),
}

/// Per-pass bookkeeping, dropped on every discontinuity.
#[derive(Debug)]
struct PlaybackPass {
    queues: FxHashMap<ElementId, AnimationQueue>,
    /// Elements waiting for the clock to start their next frame.
    parked: Vec<ElementId>,
    /// Frame the clock is currently running towards.
    clock_frame: usize,
}

/// Drives trajectory playback over a scene and reports to a transport.
///
/// One scheduler exists per rendered scene; it owns the scene, the
/// transport, the trajectory store and the playback cursor.
pub struct Scheduler<S: Scene, T: Transport> {
    scene: S,
    transport: T,
    store: TrajectoryStore,
    trajectory: Arc<Trajectory>,
    options: Options,
    state: PlaybackState,
    generation: Generation,
    pass: Option<PlaybackPass>,
}

impl<S: Scene, T: Transport> Scheduler<S, T> {
    /// Load `selection` through `store` and render its frame 0.
    ///
    /// A store that already holds `selection` is not asked to reload it.
    pub fn new(
        scene: S,
        transport: T,
        mut store: TrajectoryStore,
        selection: &SimulationSelection,
        options: Options,
    ) -> Result<Self, PlayerError> {
        let trajectory = store.load(selection)?;

        let mut scheduler = Self {
            scene,
            transport,
            store,
            trajectory,
            options,
            state: PlaybackState::default(),
            generation: Generation::default(),
            pass: None,
        };
        scheduler.render_frame(0);
        scheduler.refresh_tooltips(0);
        scheduler.render_readout();
        Ok(scheduler)
    }

    // ── Transport commands ─────────────────────────────────────────────

    /// Execute a transport command.
    pub fn execute(&mut self, command: TransportCommand) {
        match command {
            TransportCommand::Play => self.play(),
            TransportCommand::Pause => self.pause(),
            TransportCommand::TogglePlayback => {
                if self.state.is_playing() {
                    self.pause();
                } else {
                    self.play();
                }
            }
            TransportCommand::Reset => self.reset(),
            TransportCommand::Scrub { index } => self.scrub(index),
        }
    }

    /// Start playback from the current frame. No-op while playing.
    pub fn play(&mut self) {
        let PlaybackState::Idle(start) = self.state else {
            log::debug!("play ignored: already playing");
            return;
        };

        self.generation = self.generation.next();
        let trajectory = Arc::clone(&self.trajectory);
        let record = trajectory.record();
        let timing = self.options.playback.timing();

        let mut order = Vec::with_capacity(record.len());
        let mut queues = FxHashMap::default();
        for track in record.tracks() {
            if !self.scene.contains(&track.id) {
                log::trace!("{} not in scene, skipped", track.id);
                continue;
            }
            let queue = animation::build(record, &track.id, start, timing);
            if queue.is_empty() {
                log::debug!("{} has no frames from {start}, excluded", track.id);
                continue;
            }
            order.push(track.id.clone());
            let _ = queues.insert(track.id.clone(), queue);
        }

        log::info!(
            "Playback started at frame {start}/{} with {} elements ({})",
            trajectory.time_axis().last_index(),
            order.len(),
            self.generation
        );

        self.state = PlaybackState::Playing(start);
        self.pass = Some(PlaybackPass {
            queues,
            parked: Vec::new(),
            clock_frame: start,
        });

        self.start_clock(start);
        for id in &order {
            self.issue_next(id);
        }
        self.render_readout();
    }

    /// Pause at the last committed frame. No-op while idle.
    pub fn pause(&mut self) {
        let PlaybackState::Playing(committed) = self.state else {
            log::debug!("pause ignored: not playing");
            return;
        };

        let index = match self.options.playback.pause_mode {
            PauseMode::Truncate => {
                self.scene.stop_all(false);
                committed
            }
            PauseMode::FinishInFlight => {
                self.scene.stop_all(true);
                let in_flight = self
                    .pass
                    .as_ref()
                    .map_or(committed, |pass| pass.clock_frame);
                // Lagging elements jumped to older targets; align them.
                self.render_frame(in_flight);
                in_flight
            }
        };

        self.stop_pass();
        self.state = PlaybackState::Idle(index);
        if index != committed {
            self.refresh_tooltips(index);
        }
        log::info!("Playback paused at frame {index} ({})", self.generation);
        self.render_readout();
    }

    /// Jump to frame 0 with instant styles, from any state.
    pub fn reset(&mut self) {
        self.jump_to(0);
        log::info!("Playback reset ({})", self.generation);
    }

    /// Pause if playing and jump to `index` with instant styles. Indices
    /// past the end are clamped to the last frame.
    pub fn scrub(&mut self, index: usize) {
        let last = self.trajectory.time_axis().last_index();
        if index > last {
            log::debug!("scrub to {index} clamped to {last}");
        }
        self.jump_to(index.min(last));
    }

    // ── Host events ────────────────────────────────────────────────────

    /// Handle the completion of a transition started by this scheduler.
    pub fn on_transition_complete(
        &mut self,
        ticket: TransitionTicket,
    ) -> Completion {
        if ticket.generation != self.generation {
            log::debug!(
                "stale completion of {:?} frame {} ignored ({} != {})",
                ticket.track,
                ticket.frame,
                ticket.generation,
                self.generation
            );
            return Completion::Stale;
        }
        if !self.state.is_playing() || self.pass.is_none() {
            return Completion::Ignored;
        }

        match ticket.track {
            Track::Clock => self.commit(ticket.frame),
            Track::Element(id) => self.advance_element(id, ticket.frame),
        }
    }

    /// Compound nodes are about to collapse or expand; element membership
    /// of the scene is changing, so playback pauses first.
    pub fn before_compound_toggle(&mut self) {
        if self.state.is_playing() {
            log::debug!("compound toggle pauses playback");
            self.pause();
        }
    }

    /// Open the tooltip of `id` showing its current value, or close it if
    /// already open. Elements without a track are ignored.
    pub fn toggle_tooltip(&mut self, id: &ElementId) {
        if self.scene.has_tooltip(id) {
            self.scene.close_tooltip(id);
            return;
        }
        let Some(attrs) = self.trajectory.record().frame(id, self.state.index())
        else {
            return;
        };
        let text = self.options.display.tooltip_label(attrs.tooltip());
        self.scene.set_tooltip(id, &text);
    }

    /// Switch to another simulation run or process.
    ///
    /// On success the trajectory is replaced, playback stops and frame 0 is
    /// rendered. On failure nothing changes: the error is shown through the
    /// transport and returned.
    pub fn select(
        &mut self,
        selection: &SimulationSelection,
    ) -> Result<(), PlayerError> {
        let trajectory = match self.store.load(selection) {
            Ok(trajectory) => trajectory,
            Err(e) => {
                log::error!("Failed to load {selection}: {e}");
                self.transport
                    .show_notice(&format!("Could not load {selection}: {e}"));
                return Err(e);
            }
        };

        self.scene.stop_all(false);
        self.stop_pass();
        self.trajectory = trajectory;
        self.state = PlaybackState::Idle(0);
        self.render_frame(0);
        self.refresh_tooltips(0);
        self.render_readout();
        Ok(())
    }

    // ── Accessors ──────────────────────────────────────────────────────

    /// Current playback state.
    #[must_use]
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Current frame index.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.state.index()
    }

    /// Whether playback is advancing.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.state.is_playing()
    }

    /// Current generation token.
    #[must_use]
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// The trajectory being played.
    #[must_use]
    pub fn trajectory(&self) -> &Arc<Trajectory> {
        &self.trajectory
    }

    /// The current simulation selection.
    #[must_use]
    pub fn selection(&self) -> Option<&SimulationSelection> {
        self.store.current_selection()
    }

    /// Active options.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// The driven scene.
    #[must_use]
    pub fn scene(&self) -> &S {
        &self.scene
    }

    /// Mutable access to the scene, e.g. to advance its time.
    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }

    /// The transport.
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    // ── Internals ──────────────────────────────────────────────────────

    fn ticket(&self, frame: usize, track: Track) -> TransitionTicket {
        TransitionTicket {
            generation: self.generation,
            frame,
            track,
        }
    }

    fn start_clock(&mut self, frame: usize) {
        let ticket = self.ticket(frame, Track::Clock);
        let duration = self.options.playback.timing().duration;
        self.scene.start_clock(duration, ticket);
    }

    /// Issue the next queued command of `id`, if any.
    fn issue_next(&mut self, id: &ElementId) {
        let generation = self.generation;
        let Some(pass) = self.pass.as_mut() else {
            return;
        };
        let Some(command) = pass.queues.get_mut(id).and_then(AnimationQueue::pop)
        else {
            return;
        };
        let ticket = TransitionTicket {
            generation,
            frame: command.frame,
            track: Track::Element(id.clone()),
        };
        self.scene.transition(&command, ticket);
    }

    fn advance_element(&mut self, id: ElementId, frame: usize) -> Completion {
        let last = self.trajectory.time_axis().last_index();
        let Some(pass) = self.pass.as_mut() else {
            return Completion::Ignored;
        };
        let Some(queue) = pass.queues.get(&id) else {
            return Completion::Ignored;
        };
        let next = queue.next_frame();
        let issued = next.map_or(Some(last), |n| n.checked_sub(1));
        if issued != Some(frame) {
            log::debug!("{id} frame {frame} was superseded");
            return Completion::Ignored;
        }

        let Some(next) = next else {
            let _ = pass.queues.remove(&id);
            return Completion::Drained(id);
        };
        if next > pass.clock_frame {
            pass.parked.push(id.clone());
            return Completion::Parked(id);
        }
        self.issue_next(&id);
        Completion::Advanced(id)
    }

    fn commit(&mut self, frame: usize) -> Completion {
        self.catch_up(frame);
        let previous = self.state.index();
        if frame != previous {
            self.refresh_tooltips(frame);
        }

        let last = self.trajectory.time_axis().last_index();
        if frame >= last {
            self.stop_pass();
            self.state = PlaybackState::Idle(frame);
            log::info!("Playback finished at frame {frame}");
            self.render_readout();
            return Completion::Finished(frame);
        }

        self.state = PlaybackState::Playing(frame);
        self.render_readout();

        let next = frame + 1;
        let parked = self.pass.as_mut().map_or_else(Vec::new, |pass| {
            pass.clock_frame = next;
            std::mem::take(&mut pass.parked)
        });
        self.start_clock(next);
        for id in &parked {
            self.issue_next(id);
        }
        Completion::Committed(frame)
    }

    /// Start `frame` on every element still animating an earlier one, so
    /// all elements have begun `frame` before the clock moves past it.
    fn catch_up(&mut self, frame: usize) {
        let Some(pass) = self.pass.as_mut() else {
            return;
        };
        let mut behind: Vec<ElementId> = pass
            .queues
            .iter_mut()
            .filter_map(|(id, queue)| {
                if queue.next_frame()? > frame {
                    return None;
                }
                queue.skip_to(frame);
                Some(id.clone())
            })
            .collect();
        behind.sort();
        for id in &behind {
            log::debug!("{id} is behind the clock, jumping to frame {frame}");
            self.issue_next(id);
        }
    }

    /// Drop the running pass and invalidate its outstanding tickets.
    fn stop_pass(&mut self) {
        self.pass = None;
        self.generation = self.generation.next();
    }

    fn jump_to(&mut self, index: usize) {
        self.scene.stop_all(false);
        self.stop_pass();
        self.state = PlaybackState::Idle(index);
        self.render_frame(index);
        self.refresh_tooltips(index);
        self.render_readout();
    }

    /// Instantly apply `frame` to every live element.
    fn render_frame(&mut self, frame: usize) {
        let trajectory = Arc::clone(&self.trajectory);
        for track in trajectory.record().tracks() {
            if !self.scene.contains(&track.id) {
                log::trace!("{} not in scene, skipped", track.id);
                continue;
            }
            if let Some(attrs) = track.frames.get(frame) {
                self.scene.set_style(&track.id, &attrs.style());
            }
        }
    }

    /// Point every open tooltip at `frame`.
    fn refresh_tooltips(&mut self, frame: usize) {
        for id in self.scene.open_tooltips() {
            if let Some(attrs) = self.trajectory.record().frame(&id, frame) {
                let text = self.options.display.tooltip_label(attrs.tooltip());
                self.scene.set_tooltip(&id, &text);
            }
        }
    }

    fn render_readout(&mut self) {
        let index = self.state.index();
        let time = self.trajectory.time_axis().get(index).unwrap_or_default();
        let readout = TransportReadout {
            index,
            time_label: self.options.display.time_label(time),
            is_playing: self.state.is_playing(),
            frame_count: self.trajectory.frame_count(),
        };
        self.transport.render_state(&readout);
    }
}

impl<S: Scene, T: Transport> std::fmt::Debug for Scheduler<S, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("state", &self.state)
            .field("generation", &self.generation)
            .field("frames", &self.trajectory.frame_count())
            .field("pass", &self.pass)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use web_time::{Duration, Instant};

    use super::*;
    use crate::scene::{MemoryScene, SceneEvent};
    use crate::style::{Color, VisualStyle};
    use crate::trajectory::payload::{EdgePayload, NodePayload, PayloadElements};
    use crate::trajectory::{ProcessKind, StaticSource, TrajectoryPayload};

    #[derive(Debug, Default)]
    struct RecordingTransport {
        readouts: Vec<TransportReadout>,
        notices: Vec<String>,
    }

    impl Transport for RecordingTransport {
        fn render_state(&mut self, readout: &TransportReadout) {
            self.readouts.push(readout.clone());
        }

        fn show_notice(&mut self, message: &str) {
            self.notices.push(message.to_owned());
        }
    }

    type TestScheduler = Scheduler<MemoryScene, RecordingTransport>;

    const STEP: Duration = Duration::from_millis(500);
    const FRAME: Duration = Duration::from_millis(1000);

    fn edge() -> ElementId {
        ElementId::edge("A", "B")
    }

    fn node() -> ElementId {
        ElementId::node("A")
    }

    fn rgb(hex: &str) -> Option<Color> {
        Color::parse(hex)
    }

    fn color_of(style: VisualStyle) -> Option<Color> {
        match style {
            VisualStyle::Edge { color, .. } => Some(color),
            VisualStyle::Node { .. } => None,
        }
    }

    /// Edge `A->B` with the given colors and node `A`, half a time unit
    /// apart. Edge tooltips are 1000, 2000, ...
    fn payload(colors: &[&str]) -> TrajectoryPayload {
        let n = colors.len();
        TrajectoryPayload {
            time_axis: (0..n).map(|i| i as f64 * 0.5).collect(),
            elements: PayloadElements {
                edges: vec![EdgePayload {
                    source: "A".to_owned(),
                    target: "B".to_owned(),
                    per_frame_color: colors
                        .iter()
                        .map(|&c| c.to_owned())
                        .collect(),
                    per_frame_width: vec![2.0; n],
                    per_frame_tooltip: (1..=n)
                        .map(|i| i as f64 * 1000.0)
                        .collect(),
                }],
                nodes: vec![NodePayload {
                    id: "A".to_owned(),
                    node_type: Some("species".to_owned()),
                    per_frame_pie_fraction: (0..n)
                        .map(|i| i as f32 / 4.0)
                        .collect(),
                    per_frame_tooltip: vec![0.0; n],
                }],
            },
        }
    }

    fn scheduler_with(source: StaticSource, options: Options) -> TestScheduler {
        let selection = SimulationSelection::default();
        let mut store = TrajectoryStore::new(
            source,
            options.display.compound_kinds.clone(),
        );
        let trajectory = store.load(&selection).unwrap();
        let scene = MemoryScene::from_trajectory(&trajectory, Instant::now());
        Scheduler::new(
            scene,
            RecordingTransport::default(),
            store,
            &selection,
            options,
        )
        .unwrap()
    }

    fn scheduler(colors: &[&str]) -> TestScheduler {
        let source = StaticSource::new()
            .with(SimulationSelection::default(), payload(colors));
        scheduler_with(source, Options::default())
    }

    /// Advance scene time by `by` and feed every completion back.
    fn advance(s: &mut TestScheduler, by: Duration) -> Vec<Completion> {
        let now = s.scene().now() + by;
        let tickets = s.scene_mut().update(now);
        tickets
            .into_iter()
            .map(|ticket| s.on_transition_complete(ticket))
            .collect()
    }

    /// Run until playback stops, returning every committed index.
    fn run_to_end(s: &mut TestScheduler) -> Vec<usize> {
        let mut committed = Vec::new();
        for _ in 0..100 {
            for completion in advance(s, STEP) {
                if let Completion::Committed(i) | Completion::Finished(i) =
                    completion
                {
                    committed.push(i);
                }
            }
            if !s.is_playing() {
                break;
            }
        }
        committed
    }

    fn edge_color(s: &TestScheduler) -> Option<Color> {
        s.scene().style(&edge()).and_then(color_of)
    }

    fn edge_writes(journal: &[SceneEvent]) -> Vec<Option<Color>> {
        journal
            .iter()
            .filter_map(|event| match event {
                SceneEvent::SetStyle { element, style } if *element == edge() => {
                    Some(color_of(*style))
                }
                _ => None,
            })
            .collect()
    }

    #[test]
    fn new_renders_frame_zero() {
        let s = scheduler(&["#000", "#f00", "#0f0"]);
        assert_eq!(s.state(), PlaybackState::Idle(0));
        assert_eq!(
            s.transport().readouts,
            vec![TransportReadout {
                index: 0,
                time_label: "0.00".to_owned(),
                is_playing: false,
                frame_count: 3,
            }]
        );
        assert_eq!(edge_writes(s.scene().journal()), vec![rgb("#000")]);
    }

    #[test]
    fn play_visits_every_frame_once_and_stops_on_last() {
        let mut s = scheduler(&["#000", "#f00", "#0f0"]);
        s.play();
        assert_eq!(s.state(), PlaybackState::Playing(0));

        assert_eq!(run_to_end(&mut s), vec![0, 1, 2]);
        assert_eq!(s.state(), PlaybackState::Idle(2));
        assert_eq!(edge_color(&s), rgb("#0f0"));
        assert_eq!(
            s.scene().style(&node()),
            Some(VisualStyle::Node { pie_fraction: 0.5 })
        );

        let last = s.transport().readouts.last().unwrap();
        assert_eq!(last.index, 2);
        assert_eq!(last.time_label, "1.00");
        assert!(!last.is_playing);
    }

    #[test]
    fn element_waits_for_the_clock() {
        let mut s = scheduler(&["#000", "#f00", "#0f0"]);
        s.play();
        let _ = s.scene_mut().take_journal();

        // Edge finishes frame 0 before the clock does.
        let early = TransitionTicket {
            generation: s.generation(),
            frame: 0,
            track: Track::Element(edge()),
        };
        assert_eq!(s.on_transition_complete(early), Completion::Parked(edge()));
        assert!(s.scene().journal().is_empty());

        let clock = TransitionTicket {
            generation: s.generation(),
            frame: 0,
            track: Track::Clock,
        };
        assert_eq!(s.on_transition_complete(clock), Completion::Committed(0));
        assert!(s.scene().journal().contains(&SceneEvent::Transition {
            element: edge(),
            frame: 1,
            target: VisualStyle::Edge {
                color: Color::rgb(255, 0, 0),
                width: 2.0,
            },
        }));
    }

    #[test]
    fn lagging_element_is_caught_up_before_the_next_frame() {
        let mut s = scheduler(&["#000", "#f00", "#0f0"]);
        s.play();
        let _ = s.scene_mut().take_journal();
        let clock = |s: &TestScheduler, frame| TransitionTicket {
            generation: s.generation(),
            frame,
            track: Track::Clock,
        };

        // The clock finishes two frames while the edge is still on frame 0.
        assert_eq!(
            s.on_transition_complete(clock(&s, 0)),
            Completion::Committed(0)
        );
        assert_eq!(
            s.on_transition_complete(clock(&s, 1)),
            Completion::Committed(1)
        );

        let journal = s.scene().journal();
        let position = |wanted: &SceneEvent| {
            journal.iter().position(|event| event == wanted)
        };
        let edge_frame_1 = position(&SceneEvent::Transition {
            element: edge(),
            frame: 1,
            target: VisualStyle::Edge {
                color: Color::rgb(255, 0, 0),
                width: 2.0,
            },
        });
        let clock_frame_2 = position(&SceneEvent::Clock { frame: 2 });
        assert!(edge_frame_1.is_some());
        assert!(edge_frame_1 < clock_frame_2);

        // The replaced frame-0 transition no longer drives the edge.
        let late = TransitionTicket {
            generation: s.generation(),
            frame: 0,
            track: Track::Element(edge()),
        };
        assert_eq!(s.on_transition_complete(late), Completion::Ignored);
    }

    #[test]
    fn play_while_playing_is_ignored() {
        let mut s = scheduler(&["#000", "#f00", "#0f0"]);
        s.play();
        let generation = s.generation();
        let readouts = s.transport().readouts.len();
        let active = s.scene().active_count();

        s.play();
        assert_eq!(s.generation(), generation);
        assert_eq!(s.transport().readouts.len(), readouts);
        assert_eq!(s.scene().active_count(), active);
    }

    #[test]
    fn pause_truncates_and_resume_continues() {
        let mut s = scheduler(&["#000", "#f00", "#0f0", "#00f", "#fff"]);
        s.play();
        let _ = advance(&mut s, FRAME);
        let _ = advance(&mut s, FRAME);
        let _ = advance(&mut s, STEP);
        assert_eq!(s.state(), PlaybackState::Playing(1));

        let before_pause = s.generation();
        s.pause();
        assert_eq!(s.state(), PlaybackState::Idle(1));
        assert_eq!(s.scene().active_count(), 0);
        let mid = edge_color(&s);
        assert_ne!(mid, rgb("#f00"));
        assert_ne!(mid, rgb("#0f0"));
        assert!(!s.transport().readouts.last().unwrap().is_playing);

        // A late completion from before the pause changes nothing.
        let late = TransitionTicket {
            generation: before_pause,
            frame: 2,
            track: Track::Clock,
        };
        assert_eq!(s.on_transition_complete(late), Completion::Stale);
        assert_eq!(s.state(), PlaybackState::Idle(1));

        s.play();
        assert_eq!(s.state(), PlaybackState::Playing(1));
        assert_eq!(run_to_end(&mut s), vec![1, 2, 3, 4]);
        assert_eq!(edge_color(&s), rgb("#fff"));
    }

    #[test]
    fn pause_can_finish_in_flight_frame() {
        let mut options = Options::default();
        options.playback.pause_mode = PauseMode::FinishInFlight;
        let source = StaticSource::new().with(
            SimulationSelection::default(),
            payload(&["#000", "#f00", "#0f0"]),
        );
        let mut s = scheduler_with(source, options);
        s.play();
        let _ = advance(&mut s, FRAME);
        let _ = advance(&mut s, STEP);

        s.pause();
        assert_eq!(s.state(), PlaybackState::Idle(1));
        assert_eq!(edge_color(&s), rgb("#f00"));
        assert_eq!(s.transport().readouts.last().unwrap().index, 1);
    }

    #[test]
    fn reset_stops_playback_and_renders_frame_zero() {
        let mut s = scheduler(&["#000", "#f00", "#0f0"]);
        s.play();
        let _ = advance(&mut s, FRAME);
        let _ = advance(&mut s, STEP);

        s.reset();
        assert_eq!(s.state(), PlaybackState::Idle(0));
        assert_eq!(s.scene().active_count(), 0);
        assert_eq!(edge_color(&s), rgb("#000"));
        assert_eq!(
            s.scene().style(&node()),
            Some(VisualStyle::Node { pie_fraction: 0.0 })
        );
        assert!(advance(&mut s, FRAME).is_empty());
    }

    #[test]
    fn reset_then_scrub_renders_only_the_target_frame() {
        let mut s = scheduler(&["#000", "#f00", "#0f0"]);
        s.play();
        let _ = run_to_end(&mut s);
        let _ = s.scene_mut().take_journal();

        s.reset();
        let journal = s.scene_mut().take_journal();
        assert_eq!(edge_writes(&journal), vec![rgb("#000")]);

        s.scrub(1);
        let journal = s.scene_mut().take_journal();
        assert_eq!(edge_writes(&journal), vec![rgb("#f00")]);
        assert!(!journal
            .iter()
            .any(|e| matches!(e, SceneEvent::Transition { .. })));
        assert_eq!(s.state(), PlaybackState::Idle(1));
        assert_eq!(s.transport().readouts.last().unwrap().time_label, "0.50");
    }

    #[test]
    fn scrub_is_idempotent_and_clamped() {
        let mut s = scheduler(&["#000", "#f00", "#0f0"]);
        s.scrub(1);
        let first = s.scene().style(&edge());
        s.scrub(1);
        assert_eq!(s.state(), PlaybackState::Idle(1));
        assert_eq!(s.scene().style(&edge()), first);

        s.scrub(99);
        assert_eq!(s.state(), PlaybackState::Idle(2));
        assert_eq!(edge_color(&s), rgb("#0f0"));
    }

    #[test]
    fn scrub_while_playing_pauses() {
        let mut s = scheduler(&["#000", "#f00", "#0f0"]);
        s.play();
        let _ = advance(&mut s, FRAME);
        s.scrub(2);
        assert_eq!(s.state(), PlaybackState::Idle(2));
        assert_eq!(s.scene().active_count(), 0);
        assert!(advance(&mut s, FRAME).is_empty());
    }

    #[test]
    fn hidden_elements_are_not_animated() {
        let mut s = scheduler(&["#000", "#f00", "#0f0"]);
        s.scene_mut().set_visible(&node(), false);
        s.play();
        assert!(!s.scene().journal().iter().any(|e| matches!(
            e,
            SceneEvent::Transition { element, .. } if *element == node()
        )));

        assert_eq!(run_to_end(&mut s), vec![0, 1, 2]);
        assert_eq!(
            s.scene().style(&node()),
            Some(VisualStyle::Node { pie_fraction: 0.0 })
        );
        assert_eq!(edge_color(&s), rgb("#0f0"));
    }

    #[test]
    fn clock_advances_without_live_elements() {
        let mut s = scheduler(&["#000", "#f00", "#0f0"]);
        s.scene_mut().set_visible(&node(), false);
        s.scene_mut().set_visible(&edge(), false);
        s.play();
        assert_eq!(run_to_end(&mut s), vec![0, 1, 2]);
        assert_eq!(s.state(), PlaybackState::Idle(2));
    }

    #[test]
    fn open_tooltips_follow_the_committed_index() {
        let mut s = scheduler(&["#000", "#f00", "#0f0"]);
        s.toggle_tooltip(&edge());
        assert_eq!(s.scene().tooltip(&edge()), Some("1.00e+3"));
        let _ = s.scene_mut().take_journal();

        s.play();
        let _ = run_to_end(&mut s);
        let texts: Vec<Option<String>> = s
            .scene()
            .journal()
            .iter()
            .filter_map(|event| match event {
                SceneEvent::Tooltip { element, text } if *element == edge() => {
                    Some(text.clone())
                }
                _ => None,
            })
            .collect();
        assert_eq!(
            texts,
            vec![Some("2.00e+3".to_owned()), Some("3.00e+3".to_owned())]
        );

        s.toggle_tooltip(&edge());
        assert_eq!(s.scene().tooltip(&edge()), None);
    }

    #[test]
    fn compound_toggle_pauses_playback() {
        let mut s = scheduler(&["#000", "#f00", "#0f0"]);
        s.before_compound_toggle();
        assert_eq!(s.state(), PlaybackState::Idle(0));

        s.play();
        let _ = advance(&mut s, FRAME);
        s.before_compound_toggle();
        assert_eq!(s.state(), PlaybackState::Idle(0));
        assert_eq!(s.scene().active_count(), 0);
    }

    #[test]
    fn transport_commands_drive_the_state_machine() {
        let mut s = scheduler(&["#000", "#f00", "#0f0"]);
        s.execute(TransportCommand::TogglePlayback);
        assert!(s.is_playing());
        s.execute(TransportCommand::TogglePlayback);
        assert!(!s.is_playing());
        s.execute(TransportCommand::Scrub { index: 2 });
        assert_eq!(s.current_index(), 2);
        s.execute(TransportCommand::Play);
        assert!(s.is_playing());
        s.execute(TransportCommand::Pause);
        assert_eq!(s.state(), PlaybackState::Idle(2));
        s.execute(TransportCommand::Reset);
        assert_eq!(s.state(), PlaybackState::Idle(0));
    }

    #[test]
    fn failed_selection_keeps_everything() {
        let bad = SimulationSelection::new(1, ProcessKind::Consumption);
        let mut bad_payload = payload(&["#000", "#fff"]);
        let _ = bad_payload.elements.edges[0].per_frame_width.pop();
        let source = StaticSource::new()
            .with(
                SimulationSelection::default(),
                payload(&["#000", "#f00", "#0f0"]),
            )
            .with(bad.clone(), bad_payload);
        let mut s = scheduler_with(source, Options::default());
        s.scrub(1);
        let before = Arc::clone(s.trajectory());

        let err = s.select(&bad).unwrap_err();
        assert!(matches!(err, PlayerError::DataShape(_)));
        assert_eq!(s.state(), PlaybackState::Idle(1));
        assert!(Arc::ptr_eq(s.trajectory(), &before));
        assert_eq!(s.selection(), Some(&SimulationSelection::default()));
        assert_eq!(s.transport().notices.len(), 1);

        let missing = SimulationSelection::new(7, ProcessKind::Production);
        assert!(matches!(
            s.select(&missing),
            Err(PlayerError::UnknownSelection(_))
        ));
        assert_eq!(s.transport().notices.len(), 2);
    }

    #[test]
    fn selecting_another_run_restarts_at_frame_zero() {
        let other = SimulationSelection::new(1, ProcessKind::Production);
        let source = StaticSource::new()
            .with(
                SimulationSelection::default(),
                payload(&["#000", "#f00", "#0f0"]),
            )
            .with(other.clone(), payload(&["#00f", "#fff", "#fff", "#000"]));
        let mut s = scheduler_with(source, Options::default());
        s.play();
        let _ = advance(&mut s, FRAME);
        let generation = s.generation();

        s.select(&other).unwrap();
        assert_eq!(s.state(), PlaybackState::Idle(0));
        assert!(s.generation() > generation);
        assert_eq!(edge_color(&s), rgb("#00f"));
        assert_eq!(s.transport().readouts.last().unwrap().frame_count, 4);
        assert!(advance(&mut s, FRAME).is_empty());

        s.play();
        assert_eq!(run_to_end(&mut s), vec![0, 1, 2, 3]);
    }
}

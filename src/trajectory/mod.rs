//! Simulation trajectories: the time axis and per-element frame attributes.
//!
//! A [`Trajectory`] is an immutable snapshot for one simulation selection.
//! Every track in its [`TrajectoryRecord`] holds exactly one frame per time
//! point; this is checked once at load time (see [`payload`]) so playback
//! never has to deal with ragged data.

pub mod payload;
pub mod store;

use std::fmt;

use rustc_hash::FxHashMap;

use crate::style::{Color, VisualStyle};

pub use payload::TrajectoryPayload;
pub use store::{
    DirectorySource, ProcessKind, SimulationSelection, StaticSource,
    TrajectorySource, TrajectoryStore,
};

/// Stable identifier of an animatable graph element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementId {
    /// A node, by name.
    Node(String),
    /// An edge, by the names of its endpoints.
    Edge {
        /// Source node name.
        source: String,
        /// Target node name.
        target: String,
    },
}

impl ElementId {
    /// Node identifier.
    pub fn node(name: impl Into<String>) -> Self {
        Self::Node(name.into())
    }

    /// Edge identifier.
    pub fn edge(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self::Edge {
            source: source.into(),
            target: target.into(),
        }
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node(name) => f.write_str(name),
            Self::Edge { source, target } => write!(f, "{source}->{target}"),
        }
    }
}

/// One frame of an edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeFrame {
    /// Line color.
    pub color: Color,
    /// Stroke width.
    pub width: f32,
    /// Value shown in the tooltip overlay.
    pub tooltip: f64,
}

/// One frame of a node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeFrame {
    /// Pie slice size.
    pub pie_fraction: f32,
    /// Value shown in the tooltip overlay.
    pub tooltip: f64,
}

/// The attributes of one element at one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameAttributes {
    /// Edge attributes.
    Edge(EdgeFrame),
    /// Node attributes.
    Node(NodeFrame),
}

impl FrameAttributes {
    /// The animated part of the frame.
    #[must_use]
    pub fn style(&self) -> VisualStyle {
        match self {
            Self::Edge(e) => VisualStyle::Edge {
                color: e.color,
                width: e.width,
            },
            Self::Node(n) => VisualStyle::Node {
                pie_fraction: n.pie_fraction,
            },
        }
    }

    /// The tooltip value carried alongside the style.
    #[must_use]
    pub fn tooltip(&self) -> f64 {
        match self {
            Self::Edge(e) => e.tooltip,
            Self::Node(n) => n.tooltip,
        }
    }
}

/// Per-kind frame storage; a track never mixes edge and node frames.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementFrames {
    /// Frames of an edge.
    Edge(Vec<EdgeFrame>),
    /// Frames of a node.
    Node(Vec<NodeFrame>),
}

impl ElementFrames {
    /// Number of frames.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Edge(v) => v.len(),
            Self::Node(v) => v.len(),
        }
    }

    /// Whether the track has no frames.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Attributes at `frame`, if in range.
    #[must_use]
    pub fn get(&self, frame: usize) -> Option<FrameAttributes> {
        match self {
            Self::Edge(v) => v.get(frame).copied().map(FrameAttributes::Edge),
            Self::Node(v) => v.get(frame).copied().map(FrameAttributes::Node),
        }
    }
}

/// The frames of a single element.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementTrack {
    /// Element identifier.
    pub id: ElementId,
    /// Frames aligned index-for-index with the time axis.
    pub frames: ElementFrames,
}

/// Structural violations found while loading a trajectory.
#[derive(Debug, Clone, PartialEq)]
pub enum DataShapeError {
    /// The time axis has no points.
    EmptyTimeAxis,
    /// `time_axis[index]` is not a number or is smaller than its
    /// predecessor.
    DecreasingTime {
        /// Offending position.
        index: usize,
    },
    /// A per-frame array does not match the time axis length.
    LengthMismatch {
        /// Element owning the array.
        element: ElementId,
        /// Payload field name.
        field: &'static str,
        /// Time axis length.
        expected: usize,
        /// Actual array length.
        found: usize,
    },
    /// A per-frame color is not `#rgb`/`#rrggbb`.
    InvalidColor {
        /// Element owning the color.
        element: ElementId,
        /// Frame index.
        frame: usize,
        /// The rejected text.
        value: String,
    },
    /// Two tracks share an identifier.
    DuplicateElement(ElementId),
}

impl fmt::Display for DataShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTimeAxis => f.write_str("time axis is empty"),
            Self::DecreasingTime { index } => {
                write!(f, "time axis decreases at index {index}")
            }
            Self::LengthMismatch {
                element,
                field,
                expected,
                found,
            } => write!(
                f,
                "{element}: {field} has {found} frames, time axis has \
                 {expected}"
            ),
            Self::InvalidColor {
                element,
                frame,
                value,
            } => write!(f, "{element}: invalid color {value:?} at frame {frame}"),
            Self::DuplicateElement(id) => write!(f, "duplicate element {id}"),
        }
    }
}

impl std::error::Error for DataShapeError {}

/// Ordered sequence of simulation time points.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeAxis {
    points: Vec<f64>,
}

impl TimeAxis {
    /// Validate and wrap time points: non-empty and non-decreasing.
    pub fn new(points: Vec<f64>) -> Result<Self, DataShapeError> {
        if points.is_empty() {
            return Err(DataShapeError::EmptyTimeAxis);
        }
        if let Some(index) = points.iter().position(|t| t.is_nan()) {
            return Err(DataShapeError::DecreasingTime { index });
        }
        if let Some(i) = points.windows(2).position(|w| w[1] < w[0]) {
            return Err(DataShapeError::DecreasingTime { index: i + 1 });
        }
        Ok(Self { points })
    }

    /// Number of frames.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false for a validated axis; present for API symmetry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Time value at `frame`.
    #[must_use]
    pub fn get(&self, frame: usize) -> Option<f64> {
        self.points.get(frame).copied()
    }

    /// Index of the last frame.
    #[must_use]
    pub fn last_index(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    /// All time points.
    #[must_use]
    pub fn points(&self) -> &[f64] {
        &self.points
    }
}

/// Per-element frame sequences, in payload order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrajectoryRecord {
    tracks: Vec<ElementTrack>,
    index: FxHashMap<ElementId, usize>,
}

impl TrajectoryRecord {
    /// Build a record whose every track has exactly `frame_count` frames.
    pub fn new(
        tracks: Vec<ElementTrack>,
        frame_count: usize,
    ) -> Result<Self, DataShapeError> {
        let mut index = FxHashMap::default();
        for (i, track) in tracks.iter().enumerate() {
            if track.frames.len() != frame_count {
                return Err(DataShapeError::LengthMismatch {
                    element: track.id.clone(),
                    field: "frames",
                    expected: frame_count,
                    found: track.frames.len(),
                });
            }
            if index.insert(track.id.clone(), i).is_some() {
                return Err(DataShapeError::DuplicateElement(track.id.clone()));
            }
        }
        Ok(Self { tracks, index })
    }

    /// Track for `id`.
    #[must_use]
    pub fn track(&self, id: &ElementId) -> Option<&ElementTrack> {
        self.index.get(id).map(|&i| &self.tracks[i])
    }

    /// Attributes of `id` at `frame`.
    #[must_use]
    pub fn frame(&self, id: &ElementId, frame: usize) -> Option<FrameAttributes> {
        self.track(id)?.frames.get(frame)
    }

    /// All tracks in payload order.
    #[must_use]
    pub fn tracks(&self) -> &[ElementTrack] {
        &self.tracks
    }

    /// Number of tracks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Whether there are no tracks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

/// Time axis plus aligned record for one simulation selection.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    time_axis: TimeAxis,
    record: TrajectoryRecord,
}

impl Trajectory {
    /// Pair an axis with a record, checking their lengths agree.
    pub fn new(
        time_axis: TimeAxis,
        tracks: Vec<ElementTrack>,
    ) -> Result<Self, DataShapeError> {
        let record = TrajectoryRecord::new(tracks, time_axis.len())?;
        Ok(Self { time_axis, record })
    }

    /// The time axis.
    #[must_use]
    pub fn time_axis(&self) -> &TimeAxis {
        &self.time_axis
    }

    /// The per-element record.
    #[must_use]
    pub fn record(&self) -> &TrajectoryRecord {
        &self.record
    }

    /// Number of frames.
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.time_axis.len()
    }
}

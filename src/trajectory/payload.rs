//! Wire shape of a trajectory as delivered by the simulation host.
//!
//! Field names are snake_case; the camelCase spellings used by notebook
//! front ends are accepted as aliases. Missing per-frame arrays decode as
//! empty and are then reported as length mismatches, so a malformed
//! payload always surfaces as a [`DataShapeError`] naming the element.

use serde::{Deserialize, Serialize};

use super::{
    DataShapeError, EdgeFrame, ElementFrames, ElementId, ElementTrack,
    NodeFrame, TimeAxis, Trajectory,
};
use crate::error::PlayerError;
use crate::style::Color;

/// Decoded trajectory payload, not yet validated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct TrajectoryPayload {
    /// Simulation time points.
    #[serde(alias = "timeAxis", alias = "tspan")]
    pub time_axis: Vec<f64>,
    /// Animated elements.
    #[serde(default)]
    pub elements: PayloadElements,
}

/// Edge and node entries of a payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PayloadElements {
    /// Edge entries.
    #[serde(default)]
    pub edges: Vec<EdgePayload>,
    /// Node entries.
    #[serde(default)]
    pub nodes: Vec<NodePayload>,
}

/// Per-frame data of one edge.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct EdgePayload {
    /// Source node name.
    pub source: String,
    /// Target node name.
    pub target: String,
    /// Hex color per frame.
    #[serde(default, alias = "perFrameColor")]
    pub per_frame_color: Vec<String>,
    /// Stroke width per frame.
    #[serde(default, alias = "perFrameWidth")]
    pub per_frame_width: Vec<f32>,
    /// Tooltip value per frame.
    #[serde(default, alias = "perFrameTooltip")]
    pub per_frame_tooltip: Vec<f64>,
}

/// Per-frame data of one node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct NodePayload {
    /// Node name.
    pub id: String,
    /// Node classification (`species`, `community`, `compartment`, ...).
    #[serde(default, alias = "nodeType", alias = "NodeType")]
    pub node_type: Option<String>,
    /// Pie slice size per frame.
    #[serde(default, alias = "perFramePieFraction")]
    pub per_frame_pie_fraction: Vec<f32>,
    /// Tooltip value per frame.
    #[serde(default, alias = "perFrameTooltip")]
    pub per_frame_tooltip: Vec<f64>,
}

impl TrajectoryPayload {
    /// Decode a JSON payload.
    pub fn from_json(text: &str) -> Result<Self, PlayerError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Validate the payload and convert it into a [`Trajectory`].
    ///
    /// Nodes whose `node_type` is listed in `compound_kinds` are containers
    /// without per-frame data and are left out of the record.
    pub fn into_trajectory(
        self,
        compound_kinds: &[String],
    ) -> Result<Trajectory, DataShapeError> {
        let time_axis = TimeAxis::new(self.time_axis)?;
        let n = time_axis.len();

        let mut tracks = Vec::with_capacity(
            self.elements.edges.len() + self.elements.nodes.len(),
        );
        for edge in self.elements.edges {
            tracks.push(edge.into_track(n)?);
        }
        for node in self.elements.nodes {
            let is_compound = node
                .node_type
                .as_ref()
                .is_some_and(|kind| compound_kinds.contains(kind));
            if is_compound {
                continue;
            }
            tracks.push(node.into_track(n)?);
        }

        Trajectory::new(time_axis, tracks)
    }
}

fn check_len(
    element: &ElementId,
    field: &'static str,
    expected: usize,
    found: usize,
) -> Result<(), DataShapeError> {
    if expected == found {
        Ok(())
    } else {
        Err(DataShapeError::LengthMismatch {
            element: element.clone(),
            field,
            expected,
            found,
        })
    }
}

impl EdgePayload {
    fn into_track(self, n: usize) -> Result<ElementTrack, DataShapeError> {
        let id = ElementId::edge(self.source, self.target);
        check_len(&id, "per_frame_color", n, self.per_frame_color.len())?;
        check_len(&id, "per_frame_width", n, self.per_frame_width.len())?;
        check_len(&id, "per_frame_tooltip", n, self.per_frame_tooltip.len())?;

        let mut frames = Vec::with_capacity(n);
        for (frame, ((color, width), tooltip)) in self
            .per_frame_color
            .iter()
            .zip(self.per_frame_width)
            .zip(self.per_frame_tooltip)
            .enumerate()
        {
            let Some(color) = Color::parse(color) else {
                return Err(DataShapeError::InvalidColor {
                    element: id,
                    frame,
                    value: color.clone(),
                });
            };
            frames.push(EdgeFrame {
                color,
                width,
                tooltip,
            });
        }

        Ok(ElementTrack {
            id,
            frames: ElementFrames::Edge(frames),
        })
    }
}

impl NodePayload {
    fn into_track(self, n: usize) -> Result<ElementTrack, DataShapeError> {
        let id = ElementId::node(self.id);
        check_len(
            &id,
            "per_frame_pie_fraction",
            n,
            self.per_frame_pie_fraction.len(),
        )?;
        check_len(&id, "per_frame_tooltip", n, self.per_frame_tooltip.len())?;

        let frames = self
            .per_frame_pie_fraction
            .into_iter()
            .zip(self.per_frame_tooltip)
            .map(|(pie_fraction, tooltip)| NodeFrame {
                pie_fraction,
                tooltip,
            })
            .collect();

        Ok(ElementTrack {
            id,
            frames: ElementFrames::Node(frames),
        })
    }
}

//! Trajectory loading keyed by simulation selection.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::{Trajectory, TrajectoryPayload};
use crate::error::PlayerError;

/// Which reaction flux the trajectory visualizes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProcessKind {
    /// Species consumption.
    Consumption,
    /// Species production.
    Production,
    /// Host-defined label.
    Other(String),
}

impl ProcessKind {
    /// Label used on the wire and in file names.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Consumption => "consumption",
            Self::Production => "production",
            Self::Other(label) => label,
        }
    }
}

impl From<String> for ProcessKind {
    fn from(label: String) -> Self {
        match label.as_str() {
            "consumption" => Self::Consumption,
            "production" => Self::Production,
            _ => Self::Other(label),
        }
    }
}

impl From<ProcessKind> for String {
    fn from(kind: ProcessKind) -> Self {
        kind.label().to_owned()
    }
}

impl fmt::Display for ProcessKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Run and process chosen by the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SimulationSelection {
    /// Index of the simulation run.
    pub run_index: usize,
    /// Process being visualized.
    pub process: ProcessKind,
}

impl SimulationSelection {
    /// Selection of `run_index` for `process`.
    #[must_use]
    pub fn new(run_index: usize, process: ProcessKind) -> Self {
        Self {
            run_index,
            process,
        }
    }
}

impl Default for SimulationSelection {
    fn default() -> Self {
        Self::new(0, ProcessKind::Consumption)
    }
}

impl fmt::Display for SimulationSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "run {} ({})", self.run_index, self.process)
    }
}

/// Supplier of raw trajectory payloads.
pub trait TrajectorySource {
    /// Fetch the payload for `selection`.
    fn fetch(
        &self,
        selection: &SimulationSelection,
    ) -> Result<TrajectoryPayload, PlayerError>;
}

/// Payloads pushed in memory by the host.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    payloads: FxHashMap<SimulationSelection, TrajectoryPayload>,
}

impl StaticSource {
    /// Empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the payload for `selection`.
    pub fn insert(
        &mut self,
        selection: SimulationSelection,
        payload: TrajectoryPayload,
    ) {
        let _ = self.payloads.insert(selection, payload);
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with(
        mut self,
        selection: SimulationSelection,
        payload: TrajectoryPayload,
    ) -> Self {
        self.insert(selection, payload);
        self
    }
}

impl TrajectorySource for StaticSource {
    fn fetch(
        &self,
        selection: &SimulationSelection,
    ) -> Result<TrajectoryPayload, PlayerError> {
        self.payloads
            .get(selection)
            .cloned()
            .ok_or_else(|| PlayerError::UnknownSelection(selection.to_string()))
    }
}

/// JSON payloads on disk, one file per selection:
/// `<root>/run<run_index>_<process>.json`.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    /// Source reading from `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// File backing `selection`.
    #[must_use]
    pub fn path_for(&self, selection: &SimulationSelection) -> PathBuf {
        self.root.join(format!(
            "run{}_{}.json",
            selection.run_index,
            selection.process.label()
        ))
    }

    /// Root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl TrajectorySource for DirectorySource {
    fn fetch(
        &self,
        selection: &SimulationSelection,
    ) -> Result<TrajectoryPayload, PlayerError> {
        let path = self.path_for(selection);
        if !path.is_file() {
            return Err(PlayerError::UnknownSelection(format!(
                "{selection}: {} not found",
                path.display()
            )));
        }
        let content = std::fs::read_to_string(&path)?;
        TrajectoryPayload::from_json(&content)
    }
}

/// Loads and validates trajectories, caching only the current selection.
pub struct TrajectoryStore {
    source: Box<dyn TrajectorySource>,
    compound_kinds: Vec<String>,
    current: Option<(SimulationSelection, Arc<Trajectory>)>,
}

impl TrajectoryStore {
    /// Store over `source`. Nodes of the given compound kinds are excluded
    /// from loaded records.
    pub fn new(
        source: impl TrajectorySource + 'static,
        compound_kinds: Vec<String>,
    ) -> Self {
        Self {
            source: Box::new(source),
            compound_kinds,
            current: None,
        }
    }

    /// Load the trajectory for `selection`.
    ///
    /// A failed load leaves the current selection and trajectory untouched.
    pub fn load(
        &mut self,
        selection: &SimulationSelection,
    ) -> Result<Arc<Trajectory>, PlayerError> {
        if let Some((current, trajectory)) = &self.current {
            if current == selection {
                return Ok(Arc::clone(trajectory));
            }
        }

        let payload = self.source.fetch(selection)?;
        let trajectory =
            Arc::new(payload.into_trajectory(&self.compound_kinds)?);
        log::info!(
            "Loaded trajectory for {selection}: {} frames, {} elements",
            trajectory.frame_count(),
            trajectory.record().len()
        );
        self.current = Some((selection.clone(), Arc::clone(&trajectory)));
        Ok(trajectory)
    }

    /// The selection of the last successful load.
    #[must_use]
    pub fn current_selection(&self) -> Option<&SimulationSelection> {
        self.current.as_ref().map(|(selection, _)| selection)
    }

    /// The trajectory of the last successful load.
    #[must_use]
    pub fn current(&self) -> Option<&Arc<Trajectory>> {
        self.current.as_ref().map(|(_, trajectory)| trajectory)
    }
}

impl fmt::Debug for TrajectoryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrajectoryStore")
            .field("compound_kinds", &self.compound_kinds)
            .field("current", &self.current_selection())
            .finish_non_exhaustive()
    }
}

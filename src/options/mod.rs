//! Player options with TOML preset support.
//!
//! Playback timing and readout formatting live here. Options serialize
//! to/from TOML so a notebook host can ship presets next to its payloads.

mod display;
mod playback;

use std::path::Path;

pub use display::DisplayOptions;
pub use playback::{PauseMode, PlaybackOptions};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::PlayerError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[playback]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Transition timing and pause behavior.
    pub playback: PlaybackOptions,
    /// Readout formatting and compound kinds.
    pub display: DisplayOptions,
}

impl Options {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, PlayerError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse options from TOML text. Missing fields use defaults.
    pub fn from_toml(content: &str) -> Result<Self, PlayerError> {
        toml::from_str(content)
            .map_err(|e| PlayerError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    pub fn save(&self, path: &Path) -> Result<(), PlayerError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| PlayerError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }
}

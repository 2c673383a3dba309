//! Crate-level error types.

use std::fmt;

use crate::trajectory::DataShapeError;

/// Errors produced by the vipr-player crate.
#[derive(Debug)]
pub enum PlayerError {
    /// A trajectory payload failed structural validation.
    DataShape(DataShapeError),
    /// The trajectory source has nothing for the requested selection.
    UnknownSelection(String),
    /// A trajectory payload could not be decoded.
    Payload(serde_json::Error),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
}

impl fmt::Display for PlayerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DataShape(e) => write!(f, "trajectory shape error: {e}"),
            Self::UnknownSelection(msg) => {
                write!(f, "unknown simulation selection: {msg}")
            }
            Self::Payload(e) => write!(f, "trajectory payload error: {e}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
        }
    }
}

impl std::error::Error for PlayerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::DataShape(e) => Some(e),
            Self::Payload(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<DataShapeError> for PlayerError {
    fn from(e: DataShapeError) -> Self {
        Self::DataShape(e)
    }
}

impl From<serde_json::Error> for PlayerError {
    fn from(e: serde_json::Error) -> Self {
        Self::Payload(e)
    }
}

impl From<std::io::Error> for PlayerError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

//! Error types for settings and batch generation

use scenario_engine::ParseError;
use std::path::PathBuf;

/// Errors from the settings store and profile edits
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// IO error during settings write
    #[error("io error writing {path}: {source}")]
    Io {
        /// Settings file
        path: PathBuf,
        /// Underlying failure
        #[source]
        source: std::io::Error,
    },

    /// Settings could not be encoded
    #[error("settings encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Profile name already used
    #[error("a profile named '{0}' already exists")]
    ProfileExists(String),

    /// Profile name not found
    #[error("no profile named '{0}'")]
    ProfileNotFound(String),

    /// Attempt to delete the only profile
    #[error("cannot delete the last profile")]
    LastProfile,

    /// Profile name blank
    #[error("profile name cannot be empty")]
    EmptyProfileName,

    /// Tag text blank
    #[error("variant tags cannot be empty")]
    EmptyTag,

    /// Value index out of range for a modifier
    #[error("{modifier} has no value {value}")]
    UnknownValue {
        /// Modifier identifier
        modifier: String,
        /// Requested value
        value: u32,
    },
}

impl SettingsError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors that stop a batch before it starts
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    /// Scenario could not be loaded
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Scenario folder could not be read
    #[error("io error reading {path}: {source}")]
    Io {
        /// Folder being listed
        path: PathBuf,
        /// Underlying failure
        #[source]
        source: std::io::Error,
    },
}

impl BatchError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

//! Error types for the scenario engine
//!
//! Provides error handling for:
//! - Parse operations (file → `ScenarioDocument`)
//! - Mutate operations (document + request → variant)

use crate::catalog::ModifierKey;
use std::path::PathBuf;

/// Errors while loading a scenario file
///
/// Fatal for the whole load; no partial document is returned.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// IO error during file read
    #[error("io error reading {path}: {source}")]
    Io {
        /// File being read
        path: PathBuf,
        /// Underlying failure
        #[source]
        source: std::io::Error,
    },

    /// A tracked property holds a non-numeric value
    #[error("line {line}: value of '{key}' is not a number: '{value}'")]
    InvalidNumber {
        /// 1-based line number
        line: usize,
        /// Key as written in the file
        key: String,
        /// Offending value
        value: String,
    },
}

impl ParseError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create number error for a line
    pub fn invalid_number(line: usize, key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidNumber {
            line,
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Errors while deriving one variant
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MutateError {
    /// The internal name line no longer appears before the first section
    #[error("could not find the name line in the file (looking for '{name}')")]
    NameNotFound {
        /// Internal name recorded at parse time
        name: String,
    },

    /// Duration requested for a scenario without a positive time limit
    #[error("cannot create a duration variant for a scenario with Timelimit={timelimit}")]
    ZeroDurationBase {
        /// Base time limit found
        timelimit: f64,
    },

    /// Target value would divide by zero
    #[error("{modifier} target value must be greater than zero")]
    ZeroTarget {
        /// Modifier requested
        modifier: ModifierKey,
    },
}

impl MutateError {
    /// Whether later variants from the same document are also suspect
    #[inline]
    #[must_use]
    pub fn aborts_batch(&self) -> bool {
        matches!(self, Self::NameNotFound { .. })
    }
}

/// Combined engine error
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Loading failed
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Variant derivation failed
    #[error("mutate error: {0}")]
    Mutate(#[from] MutateError),
}

/// Result type alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

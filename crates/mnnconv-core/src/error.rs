//! Error types for mnnconv.
//!
//! `ConvertError` covers the conditions that abort a whole run or a single
//! model. `StageFailure` covers everything that can go wrong inside one
//! conversion stage; those never leave the stage and are rendered into the
//! stage's outcome detail instead.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Main error type for the conversion library.
#[derive(Debug, Error)]
pub enum ConvertError {
    // Startup errors
    #[error("OCR directory not found: {0}")]
    RootNotFound(PathBuf),

    #[error("Model directory not found: {0}")]
    ModelNotFound(PathBuf),

    #[error("Path is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Required tool not available: {tool} ({hint})")]
    ToolUnavailable { tool: String, hint: String },

    // File system errors
    #[error("IO error at {path:?}: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    // Per-model errors
    #[error("Model conversion panicked: {0}")]
    Panicked(String),
}

/// Result type alias for conversion operations.
pub type Result<T> = std::result::Result<T, ConvertError>;

impl From<std::io::Error> for ConvertError {
    fn from(err: std::io::Error) -> Self {
        ConvertError::Io {
            message: err.to_string(),
            path: None,
            source: Some(err),
        }
    }
}

impl ConvertError {
    /// Create an IO error with path context.
    pub fn io_with_path(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        ConvertError::Io {
            message: err.to_string(),
            path: Some(path.into()),
            source: Some(err),
        }
    }

    /// Whether this error should stop the whole process rather than one model.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ConvertError::RootNotFound(_)
                | ConvertError::ModelNotFound(_)
                | ConvertError::NotADirectory(_)
                | ConvertError::ToolUnavailable { .. }
        )
    }
}

/// Why a single stage did not succeed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StageFailure {
    #[error("missing input: {0}")]
    MissingInput(String),

    #[error("not attempted: {0}")]
    Skipped(String),

    #[error("{tool} failed: {message}")]
    ToolFailed { tool: String, message: String },

    #[error("{tool} could not be run: {message}")]
    Invocation { tool: String, message: String },

    #[error("{tool} timed out after {timeout:?}")]
    Timeout { tool: String, timeout: Duration },

    #[error("failed to parse {file}: {message}")]
    Parse { file: String, message: String },

    #[error("no character_dict found in {0}")]
    DictionaryNotFound(String),

    #[error("failed to write {file}: {message}")]
    Write { file: String, message: String },
}

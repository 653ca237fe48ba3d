//! Error types for flow loading and wire document handling.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::status::OperStatus;

/// Errors raised while reading flow descriptions or wire documents.
///
/// Encoding and rendering never fail on content; only the surrounding I/O
/// and parsing can.
#[derive(Debug, Error)]
pub enum FlowError {
    /// Reading a file or stdin failed
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// JSON parse or serialization failure
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parse failure
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// File extension is neither JSON nor YAML
    #[error("unsupported file format: {path}")]
    UnsupportedFormat { path: PathBuf },

    /// Expected data is missing from the input
    #[error("data not found: {what}")]
    DataNotFound { what: String },
}

impl FlowError {
    /// Creates an I/O error for the given path.
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        FlowError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Creates a data-not-found error.
    pub fn data_not_found(what: impl Into<String>) -> Self {
        FlowError::DataNotFound { what: what.into() }
    }

    /// Converts this error to an OperStatus.
    pub fn to_status(&self) -> OperStatus {
        match self {
            FlowError::Io { .. } => OperStatus::DataNotFound,
            FlowError::DataNotFound { .. } => OperStatus::DataNotFound,
            FlowError::Json(_) => OperStatus::MalformedData,
            FlowError::Yaml(_) => OperStatus::MalformedData,
            FlowError::UnsupportedFormat { .. } => OperStatus::MalformedData,
        }
    }
}

/// Result type for flow operations.
pub type FlowResult<T> = Result<T, FlowError>;

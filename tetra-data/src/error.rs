//! Error types for loading, meshing and exporting.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur anywhere in the data pipeline.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("Could not open file {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not create file {}: {source}", .path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("PLY parsing error in {}: {message}", .path.display())]
    PlyParse { path: PathBuf, message: String },

    #[error("Face {index} has {len} vertex indices, need at least 3")]
    InvalidFace { index: usize, len: usize },

    #[error("{element} {index} references point {value}, but only {points} points exist")]
    IndexOutOfBounds {
        element: &'static str,
        index: usize,
        value: i64,
        points: usize,
    },

    #[error("Invalid tetgen switches: {0}")]
    InvalidSwitches(String),

    #[error("Tetrahedralization failed: {0}")]
    Engine(String),

    #[error("Malformed tetgen output {file}:{line}: {message}")]
    EngineOutput {
        file: String,
        line: usize,
        message: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DataError {
    pub(crate) fn open(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Open {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn create(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Create {
            path: path.into(),
            source,
        }
    }
}

pub type DataResult<T> = Result<T, DataError>;

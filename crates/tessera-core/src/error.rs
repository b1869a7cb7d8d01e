//! Error types for tessera.

use crate::Triple;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Tessera error type.
#[derive(Error, Debug)]
pub enum Error {
    /// Filesystem failure, always tagged with the path involved.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// Offending path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Input directory or triple file does not exist.
    #[error("input not found: {}", .0.display())]
    MissingInput(PathBuf),

    /// Input parsed but produced no triples.
    #[error("no triples found in {0}")]
    EmptyDataset(String),

    /// Invalid configuration value.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// A triple references ids that the vocabulary never issued.
    #[error("triple {0} does not belong to this vocabulary")]
    ForeignTriple(Triple),

    /// Metrics (de)serialization failure.
    #[error("JSON error on {}: {source}", path.display())]
    Json {
        /// Offending path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    pub(crate) fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub(crate) fn json(path: impl AsRef<Path>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, Error>;

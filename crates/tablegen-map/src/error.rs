//! Error types for mapping operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from mapping review and mapping files.
#[derive(Debug, Error)]
pub enum MapError {
    /// No target column carries the given header.
    #[error("no target column named '{0}'")]
    UnknownTarget(String),

    /// Target position outside the mapping list.
    #[error("target position {position} out of range ({len} columns)")]
    PositionOutOfRange { position: usize, len: usize },

    /// Source text that is neither a marker name nor a column letter.
    #[error("invalid source '{0}' (expected blank, seq, country or a column letter)")]
    InvalidSource(String),

    /// Override text without a `header=value` shape.
    #[error("invalid override '{0}' (expected HEADER=VALUE)")]
    InvalidOverride(String),

    #[error(transparent)]
    Model(#[from] tablegen_model::ModelError),

    #[error("failed to read mapping file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write mapping file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse mapping file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize mapping: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Result type for mapping operations.
pub type Result<T> = std::result::Result<T, MapError>;

//! Error types for document output.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while assembling or writing a document.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to build document package: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("failed to serialize document XML: {0}")]
    Xml(#[from] std::io::Error),

    #[error("table has no columns")]
    EmptyTable,
}

pub type Result<T> = std::result::Result<T, OutputError>;

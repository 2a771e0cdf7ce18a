use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("invalid column locator '{0}'")]
    InvalidLocator(String),
    #[error("column index must be at least 1")]
    ZeroColumnIndex,
    #[error("unknown value format '{0}' (expected passthrough or short_date)")]
    UnknownFormat(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;

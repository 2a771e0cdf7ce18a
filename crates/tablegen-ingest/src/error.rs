//! Error types for loading templates, workbooks and row selections.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading inputs.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Input file not found.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File exceeds the size limit.
    #[error("file {path} is too large ({size} bytes, limit {max_size} bytes)")]
    FileTooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    /// File extension is not a known workbook or template format.
    #[error("unsupported file type: {path}")]
    UnsupportedFormat { path: PathBuf },

    /// Text encoding that cannot be decoded.
    #[error("unsupported encoding {encoding} in {path} (save the file as UTF-8)")]
    UnsupportedEncoding {
        path: PathBuf,
        encoding: &'static str,
    },

    // === Workbook Errors ===
    /// Failed to open or read a spreadsheet workbook.
    #[error("failed to read workbook {path}: {source}")]
    Workbook {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    /// Failed to parse a CSV file.
    #[error("failed to parse CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Requested sheet does not exist.
    #[error("sheet '{sheet}' not found; available sheets: {}", available.join(", "))]
    SheetNotFound {
        sheet: String,
        available: Vec<String>,
    },

    /// Header rows are numbered from 1.
    #[error("invalid header row {0} (rows are numbered from 1)")]
    InvalidHeaderRow(u32),

    // === Template Errors ===
    /// Template container or document part is unreadable.
    #[error("invalid template archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("malformed template XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("malformed template XML attribute: {0}")]
    XmlAttribute(#[from] quick_xml::events::attributes::AttrError),

    #[error("malformed template XML text: {0}")]
    XmlEncoding(#[from] quick_xml::encoding::EncodingError),

    #[error("unknown XML entity '{0}' in template")]
    XmlEntity(String),

    /// Template lacks the structure needed to define target columns.
    #[error("{0}")]
    MissingStructure(String),

    // === Row Selection Errors ===
    /// A row-selection token is not a number or range.
    #[error("invalid row selection '{0}' (use numbers, lists and ranges such as 5-10)")]
    InvalidRowToken(String),

    /// Row selection expands to more rows than allowed.
    #[error("row selection expands to {count} rows (limit {limit})")]
    SelectionTooLarge { count: u64, limit: usize },
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

//! Data model shared by every tablegen crate.
//!
//! - **template**: target columns and page geometry read from a document template
//! - **locator**: letter-style spreadsheet column addresses (`A`, `B`, ..., `AA`)
//! - **catalog**: source columns discovered in a sheet's header rows
//! - **mapping**: the resolved target-to-source correspondence
//! - **sheet**: in-memory cell grid of a loaded workbook
//! - **record**: materialized output rows

pub mod catalog;
pub mod error;
pub mod locator;
pub mod mapping;
pub mod record;
pub mod sheet;
pub mod template;

pub use catalog::SourceCatalog;
pub use error::{ModelError, Result};
pub use locator::{ColumnLocator, column_index, column_letter};
pub use mapping::{ColumnMapping, MappingSource, ValueFormat};
pub use record::{OutputRecord, OutputValue};
pub use sheet::{CellValue, Sheet, Workbook};
pub use template::{
    Alignment, DEFAULT_COLUMN_WIDTH, Orientation, PageMargins, PageSetup, TargetColumn, Template,
};

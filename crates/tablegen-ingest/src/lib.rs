//! Input side of tablegen.
//!
//! This crate turns files and user input into model values:
//!
//! - **Workbooks**: `xlsx`/`xlsm`/`xlsb`/`xls`/`ods` via calamine and `csv`
//!   files, loaded into [`Workbook`](tablegen_model::Workbook) sheets
//! - **Header Reader**: builds a [`SourceCatalog`](tablegen_model::SourceCatalog)
//!   from one or two stacked header rows
//! - **Templates**: target columns, title and page setup from a `.docx`
//! - **Row selections**: `"1-3, 5"` style row lists
//! - **Preview**: first data rows of a sheet
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use tablegen_ingest::{SourceOptions, load_workbook, parse_rows, read_source_catalog, read_template};
//!
//! let template = read_template(Path::new("plantilla.docx"))?;
//! let workbook = load_workbook(Path::new("experiencias.xlsx"))?;
//! let catalog = read_source_catalog(&workbook, &SourceOptions::default())?;
//! let rows = parse_rows("5-7, 12")?;
//! ```

mod error;
mod header;
mod preview;
mod selection;
mod template;
mod workbook;

// === Error Types ===
pub use error::{IngestError, Result};

// === Workbooks ===
pub use workbook::{
    MAX_FILE_SIZE, cell_from_data, check_file_size, check_file_size_with_limit, load_workbook,
    read_csv_sheet, sheet_from_range,
};

// === Header Reader ===
pub use header::{MAX_HEADER_COLUMNS, SourceOptions, read_headers, read_source_catalog, select_sheet};

// === Templates ===
pub use template::{parse_document, read_template};

// === Row Selection ===
pub use selection::{MAX_SELECTED_ROWS, parse_rows};

// === Preview ===
pub use preview::{DEFAULT_PREVIEW_ROWS, PreviewRow, SheetPreview, preview_rows};

//! Value transformations applied when building output rows.
//!
//! - **extract**: short-date conversion, country extraction and cell
//!   stringification
//! - **materialize**: applies a finalized mapping to selected sheet rows

pub mod extract;
pub mod materialize;

pub use extract::{cell_text, convert_date, extract_country, format_cell_date};
pub use materialize::{column_value, read_rows};

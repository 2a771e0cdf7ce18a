//! Header reader: builds the source catalog from a sheet's header rows.

use serde::{Deserialize, Serialize};
use tablegen_model::{ColumnLocator, SourceCatalog, Sheet, Workbook};
use tablegen_transform::cell_text;
use tracing::{debug, warn};

use crate::error::{IngestError, Result};

/// Columns scanned per header row.
pub const MAX_HEADER_COLUMNS: u32 = 700;

/// Which sheet holds the data and where its header block starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceOptions {
    pub sheet: String,
    /// 1-based row of the first header row; the row below is read too.
    pub header_row: u32,
}

impl Default for SourceOptions {
    fn default() -> Self {
        Self {
            sheet: "ESP".to_string(),
            header_row: 3,
        }
    }
}

/// Looks up a sheet by exact name.
pub fn select_sheet<'a>(workbook: &'a Workbook, name: &str) -> Result<&'a Sheet> {
    workbook
        .sheet(name)
        .ok_or_else(|| IngestError::SheetNotFound {
            sheet: name.to_string(),
            available: workbook
                .sheet_names()
                .into_iter()
                .map(str::to_string)
                .collect(),
        })
}

/// Builds the catalog for the sheet named in `options`.
pub fn read_source_catalog(workbook: &Workbook, options: &SourceOptions) -> Result<SourceCatalog> {
    read_headers(select_sheet(workbook, &options.sheet)?, options.header_row)
}

/// Combines header row `header_row` and the row below it into a catalog.
///
/// Two non-blank labels are joined as `"upper / lower"`; a single non-blank
/// label is used alone; columns blank in both rows are left out.
pub fn read_headers(sheet: &Sheet, header_row: u32) -> Result<SourceCatalog> {
    if header_row == 0 {
        return Err(IngestError::InvalidHeaderRow(header_row));
    }
    let upper = sheet.row(header_row);
    let lower = sheet.row(header_row.saturating_add(1));
    let width = u32::try_from(upper.len().max(lower.len())).unwrap_or(u32::MAX);
    if width > MAX_HEADER_COLUMNS {
        warn!(
            sheet = %sheet.name,
            columns = width,
            limit = MAX_HEADER_COLUMNS,
            "header rows truncated at column limit"
        );
    }

    let mut catalog = SourceCatalog::new();
    for index in 1..=width.min(MAX_HEADER_COLUMNS) {
        let locator = ColumnLocator::saturating(index);
        let first = cell_text(sheet.cell(header_row, locator));
        let second = cell_text(sheet.cell(header_row.saturating_add(1), locator));
        let label = match (first.trim().is_empty(), second.trim().is_empty()) {
            (false, false) => format!("{first} / {second}"),
            (false, true) => first,
            (true, false) => second,
            (true, true) => continue,
        };
        catalog.insert(locator, label.trim());
    }
    debug!(sheet = %sheet.name, header_row, columns = catalog.len(), "read header rows");
    Ok(catalog)
}

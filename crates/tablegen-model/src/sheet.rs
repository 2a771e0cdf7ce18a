//! In-memory cell grid of a loaded workbook.
//!
//! Rows and columns are addressed with the sheet's own 1-based numbering,
//! so row `5` is the fifth row of the sheet regardless of header rows.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::locator::ColumnLocator;

/// A single spreadsheet cell value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    Date(NaiveDateTime),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

static EMPTY_CELL: CellValue = CellValue::Empty;

/// One worksheet as a dense grid anchored at cell `A1`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sheet {
    pub name: String,
    rows: Vec<Vec<CellValue>>,
}

impl Sheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
        }
    }

    pub fn from_rows(name: impl Into<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    /// Appends a row after the current last row.
    pub fn push_row(&mut self, row: Vec<CellValue>) {
        self.rows.push(row);
    }

    /// Number of the last row present in the sheet (its "max row").
    pub fn row_count(&self) -> u32 {
        u32::try_from(self.rows.len()).unwrap_or(u32::MAX)
    }

    /// Widest row, in columns.
    pub fn column_count(&self) -> u32 {
        let widest = self.rows.iter().map(Vec::len).max().unwrap_or(0);
        u32::try_from(widest).unwrap_or(u32::MAX)
    }

    /// True when `row` (1-based) lies inside the sheet.
    pub fn contains_row(&self, row: u32) -> bool {
        row >= 1 && row <= self.row_count()
    }

    /// Cells of a 1-based row; empty for rows outside the sheet.
    pub fn row(&self, row: u32) -> &[CellValue] {
        if row == 0 {
            return &[];
        }
        self.rows
            .get((row - 1) as usize)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Cell at a 1-based row and a column; [`CellValue::Empty`] when absent.
    pub fn cell(&self, row: u32, column: ColumnLocator) -> &CellValue {
        self.row(row).get(column.offset()).unwrap_or(&EMPTY_CELL)
    }
}

/// All sheets of a loaded workbook, in workbook order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new(sheets: Vec<Sheet>) -> Self {
        Self { sheets }
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|sheet| sheet.name == name)
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|sheet| sheet.name.as_str()).collect()
    }
}

//! Quick look at the data rows below a sheet's header block.

use tablegen_model::{ColumnLocator, Sheet};
use tablegen_transform::cell_text;

/// Rows listed by [`preview_rows`] unless told otherwise.
pub const DEFAULT_PREVIEW_ROWS: usize = 20;

/// Characters of the first column shown per row.
const PREVIEW_TEXT_CHARS: usize = 90;

/// One previewed data row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewRow {
    /// 1-based sheet row number.
    pub row: u32,
    pub text: String,
}

/// Rows shown by a sheet preview.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetPreview {
    pub rows: Vec<PreviewRow>,
    /// More qualifying rows exist past the limit.
    pub truncated: bool,
}

impl SheetPreview {
    /// Lines in the form `Fila 12: <first column text>`.
    pub fn lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .rows
            .iter()
            .map(|row| format!("Fila {}: {}", row.row, row.text))
            .collect();
        if self.truncated {
            lines.push("...".to_string());
        }
        lines
    }
}

/// Lists up to `limit` rows after the two header rows whose first column is
/// not blank.
pub fn preview_rows(sheet: &Sheet, header_row: u32, limit: usize) -> SheetPreview {
    let first_column = ColumnLocator::saturating(1);
    let mut qualifying = (header_row.saturating_add(2)..=sheet.row_count()).filter_map(|row| {
        let text = cell_text(sheet.cell(row, first_column));
        (!text.trim().is_empty()).then(|| PreviewRow {
            row,
            text: text.chars().take(PREVIEW_TEXT_CHARS).collect(),
        })
    });
    let rows: Vec<PreviewRow> = qualifying.by_ref().take(limit).collect();
    let truncated = qualifying.next().is_some();
    SheetPreview { rows, truncated }
}

#[cfg(test)]
mod tests {
    use tablegen_model::CellValue;

    use super::*;

    #[test]
    fn skips_header_block_and_blank_rows() {
        let mut sheet = Sheet::new("ESP");
        sheet.push_row(vec!["Experiencias".into()]);
        sheet.push_row(vec![]);
        sheet.push_row(vec!["Numero".into()]);
        sheet.push_row(vec!["(sub)".into()]);
        sheet.push_row(vec![CellValue::Number(1.0)]);
        sheet.push_row(vec![CellValue::Empty, "x".into()]);
        sheet.push_row(vec!["a".repeat(120).as_str().into()]);

        let preview = preview_rows(&sheet, 3, DEFAULT_PREVIEW_ROWS);
        assert!(!preview.truncated);
        assert_eq!(preview.rows.len(), 2);
        assert_eq!(preview.rows[0], PreviewRow { row: 5, text: "1".to_string() });
        assert_eq!(preview.rows[1].row, 7);
        assert_eq!(preview.rows[1].text.chars().count(), 90);
        assert_eq!(preview.lines()[0], "Fila 5: 1");
    }

    #[test]
    fn marks_truncation() {
        let sheet = Sheet::from_rows(
            "ESP",
            (0..10).map(|i| vec![CellValue::Number(f64::from(i))]).collect(),
        );
        let preview = preview_rows(&sheet, 1, 3);
        assert_eq!(preview.rows.len(), 3);
        assert!(preview.truncated);
        assert_eq!(preview.lines().last().map(String::as_str), Some("..."));
        assert_eq!(preview.rows[0].row, 3);
    }
}

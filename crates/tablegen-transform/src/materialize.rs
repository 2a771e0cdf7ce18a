//! Row materializer: turns selected sheet rows into output records.

use tablegen_model::{
    CellValue, ColumnLocator, ColumnMapping, MappingSource, OutputRecord, OutputValue, Sheet,
    ValueFormat,
};
use tracing::{debug, info};

use crate::extract::{cell_text, convert_date, extract_country, format_cell_date};

/// Builds one record per requested row, in request order.
///
/// Rows outside the sheet are skipped. Sequence values count positions in
/// `rows`, so a skipped row still consumes its number.
pub fn read_rows(sheet: &Sheet, rows: &[u32], mappings: &[ColumnMapping]) -> Vec<OutputRecord> {
    let records: Vec<OutputRecord> = rows
        .iter()
        .enumerate()
        .filter_map(|(index, &row)| {
            if !sheet.contains_row(row) {
                debug!(row, max_row = sheet.row_count(), "row outside sheet, skipped");
                return None;
            }
            let position = index + 1;
            let mut record = OutputRecord::new(row);
            for mapping in mappings {
                record.push(
                    mapping.header.clone(),
                    resolve(sheet, row, position, mapping),
                );
            }
            Some(record)
        })
        .collect();
    info!(
        sheet = %sheet.name,
        requested = rows.len(),
        produced = records.len(),
        "materialized rows"
    );
    records
}

fn resolve(sheet: &Sheet, row: u32, position: usize, mapping: &ColumnMapping) -> OutputValue {
    match mapping.source {
        MappingSource::Blank => OutputValue::empty(),
        MappingSource::Sequence => OutputValue::Text(position.to_string()),
        MappingSource::CountryExtract { from_col } => {
            OutputValue::Text(extract_country(&cell_text(sheet.cell(row, from_col))))
        }
        MappingSource::Column { locator } => column_value(sheet, row, locator, mapping.format),
    }
}

/// Value of one sheet cell under a value format.
pub fn column_value(
    sheet: &Sheet,
    row: u32,
    locator: ColumnLocator,
    format: ValueFormat,
) -> OutputValue {
    let cell = sheet.cell(row, locator);
    match format {
        ValueFormat::ShortDate => OutputValue::Text(convert_date(&cell_text(cell))),
        ValueFormat::Passthrough => match cell {
            CellValue::Number(number) => OutputValue::Number(*number),
            CellValue::Date(date) => OutputValue::Text(format_cell_date(date)),
            other => OutputValue::Text(cell_text(other)),
        },
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use tablegen_model::TargetColumn;

    use super::*;

    fn loc(letters: &str) -> ColumnLocator {
        ColumnLocator::parse(letters).unwrap()
    }

    #[test]
    fn passthrough_keeps_numbers_numeric() {
        let sheet = Sheet::from_rows(
            "ESP",
            vec![vec![
                CellValue::Number(42.0),
                CellValue::Date(
                    NaiveDate::from_ymd_opt(2022, 5, 1)
                        .unwrap()
                        .and_hms_opt(0, 0, 0)
                        .unwrap(),
                ),
                CellValue::Bool(false),
            ]],
        );
        let passthrough = ValueFormat::Passthrough;
        assert_eq!(
            column_value(&sheet, 1, loc("A"), passthrough),
            OutputValue::Number(42.0)
        );
        assert_eq!(
            column_value(&sheet, 1, loc("B"), passthrough),
            OutputValue::text("05/2022")
        );
        assert_eq!(
            column_value(&sheet, 1, loc("C"), passthrough),
            OutputValue::text("false")
        );
        assert_eq!(
            column_value(&sheet, 1, loc("Z"), passthrough),
            OutputValue::empty()
        );
    }

    #[test]
    fn short_date_stringifies_first() {
        let sheet = Sheet::from_rows("ESP", vec![vec![CellValue::Number(2021.0)]]);
        assert_eq!(
            column_value(&sheet, 1, loc("A"), ValueFormat::ShortDate),
            OutputValue::text("2021")
        );
    }

    #[test]
    fn short_date_on_date_cells_uses_cell_date_format() {
        let at = |day| {
            CellValue::Date(
                NaiveDate::from_ymd_opt(2021, 8, day)
                    .unwrap()
                    .and_hms_opt(9, 30, 0)
                    .unwrap(),
            )
        };
        let sheet = Sheet::from_rows(
            "ESP",
            vec![vec![at(1), at(15), "Agosto 2021".into()]],
        );
        let short = ValueFormat::ShortDate;
        assert_eq!(
            column_value(&sheet, 1, loc("A"), short),
            OutputValue::text("08/2021")
        );
        assert_eq!(
            column_value(&sheet, 1, loc("B"), short),
            OutputValue::text("15/08/2021")
        );
        assert_eq!(
            column_value(&sheet, 1, loc("C"), short),
            OutputValue::text("ago-21")
        );

        let mapping = ColumnMapping::new(
            &TargetColumn::new("Fecha Fin"),
            MappingSource::Column { locator: loc("A") },
            short,
        );
        let records = read_rows(&sheet, &[1], &[mapping]);
        assert_eq!(records[0].get("Fecha Fin"), Some(&OutputValue::text("08/2021")));
    }

    #[test]
    fn empty_mapping_yields_empty_records() {
        let sheet = Sheet::from_rows("ESP", vec![vec!["x".into()]]);
        let records = read_rows(&sheet, &[1], &[]);
        assert_eq!(records.len(), 1);
        assert!(records[0].is_empty());

        let mapping = ColumnMapping::new(
            &TargetColumn::new("Obs"),
            MappingSource::Blank,
            ValueFormat::Passthrough,
        );
        let records = read_rows(&sheet, &[1], &[mapping]);
        assert_eq!(records[0].get("Obs"), Some(&OutputValue::empty()));
    }
}

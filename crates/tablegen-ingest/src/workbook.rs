//! Workbook loading.
//!
//! Spreadsheet formats (`xlsx`, `xlsm`, `xlsb`, `xls`, `ods`) are read with
//! calamine; `csv` files become a single sheet named after the file stem.
//! Every sheet is anchored at cell `A1`, so row and column numbers match
//! what a user sees in a spreadsheet application.

use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

use calamine::{Data, Range, Reader, open_workbook_auto};
use tablegen_model::{CellValue, Sheet, Workbook};
use tracing::{debug, info};

use crate::error::{IngestError, Result};

/// Maximum input file size (500 MB).
pub const MAX_FILE_SIZE: u64 = 500 * 1024 * 1024;

/// Extensions handled by calamine.
const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Loads every sheet of a workbook file.
pub fn load_workbook(path: &Path) -> Result<Workbook> {
    check_file_size(path)?;
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let workbook = if extension == "csv" {
        Workbook::new(vec![read_csv_sheet(path)?])
    } else if SPREADSHEET_EXTENSIONS.contains(&extension.as_str()) {
        read_spreadsheet(path)?
    } else {
        return Err(IngestError::UnsupportedFormat {
            path: path.to_path_buf(),
        });
    };

    info!(
        path = %path.display(),
        sheets = workbook.sheets.len(),
        "loaded workbook"
    );
    Ok(workbook)
}

/// Check file size before loading.
pub fn check_file_size(path: &Path) -> Result<()> {
    check_file_size_with_limit(path, MAX_FILE_SIZE)
}

/// Check file size against a custom limit.
pub fn check_file_size_with_limit(path: &Path, max_size: u64) -> Result<()> {
    let metadata = fs::metadata(path).map_err(|e| open_error(path, e))?;
    if metadata.len() > max_size {
        return Err(IngestError::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max_size,
        });
    }
    Ok(())
}

pub(crate) fn open_error(path: &Path, error: std::io::Error) -> IngestError {
    if error.kind() == std::io::ErrorKind::NotFound {
        IngestError::FileNotFound {
            path: path.to_path_buf(),
        }
    } else {
        IngestError::FileRead {
            path: path.to_path_buf(),
            source: error,
        }
    }
}

fn read_spreadsheet(path: &Path) -> Result<Workbook> {
    let workbook_error = |source| IngestError::Workbook {
        path: path.to_path_buf(),
        source,
    };
    let mut workbook = open_workbook_auto(path).map_err(workbook_error)?;
    let names: Vec<String> = workbook.sheet_names().to_vec();
    let mut sheets = Vec::with_capacity(names.len());
    for name in names {
        let range = workbook.worksheet_range(&name).map_err(workbook_error)?;
        debug!(sheet = %name, size = ?range.get_size(), "read sheet range");
        sheets.push(sheet_from_range(&name, &range));
    }
    Ok(Workbook::new(sheets))
}

/// Converts a calamine range into a sheet anchored at `A1`.
///
/// calamine ranges start at the first used cell; leading empty rows and
/// columns are restored so numbering stays absolute.
pub fn sheet_from_range(name: &str, range: &Range<Data>) -> Sheet {
    let mut sheet = Sheet::new(name);
    let Some((start_row, start_col)) = range.start() else {
        return sheet;
    };
    for _ in 0..start_row {
        sheet.push_row(Vec::new());
    }
    for row in range.rows() {
        let mut cells = vec![CellValue::Empty; start_col as usize];
        cells.extend(row.iter().map(cell_from_data));
        while cells.last().is_some_and(CellValue::is_empty) {
            cells.pop();
        }
        sheet.push_row(cells);
    }
    sheet
}

/// Maps a calamine cell onto the model's cell value.
pub fn cell_from_data(data: &Data) -> CellValue {
    match data {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::String(text) => CellValue::Text(text.clone()),
        Data::Float(number) => CellValue::Number(*number),
        Data::Int(number) => CellValue::Number(*number as f64),
        Data::Bool(flag) => CellValue::Bool(*flag),
        Data::DateTime(value) => match value.as_datetime() {
            Some(datetime) => CellValue::Date(datetime),
            None => CellValue::Number(value.as_f64()),
        },
        Data::DateTimeIso(text) => chrono::NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S")
            .or_else(|_| {
                chrono::NaiveDate::parse_from_str(text, "%Y-%m-%d")
                    .map(|date| date.and_time(chrono::NaiveTime::MIN))
            })
            .map(CellValue::Date)
            .unwrap_or_else(|_| CellValue::Text(text.clone())),
        Data::DurationIso(text) => CellValue::Text(text.clone()),
    }
}

/// Reads a CSV file as a single sheet named after the file stem.
///
/// UTF-8 (with or without BOM) is read as is; other byte sequences are
/// decoded as Windows-1252. UTF-16 files are rejected.
pub fn read_csv_sheet(path: &Path) -> Result<Sheet> {
    let mut bytes = Vec::new();
    File::open(path)
        .map_err(|e| open_error(path, e))?
        .read_to_end(&mut bytes)
        .map_err(|source| IngestError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;

    let text = decode_text(path, &bytes)?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut sheet = Sheet::new(name);
    for record in reader.records() {
        let record = record.map_err(|source| IngestError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        let mut cells: Vec<CellValue> = record
            .iter()
            .map(|field| {
                if field.is_empty() {
                    CellValue::Empty
                } else {
                    CellValue::Text(field.to_string())
                }
            })
            .collect();
        while cells.last().is_some_and(CellValue::is_empty) {
            cells.pop();
        }
        sheet.push_row(cells);
    }
    Ok(sheet)
}

fn decode_text(path: &Path, bytes: &[u8]) -> Result<String> {
    if bytes.starts_with(&[0xFF, 0xFE]) {
        return Err(IngestError::UnsupportedEncoding {
            path: path.to_path_buf(),
            encoding: "UTF-16 LE",
        });
    }
    if bytes.starts_with(&[0xFE, 0xFF]) {
        return Err(IngestError::UnsupportedEncoding {
            path: path.to_path_buf(),
            encoding: "UTF-16 BE",
        });
    }
    let body = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(bytes);
    match std::str::from_utf8(body) {
        Ok(text) => Ok(text.to_string()),
        Err(_) => {
            debug!(path = %path.display(), "input is not UTF-8, decoding as Windows-1252");
            let (text, _, _) = encoding_rs::WINDOWS_1252.decode(body);
            Ok(text.into_owned())
        }
    }
}

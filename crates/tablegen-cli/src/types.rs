use std::path::PathBuf;

use tablegen_cli::session::{GeneratedTable, Session};

#[derive(Debug)]
pub struct SheetSummary {
    pub name: String,
    pub rows: u32,
    pub columns: u32,
}

#[derive(Debug)]
pub struct MapResult {
    pub session: Session,
    /// Targets updated from a `--mapping` file.
    pub loaded_from_file: Option<usize>,
    pub saved_to: Option<PathBuf>,
    pub list_sources: bool,
}

#[derive(Debug)]
pub struct GenerateResult {
    pub output: PathBuf,
    pub headers: Vec<String>,
    pub table: GeneratedTable,
}

//! CLI argument definitions for tablegen.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use tablegen_ingest::{DEFAULT_PREVIEW_ROWS, SourceOptions};

#[derive(Parser)]
#[command(
    name = "tablegen",
    version,
    about = "Fill a Word table template with rows from a spreadsheet",
    long_about = "Fill a Word table template with rows from a spreadsheet.\n\n\
                  Template columns are matched to spreadsheet columns by their header\n\
                  labels; the proposed mapping can be reviewed and overridden before\n\
                  the table is generated."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Include spreadsheet cell values in debug logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the sheets of a workbook.
    Sheets(SheetsArgs),

    /// Show the first data rows of a sheet.
    Preview(PreviewArgs),

    /// Propose a column mapping and print it for review.
    Map(MapArgs),

    /// Generate the table document for a set of rows.
    Generate(GenerateArgs),
}

#[derive(Args)]
pub struct SheetsArgs {
    /// Workbook file (xlsx, xlsm, xlsb, xls, ods or csv).
    #[arg(value_name = "WORKBOOK")]
    pub workbook: PathBuf,
}

/// Sheet and header-row selection.
#[derive(Args, Clone)]
pub struct SourceArgs {
    /// Sheet holding the data.
    #[arg(long = "sheet", default_value = "ESP")]
    pub sheet: String,

    /// 1-based row of the first header row; the next row is read as well.
    #[arg(long = "header-row", default_value_t = 3)]
    pub header_row: u32,
}

impl SourceArgs {
    pub fn options(&self) -> SourceOptions {
        SourceOptions {
            sheet: self.sheet.clone(),
            header_row: self.header_row,
        }
    }
}

#[derive(Args)]
pub struct PreviewArgs {
    #[arg(value_name = "WORKBOOK")]
    pub workbook: PathBuf,

    #[command(flatten)]
    pub source: SourceArgs,

    /// Maximum number of rows to list.
    #[arg(long = "limit", default_value_t = DEFAULT_PREVIEW_ROWS)]
    pub limit: usize,
}

/// Manual adjustments applied on top of the proposed mapping.
#[derive(Args, Clone, Default)]
pub struct OverrideArgs {
    /// Load a saved mapping file before applying overrides.
    #[arg(long = "mapping", value_name = "PATH")]
    pub mapping: Option<PathBuf>,

    /// Override a column source: HEADER=blank|seq|country|<column letter>.
    #[arg(long = "set", value_name = "HEADER=SOURCE")]
    pub set: Vec<String>,

    /// Override a column format: HEADER=passthrough|short_date.
    #[arg(long = "format", value_name = "HEADER=FORMAT")]
    pub format: Vec<String>,
}

#[derive(Args)]
pub struct MapArgs {
    /// Word template (.docx) whose first table defines the target columns.
    #[arg(value_name = "TEMPLATE")]
    pub template: PathBuf,

    #[arg(value_name = "WORKBOOK")]
    pub workbook: PathBuf,

    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub overrides: OverrideArgs,

    /// List every selectable source after the mapping table.
    #[arg(long = "list-sources")]
    pub list_sources: bool,

    /// Save the reviewed mapping to a JSON file.
    #[arg(long = "save-mapping", value_name = "PATH")]
    pub save_mapping: Option<PathBuf>,

    /// Free-text description stored with a saved mapping.
    #[arg(long = "description", requires = "save_mapping")]
    pub description: Option<String>,
}

#[derive(Args)]
pub struct GenerateArgs {
    #[arg(value_name = "TEMPLATE")]
    pub template: PathBuf,

    #[arg(value_name = "WORKBOOK")]
    pub workbook: PathBuf,

    /// Rows to include, e.g. "5-10, 12 14".
    #[arg(long = "rows", short = 'r')]
    pub rows: String,

    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub overrides: OverrideArgs,

    /// Output file (default: Tabla_filas_<rows>.docx next to the workbook).
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

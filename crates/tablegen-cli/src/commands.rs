use std::path::Path;

use anyhow::{Context, Result};
use tablegen_cli::session::Session;
use tablegen_ingest::{SheetPreview, load_workbook, parse_rows, preview_rows, select_sheet};
use tablegen_map::{AutoMapOptions, StoredMapping, load_mapping, save_mapping};
use tracing::{info, info_span};

use crate::cli::{GenerateArgs, MapArgs, OverrideArgs, PreviewArgs, SheetsArgs, SourceArgs};
use crate::types::{GenerateResult, MapResult, SheetSummary};

pub fn run_sheets(args: &SheetsArgs) -> Result<Vec<SheetSummary>> {
    let workbook = load_workbook(&args.workbook)
        .with_context(|| format!("load workbook {}", args.workbook.display()))?;
    Ok(workbook
        .sheets
        .iter()
        .map(|sheet| SheetSummary {
            name: sheet.name.clone(),
            rows: sheet.row_count(),
            columns: sheet.column_count(),
        })
        .collect())
}

pub fn run_preview(args: &PreviewArgs) -> Result<SheetPreview> {
    let workbook = load_workbook(&args.workbook)
        .with_context(|| format!("load workbook {}", args.workbook.display()))?;
    let sheet = select_sheet(&workbook, &args.source.sheet)?;
    Ok(preview_rows(sheet, args.source.header_row, args.limit))
}

pub fn run_map(args: &MapArgs) -> Result<MapResult> {
    let span = info_span!("map", template = %args.template.display());
    let _guard = span.enter();
    let (session, loaded_from_file) =
        open_session(&args.template, &args.workbook, &args.source, &args.overrides)?;

    let saved_to = match &args.save_mapping {
        Some(path) => {
            let mapping = session.mapping().context("no mapping to save")?;
            let mut stored = StoredMapping::new(mapping.mappings().to_vec());
            if let Some(description) = &args.description {
                stored = stored.with_description(description);
            }
            save_mapping(path, &stored)
                .with_context(|| format!("save mapping {}", path.display()))?;
            Some(path.clone())
        }
        None => None,
    };

    Ok(MapResult {
        session,
        loaded_from_file,
        saved_to,
        list_sources: args.list_sources,
    })
}

pub fn run_generate(args: &GenerateArgs) -> Result<GenerateResult> {
    let span = info_span!("generate", workbook = %args.workbook.display());
    let _guard = span.enter();
    let rows = parse_rows(&args.rows).context("parse row selection")?;
    let (session, _) = open_session(&args.template, &args.workbook, &args.source, &args.overrides)?;

    let table = session.generate(&rows)?;
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| session.default_output_path(&rows));
    session
        .write_document(&table, &output)
        .with_context(|| format!("write {}", output.display()))?;
    info!(
        output = %output.display(),
        requested = rows.len(),
        written = table.records.len(),
        "generation complete"
    );

    let headers = session
        .mapping()
        .map(|mapping| {
            mapping
                .mappings()
                .iter()
                .map(|column| column.header.clone())
                .collect()
        })
        .unwrap_or_default();
    Ok(GenerateResult {
        output,
        headers,
        table,
    })
}

/// Loads both inputs, then applies a saved mapping and manual overrides.
///
/// Returns the session and, when a mapping file was given, how many targets it
/// updated.
fn open_session(
    template: &Path,
    workbook: &Path,
    source: &SourceArgs,
    overrides: &OverrideArgs,
) -> Result<(Session, Option<usize>)> {
    let mut session = Session::new(source.options(), AutoMapOptions::default());
    session
        .load_template(template)
        .with_context(|| format!("load template {}", template.display()))?;
    session
        .load_workbook(workbook)
        .with_context(|| format!("load workbook {}", workbook.display()))?;

    let state = session
        .mapping_mut()
        .context("mapping unavailable after loading template and workbook")?;
    let loaded = match &overrides.mapping {
        Some(path) => {
            let stored =
                load_mapping(path).with_context(|| format!("load mapping {}", path.display()))?;
            Some(stored.apply_to(state)?)
        }
        None => None,
    };
    for text in &overrides.set {
        state
            .apply_source_override(text)
            .with_context(|| format!("apply --set {text}"))?;
    }
    for text in &overrides.format {
        state
            .apply_format_override(text)
            .with_context(|| format!("apply --format {text}"))?;
    }
    Ok((session, loaded))
}

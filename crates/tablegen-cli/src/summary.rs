use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use tablegen_ingest::SheetPreview;
use tablegen_model::{MappingSource, SourceCatalog, ValueFormat};

use crate::types::{GenerateResult, MapResult, SheetSummary};

pub fn print_sheets(sheets: &[SheetSummary]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Sheet"),
        header_cell("Rows"),
        header_cell("Columns"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for sheet in sheets {
        table.add_row(vec![
            Cell::new(&sheet.name)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(sheet.rows),
            Cell::new(sheet.columns),
        ]);
    }
    println!("{table}");
}

pub fn print_preview(preview: &SheetPreview) {
    if preview.rows.is_empty() {
        println!("No data rows below the header rows.");
        return;
    }
    for line in preview.lines() {
        println!("{line}");
    }
}

pub fn print_mapping(result: &MapResult) {
    let session = &result.session;
    if let Some(template) = session.template()
        && !template.title.is_empty()
    {
        println!("Title: {}", template.title);
    }
    if let Some(count) = result.loaded_from_file {
        println!("Mapping file applied to {count} column(s)");
    }
    let (Some(mapping), Some(catalog)) = (session.mapping(), session.catalog()) else {
        return;
    };
    let proposal = session.proposal();

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Target"),
        header_cell("Source"),
        header_cell("Label"),
        header_cell("Format"),
        header_cell("Score"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 5, CellAlignment::Right);
    for (position, column) in mapping.mappings().iter().enumerate() {
        // Scores only describe sources the auto-mapper picked.
        let score = proposal
            .filter(|proposal| {
                proposal
                    .mappings
                    .get(position)
                    .is_some_and(|proposed| proposed.source == column.source)
            })
            .and_then(|proposal| proposal.scores.get(position).copied().flatten());
        table.add_row(vec![
            Cell::new(position + 1),
            Cell::new(&column.header).add_attribute(Attribute::Bold),
            source_cell(&column.source),
            Cell::new(source_label(&column.source, catalog)),
            format_cell(column.format),
            match score {
                Some(score) => Cell::new(format!("{score:.2}")),
                None => dim_cell("-"),
            },
        ]);
    }
    println!("{table}");

    if let Some(proposal) = proposal
        && !proposal.unused_columns.is_empty()
    {
        let unused: Vec<String> = proposal
            .unused_columns
            .iter()
            .map(ToString::to_string)
            .collect();
        println!("Unused columns: {}", unused.join(", "));
    }
    if result.list_sources {
        println!("Sources:");
        for option in mapping.source_options() {
            println!("  {}", option.display);
        }
    }
    if let Some(path) = &result.saved_to {
        println!("Mapping saved: {}", path.display());
    }
}

pub fn print_generation(result: &GenerateResult) {
    println!("Output: {}", result.output.display());
    let skipped = result.table.requested.len() - result.table.records.len();
    if skipped > 0 {
        println!("Skipped {skipped} requested row(s) outside the sheet");
    }

    let mut table = Table::new();
    let mut header = vec![header_cell("Row")];
    header.extend(result.headers.iter().map(|label| header_cell(label)));
    table.set_header(header);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for record in &result.table.records {
        let mut row = vec![Cell::new(record.row).fg(Color::DarkGrey)];
        row.extend(
            (0..result.headers.len()).map(|position| match record.value_at(position) {
                Some(value) => Cell::new(value),
                None => dim_cell(""),
            }),
        );
        table.add_row(row);
    }
    println!("{table}");
}

fn source_label(source: &MappingSource, catalog: &SourceCatalog) -> String {
    match source {
        MappingSource::Column { locator } => catalog.get(*locator).unwrap_or_default().to_string(),
        MappingSource::CountryExtract { from_col } => {
            catalog.get(*from_col).unwrap_or_default().to_string()
        }
        MappingSource::Blank | MappingSource::Sequence => String::new(),
    }
}

fn source_cell(source: &MappingSource) -> Cell {
    match source {
        MappingSource::Blank => dim_cell(source),
        MappingSource::Column { .. } => Cell::new(source).fg(Color::Green),
        MappingSource::Sequence | MappingSource::CountryExtract { .. } => {
            Cell::new(source).fg(Color::Magenta)
        }
    }
}

fn format_cell(format: ValueFormat) -> Cell {
    match format {
        ValueFormat::Passthrough => dim_cell("passthrough"),
        ValueFormat::ShortDate => Cell::new("short_date").fg(Color::Yellow),
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

use std::fs::File;
use std::io::Read;

use tablegen_ingest::read_template;
use tablegen_model::{
    Alignment, ColumnLocator, ColumnMapping, MappingSource, Orientation, OutputRecord,
    OutputValue, PageSetup, TargetColumn, ValueFormat,
};
use tablegen_output::{TableDocument, output_file_name, write_docx};
use tempfile::TempDir;
use zip::ZipArchive;

fn mappings() -> Vec<ColumnMapping> {
    let b = ColumnLocator::parse("B").unwrap();
    vec![
        ColumnMapping::new(
            &TargetColumn::new("No").with_width(700).with_bold(true),
            MappingSource::Sequence,
            ValueFormat::Passthrough,
        ),
        ColumnMapping::new(
            &TargetColumn::new("Entidad").with_width(3500).with_align(Alignment::Justify),
            MappingSource::Column { locator: b },
            ValueFormat::Passthrough,
        ),
        ColumnMapping::new(
            &TargetColumn::new("País").with_width(1800),
            MappingSource::CountryExtract { from_col: b },
            ValueFormat::Passthrough,
        ),
    ]
}

fn record(row: u32, values: [&str; 3]) -> OutputRecord {
    let mut record = OutputRecord::new(row);
    for (header, value) in ["No", "Entidad", "País"].into_iter().zip(values) {
        record.push(header, OutputValue::text(value));
    }
    record
}

#[test]
fn written_document_reads_back_as_template() {
    let dir = TempDir::new().unwrap();
    let rows = [5, 6];
    let path = dir.path().join(output_file_name(&rows));
    let mut page = PageSetup::default();
    page.orientation = Orientation::Landscape;
    page.width = 16838;
    page.height = 11906;
    let columns = mappings();
    let records = vec![
        record(5, ["1", "Ministerio de Seguridad de la Nación", "Argentina"]),
        record(6, ["2", "Alcaldía de Bogotá", "Colombia"]),
    ];

    write_docx(
        &path,
        &TableDocument {
            title: "EXPERIENCIA ESPECÍFICA",
            page: &page,
            columns: &columns,
            records: &records,
        },
    )
    .expect("write docx");
    assert!(path.ends_with("Tabla_filas_5_6.docx"));

    let template = read_template(&path).expect("read generated docx");
    assert_eq!(template.title, "EXPERIENCIA ESPECÍFICA");
    insta::assert_snapshot!(template.headers().collect::<Vec<_>>().join(" | "), @"No | Entidad | País");
    let widths: Vec<u32> = template.columns.iter().map(|c| c.width).collect();
    assert_eq!(widths, vec![700, 3500, 1800]);
    assert!(template.columns[0].bold);
    assert_eq!(template.columns[1].align, Alignment::Justify);
    assert_eq!(template.page, page);
}

#[test]
fn package_contains_required_parts() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out.docx");
    let page = PageSetup::default();
    let columns = mappings();
    write_docx(
        &path,
        &TableDocument {
            title: "",
            page: &page,
            columns: &columns,
            records: &[record(9, ["1", "Entidad & Cía", ""])],
        },
    )
    .expect("write docx");

    let mut archive = ZipArchive::new(File::open(&path).unwrap()).unwrap();
    for part in ["[Content_Types].xml", "_rels/.rels", "word/document.xml"] {
        assert!(archive.by_name(part).is_ok(), "missing {part}");
    }
    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .unwrap()
        .read_to_string(&mut xml)
        .unwrap();
    assert!(xml.contains("Entidad &amp; Cía"));
    assert_eq!(xml.matches("<w:tbl>").count(), 1);
}

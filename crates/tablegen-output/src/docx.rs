//! WordprocessingML package writer.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use tablegen_model::{Alignment, ColumnMapping, Orientation, OutputRecord, PageSetup};
use tracing::{debug, info};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::error::{OutputError, Result};

const WORDML_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;

const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

/// Header cell shading.
const HEADER_FILL: &str = "BFBFBF";
/// Run size in half-points (11pt).
const FONT_HALF_POINTS: &str = "22";
/// Border width in eighths of a point.
const BORDER_SIZE: &str = "4";
const BORDER_EDGES: [&str; 4] = ["top", "left", "bottom", "right"];

/// Everything needed to lay out the output table.
#[derive(Debug, Clone, Copy)]
pub struct TableDocument<'a> {
    pub title: &'a str,
    pub page: &'a PageSetup,
    pub columns: &'a [ColumnMapping],
    pub records: &'a [OutputRecord],
}

/// Writes `document` as a `.docx` package at `path`.
pub fn write_docx(path: &Path, document: &TableDocument<'_>) -> Result<()> {
    let body = render_document_xml(document)?;
    let io_error = |source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(io_error)?;
    let mut zip = ZipWriter::new(BufWriter::new(file));
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    for (name, bytes) in [
        ("[Content_Types].xml", CONTENT_TYPES.as_bytes()),
        ("_rels/.rels", PACKAGE_RELS.as_bytes()),
        ("word/document.xml", body.as_slice()),
    ] {
        zip.start_file(name, options)?;
        zip.write_all(bytes).map_err(io_error)?;
    }
    zip.finish()?.flush().map_err(io_error)?;

    info!(
        path = %path.display(),
        columns = document.columns.len(),
        rows = document.records.len(),
        "wrote table document"
    );
    Ok(())
}

/// Renders the `word/document.xml` part.
pub fn render_document_xml(document: &TableDocument<'_>) -> Result<Vec<u8>> {
    if document.columns.is_empty() {
        return Err(OutputError::EmptyTable);
    }
    let mut out = PartWriter::new();
    out.declaration()?;
    out.start("w:document", &[("xmlns:w", WORDML_NS)])?;
    out.start("w:body", &[])?;

    if !document.title.trim().is_empty() {
        out.paragraph(document.title, Alignment::Center, true)?;
    }
    write_table(&mut out, document)?;
    write_section(&mut out, document.page)?;

    out.end("w:body")?;
    out.end("w:document")?;
    let bytes = out.into_inner();
    debug!(bytes = bytes.len(), "rendered document part");
    Ok(bytes)
}

fn write_table(out: &mut PartWriter, document: &TableDocument<'_>) -> Result<()> {
    let total_width: u32 = document.columns.iter().map(|column| column.width).sum();
    let total_width = total_width.to_string();

    out.start("w:tbl", &[])?;
    out.start("w:tblPr", &[])?;
    out.empty("w:tblW", &[("w:w", &total_width), ("w:type", "dxa")])?;
    out.empty("w:tblLayout", &[("w:type", "fixed")])?;
    out.end("w:tblPr")?;

    out.start("w:tblGrid", &[])?;
    for column in document.columns {
        out.empty("w:gridCol", &[("w:w", &column.width.to_string())])?;
    }
    out.end("w:tblGrid")?;

    out.start("w:tr", &[])?;
    out.start("w:trPr", &[])?;
    out.empty("w:tblHeader", &[])?;
    out.end("w:trPr")?;
    for column in document.columns {
        out.cell(column.width, Some(HEADER_FILL), &column.header, Alignment::Center, true)?;
    }
    out.end("w:tr")?;

    for record in document.records {
        out.start("w:tr", &[])?;
        for (position, column) in document.columns.iter().enumerate() {
            let text = record
                .value_at(position)
                .map(ToString::to_string)
                .unwrap_or_default();
            out.cell(column.width, None, &text, column.align, column.bold)?;
        }
        out.end("w:tr")?;
    }
    out.end("w:tbl")
}

fn write_section(out: &mut PartWriter, page: &PageSetup) -> Result<()> {
    let width = page.width.to_string();
    let height = page.height.to_string();
    let mut size = vec![("w:w", width.as_str()), ("w:h", height.as_str())];
    if page.orientation == Orientation::Landscape {
        size.push(("w:orient", "landscape"));
    }
    let margins = page.margins;
    let top = margins.top.to_string();
    let right = margins.right.to_string();
    let bottom = margins.bottom.to_string();
    let left = margins.left.to_string();

    out.start("w:sectPr", &[])?;
    out.empty("w:pgSz", &size)?;
    out.empty(
        "w:pgMar",
        &[
            ("w:top", &top),
            ("w:right", &right),
            ("w:bottom", &bottom),
            ("w:left", &left),
            ("w:header", "708"),
            ("w:footer", "708"),
            ("w:gutter", "0"),
        ],
    )?;
    out.end("w:sectPr")
}

/// Thin event helper over a quick-xml writer buffering one package part.
struct PartWriter {
    xml: Writer<Vec<u8>>,
}

impl PartWriter {
    fn new() -> Self {
        Self {
            xml: Writer::new(Vec::new()),
        }
    }

    fn into_inner(self) -> Vec<u8> {
        self.xml.into_inner()
    }

    fn declaration(&mut self) -> Result<()> {
        self.xml
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
        Ok(())
    }

    fn start(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<()> {
        let mut element = BytesStart::new(name);
        for &attribute in attributes {
            element.push_attribute(attribute);
        }
        self.xml.write_event(Event::Start(element))?;
        Ok(())
    }

    fn empty(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<()> {
        let mut element = BytesStart::new(name);
        for &attribute in attributes {
            element.push_attribute(attribute);
        }
        self.xml.write_event(Event::Empty(element))?;
        Ok(())
    }

    fn end(&mut self, name: &str) -> Result<()> {
        self.xml.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    fn text(&mut self, text: &str) -> Result<()> {
        self.xml.write_event(Event::Text(BytesText::new(text)))?;
        Ok(())
    }

    fn cell(
        &mut self,
        width: u32,
        fill: Option<&str>,
        text: &str,
        align: Alignment,
        bold: bool,
    ) -> Result<()> {
        self.start("w:tc", &[])?;
        self.start("w:tcPr", &[])?;
        self.empty("w:tcW", &[("w:w", &width.to_string()), ("w:type", "dxa")])?;
        self.start("w:tcBorders", &[])?;
        for edge in BORDER_EDGES {
            self.empty(
                &format!("w:{edge}"),
                &[
                    ("w:val", "single"),
                    ("w:sz", BORDER_SIZE),
                    ("w:space", "0"),
                    ("w:color", "000000"),
                ],
            )?;
        }
        self.end("w:tcBorders")?;
        if let Some(fill) = fill {
            self.empty("w:shd", &[("w:val", "clear"), ("w:color", "auto"), ("w:fill", fill)])?;
            self.empty("w:vAlign", &[("w:val", "center")])?;
        }
        self.end("w:tcPr")?;
        self.paragraph(text, align, bold)?;
        self.end("w:tc")
    }

    /// Single-run paragraph with no spacing after and single line spacing.
    fn paragraph(&mut self, text: &str, align: Alignment, bold: bool) -> Result<()> {
        self.start("w:p", &[])?;
        self.start("w:pPr", &[])?;
        self.empty(
            "w:spacing",
            &[("w:after", "0"), ("w:line", "240"), ("w:lineRule", "auto")],
        )?;
        self.empty("w:jc", &[("w:val", align.as_ooxml())])?;
        self.end("w:pPr")?;

        self.start("w:r", &[])?;
        self.start("w:rPr", &[])?;
        if bold {
            self.empty("w:b", &[])?;
        }
        self.empty("w:sz", &[("w:val", FONT_HALF_POINTS)])?;
        self.empty("w:szCs", &[("w:val", FONT_HALF_POINTS)])?;
        self.end("w:rPr")?;
        self.start("w:t", &[("xml:space", "preserve")])?;
        self.text(text)?;
        self.end("w:t")?;
        self.end("w:r")?;
        self.end("w:p")
    }
}

#[cfg(test)]
mod tests {
    use tablegen_model::{MappingSource, OutputValue, TargetColumn, ValueFormat};

    use super::*;

    fn columns() -> Vec<ColumnMapping> {
        vec![
            ColumnMapping::new(
                &TargetColumn::new("No").with_width(700).with_bold(true),
                MappingSource::Sequence,
                ValueFormat::Passthrough,
            ),
            ColumnMapping::new(
                &TargetColumn::new("Monto").with_align(Alignment::Right),
                MappingSource::Blank,
                ValueFormat::Passthrough,
            ),
        ]
    }

    fn render(title: &str, records: &[OutputRecord]) -> String {
        let page = PageSetup::default();
        let columns = columns();
        let bytes = render_document_xml(&TableDocument {
            title,
            page: &page,
            columns: &columns,
            records,
        })
        .unwrap();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn header_row_is_shaded_and_bold() {
        let xml = render("Experiencia", &[]);
        assert!(xml.contains(r#"<w:gridCol w:w="700"/><w:gridCol w:w="1500"/>"#));
        assert!(xml.contains(r#"<w:tblW w:w="2200" w:type="dxa"/>"#));
        assert_eq!(xml.matches(r#"w:fill="BFBFBF""#).count(), 2);
        assert!(xml.contains(r#"<w:t xml:space="preserve">Experiencia</w:t>"#));
        assert!(xml.contains(r#"<w:pgSz w:w="11906" w:h="16838"/>"#));
    }

    #[test]
    fn data_cells_follow_column_layout() {
        let mut record = OutputRecord::new(5);
        record.push("No", OutputValue::text("1"));
        record.push("Monto", OutputValue::Number(1500.5));
        let xml = render("", &[record]);

        assert!(!xml.contains("Experiencia"));
        assert_eq!(xml.matches("<w:tr>").count(), 2);
        assert!(xml.contains(r#"<w:jc w:val="right"/></w:pPr><w:r><w:rPr><w:sz w:val="22"/>"#));
        assert!(xml.contains(r#"<w:t xml:space="preserve">1500.5</w:t>"#));
    }

    #[test]
    fn text_is_escaped() {
        let mut record = OutputRecord::new(1);
        record.push("No", OutputValue::text("A & B <C>"));
        let xml = render("", &[record]);
        assert!(xml.contains("A &amp; B &lt;C&gt;"));
    }

    #[test]
    fn empty_column_list_is_rejected() {
        let page = PageSetup::default();
        let result = render_document_xml(&TableDocument {
            title: "x",
            page: &page,
            columns: &[],
            records: &[],
        });
        assert!(matches!(result, Err(OutputError::EmptyTable)));
    }
}

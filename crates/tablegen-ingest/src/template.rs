//! Layout template reader.
//!
//! A template is a `.docx` whose first table defines the target columns:
//! the header row gives the column labels, the table grid gives widths and
//! the second row (when present) gives each column's bold flag and
//! alignment. The first non-empty body paragraph becomes the title and the
//! first section's page settings are kept for the generated document.

use std::borrow::Cow;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use quick_xml::Reader;
use quick_xml::escape::resolve_xml_entity;
use quick_xml::events::{BytesRef, BytesStart, Event};
use tablegen_model::{
    Alignment, DEFAULT_COLUMN_WIDTH, Orientation, PageSetup, TargetColumn, Template,
};
use tracing::{debug, info, warn};
use zip::ZipArchive;
use zip::result::ZipError;

use crate::error::{IngestError, Result};
use crate::workbook::{check_file_size, open_error};

/// Main document part of a WordprocessingML package.
const DOCUMENT_PART: &str = "word/document.xml";

/// Reads target columns, title and page setup from a `.docx` template.
pub fn read_template(path: &Path) -> Result<Template> {
    check_file_size(path)?;
    let file = File::open(path).map_err(|e| open_error(path, e))?;
    let mut archive = ZipArchive::new(BufReader::new(file))?;
    let mut xml = String::new();
    match archive.by_name(DOCUMENT_PART) {
        Ok(mut part) => {
            part.read_to_string(&mut xml)
                .map_err(|source| IngestError::FileRead {
                    path: path.to_path_buf(),
                    source,
                })?;
        }
        Err(ZipError::FileNotFound) => {
            return Err(IngestError::MissingStructure(format!(
                "template {} has no {DOCUMENT_PART}",
                path.display()
            )));
        }
        Err(error) => return Err(error.into()),
    }

    let template = parse_document(&xml)?;
    info!(
        path = %path.display(),
        columns = template.columns.len(),
        title = %template.title,
        "loaded template"
    );
    Ok(template)
}

/// Parses the XML of a document part into a template.
pub fn parse_document(xml: &str) -> Result<Template> {
    let mut reader = Reader::from_str(xml);
    let config = reader.config_mut();
    config.expand_empty_elements = true;
    config.trim_text(false);

    let mut scanner = Scanner::default();
    loop {
        match reader.read_event()? {
            Event::Start(element) => scanner.start(&element)?,
            Event::End(_) => scanner.end(),
            Event::Text(text) => scanner.text(&text.xml_content()?),
            Event::CData(data) => scanner.text(&String::from_utf8_lossy(&data)),
            Event::GeneralRef(reference) => scanner.text(&resolve_reference(&reference)?),
            Event::Eof => break,
            _ => {}
        }
    }
    scanner.finish()
}

fn resolve_reference(reference: &BytesRef<'_>) -> Result<String> {
    let raw = reference.xml_content()?;
    if let Some(number) = raw.strip_prefix('#') {
        let code = match number.strip_prefix('x') {
            Some(hex) => u32::from_str_radix(hex, 16),
            None => number.parse(),
        }
        .map_err(|_| IngestError::XmlEntity(raw.to_string()))?;
        return char::from_u32(code)
            .map(String::from)
            .ok_or_else(|| IngestError::XmlEntity(raw.to_string()));
    }
    resolve_xml_entity(&raw)
        .map(str::to_string)
        .ok_or_else(|| IngestError::XmlEntity(raw.to_string()))
}

/// Value of the attribute with local name `name`, whatever its prefix.
fn attribute<'a>(element: &'a BytesStart<'a>, name: &str) -> Result<Option<Cow<'a, str>>> {
    for attr in element.attributes() {
        let attr = attr?;
        if attr.key.local_name().as_ref() == name.as_bytes() {
            return Ok(Some(attr.unescape_value()?));
        }
    }
    Ok(None)
}

fn numeric_attribute(element: &BytesStart<'_>, name: &str) -> Result<Option<u32>> {
    Ok(attribute(element, name)?.and_then(|value| value.trim().parse().ok()))
}

/// Style collected from one cell of the row below the header.
#[derive(Debug, Default)]
struct CellStyle {
    bold: bool,
    align: Option<Alignment>,
    paragraphs: usize,
}

/// Streaming state over the document's element tree.
#[derive(Debug, Default)]
struct Scanner {
    /// Local names of the open elements.
    stack: Vec<String>,

    title: Option<String>,
    /// Depth of the body paragraph whose text is being collected.
    title_paragraph: Option<(usize, String)>,

    /// Depth of the `tbl` element of the first table.
    table_depth: Option<usize>,
    table_closed: bool,
    widths: Vec<u32>,
    row_count: usize,
    headers: Vec<String>,
    /// Header cell text being collected.
    header_cell: Option<String>,
    styles: Vec<CellStyle>,

    /// Depth of the first `sectPr`.
    section_depth: Option<usize>,
    section_closed: bool,
    page: PageSetup,
}

impl Scanner {
    fn parent(&self) -> Option<&str> {
        self.stack.last().map(String::as_str)
    }

    /// Depth relative to the table element, for elements of the first table.
    fn table_level(&self) -> Option<usize> {
        match self.table_depth {
            Some(depth) if !self.table_closed => self.stack.len().checked_sub(depth),
            _ => None,
        }
    }

    fn start(&mut self, element: &BytesStart<'_>) -> Result<()> {
        let local = String::from_utf8_lossy(element.local_name().as_ref()).into_owned();

        match local.as_str() {
            "p" if self.parent() == Some("body") && self.title.is_none() => {
                self.title_paragraph = Some((self.stack.len(), String::new()));
            }
            "tbl" if self.table_depth.is_none() => {
                self.table_depth = Some(self.stack.len());
            }
            "sectPr" if self.section_depth.is_none() => {
                self.section_depth = Some(self.stack.len());
            }
            _ => {}
        }

        if let Some(level) = self.table_level() {
            self.start_in_table(&local, level, element)?;
        }
        if self.section_depth.is_some_and(|depth| depth + 1 == self.stack.len())
            && !self.section_closed
        {
            self.start_in_section(&local, element)?;
        }

        self.stack.push(local);
        Ok(())
    }

    /// `level` counts open elements between the table and `element`
    /// (`0` for the table itself).
    fn start_in_table(&mut self, local: &str, level: usize, element: &BytesStart<'_>) -> Result<()> {
        match (local, level) {
            ("gridCol", 2) if self.parent() == Some("tblGrid") => {
                let width = numeric_attribute(element, "w")?.unwrap_or(DEFAULT_COLUMN_WIDTH);
                self.widths.push(width);
            }
            ("tr", 1) => self.row_count += 1,
            ("tc", 2) if self.parent() == Some("tr") => match self.row_count {
                1 => self.header_cell = Some(String::new()),
                2 => self.styles.push(CellStyle::default()),
                _ => {}
            },
            _ if self.row_count == 2 && level > 2 => self.start_in_style_cell(local, element)?,
            _ => {}
        }
        Ok(())
    }

    fn start_in_style_cell(&mut self, local: &str, element: &BytesStart<'_>) -> Result<()> {
        let parent_is_ppr = self.parent() == Some("pPr");
        let in_first_paragraph = self.styles.last().is_some_and(|style| style.paragraphs == 1);
        let Some(style) = self.styles.last_mut() else {
            return Ok(());
        };
        match local {
            "p" => style.paragraphs += 1,
            "b" => {
                let value = attribute(element, "val")?;
                if !matches!(value.as_deref(), Some("0" | "false" | "off")) {
                    style.bold = true;
                }
            }
            "jc" if parent_is_ppr && in_first_paragraph && style.align.is_none() => {
                if let Some(value) = attribute(element, "val")? {
                    style.align = Alignment::from_ooxml(&value);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn start_in_section(&mut self, local: &str, element: &BytesStart<'_>) -> Result<()> {
        let page = &mut self.page;
        match local {
            "pgSz" => {
                if let Some(width) = numeric_attribute(element, "w")? {
                    page.width = width;
                }
                if let Some(height) = numeric_attribute(element, "h")? {
                    page.height = height;
                }
                if attribute(element, "orient")?.as_deref() == Some("landscape") {
                    page.orientation = Orientation::Landscape;
                }
            }
            "pgMar" => {
                let margins = &mut page.margins;
                for (name, slot) in [
                    ("top", &mut margins.top),
                    ("right", &mut margins.right),
                    ("bottom", &mut margins.bottom),
                    ("left", &mut margins.left),
                ] {
                    if let Some(value) = numeric_attribute(element, name)? {
                        *slot = value;
                    }
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn text(&mut self, content: &str) {
        if self.parent() != Some("t") {
            return;
        }
        if let Some((_, title)) = self.title_paragraph.as_mut() {
            title.push_str(content);
        }
        if let Some(cell) = self.header_cell.as_mut() {
            cell.push_str(content);
        }
    }

    fn end(&mut self) {
        let Some(local) = self.stack.pop() else {
            return;
        };
        let depth = self.stack.len();

        if self
            .title_paragraph
            .as_ref()
            .is_some_and(|(start, _)| *start == depth)
        {
            if let Some((_, text)) = self.title_paragraph.take() {
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    self.title = Some(trimmed.to_string());
                }
            }
        }

        if let Some(level) = self.table_level() {
            match (local.as_str(), level) {
                ("tbl", 0) => self.table_closed = true,
                ("tc", 2) => {
                    if let Some(text) = self.header_cell.take() {
                        self.headers.push(text.trim().to_string());
                    }
                }
                _ => {}
            }
        }

        if local == "sectPr" && self.section_depth == Some(depth) {
            self.section_closed = true;
        }
    }

    fn finish(self) -> Result<Template> {
        if self.table_depth.is_none() {
            return Err(IngestError::MissingStructure(
                "template contains no table".to_string(),
            ));
        }
        if self.row_count == 0 {
            return Err(IngestError::MissingStructure(
                "template table has no rows".to_string(),
            ));
        }
        if self.widths.is_empty() {
            warn!("template table declares no grid widths, using defaults");
        }

        let columns: Vec<TargetColumn> = self
            .headers
            .into_iter()
            .enumerate()
            .map(|(index, header)| {
                let style = self.styles.get(index);
                TargetColumn::new(header)
                    .with_width(self.widths.get(index).copied().unwrap_or(DEFAULT_COLUMN_WIDTH))
                    .with_bold(style.is_some_and(|style| style.bold))
                    .with_align(style.and_then(|style| style.align).unwrap_or_default())
            })
            .collect();
        debug!(
            rows = self.row_count,
            columns = columns.len(),
            "scanned template table"
        );

        Ok(Template {
            title: self.title.unwrap_or_default(),
            page: self.page,
            columns,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NS: &str = r#"xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main""#;

    fn document(body: &str) -> String {
        format!(r#"<?xml version="1.0" encoding="UTF-8"?><w:document {NS}><w:body>{body}</w:body></w:document>"#)
    }

    fn cell(text: &str, props: &str) -> String {
        format!("<w:tc><w:p>{props}<w:r><w:t>{text}</w:t></w:r></w:p></w:tc>")
    }

    #[test]
    fn reads_columns_widths_and_styles() {
        let body = format!(
            "<w:p/><w:p><w:r><w:t>Experiencias </w:t></w:r><w:r><w:t>relevantes</w:t></w:r></w:p>\
             <w:tbl><w:tblGrid><w:gridCol w:w=\"600\"/><w:gridCol w:w=\"3000\"/><w:gridCol/></w:tblGrid>\
             <w:tr>{}{}{}</w:tr>\
             <w:tr>{}{}{}</w:tr></w:tbl>\
             <w:sectPr><w:pgSz w:w=\"16838\" w:h=\"11906\" w:orient=\"landscape\"/>\
             <w:pgMar w:top=\"720\" w:right=\"1000\" w:bottom=\"720\" w:left=\"1000\"/></w:sectPr>",
            cell("No", ""),
            cell("Entidad", ""),
            cell("Pa&#237;s &amp; regi&#xF3;n", ""),
            cell("1", "<w:pPr><w:jc w:val=\"right\"/></w:pPr>"),
            "<w:tc><w:p><w:r><w:rPr><w:b/></w:rPr><w:t>x</w:t></w:r></w:p></w:tc>",
            "<w:tc><w:p><w:r><w:rPr><w:b w:val=\"0\"/></w:rPr><w:t>y</w:t></w:r></w:p></w:tc>",
        );
        let template = parse_document(&document(&body)).unwrap();

        assert_eq!(template.title, "Experiencias relevantes");
        let headers: Vec<&str> = template.headers().collect();
        assert_eq!(headers, vec!["No", "Entidad", "País & región"]);
        let widths: Vec<u32> = template.columns.iter().map(|c| c.width).collect();
        assert_eq!(widths, vec![600, 3000, DEFAULT_COLUMN_WIDTH]);
        assert_eq!(template.columns[0].align, Alignment::Right);
        assert!(!template.columns[0].bold);
        assert!(template.columns[1].bold);
        assert_eq!(template.columns[1].align, Alignment::Center);
        assert!(!template.columns[2].bold);
        assert_eq!(template.page.width, 16838);
        assert_eq!(template.page.orientation, Orientation::Landscape);
        assert_eq!(template.page.margins.left, 1000);
        assert_eq!(template.page.margins.top, 720);
    }

    #[test]
    fn nested_tables_do_not_add_columns() {
        let body = format!(
            "<w:tbl><w:tr>{}<w:tc><w:tbl><w:tr>{}</w:tr></w:tbl><w:p/></w:tc></w:tr></w:tbl>",
            cell("A", ""),
            cell("inner", ""),
        );
        let template = parse_document(&document(&body)).unwrap();
        assert_eq!(template.columns.len(), 2);
        assert_eq!(template.columns[0].header, "A");
        assert_eq!(template.columns[1].header, "inner");
        assert_eq!(template.title, "");
        assert_eq!(template.page, PageSetup::default());
    }

    #[test]
    fn only_first_table_is_used() {
        let body = format!(
            "<w:tbl><w:tr>{}</w:tr></w:tbl><w:tbl><w:tr>{}{}</w:tr></w:tbl>",
            cell("Uno", ""),
            cell("Dos", ""),
            cell("Tres", ""),
        );
        let template = parse_document(&document(&body)).unwrap();
        let headers: Vec<&str> = template.headers().collect();
        assert_eq!(headers, vec!["Uno"]);
    }

    #[test]
    fn missing_table_or_rows_is_structural() {
        let no_table = parse_document(&document("<w:p><w:r><w:t>Hola</w:t></w:r></w:p>"));
        assert!(matches!(no_table, Err(IngestError::MissingStructure(_))));
        let no_rows = parse_document(&document("<w:tbl><w:tblGrid/></w:tbl>"));
        assert!(matches!(no_rows, Err(IngestError::MissingStructure(_))));
    }
}

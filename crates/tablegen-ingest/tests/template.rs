use std::fs::File;
use std::io::Write;
use std::path::Path;

use tablegen_ingest::{IngestError, read_template};
use tablegen_model::Alignment;
use tempfile::TempDir;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

const DOCUMENT: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:pPr><w:jc w:val="center"/></w:pPr><w:r><w:t>Experiencia de la firma</w:t></w:r></w:p>
    <w:tbl>
      <w:tblPr><w:tblW w:w="0" w:type="auto"/></w:tblPr>
      <w:tblGrid><w:gridCol w:w="700"/><w:gridCol w:w="3500"/><w:gridCol w:w="1800"/><w:gridCol w:w="1500"/></w:tblGrid>
      <w:tr>
        <w:tc><w:p><w:r><w:t>No</w:t></w:r></w:p></w:tc>
        <w:tc><w:p><w:r><w:t>Entidad</w:t></w:r></w:p></w:tc>
        <w:tc><w:p><w:r><w:t>País</w:t></w:r></w:p></w:tc>
        <w:tc><w:p><w:r><w:t xml:space="preserve">Fecha </w:t></w:r><w:r><w:t>Inicio</w:t></w:r></w:p></w:tc>
      </w:tr>
      <w:tr>
        <w:tc><w:p><w:pPr><w:jc w:val="center"/></w:pPr><w:r><w:rPr><w:b/></w:rPr><w:t>1</w:t></w:r></w:p></w:tc>
        <w:tc><w:p><w:pPr><w:jc w:val="both"/></w:pPr><w:r><w:t>x</w:t></w:r></w:p></w:tc>
        <w:tc><w:p><w:pPr><w:jc w:val="left"/></w:pPr><w:r><w:t>x</w:t></w:r></w:p></w:tc>
        <w:tc><w:p><w:r><w:t>x</w:t></w:r></w:p></w:tc>
      </w:tr>
    </w:tbl>
    <w:sectPr><w:pgSz w:w="11906" w:h="16838"/><w:pgMar w:top="1134" w:right="1134" w:bottom="1134" w:left="1701" w:header="709" w:footer="709" w:gutter="0"/></w:sectPr>
  </w:body>
</w:document>"#;

fn write_docx(path: &Path, document: Option<&str>) {
    let mut zip = ZipWriter::new(File::create(path).unwrap());
    let options = SimpleFileOptions::default();
    zip.start_file("[Content_Types].xml", options).unwrap();
    zip.write_all(b"<?xml version=\"1.0\"?><Types/>").unwrap();
    if let Some(document) = document {
        zip.start_file("word/document.xml", options).unwrap();
        zip.write_all(document.as_bytes()).unwrap();
    }
    zip.finish().unwrap();
}

#[test]
fn reads_template_from_docx() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("plantilla.docx");
    write_docx(&path, Some(DOCUMENT));

    let template = read_template(&path).unwrap();
    assert_eq!(template.title, "Experiencia de la firma");
    let headers: Vec<&str> = template.headers().collect();
    assert_eq!(headers, vec!["No", "Entidad", "País", "Fecha Inicio"]);

    let widths: Vec<u32> = template.columns.iter().map(|c| c.width).collect();
    assert_eq!(widths, vec![700, 3500, 1800, 1500]);
    let aligns: Vec<Alignment> = template.columns.iter().map(|c| c.align).collect();
    assert_eq!(
        aligns,
        vec![Alignment::Center, Alignment::Justify, Alignment::Left, Alignment::Center]
    );
    assert!(template.columns[0].bold);
    assert!(!template.columns[1].bold);
    assert_eq!(template.page.margins.left, 1701);
    assert_eq!(template.page.margins.top, 1134);
    assert_eq!(template.page.height, 16838);
}

#[test]
fn docx_without_document_part_is_structural_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("vacio.docx");
    write_docx(&path, None);
    assert!(matches!(
        read_template(&path),
        Err(IngestError::MissingStructure(_))
    ));
}

#[test]
fn non_zip_template_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("plantilla.docx");
    std::fs::write(&path, "not a zip").unwrap();
    assert!(matches!(read_template(&path), Err(IngestError::Zip(_))));
}

#[test]
fn missing_template_file() {
    let dir = TempDir::new().unwrap();
    assert!(matches!(
        read_template(&dir.path().join("nada.docx")),
        Err(IngestError::FileNotFound { .. })
    ));
}

//! Document assembly for tablegen.
//!
//! Writes the generated table as a WordprocessingML (`.docx`) package: a
//! title paragraph, one table whose header row is shaded and bold, and the
//! page geometry copied from the template.

mod docx;
mod error;
mod naming;

pub use docx::{TableDocument, render_document_xml, write_docx};
pub use error::{OutputError, Result};
pub use naming::output_file_name;

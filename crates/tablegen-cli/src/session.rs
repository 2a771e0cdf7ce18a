//! Working state of one template/workbook pairing.
//!
//! A [`Session`] owns whatever has been loaded so far. Loads that fail leave
//! the previous state untouched; the proposed mapping is rebuilt whenever
//! both a template and a source catalog are present.

use std::path::{Path, PathBuf};

use tablegen_ingest::{
    IngestError, SourceOptions, load_workbook, read_source_catalog, read_template, select_sheet,
};
use tablegen_map::{AutoMapOptions, AutoMapper, MapError, MappingProposal, MappingState};
use tablegen_model::{OutputRecord, Sheet, SourceCatalog, Template, Workbook};
use tablegen_output::{OutputError, TableDocument, output_file_name, write_docx};
use tablegen_transform::read_rows;
use thiserror::Error;
use tracing::{debug, info};

use crate::logging::redact_value;

/// Why a generation request produced nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EmptySelection {
    #[error("no row numbers were given")]
    NoRows,
    #[error("no target column is mapped to a source")]
    NoMappedColumns,
    #[error("none of the requested rows exist in the sheet")]
    NoRowsInRange,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no template loaded")]
    NoTemplate,
    #[error("no workbook loaded")]
    NoWorkbook,
    #[error("nothing to generate: {0}")]
    EmptySelection(#[from] EmptySelection),
    #[error(transparent)]
    Ingest(#[from] IngestError),
    #[error(transparent)]
    Map(#[from] MapError),
    #[error(transparent)]
    Output(#[from] OutputError),
}

pub type Result<T> = std::result::Result<T, SessionError>;

#[derive(Debug, Clone)]
struct LoadedTemplate {
    path: PathBuf,
    template: Template,
}

#[derive(Debug, Clone)]
struct LoadedWorkbook {
    path: PathBuf,
    workbook: Workbook,
    catalog: SourceCatalog,
}

/// Rows materialized for one generation request.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedTable {
    /// Row numbers as requested, including any that were skipped.
    pub requested: Vec<u32>,
    pub records: Vec<OutputRecord>,
}

/// Template, workbook and mapping held between user actions.
#[derive(Debug, Clone)]
pub struct Session {
    source: SourceOptions,
    mapper: AutoMapper,
    template: Option<LoadedTemplate>,
    workbook: Option<LoadedWorkbook>,
    proposal: Option<MappingProposal>,
    mapping: Option<MappingState>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SourceOptions::default(), AutoMapOptions::default())
    }
}

impl Session {
    pub fn new(source: SourceOptions, options: AutoMapOptions) -> Self {
        Self {
            source,
            mapper: AutoMapper::new(options),
            template: None,
            workbook: None,
            proposal: None,
            mapping: None,
        }
    }

    pub fn source(&self) -> &SourceOptions {
        &self.source
    }

    pub fn template_path(&self) -> Option<&Path> {
        self.template.as_ref().map(|loaded| loaded.path.as_path())
    }

    pub fn template(&self) -> Option<&Template> {
        self.template.as_ref().map(|loaded| &loaded.template)
    }

    pub fn workbook(&self) -> Option<&Workbook> {
        self.workbook.as_ref().map(|loaded| &loaded.workbook)
    }

    pub fn workbook_path(&self) -> Option<&Path> {
        self.workbook.as_ref().map(|loaded| loaded.path.as_path())
    }

    pub fn catalog(&self) -> Option<&SourceCatalog> {
        self.workbook.as_ref().map(|loaded| &loaded.catalog)
    }

    /// Auto-mapper output the current mapping started from.
    pub fn proposal(&self) -> Option<&MappingProposal> {
        self.proposal.as_ref()
    }

    pub fn mapping(&self) -> Option<&MappingState> {
        self.mapping.as_ref()
    }

    /// Mapping under review, for applying overrides.
    pub fn mapping_mut(&mut self) -> Option<&mut MappingState> {
        self.mapping.as_mut()
    }

    pub fn load_template(&mut self, path: &Path) -> Result<&Template> {
        let template = read_template(path)?;
        info!(
            path = %path.display(),
            columns = template.columns.len(),
            "template loaded"
        );
        self.template = Some(LoadedTemplate {
            path: path.to_path_buf(),
            template,
        });
        self.rebuild_mapping();
        self.template().ok_or(SessionError::NoTemplate)
    }

    /// Loads a workbook and reads the header rows of the configured sheet.
    pub fn load_workbook(&mut self, path: &Path) -> Result<&SourceCatalog> {
        let workbook = load_workbook(path)?;
        let catalog = read_source_catalog(&workbook, &self.source)?;
        info!(
            path = %path.display(),
            sheet = %self.source.sheet,
            columns = catalog.len(),
            "workbook loaded"
        );
        self.workbook = Some(LoadedWorkbook {
            path: path.to_path_buf(),
            workbook,
            catalog,
        });
        self.rebuild_mapping();
        self.catalog().ok_or(SessionError::NoWorkbook)
    }

    /// Switches sheet or header row, re-reading the loaded workbook's headers.
    pub fn select_source(&mut self, source: SourceOptions) -> Result<()> {
        if let Some(loaded) = self.workbook.as_mut() {
            loaded.catalog = read_source_catalog(&loaded.workbook, &source)?;
        }
        self.source = source;
        self.rebuild_mapping();
        Ok(())
    }

    pub fn clear_template(&mut self) {
        self.template = None;
        self.rebuild_mapping();
    }

    pub fn clear_workbook(&mut self) {
        self.workbook = None;
        self.rebuild_mapping();
    }

    fn rebuild_mapping(&mut self) {
        let (Some(template), Some(workbook)) = (&self.template, &self.workbook) else {
            self.proposal = None;
            self.mapping = None;
            return;
        };
        let proposal = self
            .mapper
            .propose(&template.template.columns, &workbook.catalog);
        info!(
            targets = proposal.mappings.len(),
            mapped = proposal.mapped_count(),
            unused = proposal.unused_columns.len(),
            "proposed mapping"
        );
        self.mapping = Some(MappingState::from_proposal(
            workbook.catalog.clone(),
            proposal.clone(),
            self.mapper.options(),
        ));
        self.proposal = Some(proposal);
    }

    fn sheet(&self) -> Result<&Sheet> {
        let loaded = self.workbook.as_ref().ok_or(SessionError::NoWorkbook)?;
        Ok(select_sheet(&loaded.workbook, &self.source.sheet)?)
    }

    /// Materializes `rows` through the current mapping.
    pub fn generate(&self, rows: &[u32]) -> Result<GeneratedTable> {
        if self.template.is_none() {
            return Err(SessionError::NoTemplate);
        }
        let sheet = self.sheet()?;
        let mapping = self.mapping.as_ref().ok_or(SessionError::NoTemplate)?;
        if rows.is_empty() {
            return Err(EmptySelection::NoRows.into());
        }
        if !mapping.has_mapped_source() {
            return Err(EmptySelection::NoMappedColumns.into());
        }

        let records = read_rows(sheet, rows, mapping.mappings());
        if records.is_empty() {
            return Err(EmptySelection::NoRowsInRange.into());
        }
        for record in &records {
            for (header, value) in &record.values {
                let text = value.to_string();
                debug!(row = record.row, column = %header, value = redact_value(&text), "cell");
            }
        }
        Ok(GeneratedTable {
            requested: rows.to_vec(),
            records,
        })
    }

    /// Default output location: next to the workbook, named after the rows.
    pub fn default_output_path(&self, rows: &[u32]) -> PathBuf {
        let name = output_file_name(rows);
        match self.workbook_path().and_then(Path::parent) {
            Some(dir) => dir.join(name),
            None => PathBuf::from(name),
        }
    }

    /// Writes a generated table using the template's title and page setup.
    pub fn write_document(&self, table: &GeneratedTable, path: &Path) -> Result<()> {
        let template = self.template().ok_or(SessionError::NoTemplate)?;
        let mapping = self.mapping.as_ref().ok_or(SessionError::NoWorkbook)?;
        write_docx(
            path,
            &TableDocument {
                title: &template.title,
                page: &template.page,
                columns: mapping.mappings(),
                records: &table.records,
            },
        )?;
        Ok(())
    }
}

//! Mapping files for reusing a reviewed mapping across runs.
//!
//! A mapping file is a JSON document:
//!
//! ```json
//! {
//!   "version": "1.0",
//!   "saved_at": "2026-10-19T09:30:00Z",
//!   "description": "Experiencia ESP",
//!   "mappings": [
//!     { "header": "No", "source": { "kind": "sequence" }, "format": "passthrough", "width": 600 }
//!   ]
//! }
//! ```
//!
//! Loading a file onto a freshly read template keeps the template's layout
//! and only takes sources and formats from the file.

use std::fs;
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tablegen_model::ColumnMapping;
use tracing::{debug, info};

use crate::error::{MapError, Result};
use crate::state::MappingState;

/// Version written into new mapping files.
pub const MAPPING_FILE_VERSION: &str = "1.0";

fn default_version() -> String {
    MAPPING_FILE_VERSION.to_string()
}

/// A mapping with its file metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredMapping {
    #[serde(default = "default_version")]
    pub version: String,
    /// When the mapping was saved (ISO 8601, UTC).
    #[serde(default)]
    pub saved_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub mappings: Vec<ColumnMapping>,
}

impl StoredMapping {
    /// Wraps mappings stamped with the current time.
    pub fn new(mappings: Vec<ColumnMapping>) -> Self {
        Self {
            version: default_version(),
            saved_at: Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)),
            description: None,
            mappings,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Copies source and format onto the matching targets of `state`.
    ///
    /// Targets are matched by header; stored entries without a counterpart
    /// are ignored. Returns how many targets were updated.
    pub fn apply_to(&self, state: &mut MappingState) -> Result<usize> {
        let mut applied = 0;
        for stored in &self.mappings {
            let Some(position) = state.position(&stored.header) else {
                debug!(header = %stored.header, "stored mapping has no target column");
                continue;
            };
            state.set_stored(position, stored.source, stored.format)?;
            applied += 1;
        }
        Ok(applied)
    }
}

/// Writes a mapping file as pretty-printed JSON.
pub fn save_mapping(path: &Path, stored: &StoredMapping) -> Result<()> {
    let json = serde_json::to_string_pretty(stored).map_err(MapError::Serialize)?;
    fs::write(path, json).map_err(|source| MapError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), columns = stored.mappings.len(), "saved mapping");
    Ok(())
}

/// Reads a mapping file.
pub fn load_mapping(path: &Path) -> Result<StoredMapping> {
    let content = fs::read_to_string(path).map_err(|source| MapError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let stored: StoredMapping =
        serde_json::from_str(&content).map_err(|source| MapError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    info!(path = %path.display(), columns = stored.mappings.len(), "loaded mapping");
    Ok(stored)
}

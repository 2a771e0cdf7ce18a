//! Automatic column mapping between a template table and a spreadsheet.
//!
//! The [`AutoMapper`] proposes, for every target column of a template, one
//! source: a spreadsheet column picked by word overlap with its header label,
//! or one of the marker sources (sequence number, country extraction, blank).
//! Each spreadsheet column is proposed for at most one target; earlier target
//! columns get first pick.
//!
//! The proposal can then be reviewed through [`MappingState`] and stored with
//! [`save_mapping`] / [`load_mapping`].
//!
//! # Example
//!
//! ```ignore
//! use tablegen_map::auto_map;
//!
//! let mappings = auto_map(&template.columns, &catalog);
//! ```

#![deny(unsafe_code)]

mod engine;
mod error;
mod repository;
mod state;
mod utils;
mod vocabulary;

pub use engine::{
    AutoMapOptions, AutoMapper, MappingProposal, auto_map, find_entity_column,
    resolve_country_source,
};
pub use error::{MapError, Result};
pub use repository::{MAPPING_FILE_VERSION, StoredMapping, load_mapping, save_mapping};
pub use state::{MappingState, SourceChoice, SourceOption};
pub use utils::{normalize, token_set, word_overlap};

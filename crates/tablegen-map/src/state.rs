//! Mapping review state.
//!
//! Holds the proposed mappings for a template/sheet pair and applies the
//! reviewer's overrides. Overrides are free to reuse a column that another
//! target already reads from; only the auto-mapper enforces exclusivity.

use std::fmt;
use std::str::FromStr;

use tablegen_model::{ColumnLocator, ColumnMapping, MappingSource, SourceCatalog, ValueFormat};
use tracing::{debug, warn};

use crate::engine::{AutoMapOptions, MappingProposal, resolve_country_source};
use crate::error::{MapError, Result};
use crate::utils::normalize;

/// Labels in source option listings are cut to this many characters.
const OPTION_LABEL_CHARS: usize = 40;

/// A source picked by the reviewer.
///
/// Unlike [`MappingSource`], the country marker carries no column: it is
/// resolved against the catalog when applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceChoice {
    Blank,
    Sequence,
    Country,
    Column(ColumnLocator),
}

impl FromStr for SourceChoice {
    type Err = MapError;

    /// Accepts `blank`, `seq`/`sequence`, `country`/`pais`, a column letter,
    /// or a listing entry such as `"B: Entidad Contratante"`. Marker names
    /// win over column letters that spell the same word.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        match normalize(trimmed).as_str() {
            "" | "blank" | "vacio" => return Ok(Self::Blank),
            "seq" | "sequence" | "numero" => return Ok(Self::Sequence),
            "country" | "pais" => return Ok(Self::Country),
            _ => {}
        }
        let letters = trimmed.split(':').next().unwrap_or(trimmed);
        ColumnLocator::parse(letters)
            .map(Self::Column)
            .map_err(|_| MapError::InvalidSource(s.to_string()))
    }
}

impl fmt::Display for SourceChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blank => f.write_str("blank"),
            Self::Sequence => f.write_str("seq"),
            Self::Country => f.write_str("country"),
            Self::Column(locator) => write!(f, "{locator}"),
        }
    }
}

/// One entry of the source picker shown to a reviewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceOption {
    pub choice: SourceChoice,
    pub display: String,
}

/// Reviewable mapping for one template/sheet pair.
#[derive(Debug, Clone)]
pub struct MappingState {
    catalog: SourceCatalog,
    mappings: Vec<ColumnMapping>,
    fallback_entity_column: ColumnLocator,
}

impl MappingState {
    pub fn new(catalog: SourceCatalog, mappings: Vec<ColumnMapping>) -> Self {
        Self {
            catalog,
            mappings,
            fallback_entity_column: AutoMapOptions::default().fallback_entity_column,
        }
    }

    /// Starts a review from an auto-mapper proposal.
    pub fn from_proposal(
        catalog: SourceCatalog,
        proposal: MappingProposal,
        options: &AutoMapOptions,
    ) -> Self {
        Self {
            catalog,
            mappings: proposal.mappings,
            fallback_entity_column: options.fallback_entity_column,
        }
    }

    pub fn catalog(&self) -> &SourceCatalog {
        &self.catalog
    }

    pub fn mappings(&self) -> &[ColumnMapping] {
        &self.mappings
    }

    pub fn into_mappings(self) -> Vec<ColumnMapping> {
        self.mappings
    }

    /// Position of the first target whose header matches `header`, exactly or
    /// after normalization.
    pub fn position(&self, header: &str) -> Option<usize> {
        self.mappings
            .iter()
            .position(|mapping| mapping.header == header)
            .or_else(|| {
                let wanted = normalize(header);
                self.mappings
                    .iter()
                    .position(|mapping| normalize(&mapping.header) == wanted)
            })
    }

    /// Replaces the source of the target at `position`.
    pub fn set_source(&mut self, position: usize, choice: SourceChoice) -> Result<()> {
        let source = match choice {
            SourceChoice::Blank => MappingSource::Blank,
            SourceChoice::Sequence => MappingSource::Sequence,
            SourceChoice::Country => MappingSource::CountryExtract {
                from_col: resolve_country_source(&self.catalog, self.fallback_entity_column),
            },
            SourceChoice::Column(locator) => {
                if !self.catalog.contains(locator) {
                    warn!(column = %locator, "column has no header label in the sheet");
                }
                MappingSource::Column { locator }
            }
        };
        let mapping = self.mapping_mut(position)?;
        debug!(header = %mapping.header, %source, "source overridden");
        mapping.source = source;
        Ok(())
    }

    /// Replaces the value format of the target at `position`.
    pub fn set_format(&mut self, position: usize, format: ValueFormat) -> Result<()> {
        let mapping = self.mapping_mut(position)?;
        debug!(header = %mapping.header, %format, "format overridden");
        mapping.format = format;
        Ok(())
    }

    pub(crate) fn set_stored(
        &mut self,
        position: usize,
        source: MappingSource,
        format: ValueFormat,
    ) -> Result<()> {
        let mapping = self.mapping_mut(position)?;
        mapping.source = source;
        mapping.format = format;
        Ok(())
    }

    /// Applies a `HEADER=SOURCE` override.
    pub fn apply_source_override(&mut self, text: &str) -> Result<()> {
        let (header, value) = split_override(text)?;
        let position = self
            .position(header)
            .ok_or_else(|| MapError::UnknownTarget(header.to_string()))?;
        self.set_source(position, value.parse()?)
    }

    /// Applies a `HEADER=FORMAT` override.
    pub fn apply_format_override(&mut self, text: &str) -> Result<()> {
        let (header, value) = split_override(text)?;
        let position = self
            .position(header)
            .ok_or_else(|| MapError::UnknownTarget(header.to_string()))?;
        self.set_format(position, value.parse()?)
    }

    /// Picker entries: the three markers, then every catalog column.
    pub fn source_options(&self) -> Vec<SourceOption> {
        let markers = [
            (SourceChoice::Blank, "(blank)"),
            (SourceChoice::Sequence, "(sequence No.)"),
            (SourceChoice::Country, "(country from entity)"),
        ];
        markers
            .into_iter()
            .map(|(choice, display)| SourceOption {
                choice,
                display: display.to_string(),
            })
            .chain(self.catalog.iter().map(|(locator, label)| SourceOption {
                choice: SourceChoice::Column(locator),
                display: format!(
                    "{locator}: {}",
                    label.chars().take(OPTION_LABEL_CHARS).collect::<String>()
                ),
            }))
            .collect()
    }

    /// True when at least one target reads from a non-blank source.
    pub fn has_mapped_source(&self) -> bool {
        self.mappings
            .iter()
            .any(|mapping| !mapping.source.is_blank())
    }

    fn mapping_mut(&mut self, position: usize) -> Result<&mut ColumnMapping> {
        let len = self.mappings.len();
        self.mappings
            .get_mut(position)
            .ok_or(MapError::PositionOutOfRange { position, len })
    }
}

fn split_override(text: &str) -> Result<(&str, &str)> {
    match text.rsplit_once('=') {
        Some((header, value)) if !header.trim().is_empty() => Ok((header.trim(), value.trim())),
        _ => Err(MapError::InvalidOverride(text.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use tablegen_model::TargetColumn;

    use super::*;
    use crate::engine::AutoMapper;

    fn loc(letters: &str) -> ColumnLocator {
        ColumnLocator::parse(letters).unwrap()
    }

    fn state() -> MappingState {
        let catalog: SourceCatalog = [
            (loc("A"), "Numero".to_string()),
            (loc("B"), "Entidad Contratante".to_string()),
            (loc("C"), "Objeto del contrato y alcance de los servicios".to_string()),
        ]
        .into_iter()
        .collect();
        let targets = vec![
            TargetColumn::new("No"),
            TargetColumn::new("Entidad"),
            TargetColumn::new("Monto"),
        ];
        let options = AutoMapOptions::default();
        let proposal = AutoMapper::new(options).propose(&targets, &catalog);
        MappingState::from_proposal(catalog, proposal, &options)
    }

    #[test]
    fn choices_parse_markers_and_letters() {
        assert_eq!("blank".parse::<SourceChoice>().unwrap(), SourceChoice::Blank);
        assert_eq!("SEQ".parse::<SourceChoice>().unwrap(), SourceChoice::Sequence);
        assert_eq!("País".parse::<SourceChoice>().unwrap(), SourceChoice::Country);
        assert_eq!(
            "b: Entidad".parse::<SourceChoice>().unwrap(),
            SourceChoice::Column(loc("B"))
        );
        assert!("B2".parse::<SourceChoice>().is_err());
    }

    #[test]
    fn override_may_reuse_a_column() {
        let mut state = state();
        state.apply_source_override("Monto=B").unwrap();
        let columns: Vec<_> = state
            .mappings()
            .iter()
            .filter_map(|mapping| mapping.source.column())
            .collect();
        assert_eq!(columns, vec![loc("B"), loc("B")]);
    }

    #[test]
    fn country_override_resolves_entity_column() {
        let mut state = state();
        state.apply_source_override("monto = country").unwrap();
        assert_eq!(
            state.mappings()[2].source,
            MappingSource::CountryExtract { from_col: loc("B") }
        );
    }

    #[test]
    fn format_override_and_errors() {
        let mut state = state();
        state.apply_format_override("Entidad=short_date").unwrap();
        assert_eq!(state.mappings()[1].format, ValueFormat::ShortDate);
        assert!(matches!(
            state.apply_format_override("Fecha=short_date"),
            Err(MapError::UnknownTarget(_))
        ));
        assert!(matches!(
            state.apply_source_override("Monto"),
            Err(MapError::InvalidOverride(_))
        ));
        assert!(matches!(
            state.set_format(9, ValueFormat::Passthrough),
            Err(MapError::PositionOutOfRange { position: 9, len: 3 })
        ));
    }

    #[test]
    fn options_list_markers_then_truncated_labels() {
        let options = state().source_options();
        assert_eq!(options.len(), 6);
        assert_eq!(options[0].choice, SourceChoice::Blank);
        assert_eq!(options[3].display, "A: Numero");
        assert_eq!(
            options[5].display,
            "C: Objeto del contrato y alcance de los ser"
        );
    }

    #[test]
    fn blank_everywhere_has_no_mapped_source() {
        let mut state = state();
        assert!(state.has_mapped_source());
        for position in 0..3 {
            state.set_source(position, SourceChoice::Blank).unwrap();
        }
        assert!(!state.has_mapped_source());
    }
}

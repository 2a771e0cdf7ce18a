//! Auto-mapper: proposes one source per template column.

use std::collections::BTreeSet;

use tablegen_model::{
    ColumnLocator, ColumnMapping, MappingSource, SourceCatalog, TargetColumn, ValueFormat,
};
use tracing::{debug, info};

use crate::utils::{normalize, overlap_ratio, token_set};
use crate::vocabulary::{DateRole, is_country_header, is_entity_label, is_sequence_header};

/// Locator read for country extraction when no entity column is found.
const FALLBACK_ENTITY_COLUMN: ColumnLocator = ColumnLocator::saturating(4);

/// Tuning knobs for [`AutoMapper`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutoMapOptions {
    /// A candidate is accepted only when its score is strictly above this.
    pub min_score: f64,
    /// Added for each date end (start/end) shared by target and candidate.
    pub date_bonus: f64,
    /// Column read for country extraction when no entity column exists.
    pub fallback_entity_column: ColumnLocator,
}

impl Default for AutoMapOptions {
    fn default() -> Self {
        Self {
            min_score: 0.1,
            date_bonus: 0.4,
            fallback_entity_column: FALLBACK_ENTITY_COLUMN,
        }
    }
}

/// Result of an auto-mapping run.
#[derive(Debug, Clone, PartialEq)]
pub struct MappingProposal {
    /// One mapping per target column, in template order.
    pub mappings: Vec<ColumnMapping>,
    /// Winning overlap score per mapping; `None` for marker sources.
    pub scores: Vec<Option<f64>>,
    /// Catalog columns no target column was given, in column order.
    pub unused_columns: Vec<ColumnLocator>,
}

impl MappingProposal {
    /// Number of mappings with a non-blank source.
    pub fn mapped_count(&self) -> usize {
        self.mappings
            .iter()
            .filter(|mapping| !mapping.source.is_blank())
            .count()
    }
}

/// A catalog entry prepared for scoring.
struct Candidate<'a> {
    locator: ColumnLocator,
    label: &'a str,
    normalized: String,
    tokens: BTreeSet<String>,
}

/// Greedy, order-dependent column matcher.
///
/// Target columns are processed in template order; each concrete column is
/// handed out at most once, so earlier targets win contested columns.
///
/// # Example
///
/// ```ignore
/// let proposal = AutoMapper::default().propose(&template.columns, &catalog);
/// for mapping in &proposal.mappings {
///     println!("{} <- {}", mapping.header, mapping.source);
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct AutoMapper {
    options: AutoMapOptions,
}

impl AutoMapper {
    pub fn new(options: AutoMapOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &AutoMapOptions {
        &self.options
    }

    /// Proposes a mapping for every target column.
    pub fn propose(&self, targets: &[TargetColumn], catalog: &SourceCatalog) -> MappingProposal {
        let candidates: Vec<Candidate<'_>> = catalog
            .matching_order()
            .into_iter()
            .map(|(locator, label)| Candidate {
                locator,
                label,
                normalized: normalize(label),
                tokens: token_set(label),
            })
            .collect();
        let entity_column = candidates
            .iter()
            .find(|candidate| is_entity_label(&candidate.normalized))
            .map(|candidate| candidate.locator);

        let (decisions, used) = targets.iter().fold(
            (Vec::with_capacity(targets.len()), BTreeSet::new()),
            |(mut decisions, mut used), target| {
                let (mapping, score) = self.decide(target, &candidates, entity_column, &used);
                if let Some(locator) = mapping.source.column() {
                    used.insert(locator);
                }
                decisions.push((mapping, score));
                (decisions, used)
            },
        );

        let (mappings, scores): (Vec<_>, Vec<_>) = decisions.into_iter().unzip();
        let unused_columns = catalog
            .locators()
            .filter(|locator| !used.contains(locator))
            .collect();
        let proposal = MappingProposal {
            mappings,
            scores,
            unused_columns,
        };
        info!(
            targets = targets.len(),
            sources = catalog.len(),
            mapped = proposal.mapped_count(),
            "auto-mapping complete"
        );
        proposal
    }

    fn decide(
        &self,
        target: &TargetColumn,
        candidates: &[Candidate<'_>],
        entity_column: Option<ColumnLocator>,
        used: &BTreeSet<ColumnLocator>,
    ) -> (ColumnMapping, Option<f64>) {
        if is_sequence_header(&target.header) {
            debug!(header = %target.header, "sequence column");
            return (
                ColumnMapping::new(target, MappingSource::Sequence, ValueFormat::Passthrough),
                None,
            );
        }

        let normalized = normalize(&target.header);
        if is_country_header(&normalized) {
            let from_col = entity_column.unwrap_or(self.options.fallback_entity_column);
            debug!(header = %target.header, from_col = %from_col, "country column");
            return (
                ColumnMapping::new(
                    target,
                    MappingSource::CountryExtract { from_col },
                    ValueFormat::Passthrough,
                ),
                None,
            );
        }

        let role = DateRole::of(&normalized);
        let format = if role.is_date() {
            ValueFormat::ShortDate
        } else {
            ValueFormat::Passthrough
        };

        let target_tokens = token_set(&target.header);
        let mut best: Option<(&Candidate<'_>, f64)> = None;
        let mut best_score = 0.0;
        for candidate in candidates.iter().filter(|c| !used.contains(&c.locator)) {
            let score = overlap_ratio(&target_tokens, &candidate.tokens)
                + role.bonus(&candidate.normalized, self.options.date_bonus);
            if score > best_score {
                best_score = score;
                best = Some((candidate, score));
            }
        }

        match best {
            Some((candidate, score)) if score > self.options.min_score => {
                debug!(
                    header = %target.header,
                    column = %candidate.locator,
                    label = candidate.label,
                    score,
                    %format,
                    "matched column"
                );
                (
                    ColumnMapping::new(
                        target,
                        MappingSource::Column {
                            locator: candidate.locator,
                        },
                        format,
                    ),
                    Some(score),
                )
            }
            _ => {
                debug!(header = %target.header, best_score, "no column above threshold");
                (
                    ColumnMapping::new(target, MappingSource::Blank, format),
                    None,
                )
            }
        }
    }
}

/// Proposes mappings with default options.
pub fn auto_map(targets: &[TargetColumn], catalog: &SourceCatalog) -> Vec<ColumnMapping> {
    AutoMapper::default().propose(targets, catalog).mappings
}

/// First catalog column, in matching order, whose label names the
/// contracting entity.
pub fn find_entity_column(catalog: &SourceCatalog) -> Option<ColumnLocator> {
    catalog
        .matching_order()
        .into_iter()
        .find(|(_, label)| is_entity_label(&normalize(label)))
        .map(|(locator, _)| locator)
}

/// Column to read for country extraction: the entity column, or `fallback`.
pub fn resolve_country_source(catalog: &SourceCatalog, fallback: ColumnLocator) -> ColumnLocator {
    find_entity_column(catalog).unwrap_or(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(letters: &str) -> ColumnLocator {
        ColumnLocator::parse(letters).unwrap()
    }

    fn catalog(entries: &[(&str, &str)]) -> SourceCatalog {
        entries
            .iter()
            .map(|(letters, label)| (loc(letters), (*label).to_string()))
            .collect()
    }

    fn targets(headers: &[&str]) -> Vec<TargetColumn> {
        headers.iter().map(|header| TargetColumn::new(*header)).collect()
    }

    #[test]
    fn default_fallback_is_column_d() {
        assert_eq!(AutoMapOptions::default().fallback_entity_column, loc("D"));
    }

    #[test]
    fn country_without_entity_uses_fallback() {
        let mappings = auto_map(&targets(&["País"]), &catalog(&[("A", "Monto")]));
        assert_eq!(
            mappings[0].source,
            MappingSource::CountryExtract { from_col: loc("D") }
        );
    }

    #[test]
    fn entity_search_follows_matching_order() {
        let catalog = catalog(&[("A", "Nombre de la entidad contratante"), ("C", "Entidad")]);
        assert_eq!(find_entity_column(&catalog), Some(loc("C")));
        assert_eq!(resolve_country_source(&SourceCatalog::new(), loc("D")), loc("D"));
    }

    #[test]
    fn weak_overlap_is_rejected() {
        let options = AutoMapOptions {
            min_score: 0.5,
            ..AutoMapOptions::default()
        };
        let proposal = AutoMapper::new(options).propose(
            &targets(&["Monto total contrato"]),
            &catalog(&[("A", "Monto")]),
        );
        assert!(proposal.mappings[0].source.is_blank());
        assert_eq!(proposal.scores, vec![None]);
        assert_eq!(proposal.unused_columns, vec![loc("A")]);
    }

    #[test]
    fn date_bonus_steers_start_and_end() {
        let catalog = catalog(&[("E", "Fecha hasta"), ("F", "Fecha desde")]);
        let mappings = auto_map(&targets(&["Fecha Inicio", "Fecha Fin"]), &catalog);
        assert_eq!(mappings[0].source.column(), Some(loc("F")));
        assert_eq!(mappings[0].format, ValueFormat::ShortDate);
        assert_eq!(mappings[1].source.column(), Some(loc("E")));
        assert_eq!(mappings[1].format, ValueFormat::ShortDate);
    }

    #[test]
    fn blank_keeps_date_format() {
        let mappings = auto_map(&targets(&["Inicio"]), &SourceCatalog::new());
        assert!(mappings[0].source.is_blank());
        assert_eq!(mappings[0].format, ValueFormat::ShortDate);
    }

    #[test]
    fn ties_keep_first_in_matching_order() {
        let catalog = catalog(&[("B", "Monto USD"), ("A", "Monto ARS")]);
        let mappings = auto_map(&targets(&["Monto"]), &catalog);
        // Same length, "Monto ARS" sorts first lexicographically.
        assert_eq!(mappings[0].source.column(), Some(loc("A")));
    }

    #[test]
    fn layout_is_copied_from_target() {
        let target = TargetColumn::new("Monto")
            .with_width(2400)
            .with_bold(true)
            .with_align(tablegen_model::Alignment::Right);
        let mappings = auto_map(&[target], &catalog(&[("C", "Monto")]));
        assert_eq!(mappings[0].width, 2400);
        assert!(mappings[0].bold);
        assert_eq!(mappings[0].align, tablegen_model::Alignment::Right);
    }
}

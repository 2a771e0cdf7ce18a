//! Fixed header vocabularies recognized by the auto-mapper.

use crate::utils::normalize;

/// Headers that denote a running row number.
const SEQUENCE_HEADERS: &[&str] = &["no", "no.", "n", "#", "numero"];

/// Headers that denote a country column.
const COUNTRY_HEADERS: &[&str] = &["pais", "country", "paises"];

/// Substrings marking the contracting-entity column.
const ENTITY_MARKERS: &[&str] = &["entidad", "contratante"];

/// Tokens that make a target header a start date.
const START_DATE_TOKENS: &[&str] = &["inicio", "desde", "from", "start"];

/// Tokens that make a target header an end date.
const END_DATE_TOKENS: &[&str] = &["fin", "hasta", "end", "until"];

// Bonus vocabularies are matched as substrings of the source label and
// deliberately differ from the token lists above ("start" and "end" carry
// no bonus).
const START_BONUS_MARKERS: &[&str] = &["desde", "inicio", "from"];
const END_BONUS_MARKERS: &[&str] = &["hasta", "fin", "until"];

/// Checks both the normalized and the raw lowercase header: normalization
/// strips punctuation, so `"#"` would become empty and `"No."` would lose
/// its dot.
pub(crate) fn is_sequence_header(header: &str) -> bool {
    let normalized = normalize(header);
    let raw = header.trim().to_lowercase();
    SEQUENCE_HEADERS
        .iter()
        .any(|candidate| *candidate == normalized || *candidate == raw)
}

pub(crate) fn is_country_header(normalized: &str) -> bool {
    COUNTRY_HEADERS.contains(&normalized)
}

pub(crate) fn is_entity_label(normalized: &str) -> bool {
    ENTITY_MARKERS
        .iter()
        .any(|marker| normalized.contains(marker))
}

/// Which end of a date range a target header refers to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct DateRole {
    pub start: bool,
    pub end: bool,
}

impl DateRole {
    pub fn of(normalized: &str) -> Self {
        let has = |tokens: &[&str]| normalized.split_whitespace().any(|t| tokens.contains(&t));
        Self {
            start: has(START_DATE_TOKENS),
            end: has(END_DATE_TOKENS),
        }
    }

    pub fn is_date(self) -> bool {
        self.start || self.end
    }

    /// Bonus granted to a source label that names the same end of the range.
    pub fn bonus(self, normalized_label: &str, weight: f64) -> f64 {
        let mentions = |markers: &[&str]| markers.iter().any(|m| normalized_label.contains(m));
        let mut bonus = 0.0;
        if self.start && mentions(START_BONUS_MARKERS) {
            bonus += weight;
        }
        if self.end && mentions(END_BONUS_MARKERS) {
            bonus += weight;
        }
        bonus
    }
}

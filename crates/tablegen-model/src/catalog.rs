//! Source columns discovered in a sheet's header rows.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::locator::ColumnLocator;

/// Ordered mapping from column locator to header label.
///
/// Iteration follows column order (`A`, `B`, ..., `Z`, `AA`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceCatalog {
    entries: BTreeMap<ColumnLocator, String>,
}

impl SourceCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the label for a column.
    pub fn insert(&mut self, locator: ColumnLocator, label: impl Into<String>) {
        self.entries.insert(locator, label.into());
    }

    pub fn get(&self, locator: ColumnLocator) -> Option<&str> {
        self.entries.get(&locator).map(String::as_str)
    }

    pub fn contains(&self, locator: ColumnLocator) -> bool {
        self.entries.contains_key(&locator)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ColumnLocator, &str)> {
        self.entries
            .iter()
            .map(|(locator, label)| (*locator, label.as_str()))
    }

    pub fn locators(&self) -> impl Iterator<Item = ColumnLocator> + '_ {
        self.entries.keys().copied()
    }

    /// Entries ordered for matching: shorter labels first, then by label
    /// text, then by column.
    pub fn matching_order(&self) -> Vec<(ColumnLocator, &str)> {
        let mut ordered: Vec<(ColumnLocator, &str)> = self.iter().collect();
        ordered.sort_by(|(a_loc, a_label), (b_loc, b_label)| {
            a_label
                .chars()
                .count()
                .cmp(&b_label.chars().count())
                .then_with(|| a_label.cmp(b_label))
                .then_with(|| a_loc.cmp(b_loc))
        });
        ordered
    }
}

impl FromIterator<(ColumnLocator, String)> for SourceCatalog {
    fn from_iter<I: IntoIterator<Item = (ColumnLocator, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

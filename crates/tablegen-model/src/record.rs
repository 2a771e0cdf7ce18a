//! Materialized output rows.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Scalar value placed in an output cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OutputValue {
    Number(f64),
    Text(String),
}

impl OutputValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn empty() -> Self {
        Self::Text(String::new())
    }
}

impl fmt::Display for OutputValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

/// Values for one requested spreadsheet row, keyed by target header in
/// mapping order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputRecord {
    /// Original 1-based sheet row this record was read from.
    pub row: u32,
    pub values: Vec<(String, OutputValue)>,
}

impl OutputRecord {
    pub fn new(row: u32) -> Self {
        Self {
            row,
            values: Vec::new(),
        }
    }

    pub fn push(&mut self, header: impl Into<String>, value: OutputValue) {
        self.values.push((header.into(), value));
    }

    /// First value recorded under `header`.
    pub fn get(&self, header: &str) -> Option<&OutputValue> {
        self.values
            .iter()
            .find(|(name, _)| name == header)
            .map(|(_, value)| value)
    }

    /// Value at a mapping position; keeps duplicate headers apart.
    pub fn value_at(&self, position: usize) -> Option<&OutputValue> {
        self.values.get(position).map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

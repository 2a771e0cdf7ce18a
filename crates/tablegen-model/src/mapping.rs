//! Target-to-source mapping types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::locator::ColumnLocator;
use crate::template::{Alignment, TargetColumn};

/// Where a target column takes its values from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MappingSource {
    /// Every row gets an empty string.
    Blank,
    /// 1-based position of the row within the requested selection.
    Sequence,
    /// Country name derived from the text of `from_col`.
    CountryExtract { from_col: ColumnLocator },
    /// Raw value of a spreadsheet column.
    Column { locator: ColumnLocator },
}

impl MappingSource {
    /// Spreadsheet column this source reads its values from, if any.
    pub fn reads_from(&self) -> Option<ColumnLocator> {
        match self {
            Self::Blank | Self::Sequence => None,
            Self::CountryExtract { from_col } => Some(*from_col),
            Self::Column { locator } => Some(*locator),
        }
    }

    /// Concrete column assigned by this source (markers excluded).
    pub fn column(&self) -> Option<ColumnLocator> {
        match self {
            Self::Column { locator } => Some(*locator),
            _ => None,
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Blank)
    }
}

impl fmt::Display for MappingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blank => f.write_str("(blank)"),
            Self::Sequence => f.write_str("(sequence)"),
            Self::CountryExtract { from_col } => write!(f, "(country from {from_col})"),
            Self::Column { locator } => write!(f, "{locator}"),
        }
    }
}

/// Value-formatting rule applied to a column source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueFormat {
    #[default]
    Passthrough,
    /// `"Agosto 2021"` becomes `"ago-21"`.
    ShortDate,
}

impl fmt::Display for ValueFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Passthrough => f.write_str("passthrough"),
            Self::ShortDate => f.write_str("short_date"),
        }
    }
}

impl FromStr for ValueFormat {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "passthrough" | "" => Ok(Self::Passthrough),
            "short_date" => Ok(Self::ShortDate),
            _ => Err(ModelError::UnknownFormat(s.to_string())),
        }
    }
}

/// One resolved target column: its layout plus where its values come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub header: String,
    pub source: MappingSource,
    #[serde(default)]
    pub format: ValueFormat,
    pub width: u32,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub align: Alignment,
}

impl ColumnMapping {
    pub fn new(target: &TargetColumn, source: MappingSource, format: ValueFormat) -> Self {
        Self {
            header: target.header.clone(),
            source,
            format,
            width: target.width,
            bold: target.bold,
            align: target.align,
        }
    }
}

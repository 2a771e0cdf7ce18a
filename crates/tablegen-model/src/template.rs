//! Target columns and page geometry taken from a document template.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Column width (twentieths of a point) used when the template declares none.
pub const DEFAULT_COLUMN_WIDTH: u32 = 1500;

/// Paragraph alignment of a column's data cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    Left,
    #[default]
    Center,
    Right,
    Justify,
}

impl Alignment {
    /// Maps a WordprocessingML `w:jc` value onto an alignment.
    pub fn from_ooxml(value: &str) -> Option<Self> {
        match value {
            "left" | "start" => Some(Self::Left),
            "center" => Some(Self::Center),
            "right" | "end" => Some(Self::Right),
            "both" | "distribute" => Some(Self::Justify),
            _ => None,
        }
    }

    pub fn as_ooxml(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
            Self::Justify => "both",
        }
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Left => "LEFT",
            Self::Center => "CENTER",
            Self::Right => "RIGHT",
            Self::Justify => "JUSTIFY",
        };
        f.write_str(name)
    }
}

/// A column defined by the template's header row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetColumn {
    pub header: String,
    /// Width in twentieths of a point, from the table grid.
    pub width: u32,
    pub bold: bool,
    pub align: Alignment,
}

impl TargetColumn {
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            width: DEFAULT_COLUMN_WIDTH,
            bold: false,
            align: Alignment::default(),
        }
    }

    #[must_use]
    pub fn with_width(mut self, width: u32) -> Self {
        self.width = width;
        self
    }

    #[must_use]
    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    #[must_use]
    pub fn with_align(mut self, align: Alignment) -> Self {
        self.align = align;
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMargins {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

impl Default for PageMargins {
    fn default() -> Self {
        Self {
            top: 1440,
            right: 1440,
            bottom: 1440,
            left: 1440,
        }
    }
}

/// Page geometry in twentieths of a point (A4 portrait by default).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSetup {
    pub width: u32,
    pub height: u32,
    pub orientation: Orientation,
    pub margins: PageMargins,
}

impl Default for PageSetup {
    fn default() -> Self {
        Self {
            width: 11906,
            height: 16838,
            orientation: Orientation::Portrait,
            margins: PageMargins::default(),
        }
    }
}

/// Everything extracted from a layout template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    /// First non-empty paragraph of the document body.
    pub title: String,
    pub page: PageSetup,
    pub columns: Vec<TargetColumn>,
}

impl Template {
    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|column| column.header.as_str())
    }
}

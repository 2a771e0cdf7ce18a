//! Letter-style column addressing.
//!
//! Columns are numbered from 1 and rendered in bijective base 26:
//! `1 -> A`, `26 -> Z`, `27 -> AA`, `702 -> ZZ`, `703 -> AAA`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Renders a 1-based column index as its letter label.
///
/// Returns an empty string for `0`, which has no label.
pub fn column_letter(index: u32) -> String {
    let mut n = index;
    let mut letters = Vec::new();
    while n > 0 {
        n -= 1;
        letters.push(char::from(b'A' + (n % 26) as u8));
        n /= 26;
    }
    letters.iter().rev().collect()
}

/// Parses a letter label (case-insensitive) back into its 1-based index.
pub fn column_index(letters: &str) -> Result<u32> {
    let trimmed = letters.trim();
    if trimmed.is_empty() {
        return Err(ModelError::InvalidLocator(letters.to_string()));
    }
    let mut index: u32 = 0;
    for ch in trimmed.chars() {
        if !ch.is_ascii_alphabetic() {
            return Err(ModelError::InvalidLocator(letters.to_string()));
        }
        let digit = u32::from(ch.to_ascii_uppercase() as u8 - b'A') + 1;
        index = index
            .checked_mul(26)
            .and_then(|value| value.checked_add(digit))
            .ok_or_else(|| ModelError::InvalidLocator(letters.to_string()))?;
    }
    Ok(index)
}

/// A spreadsheet column address, stored as its 1-based index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ColumnLocator(u32);

impl ColumnLocator {
    pub fn from_index(index: u32) -> Result<Self> {
        if index == 0 {
            return Err(ModelError::ZeroColumnIndex);
        }
        Ok(Self(index))
    }

    /// Locator for a constant index; `0` clamps to column `A`.
    pub const fn saturating(index: u32) -> Self {
        if index == 0 { Self(1) } else { Self(index) }
    }

    pub fn parse(letters: &str) -> Result<Self> {
        column_index(letters).map(Self)
    }

    /// 1-based column index.
    pub fn index(self) -> u32 {
        self.0
    }

    /// 0-based offset into a row vector.
    pub fn offset(self) -> usize {
        (self.0 - 1) as usize
    }

    pub fn letter(self) -> String {
        column_letter(self.0)
    }
}

impl fmt::Display for ColumnLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.letter())
    }
}

impl FromStr for ColumnLocator {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ColumnLocator {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<ColumnLocator> for String {
    fn from(value: ColumnLocator) -> Self {
        value.letter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters_for_known_indexes() {
        assert_eq!(column_letter(1), "A");
        assert_eq!(column_letter(26), "Z");
        assert_eq!(column_letter(27), "AA");
        assert_eq!(column_letter(52), "AZ");
        assert_eq!(column_letter(702), "ZZ");
        assert_eq!(column_letter(703), "AAA");
        assert_eq!(column_letter(0), "");
    }

    #[test]
    fn indexes_for_known_letters() {
        assert_eq!(column_index("A").unwrap(), 1);
        assert_eq!(column_index("z").unwrap(), 26);
        assert_eq!(column_index("AA").unwrap(), 27);
        assert_eq!(column_index(" zz ").unwrap(), 702);
    }

    #[test]
    fn rejects_malformed_letters() {
        assert!(column_index("").is_err());
        assert!(column_index("A1").is_err());
        assert!(column_index("Ñ").is_err());
        assert!(column_index("ZZZZZZZZZZ").is_err());
    }

    #[test]
    fn locator_requires_positive_index() {
        assert_eq!(ColumnLocator::from_index(0), Err(ModelError::ZeroColumnIndex));
        let locator = ColumnLocator::from_index(4).unwrap();
        assert_eq!(locator.to_string(), "D");
        assert_eq!(locator.offset(), 3);
    }

    #[test]
    fn locator_serializes_as_letters() {
        let locator: ColumnLocator = "AB".parse().unwrap();
        let json = serde_json::to_string(&locator).unwrap();
        assert_eq!(json, "\"AB\"");
        let back: ColumnLocator = serde_json::from_str(&json).unwrap();
        assert_eq!(back, locator);
        assert!(serde_json::from_str::<ColumnLocator>("\"1\"").is_err());
    }
}

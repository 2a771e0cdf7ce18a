//! Row-selection parsing.
//!
//! Accepts single numbers, lists separated by commas, semicolons or
//! whitespace, and inclusive ranges such as `5-10`. Order and duplicates are
//! kept as written.

use crate::error::{IngestError, Result};

/// Upper bound on the number of rows a selection may expand to.
pub const MAX_SELECTED_ROWS: usize = 100_000;

/// Parses a row selection such as `"1-3, 5"` into `[1, 2, 3, 5]`.
///
/// A range whose start is above its end selects nothing.
pub fn parse_rows(input: &str) -> Result<Vec<u32>> {
    let mut rows = Vec::new();
    for token in input
        .split(|c: char| c == ',' || c == ';' || c.is_whitespace())
        .filter(|token| !token.is_empty())
    {
        match token.split_once('-') {
            Some((start, end)) if !start.is_empty() => {
                let start = parse_number(token, start)?;
                let end = parse_number(token, end)?;
                if start <= end {
                    let count = u64::from(end - start) + 1;
                    if rows.len() as u64 + count > MAX_SELECTED_ROWS as u64 {
                        return Err(IngestError::SelectionTooLarge {
                            count: rows.len() as u64 + count,
                            limit: MAX_SELECTED_ROWS,
                        });
                    }
                    rows.extend(start..=end);
                }
            }
            Some(_) => return Err(IngestError::InvalidRowToken(token.to_string())),
            None => {
                if rows.len() >= MAX_SELECTED_ROWS {
                    return Err(IngestError::SelectionTooLarge {
                        count: rows.len() as u64 + 1,
                        limit: MAX_SELECTED_ROWS,
                    });
                }
                rows.push(parse_number(token, token)?);
            }
        }
    }
    Ok(rows)
}

fn parse_number(token: &str, digits: &str) -> Result<u32> {
    digits
        .parse()
        .map_err(|_| IngestError::InvalidRowToken(token.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_and_ranges() {
        assert_eq!(parse_rows("1-3, 5").unwrap(), vec![1, 2, 3, 5]);
        assert_eq!(parse_rows("7;4 4\t10-11").unwrap(), vec![7, 4, 4, 10, 11]);
        assert_eq!(parse_rows("  ").unwrap(), Vec::<u32>::new());
        assert_eq!(parse_rows("9-7").unwrap(), Vec::<u32>::new());
        assert_eq!(parse_rows("0").unwrap(), vec![0]);
    }

    #[test]
    fn malformed_tokens_are_rejected() {
        for input in ["-3", "abc", "2-", "1-2-3", "4.5"] {
            assert!(
                matches!(parse_rows(input), Err(IngestError::InvalidRowToken(_))),
                "{input} should be rejected"
            );
        }
    }

    #[test]
    fn oversized_ranges_are_rejected() {
        assert!(matches!(
            parse_rows("1-4000000000"),
            Err(IngestError::SelectionTooLarge { .. })
        ));
    }
}

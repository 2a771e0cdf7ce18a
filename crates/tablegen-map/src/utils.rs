//! Text normalization and word-overlap scoring.

use std::collections::BTreeSet;

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Normalizes a header label for comparison.
///
/// Lowercases, strips diacritics, turns every character outside
/// `[a-z0-9 ]` into a space and trims the ends. Inner runs of spaces are
/// kept; tokenization collapses them.
pub fn normalize(text: &str) -> String {
    let folded: String = text
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c == ' ' {
                c
            } else {
                ' '
            }
        })
        .collect();
    folded.trim().to_string()
}

/// Unique whitespace-separated tokens of the normalized text.
pub fn token_set(text: &str) -> BTreeSet<String> {
    normalize(text)
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Shared tokens over the size of the larger token set; 0 when either
/// side has no tokens.
pub fn word_overlap(a: &str, b: &str) -> f64 {
    overlap_ratio(&token_set(a), &token_set(b))
}

pub(crate) fn overlap_ratio(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let shared = a.intersection(b).count();
    shared as f64 / a.len().max(b.len()) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_accents_and_punctuation() {
        assert_eq!(normalize("País"), "pais");
        assert_eq!(normalize("  Fecha de Inicio: "), "fecha de inicio");
        assert_eq!(normalize("Nº"), "n");
        assert_eq!(normalize("#"), "");
        assert_eq!(normalize("Monto (USD)"), "monto  usd");
    }

    #[test]
    fn overlap_uses_larger_set() {
        assert!((word_overlap("Entidad", "Entidad Contratante") - 0.5).abs() < 1e-9);
        assert!((word_overlap("Monto", "monto") - 1.0).abs() < 1e-9);
        assert_eq!(word_overlap("", "Monto"), 0.0);
        assert_eq!(word_overlap("No", "Numero"), 0.0);
    }

    #[test]
    fn duplicate_tokens_count_once() {
        assert!((word_overlap("de de fecha", "fecha de") - 1.0).abs() < 1e-9);
    }
}

//! Character-shingle signatures and Jaccard similarity.
//!
//! A signature is the sorted, `|`-joined set of 3-character shingles of the
//! lower-cased, whitespace-collapsed text. It is stored alongside each history
//! record so novelty checks never need to re-read the original text.

use std::collections::{BTreeSet, HashSet};
use std::hash::Hash;

/// Width of each shingle, in characters.
pub const SHINGLE_SIZE: usize = 3;

/// Separator between shingles in a serialized signature.
pub const SIGNATURE_SEPARATOR: char = '|';

/// Lower-case the text and collapse every whitespace run to a single space.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.extend(c.to_lowercase());
            in_space = false;
        }
    }
    out
}

/// The set of shingles of `text` after normalization.
pub fn shingles(text: &str) -> BTreeSet<String> {
    let chars: Vec<char> = normalize(text).chars().collect();
    chars
        .windows(SHINGLE_SIZE)
        .map(|w| w.iter().collect())
        .collect()
}

/// Compute the serialized signature of `text`.
pub fn signature(text: &str) -> String {
    let grams: Vec<String> = shingles(text).into_iter().collect();
    grams.join(&SIGNATURE_SEPARATOR.to_string())
}

/// Split a serialized signature back into its shingle set.
///
/// An empty signature yields an empty set.
pub fn parse_signature(signature: &str) -> HashSet<&str> {
    if signature.is_empty() {
        return HashSet::new();
    }
    signature.split(SIGNATURE_SEPARATOR).collect()
}

/// Jaccard similarity `|a ∩ b| / |a ∪ b|`, or 0.0 if either set is empty.
pub fn jaccard<T: Eq + Hash>(a: &HashSet<T>, b: &HashSet<T>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    intersection as f64 / union as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_collapses_whitespace_and_case() {
        assert_eq!(normalize("Hello   World\n\tAgain"), "hello world again");
        assert_eq!(normalize("  lead"), " lead");
    }

    #[test]
    fn test_signature_sorted_and_deduplicated() {
        assert_eq!(signature("abab"), "aba|bab");
        assert_eq!(signature("ABC"), "abc");
    }

    #[test]
    fn test_signature_short_text_is_empty() {
        assert_eq!(signature("ab"), "");
        assert!(parse_signature("").is_empty());
    }

    #[test]
    fn test_signature_ignores_whitespace_shape() {
        assert_eq!(
            signature("What is   your\nfavourite tea?"),
            signature("what is your favourite TEA?")
        );
    }

    #[test]
    fn test_jaccard_identical_and_disjoint() {
        let a = parse_signature("abc|bcd");
        let b = parse_signature("abc|bcd");
        let c = parse_signature("xyz");
        assert_eq!(jaccard(&a, &b), 1.0);
        assert_eq!(jaccard(&a, &c), 0.0);
    }

    #[test]
    fn test_jaccard_partial_overlap() {
        let a = parse_signature("abc|bcd|cde");
        let b = parse_signature("bcd|cde|def");
        assert!((jaccard(&a, &b) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_jaccard_empty_is_zero() {
        let a = parse_signature("");
        let b = parse_signature("abc");
        assert_eq!(jaccard(&a, &b), 0.0);
    }
}

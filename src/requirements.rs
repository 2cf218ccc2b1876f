//! Requirement keywords and the shared tokeniser.
//!
//! Documents and requirement strings go through the same [`tokenize`] rule,
//! so matching is insensitive to case and punctuation on both sides:
//! text is lower-cased, every non-alphanumeric character separates tokens,
//! and duplicates collapse.

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use crate::error::{MatchError, Result};

/// Split `text` into its set of lower-cased alphanumeric tokens.
pub fn tokenize(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// The normalised, non-empty set of keywords documents are scored against.
///
/// Immutable once parsed; share it between workers behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequirementSet {
    keywords: BTreeSet<String>,
}

impl RequirementSet {
    /// Parse a comma- or space-separated requirement string.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::Config`] if the string yields no keywords.
    pub fn parse(raw: &str) -> Result<Self> {
        let keywords: BTreeSet<String> = tokenize(raw).into_iter().collect();
        if keywords.is_empty() {
            return Err(MatchError::Config(
                "requirements must contain at least one keyword".into(),
            ));
        }
        Ok(Self { keywords })
    }

    /// Number of distinct keywords (always at least 1).
    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    /// Whether there are no keywords. Never true for a parsed set.
    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    /// Whether `token` is one of the keywords.
    pub fn contains(&self, token: &str) -> bool {
        self.keywords.contains(token)
    }

    /// Keywords in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keywords.iter().map(String::as_str)
    }
}

impl fmt::Display for RequirementSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<&str> = self.iter().collect();
        f.write_str(&joined.join(", "))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;

    #[test]
    fn tokenize_lowercases_and_collapses_duplicates() {
        let tokens = tokenize("Python python PYTHON data");
        assert_eq!(tokens.len(), 2);
        assert!(tokens.contains("python"));
        assert!(tokens.contains("data"));
    }

    #[test]
    fn tokenize_strips_punctuation() {
        let tokens = tokenize("data, analysis; (python).");
        let mut sorted: Vec<_> = tokens.into_iter().collect();
        sorted.sort();
        assert_eq!(sorted, vec!["analysis", "data", "python"]);
    }

    #[test]
    fn tokenize_empty_and_symbol_only() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("  \n\t ,;-- ").is_empty());
    }

    #[test]
    fn tokenize_keeps_unicode_letters_and_digits() {
        let tokens = tokenize("Zürich, Python3");
        assert!(tokens.contains("zürich"));
        assert!(tokens.contains("python3"));
    }

    #[test]
    fn tokenize_reduces_symbolic_names() {
        let tokens = tokenize("C++ and C#");
        assert!(tokens.contains("c"));
        assert!(tokens.contains("and"));
        assert_eq!(tokens.len(), 2);
    }

    #[test]
    fn parse_comma_separated_phrases() {
        let reqs = RequirementSet::parse("python, data analysis, machine learning, teamwork")
            .expect("valid");
        let keywords: Vec<&str> = reqs.iter().collect();
        assert_eq!(
            keywords,
            vec!["analysis", "data", "learning", "machine", "python", "teamwork"]
        );
        assert_eq!(reqs.len(), 6);
        assert!(!reqs.is_empty());
    }

    #[test]
    fn parse_rejects_empty_requirements() {
        for raw in ["", "   ", ", ,;"] {
            let err = RequirementSet::parse(raw).unwrap_err();
            assert!(matches!(err, MatchError::Config(_)), "{raw:?} should be rejected");
        }
    }

    #[test]
    fn contains_is_exact_after_normalisation() {
        let reqs = RequirementSet::parse("Rust").expect("valid");
        assert!(reqs.contains("rust"));
        assert!(!reqs.contains("Rust"));
        assert!(!reqs.contains("rusty"));
    }

    #[test]
    fn display_lists_keywords() {
        let reqs = RequirementSet::parse("tokio rust").expect("valid");
        assert_eq!(reqs.to_string(), "rust, tokio");
    }
}

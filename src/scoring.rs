//! Keyword match scoring.

use crate::requirements::{RequirementSet, tokenize};

/// Percentage of `requirements` present in `text`, in `[0, 100]`.
///
/// Each requirement counts once no matter how often it appears. Empty text
/// scores `0`.
pub fn score(text: &str, requirements: &RequirementSet) -> f64 {
    let total = requirements.len();
    if total == 0 {
        return 0.0;
    }
    let matched = tokenize(text)
        .iter()
        .filter(|token| requirements.contains(token))
        .count();
    matched as f64 / total as f64 * 100.0
}

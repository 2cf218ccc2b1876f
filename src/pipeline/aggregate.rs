//! Final ranking over the merged store.

use serde::Serialize;

use crate::error::{MatchError, Result};
use crate::pipeline::store::ResultStore;

/// The maximum score and every document attaining it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BestMatch {
    /// Highest score in the store.
    pub score: f64,
    /// Ids with exactly that score, ascending. Never empty.
    pub documents: Vec<String>,
}

/// Compute the best match. Ties are kept.
///
/// # Errors
///
/// Returns [`MatchError::EmptyResult`] if the store is empty.
pub fn best_match(store: &ResultStore) -> Result<BestMatch> {
    let max = store
        .iter()
        .map(|(_, score)| score)
        .reduce(f64::max)
        .ok_or(MatchError::EmptyResult)?;

    #[allow(clippy::float_cmp)]
    let documents: Vec<String> = store
        .iter()
        .filter(|(_, score)| *score == max)
        .map(|(id, _)| id.to_owned())
        .collect();

    Ok(BestMatch {
        score: max,
        documents,
    })
}

//! Per-document scores.
//!
//! Each worker fills its own [`ResultShard`] without locking. The shards are
//! merged into the [`ResultStore`] once every worker has exited.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::error::{MatchError, Result};

/// Scores recorded by a single worker.
#[derive(Debug, Default)]
pub struct ResultShard {
    scores: HashMap<String, f64>,
}

impl ResultShard {
    /// Record `score` for `id`.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::Pipeline`] if `id` was already recorded.
    pub fn insert(&mut self, id: String, score: f64) -> Result<()> {
        if self.scores.contains_key(&id) {
            return Err(MatchError::Pipeline(format!("document {id} scored twice")));
        }
        self.scores.insert(id, score);
        Ok(())
    }

    /// Number of recorded scores.
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    /// Whether nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

/// Document id to score, with unique keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResultStore {
    scores: BTreeMap<String, f64>,
}

impl ResultStore {
    /// Merge disjoint shards.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::Pipeline`] if two shards hold the same id.
    pub fn merge(shards: impl IntoIterator<Item = ResultShard>) -> Result<Self> {
        let mut scores = BTreeMap::new();
        for shard in shards {
            for (id, score) in shard.scores {
                if scores.contains_key(&id) {
                    return Err(MatchError::Pipeline(format!(
                        "document {id} appears in more than one shard"
                    )));
                }
                scores.insert(id, score);
            }
        }
        Ok(Self { scores })
    }

    /// Score for `id`, if present.
    pub fn get(&self, id: &str) -> Option<f64> {
        self.scores.get(id).copied()
    }

    /// Number of documents.
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// `(id, score)` pairs in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.scores.iter().map(|(id, score)| (id.as_str(), *score))
    }

    /// `(id, score)` pairs by descending score, then ascending id.
    pub fn ranked(&self) -> Vec<(&str, f64)> {
        let mut ranked: Vec<_> = self.iter().collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked
    }
}

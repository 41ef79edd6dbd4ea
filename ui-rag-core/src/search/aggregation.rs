//! Merging of multi-query results
//!
//! Each sub-query contributes `similarity * weight` per document. The first
//! occurrence of a document stores that value; later occurrences are folded
//! in with the selected strategy.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::SearchResult;
use crate::document::DocumentId;
use crate::error::RagError;

/// How repeated hits for one document are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    /// Highest weighted similarity seen
    #[default]
    Max,
    /// Average of the stored value and the new one. With three or more hits
    /// earlier values are halved repeatedly, so this is not the arithmetic mean.
    Mean,
    /// Sum of weighted similarities (may exceed 1.0)
    Weighted,
}

type MergeFn = fn(f32, f32) -> f32;

struct Strategy {
    aggregation: Aggregation,
    name: &'static str,
    merge: MergeFn,
}

static STRATEGIES: [Strategy; 3] = [
    Strategy {
        aggregation: Aggregation::Max,
        name: "max",
        merge: merge_max,
    },
    Strategy {
        aggregation: Aggregation::Mean,
        name: "mean",
        merge: merge_mean,
    },
    Strategy {
        aggregation: Aggregation::Weighted,
        name: "weighted",
        merge: merge_weighted,
    },
];

fn merge_max(existing: f32, incoming: f32) -> f32 {
    existing.max(incoming)
}

fn merge_mean(existing: f32, incoming: f32) -> f32 {
    (existing + incoming) / 2.0
}

fn merge_weighted(existing: f32, incoming: f32) -> f32 {
    existing + incoming
}

impl Aggregation {
    fn strategy(self) -> &'static Strategy {
        &STRATEGIES[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.strategy().name
    }

    /// Fold a new weighted similarity into the stored one
    pub fn merge(self, existing: f32, incoming: f32) -> f32 {
        (self.strategy().merge)(existing, incoming)
    }
}

impl std::fmt::Display for Aggregation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Aggregation {
    type Err = RagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        STRATEGIES
            .iter()
            .find(|strategy| strategy.name == wanted)
            .map(|strategy| strategy.aggregation)
            .ok_or_else(|| {
                RagError::validation(format!(
                    "unknown aggregation '{}' (expected max, mean or weighted)",
                    s
                ))
            })
    }
}

/// Single-writer accumulator keyed by document id
pub(crate) struct ResultMerger {
    aggregation: Aggregation,
    slots: HashMap<DocumentId, usize>,
    results: Vec<SearchResult>,
}

impl ResultMerger {
    pub fn new(aggregation: Aggregation) -> Self {
        Self {
            aggregation,
            slots: HashMap::new(),
            results: Vec::new(),
        }
    }

    pub fn add(&mut self, mut result: SearchResult, weight: f32) {
        let weighted = result.similarity * weight;
        match self.slots.get(&result.document.id).copied() {
            Some(slot) => {
                let existing = &mut self.results[slot];
                existing.similarity = self.aggregation.merge(existing.similarity, weighted);
            }
            None => {
                result.similarity = weighted;
                self.slots.insert(result.document.id, self.results.len());
                self.results.push(result);
            }
        }
    }

    pub fn unique(&self) -> usize {
        self.results.len()
    }

    /// Sorted by merged similarity, first-seen order breaking ties
    pub fn finish(mut self, top_n: usize) -> Vec<SearchResult> {
        self.results.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        self.results.truncate(top_n);
        self.results
    }
}

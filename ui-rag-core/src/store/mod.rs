//! Vector store gateway
//!
//! Nearest-neighbour queries over stored document vectors. Similarity is
//! `1 - cosine distance`; thresholds, approval and exclusion are applied by
//! the store before rows are returned.

mod rocks;

pub use rocks::DocumentStore;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::document::{Document, DocumentId, RetrievedDocument, VectorField};
use crate::error::Result;

/// One nearest-neighbour request
#[derive(Debug, Clone)]
pub struct NeighborQuery {
    pub vector: Vec<f32>,
    pub limit: usize,
    /// Only rows with similarity strictly above this are returned
    pub min_similarity: f32,
    /// Allowed `ui_type` values; empty means any
    pub categories: Vec<String>,
    pub exclude_id: Option<DocumentId>,
    pub include_content: bool,
    pub field: VectorField,
}

impl NeighborQuery {
    pub fn new(vector: Vec<f32>, limit: usize) -> Self {
        Self {
            vector,
            limit,
            min_similarity: 0.0,
            categories: vec![],
            exclude_id: None,
            include_content: false,
            field: VectorField::Description,
        }
    }

    pub fn min_similarity(mut self, min_similarity: f32) -> Self {
        self.min_similarity = min_similarity;
        self
    }

    pub fn categories(mut self, categories: Vec<String>) -> Self {
        self.categories = categories;
        self
    }

    pub fn exclude(mut self, id: DocumentId) -> Self {
        self.exclude_id = Some(id);
        self
    }

    pub fn include_content(mut self, include_content: bool) -> Self {
        self.include_content = include_content;
        self
    }

    pub fn field(mut self, field: VectorField) -> Self {
        self.field = field;
        self
    }

    /// Row-level filters other than the threshold
    pub(crate) fn admits(&self, document: &Document) -> bool {
        document.approved
            && self.exclude_id != Some(document.id)
            && (self.categories.is_empty() || self.categories.contains(&document.ui_type))
    }
}

/// A retrieved document with its similarity to the query vector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredDocument {
    pub document: RetrievedDocument,
    pub similarity: f32,
}

/// Store counts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreStats {
    pub total_documents: usize,
    pub approved_documents: usize,
    pub indexed_vectors: usize,
    pub dimension: usize,
    pub by_ui_type: BTreeMap<String, usize>,
}

/// Read side of the store, as seen by the searchers
pub trait VectorStore: Send + Sync {
    /// Rows above the threshold, most similar first, at most `limit`
    fn nearest_neighbors(&self, query: &NeighborQuery) -> Result<Vec<ScoredDocument>>;

    /// Full record including embeddings
    fn get_document(&self, id: &DocumentId) -> Result<Document>;
}

/// Sort rows by descending similarity and keep the first `limit`
pub(crate) fn rank(mut rows: Vec<ScoredDocument>, limit: usize) -> Vec<ScoredDocument> {
    rows.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    rows.truncate(limit);
    rows
}

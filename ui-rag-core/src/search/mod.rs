//! Semantic search over UI component documents
//!
//! [`Searcher`] embeds one query and asks the store for neighbours.
//! [`AdvancedSearcher`] layers filtering, multi-query aggregation, category
//! expansion and similar-to-document lookups on top of it.

mod advanced;
pub mod aggregation;
pub mod category;
pub mod params;

pub use advanced::AdvancedSearcher;
pub use aggregation::Aggregation;
pub use params::SearchOptions;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::document::{DocumentId, RetrievedDocument};
use crate::embedding::{EmbeddingProvider, QUERY_INSTRUCTION};
use crate::error::Result;
use crate::store::{NeighborQuery, ScoredDocument, VectorStore};

/// What produced a result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum QueryOrigin {
    /// Free-text query
    Text(String),
    /// Reference document of a similar-to-document search
    Document(DocumentId),
}

/// Search result with its similarity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// The matched document
    pub document: RetrievedDocument,
    /// Similarity, or the aggregated score for multi-query searches
    pub similarity: f32,
    pub origin: QueryOrigin,
}

impl SearchResult {
    fn from_scored(scored: ScoredDocument, origin: QueryOrigin) -> Self {
        Self {
            document: scored.document,
            similarity: scored.similarity,
            origin,
        }
    }
}

/// Single-query searcher
///
/// No caching: every call re-embeds the query and re-queries the store.
#[derive(Clone)]
pub struct Searcher {
    provider: Arc<EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
}

impl Searcher {
    pub fn new(provider: Arc<EmbeddingProvider>, store: Arc<dyn VectorStore>) -> Self {
        Self { provider, store }
    }

    /// Ranked results above `min_similarity`, most similar first
    pub fn search(
        &self,
        query: &str,
        limit: usize,
        min_similarity: f32,
    ) -> Result<Vec<SearchResult>> {
        let options = SearchOptions {
            limit,
            min_similarity,
            ..SearchOptions::default()
        };
        params::validate_query(query)?;
        options.validate()?;
        self.run(query, &options)
    }

    /// Embed and query without re-validating
    pub(crate) fn run(&self, query: &str, options: &SearchOptions) -> Result<Vec<SearchResult>> {
        let vector = self.provider.embed_one(query, QUERY_INSTRUCTION)?;

        let neighbors = NeighborQuery::new(vector, options.limit)
            .min_similarity(options.min_similarity)
            .categories(options.categories.clone())
            .include_content(options.include_content);

        let rows = self.store.nearest_neighbors(&neighbors)?;
        log::debug!("Query '{}' matched {} documents", query, rows.len());

        let origin = QueryOrigin::Text(query.to_string());
        Ok(rows
            .into_iter()
            .map(|row| SearchResult::from_scored(row, origin.clone()))
            .collect())
    }

    pub(crate) fn store(&self) -> &Arc<dyn VectorStore> {
        &self.store
    }
}

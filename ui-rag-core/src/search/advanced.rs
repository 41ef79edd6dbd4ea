//! Filtered, multi-query, category and similar-to-document search

use std::sync::Arc;

use super::aggregation::{Aggregation, ResultMerger};
use super::{category, params, QueryOrigin, SearchOptions, SearchResult, Searcher};
use crate::config::SearchConfig;
use crate::document::DocumentId;
use crate::embedding::EmbeddingProvider;
use crate::error::Result;
use crate::store::{NeighborQuery, VectorStore};

/// Retrieval modes layered on [`Searcher`]
///
/// Failures from the provider or store propagate unchanged; no mode returns
/// partial results.
#[derive(Clone)]
pub struct AdvancedSearcher {
    searcher: Searcher,
    config: SearchConfig,
}

impl AdvancedSearcher {
    pub fn new(
        provider: Arc<EmbeddingProvider>,
        store: Arc<dyn VectorStore>,
        config: SearchConfig,
    ) -> Self {
        Self {
            searcher: Searcher::new(provider, store),
            config,
        }
    }

    /// The underlying single-query searcher
    pub fn searcher(&self) -> &Searcher {
        &self.searcher
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Single query with an optional category allow-list and content payload
    pub fn search_with_filters(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<Vec<SearchResult>> {
        params::validate_query(query)?;
        options.validate()?;

        log::info!(
            "Filtered search: '{}' (limit {}, min {:.2}, categories {:?})",
            query,
            options.limit,
            options.min_similarity,
            options.categories
        );

        self.searcher.run(query, options)
    }

    /// Run every query and merge hits per document
    ///
    /// Sub-queries run in order with the configured candidate limit and
    /// default threshold. Weights default to 1.0 each. The merged list is
    /// sorted by aggregated score and cut to the configured top-N.
    pub fn multi_query_search<S: AsRef<str>>(
        &self,
        queries: &[S],
        weights: Option<&[f32]>,
        aggregation: Aggregation,
    ) -> Result<Vec<SearchResult>> {
        params::validate_multi_query(queries, weights)?;

        log::info!(
            "Multi-query search with {} queries ({})",
            queries.len(),
            aggregation
        );

        let options = SearchOptions {
            limit: self.config.multi_query_candidates,
            min_similarity: self.config.default_min_similarity,
            ..SearchOptions::default()
        };

        let mut merger = ResultMerger::new(aggregation);
        for (i, query) in queries.iter().enumerate() {
            let weight = weights.map_or(1.0, |w| w[i]);
            for result in self.searcher.run(query.as_ref(), &options)? {
                merger.add(result, weight);
            }
        }

        log::info!("Multi-query search found {} unique results", merger.unique());
        Ok(merger.finish(self.config.multi_query_top_n))
    }

    /// Search a category through its canned phrases, summing the hits
    pub fn semantic_category_search(
        &self,
        category: &str,
        limit: usize,
    ) -> Result<Vec<SearchResult>> {
        params::validate_query(category)?;
        params::validate_limit(limit)?;

        let queries = category::expand(category);
        let mut results = self.multi_query_search(&queries, None, Aggregation::Weighted)?;
        results.truncate(limit);
        Ok(results)
    }

    /// Documents whose description vector is closest to the reference's
    ///
    /// The reference itself is never returned. An unknown id fails with
    /// NotFound before any neighbour query is issued.
    pub fn find_similar(
        &self,
        reference_id: &DocumentId,
        limit: usize,
        min_similarity: f32,
    ) -> Result<Vec<SearchResult>> {
        params::validate_limit(limit)?;
        params::validate_threshold(min_similarity)?;

        let store = self.searcher.store();
        let reference = store.get_document(reference_id)?;

        log::info!("Finding components similar to '{}'", reference.title);

        let query = NeighborQuery::new(reference.embeddings.description, limit)
            .min_similarity(min_similarity)
            .exclude(*reference_id);

        let origin = QueryOrigin::Document(*reference_id);
        Ok(store
            .nearest_neighbors(&query)?
            .into_iter()
            .map(|row| SearchResult::from_scored(row, origin.clone()))
            .collect())
    }
}

//! Command execution
//!
//! Wires the retrieval core together from a [`RagConfig`] and maps each
//! subcommand onto one core call. Output is JSON.

use std::sync::Arc;

use serde_json::{json, Value};
use ui_rag_core::{
    AdvancedSearcher, DocumentStore, EmbeddingProvider, PromptAssembler, PromptPipeline,
    RagConfig, SearchOptions, SearchResult,
};

use crate::args::{project_context, Command};
use crate::error::CliResult;

/// Retrieval components shared by all subcommands
pub struct App {
    store: Arc<DocumentStore>,
    searcher: AdvancedSearcher,
    pipeline: PromptPipeline,
}

impl App {
    /// Load the embedding model and open the store
    pub fn open(config: &RagConfig) -> CliResult<Self> {
        let provider = Arc::new(EmbeddingProvider::from_config(&config.embedding)?);
        let store = Arc::new(DocumentStore::open(&config.store, config.embedding.dimension)?);
        Ok(Self::new(provider, store, config))
    }

    pub fn new(
        provider: Arc<EmbeddingProvider>,
        store: Arc<DocumentStore>,
        config: &RagConfig,
    ) -> Self {
        let searcher = AdvancedSearcher::new(provider, store.clone(), config.search.clone());
        let pipeline = PromptPipeline::new(searcher.clone(), PromptAssembler::new());
        Self {
            store,
            searcher,
            pipeline,
        }
    }

    pub fn execute(&self, command: &Command) -> CliResult<Value> {
        command.validate()?;

        let output = match command {
            Command::Search {
                query,
                limit,
                min_similarity,
            } => {
                let min = min_similarity.unwrap_or(self.searcher.config().default_min_similarity);
                let results = self.searcher.searcher().search(query, *limit, min)?;
                results_json(query, &results)?
            }
            Command::Filter {
                query,
                categories,
                limit,
                min_similarity,
                include_content,
            } => {
                let options = SearchOptions {
                    limit: limit.unwrap_or(self.searcher.config().default_limit),
                    min_similarity: *min_similarity,
                    categories: categories.clone(),
                    include_content: *include_content,
                };
                let results = self.searcher.search_with_filters(query, &options)?;
                results_json(query, &results)?
            }
            Command::Multi {
                queries,
                weights,
                aggregation,
            } => {
                let results =
                    self.searcher
                        .multi_query_search(queries, weights.as_deref(), *aggregation)?;
                json!({
                    "queries": queries,
                    "aggregation": aggregation,
                    "count": results.len(),
                    "results": results,
                })
            }
            Command::Category { category, limit } => {
                let results = self.searcher.semantic_category_search(category, *limit)?;
                json!({
                    "category": category,
                    "count": results.len(),
                    "results": results,
                })
            }
            Command::Similar {
                id,
                limit,
                min_similarity,
            } => {
                let results = self.searcher.find_similar(id, *limit, *min_similarity)?;
                json!({
                    "reference": id,
                    "count": results.len(),
                    "results": results,
                })
            }
            Command::Prompt {
                query,
                limit,
                no_code,
                tech_stack,
                design_system,
                target_device,
                requirements,
            } => {
                let context =
                    project_context(tech_stack, design_system, target_device, requirements);
                let generated = self
                    .pipeline
                    .generate(query, *limit, !no_code, context.as_ref())?;
                serde_json::to_value(generated)?
            }
            Command::Compare {
                query,
                limit,
                criteria,
            } => {
                let criteria = (!criteria.is_empty()).then_some(criteria.as_slice());
                let generated = self.pipeline.compare(query, *limit, criteria)?;
                serde_json::to_value(generated)?
            }
            Command::Stats => serde_json::to_value(self.store.stats())?,
        };

        Ok(output)
    }
}

/// Statistics without loading the embedding model
pub fn store_stats(config: &RagConfig) -> CliResult<Value> {
    let store = DocumentStore::open(&config.store, config.embedding.dimension)?;
    Ok(serde_json::to_value(store.stats())?)
}

fn results_json(query: &str, results: &[SearchResult]) -> CliResult<Value> {
    Ok(json!({
        "query": query,
        "count": results.len(),
        "results": serde_json::to_value(results)?,
    }))
}

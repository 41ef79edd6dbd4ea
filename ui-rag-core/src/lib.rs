//! UI component retrieval core
//!
//! Semantic retrieval of UI component documents and prompt assembly for an
//! LLM design assistant.
//!
//! ## Features
//!
//! - **Instructed embeddings** - Role instructions (query, description, content, title) with chunking and batching
//! - **RocksDB persistence** - Documents and vectors on disk, HNSW index for approved description vectors
//! - **Advanced search** - Category filters, multi-query aggregation (max / mean / weighted), similar-to-document
//! - **Prompt assembly** - Design-advice and comparison prompts grounded in the retrieved components
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use ui_rag_core::{AdvancedSearcher, DocumentStore, EmbeddingProvider, PromptAssembler, RagConfig};
//!
//! let config = RagConfig::load("ui-rag.json")?.apply_env();
//! let provider = Arc::new(EmbeddingProvider::from_config(&config.embedding)?);
//! let store = Arc::new(DocumentStore::open(&config.store, config.embedding.dimension)?);
//! let searcher = AdvancedSearcher::new(provider, store, config.search.clone());
//!
//! let results = searcher.semantic_category_search("navigation", 5)?;
//! let prompt = PromptAssembler::new().assemble("responsive navigation bar", &results, None);
//! ```

pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod pipeline;
pub mod prompt;
pub mod search;
pub mod store;
pub mod vector;

#[cfg(test)]
mod testing;

// Re-exports for convenience
pub use config::{BackendConfig, EmbeddingConfig, RagConfig, SearchConfig, StoreConfig};
pub use document::{
    Document, DocumentBuilder, DocumentDraft, DocumentEmbeddings, DocumentId, DocumentProcessor,
    Evaluation, QualityScores, RetrievedDocument, UiClassification, VectorField,
};
pub use embedding::{EmbeddingBackend, EmbeddingProvider, InstructedText};
pub use error::{RagError, Result};
pub use pipeline::{GeneratedPrompt, PromptPipeline};
pub use prompt::{ProjectContext, PromptAssembler, PromptPayload};
pub use search::{AdvancedSearcher, Aggregation, QueryOrigin, SearchOptions, SearchResult, Searcher};
pub use store::{DocumentStore, NeighborQuery, ScoredDocument, StoreStats, VectorStore};

//! Embedding module for semantic search
//!
//! Instruction-aware embeddings: every text is paired with a short
//! instruction describing its retrieval role before it reaches the backend.

mod backend;
mod chunker;
mod discovery;
mod http;
mod local;
mod provider;

pub use backend::{EmbeddingBackend, InstructedText};
pub use chunker::TextChunker;
pub use discovery::find_model_cache_dir;
pub use http::HttpEmbeddingBackend;
pub use local::FastEmbedBackend;
pub use provider::EmbeddingProvider;

/// Instruction used for search queries
pub const QUERY_INSTRUCTION: &str = "Represent the search query for finding relevant UI components";

/// Instruction for the description vector (title + description + keywords)
pub const DESCRIPTION_INSTRUCTION: &str =
    "Represent the UI component description for semantic search";

/// Instruction for the content vector (code / markup)
pub const CONTENT_INSTRUCTION: &str =
    "Represent the UI component code/markup for technical retrieval";

/// Instruction for the title vector
pub const TITLE_INSTRUCTION: &str = "Represent the UI component title for quick identification";

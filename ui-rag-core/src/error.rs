//! Error types for ui-rag-core

use thiserror::Error;

/// Errors that can occur in the retrieval core
#[derive(Debug, Error)]
pub enum RagError {
    /// Embedding backend unreachable, malformed or dimension-mismatched response
    #[error("Embedding provider error: {0}")]
    Provider(String),

    /// Vector store query or consistency failure
    #[error("Store error: {0}")]
    Store(String),

    /// RocksDB error
    #[error("Storage error: {0}")]
    Storage(#[from] rocksdb::Error),

    /// Serialization error (bincode)
    #[error("Serialization error: {0}")]
    Bincode(#[from] bincode::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Referenced document does not exist
    #[error("Document not found: {0}")]
    NotFound(String),

    /// Malformed query parameters, rejected before any remote call
    #[error("Invalid parameter: {0}")]
    Validation(String),

    /// Configuration could not be loaded or is inconsistent
    #[error("Configuration error: {0}")]
    Config(String),

    /// Builder error
    #[error("Builder error: {0}")]
    Builder(#[from] crate::document::DocumentBuilderError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RagError {
    /// Create a provider error
    pub fn provider(msg: impl Into<String>) -> Self {
        Self::Provider(msg.into())
    }

    /// Create a store error
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// Create a not found error
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound(id.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn is_provider(&self) -> bool {
        matches!(self, Self::Provider(_))
    }

    /// True for every failure that originates in the vector store
    pub fn is_store(&self) -> bool {
        matches!(self, Self::Store(_) | Self::Storage(_) | Self::Bincode(_))
    }
}

/// Result type for retrieval operations
pub type Result<T> = std::result::Result<T, RagError>;

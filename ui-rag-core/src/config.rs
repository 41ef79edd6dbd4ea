//! Configuration for the retrieval core
//!
//! Every component receives its slice of [`RagConfig`] at construction time.
//! The config can be loaded from a JSON file and adjusted from environment
//! variables; nothing is read from process-wide state after construction.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{RagError, Result};

/// Overrides the RocksDB directory
pub const ENV_DB_PATH: &str = "UI_RAG_DB_PATH";
/// Overrides the local model cache directory
pub const ENV_MODELS_PATH: &str = "UI_RAG_MODELS_PATH";
/// API key for HTTP embedding backends
pub const ENV_API_KEY: &str = "UI_RAG_API_KEY";

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RagConfig {
    pub embedding: EmbeddingConfig,
    pub store: StoreConfig,
    pub search: SearchConfig,
    /// Upper bound for one request (embedding + store round trip), in seconds
    pub request_timeout_secs: Option<u64>,
}

impl RagConfig {
    /// Load configuration from a JSON file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            RagError::config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `UI_RAG_*` environment overrides
    pub fn apply_env(mut self) -> Self {
        if let Ok(path) = std::env::var(ENV_DB_PATH) {
            log::info!("Using {}: {}", ENV_DB_PATH, path);
            self.store.path = PathBuf::from(path);
        }
        if let Ok(key) = std::env::var(ENV_API_KEY) {
            if let BackendConfig::Http { api_key, .. } = &mut self.embedding.backend {
                *api_key = Some(key);
            }
        }
        self
    }

    /// Request timeout, defaulting to two minutes
    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.request_timeout_secs.unwrap_or(120))
    }

    /// Reject configurations no component could work with
    pub fn validate(&self) -> Result<()> {
        if self.embedding.dimension == 0 {
            return Err(RagError::config("embedding.dimension must be greater than 0"));
        }
        if self.embedding.max_length == 0 {
            return Err(RagError::config("embedding.max_length must be greater than 0"));
        }
        if self.embedding.batch_size == 0 {
            return Err(RagError::config("embedding.batch_size must be greater than 0"));
        }
        if !(0.0..=1.0).contains(&self.search.default_min_similarity) {
            return Err(RagError::config(
                "search.default_min_similarity must be within [0, 1]",
            ));
        }
        if self.search.multi_query_candidates == 0 || self.search.multi_query_top_n == 0 {
            return Err(RagError::config(
                "search.multi_query_candidates and multi_query_top_n must be greater than 0",
            ));
        }
        Ok(())
    }
}

/// Embedding provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Model identifier passed to the backend
    pub model_name: String,
    /// Vector length every backend response must have
    pub dimension: usize,
    /// Maximum chunk length in characters (default: 512)
    pub max_length: usize,
    /// Chunks per backend call (default: 8)
    pub batch_size: usize,
    pub backend: BackendConfig,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model_name: "multilingual-e5-small".to_string(),
            dimension: 384,
            max_length: 512,
            batch_size: 8,
            backend: BackendConfig::default(),
        }
    }
}

/// Where embeddings come from
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BackendConfig {
    /// Local ONNX model through fastembed
    Local {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        cache_dir: Option<PathBuf>,
        #[serde(default)]
        show_download_progress: bool,
    },
    /// OpenAI-compatible `/embeddings` endpoint
    Http {
        endpoint: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        api_key: Option<String>,
        #[serde(default = "default_http_timeout")]
        timeout_secs: u64,
    },
}

fn default_http_timeout() -> u64 {
    60
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self::Local {
            cache_dir: None,
            show_download_progress: false,
        }
    }
}

/// Vector store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// RocksDB directory
    pub path: PathBuf,
    /// HNSW construction breadth (default: 100)
    pub ef_construction: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(".ui-rag/store"),
            ef_construction: 100,
        }
    }
}

/// Search defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Result limit for filtered search (default: 10)
    pub default_limit: usize,
    /// Threshold for single-query and multi-query sub-searches (default: 0.7)
    pub default_min_similarity: f32,
    /// Per-sub-query candidate limit in multi-query search (default: 20)
    pub multi_query_candidates: usize,
    /// Size of the merged multi-query result (default: 10)
    pub multi_query_top_n: usize,
    /// Results fed into a generated prompt (default: 5)
    pub prompt_search_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_limit: 10,
            default_min_similarity: 0.7,
            multi_query_candidates: 20,
            multi_query_top_n: 10,
            prompt_search_limit: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_search_config_default() {
        let config = SearchConfig::default();
        assert_eq!(config.default_limit, 10);
        assert_eq!(config.default_min_similarity, 0.7);
        assert_eq!(config.multi_query_candidates, 20);
        assert_eq!(config.multi_query_top_n, 10);
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(RagConfig::default().validate().is_ok());
        assert_eq!(
            RagConfig::default().request_timeout(),
            std::time::Duration::from_secs(120)
        );
    }

    #[test]
    fn test_load_partial_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "embedding": {{
                    "dimension": 3072,
                    "backend": {{ "type": "http", "endpoint": "http://localhost:8080/v1/embeddings" }}
                }},
                "search": {{ "default_min_similarity": 0.5 }}
            }}"#
        )
        .unwrap();

        let config = RagConfig::load(file.path()).unwrap();
        assert_eq!(config.embedding.dimension, 3072);
        assert_eq!(config.embedding.batch_size, 8);
        assert_eq!(config.search.default_min_similarity, 0.5);
        assert_eq!(config.search.multi_query_candidates, 20);
        match config.embedding.backend {
            BackendConfig::Http { timeout_secs, api_key, .. } => {
                assert_eq!(timeout_secs, 60);
                assert!(api_key.is_none());
            }
            other => panic!("Expected http backend, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        let mut config = RagConfig::default();
        config.search.default_min_similarity = 1.5;
        assert!(matches!(config.validate(), Err(RagError::Config(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let err = RagConfig::load("/nonexistent/ui-rag.json").unwrap_err();
        assert!(matches!(err, RagError::Config(_)));
    }
}

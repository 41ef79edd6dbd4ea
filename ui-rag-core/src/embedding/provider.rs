//! Embedding provider
//!
//! High-level API over an [`EmbeddingBackend`]: chunks long inputs, calls the
//! backend in bounded batches, checks every vector's dimension and folds
//! multi-chunk inputs back into one vector per text.

use std::sync::Arc;

use super::backend::{EmbeddingBackend, InstructedText};
use super::chunker::TextChunker;
use crate::config::EmbeddingConfig;
use crate::error::{RagError, Result};
use crate::vector;

/// Instruction-aware embedding provider
///
/// No caching: identical inputs are re-encoded on every call.
pub struct EmbeddingProvider {
    backend: Arc<dyn EmbeddingBackend>,
    chunker: TextChunker,
    batch_size: usize,
    dimension: usize,
}

impl EmbeddingProvider {
    /// Create a provider over `backend` using the chunking/batching settings in `config`
    pub fn new(backend: Arc<dyn EmbeddingBackend>, config: &EmbeddingConfig) -> Self {
        Self {
            backend,
            chunker: TextChunker::new(config.max_length),
            batch_size: config.batch_size.max(1),
            dimension: config.dimension,
        }
    }

    /// Build the backend described by `config` and wrap it
    pub fn from_config(config: &EmbeddingConfig) -> Result<Self> {
        use crate::config::BackendConfig;

        let backend: Arc<dyn EmbeddingBackend> = match &config.backend {
            BackendConfig::Local {
                cache_dir,
                show_download_progress,
            } => {
                let cache_dir = super::find_model_cache_dir(cache_dir.as_deref())?;
                Arc::new(super::FastEmbedBackend::new(
                    &config.model_name,
                    cache_dir,
                    *show_download_progress,
                )?)
            }
            BackendConfig::Http {
                endpoint,
                api_key,
                timeout_secs,
            } => Arc::new(super::HttpEmbeddingBackend::new(
                endpoint,
                &config.model_name,
                api_key.clone(),
                std::time::Duration::from_secs(*timeout_secs),
            )?),
        };

        log::info!(
            "EmbeddingProvider ready ({}, {}d, batch {}, max {} chars)",
            backend.name(),
            config.dimension,
            config.batch_size,
            config.max_length
        );

        Ok(Self::new(backend, config))
    }

    /// Generate one vector per text, preserving input order
    pub fn embed<S: AsRef<str>>(&self, texts: &[S], instruction: &str) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        let chunked: Vec<Vec<String>> = texts
            .iter()
            .map(|text| self.chunker.chunk(text.as_ref()))
            .collect();
        let flat: Vec<&str> = chunked.iter().flatten().map(String::as_str).collect();

        log::debug!(
            "Generating embeddings for {} texts ({} chunks) via {}",
            texts.len(),
            flat.len(),
            self.backend.name()
        );

        let mut chunk_vectors = Vec::with_capacity(flat.len());
        for batch in flat.chunks(self.batch_size) {
            let inputs: Vec<InstructedText<'_>> = batch
                .iter()
                .map(|text| InstructedText::new(instruction, text))
                .collect();
            let vectors = self.backend.encode(&inputs)?;
            self.check_batch(inputs.len(), &vectors)?;
            chunk_vectors.extend(vectors);
        }

        let mut vectors = chunk_vectors.into_iter();
        let mut results = Vec::with_capacity(texts.len());
        for chunks in &chunked {
            let parts: Vec<Vec<f32>> = vectors.by_ref().take(chunks.len()).collect();
            results.push(self.combine_chunks(parts));
        }

        Ok(results)
    }

    /// Generate a single vector
    pub fn embed_one(&self, text: &str, instruction: &str) -> Result<Vec<f32>> {
        self.embed(&[text], instruction)?
            .into_iter()
            .next()
            .ok_or_else(|| RagError::provider("No embedding returned"))
    }

    /// Vector length every result has
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Backend / model name
    pub fn model_name(&self) -> &str {
        self.backend.name()
    }

    fn check_batch(&self, expected: usize, vectors: &[Vec<f32>]) -> Result<()> {
        if vectors.len() != expected {
            return Err(RagError::provider(format!(
                "Backend returned {} vectors for {} inputs",
                vectors.len(),
                expected
            )));
        }
        if let Some(bad) = vectors.iter().find(|v| v.len() != self.dimension) {
            return Err(RagError::provider(format!(
                "Expected {} dimensions, got {}",
                self.dimension,
                bad.len()
            )));
        }
        Ok(())
    }

    /// Single chunk: returned as produced. Several: normalised element-wise mean.
    fn combine_chunks(&self, mut parts: Vec<Vec<f32>>) -> Vec<f32> {
        if parts.len() == 1 {
            return parts.remove(0);
        }
        let mut averaged = vector::mean(&parts, self.dimension);
        vector::l2_normalize(&mut averaged);
        averaged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FailingBackend, KeywordBackend};

    fn config(max_length: usize, batch_size: usize) -> EmbeddingConfig {
        EmbeddingConfig {
            dimension: 3,
            max_length,
            batch_size,
            ..EmbeddingConfig::default()
        }
    }

    fn keyword_backend() -> Arc<KeywordBackend> {
        Arc::new(
            KeywordBackend::new(3)
                .with("alpha", vec![1.0, 0.0, 0.0])
                .with("beta", vec![0.0, 1.0, 0.0])
                .with("gamma", vec![0.0, 0.0, 1.0]),
        )
    }

    #[test]
    fn test_one_vector_per_text_in_order() {
        let backend = keyword_backend();
        let provider = EmbeddingProvider::new(backend.clone(), &config(512, 8));

        let vectors = provider
            .embed(&["gamma", "alpha", "beta"], "Represent this")
            .unwrap();

        assert_eq!(vectors.len(), 3);
        assert_eq!(vectors[0], vec![0.0, 0.0, 1.0]);
        assert_eq!(vectors[1], vec![1.0, 0.0, 0.0]);
        assert_eq!(vectors[2], vec![0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_instruction_reaches_backend() {
        let backend = keyword_backend();
        let provider = EmbeddingProvider::new(backend.clone(), &config(512, 8));

        provider.embed_one("alpha", "Represent the title").unwrap();

        let seen = backend.seen();
        assert_eq!(
            seen,
            vec![("Represent the title".to_string(), "alpha".to_string())]
        );
    }

    #[test]
    fn test_batches_bounded_by_batch_size() {
        let backend = keyword_backend();
        let provider = EmbeddingProvider::new(backend.clone(), &config(512, 2));

        provider
            .embed(&["alpha", "beta", "gamma", "alpha", "beta"], "i")
            .unwrap();

        assert_eq!(backend.batch_sizes(), vec![2, 2, 1]);
    }

    #[test]
    fn test_multi_chunk_text_is_normalized_mean() {
        let backend = keyword_backend();
        // "alpha." and "beta." do not fit together in 8 characters
        let provider = EmbeddingProvider::new(backend.clone(), &config(8, 8));

        let vectors = provider.embed(&["alpha. beta."], "i").unwrap();

        let expected = std::f32::consts::FRAC_1_SQRT_2;
        assert_eq!(vectors.len(), 1);
        assert!((vectors[0][0] - expected).abs() < 1e-6);
        assert!((vectors[0][1] - expected).abs() < 1e-6);
        assert!(vectors[0][2].abs() < 1e-6);
    }

    #[test]
    fn test_uneven_chunk_counts_stay_aligned() {
        let backend = keyword_backend();
        let provider = EmbeddingProvider::new(backend.clone(), &config(8, 2));

        // 3 chunks, 1 chunk, 2 chunks
        let vectors = provider
            .embed(&["alpha. beta. gamma.", "gamma", "alpha. gamma."], "i")
            .unwrap();

        let third = 1.0 / 3.0_f32.sqrt();
        let half = std::f32::consts::FRAC_1_SQRT_2;
        assert_eq!(vectors.len(), 3);
        for value in &vectors[0] {
            assert!((value - third).abs() < 1e-6);
        }
        assert_eq!(vectors[1], vec![0.0, 0.0, 1.0]);
        assert!((vectors[2][0] - half).abs() < 1e-6);
        assert!(vectors[2][1].abs() < 1e-6);
        assert!((vectors[2][2] - half).abs() < 1e-6);
    }

    #[test]
    fn test_chunk_average_independent_of_split_points() {
        let backend = keyword_backend();
        let narrow = EmbeddingProvider::new(backend.clone(), &config(8, 8));
        let wide = EmbeddingProvider::new(backend.clone(), &config(13, 8));

        // Same three sentences; narrow gives 3 chunks, wide gives 2 ("alpha. beta." + "alpha.")
        let a = narrow.embed_one("alpha. beta. alpha.", "i").unwrap();
        let b = wide.embed_one("alpha. beta. alpha.", "i").unwrap();

        // Chunk vectors are averaged in order; the keyword backend sums keywords
        // per chunk, so both splits land on the same direction.
        for (x, y) in a.iter().zip(b.iter()) {
            assert!((x - y).abs() < 1e-6);
        }
    }

    #[test]
    fn test_dimension_mismatch_is_provider_error() {
        let backend = Arc::new(KeywordBackend::new(2));
        let provider = EmbeddingProvider::new(backend, &config(512, 8));

        let err = provider.embed_one("alpha", "i").unwrap_err();
        assert!(err.is_provider());
        assert!(err.to_string().contains("Expected 3 dimensions"));
    }

    #[test]
    fn test_backend_failure_propagates() {
        let provider = EmbeddingProvider::new(Arc::new(FailingBackend), &config(512, 8));
        let err = provider.embed_one("alpha", "i").unwrap_err();
        assert!(err.is_provider());
    }

    #[test]
    fn test_empty_input() {
        let provider = EmbeddingProvider::new(keyword_backend(), &config(512, 8));
        let empty: [&str; 0] = [];
        assert!(provider.embed(&empty, "i").unwrap().is_empty());
    }
}

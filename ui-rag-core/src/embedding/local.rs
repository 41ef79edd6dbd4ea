//! Local embedding backend using fastembed
//!
//! The ONNX model is downloaded into the cache directory on first use.
//! fastembed models have no separate instruction input, so the instruction
//! is prefixed to every chunk.

use std::path::PathBuf;

use fastembed::{InitOptions, TextEmbedding};
use parking_lot::Mutex;

use super::backend::{EmbeddingBackend, InstructedText};
use crate::error::{RagError, Result};

/// Wrapper around fastembed's TextEmbedding model.
/// Uses a Mutex because fastembed's embed() may require &mut self.
pub struct FastEmbedBackend {
    model: Mutex<TextEmbedding>,
    model_name: String,
}

impl FastEmbedBackend {
    /// Load (downloading if needed) the named model into `cache_dir`
    pub fn new(model_name: &str, cache_dir: PathBuf, show_download_progress: bool) -> Result<Self> {
        let model_enum = Self::parse_model_name(model_name)?;

        log::info!(
            "Loading fastembed model {} (cache: {})",
            model_name,
            cache_dir.display()
        );

        let options = InitOptions::new(model_enum)
            .with_cache_dir(cache_dir)
            .with_show_download_progress(show_download_progress);

        let model = TextEmbedding::try_new(options)
            .map_err(|e| RagError::provider(format!("Failed to load {}: {}", model_name, e)))?;

        Ok(Self {
            model: Mutex::new(model),
            model_name: model_name.to_string(),
        })
    }

    /// Parse model name string to fastembed enum.
    fn parse_model_name(name: &str) -> Result<fastembed::EmbeddingModel> {
        match name.to_lowercase().as_str() {
            "multilingual-e5-small" | "multilinguale5small" => {
                Ok(fastembed::EmbeddingModel::MultilingualE5Small)
            }
            "multilingual-e5-base" | "multilinguale5base" => {
                Ok(fastembed::EmbeddingModel::MultilingualE5Base)
            }
            "multilingual-e5-large" | "multilinguale5large" => {
                Ok(fastembed::EmbeddingModel::MultilingualE5Large)
            }
            "all-minilm-l6-v2" | "allminiml6v2" => Ok(fastembed::EmbeddingModel::AllMiniLML6V2),
            "bge-small-en-v1.5" | "bgesmallenv15" => Ok(fastembed::EmbeddingModel::BGESmallENV15),
            "bge-base-en-v1.5" | "bgebaseenv15" => Ok(fastembed::EmbeddingModel::BGEBaseENV15),
            "bge-large-en-v1.5" | "bgelargeenv15" => Ok(fastembed::EmbeddingModel::BGELargeENV15),
            _ => Err(RagError::config(format!(
                "Unknown model: {}. Supported models: multilingual-e5-small, multilingual-e5-base, \
                 multilingual-e5-large, all-MiniLM-L6-v2, bge-small-en-v1.5, bge-base-en-v1.5, \
                 bge-large-en-v1.5",
                name
            ))),
        }
    }
}

impl EmbeddingBackend for FastEmbedBackend {
    fn name(&self) -> &str {
        &self.model_name
    }

    fn encode(&self, inputs: &[InstructedText<'_>]) -> Result<Vec<Vec<f32>>> {
        if inputs.is_empty() {
            return Ok(vec![]);
        }

        let texts: Vec<String> = inputs.iter().map(InstructedText::prefixed).collect();

        #[allow(unused_mut)]
        let mut model = self.model.lock();
        model
            .embed(texts, None)
            .map_err(|e| RagError::provider(format!("Failed to encode texts: {}", e)))
    }
}

//! Embedding backend abstraction

use crate::error::Result;

/// A text paired with the instruction that biases its embedding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstructedText<'a> {
    pub instruction: &'a str,
    pub text: &'a str,
}

impl<'a> InstructedText<'a> {
    pub fn new(instruction: &'a str, text: &'a str) -> Self {
        Self { instruction, text }
    }

    /// Single-string form for models without a separate instruction channel
    pub fn prefixed(&self) -> String {
        if self.instruction.is_empty() {
            self.text.to_string()
        } else {
            format!("{}: {}", self.instruction, self.text)
        }
    }
}

/// The model behind the embedding provider
///
/// Implementations return exactly one vector per input, in input order.
/// Chunking, batching and dimension checks are the provider's job.
pub trait EmbeddingBackend: Send + Sync {
    /// Backend / model name, recorded in document provenance
    fn name(&self) -> &str;

    /// Encode one batch of instructed texts
    fn encode(&self, inputs: &[InstructedText<'_>]) -> Result<Vec<Vec<f32>>>;
}

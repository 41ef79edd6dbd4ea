//! OpenAI-compatible HTTP embedding backend
//!
//! Posts `{"model", "input", "encoding_format": "float"}` to the configured
//! endpoint and reads `data[].embedding`. Used for hosted models such as
//! `text-embedding-3-large` or self-hosted instructor servers.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::backend::{EmbeddingBackend, InstructedText};
use crate::error::{RagError, Result};

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: Vec<String>,
    encoding_format: &'static str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingDatum>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingDatum {
    #[serde(default)]
    index: Option<usize>,
    embedding: Vec<f32>,
}

/// Blocking client for an `/embeddings` endpoint
pub struct HttpEmbeddingBackend {
    client: reqwest::blocking::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl HttpEmbeddingBackend {
    pub fn new(
        endpoint: &str,
        model: &str,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RagError::provider(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            model: model.to_string(),
            api_key,
            timeout,
        })
    }

    /// Restore input order from the response's `index` fields
    fn into_ordered(data: Vec<EmbeddingDatum>, expected: usize) -> Result<Vec<Vec<f32>>> {
        if data.iter().all(|d| d.index.is_none()) {
            return Ok(data.into_iter().map(|d| d.embedding).collect());
        }

        let mut slots: Vec<Option<Vec<f32>>> = vec![None; expected];
        for datum in data {
            let index = datum
                .index
                .filter(|i| *i < expected)
                .ok_or_else(|| RagError::provider("Malformed response: bad embedding index"))?;
            slots[index] = Some(datum.embedding);
        }
        slots
            .into_iter()
            .map(|slot| {
                slot.ok_or_else(|| RagError::provider("Malformed response: missing embedding"))
            })
            .collect()
    }
}

impl EmbeddingBackend for HttpEmbeddingBackend {
    fn name(&self) -> &str {
        &self.model
    }

    fn encode(&self, inputs: &[InstructedText<'_>]) -> Result<Vec<Vec<f32>>> {
        if inputs.is_empty() {
            return Ok(vec![]);
        }

        let request = EmbeddingRequest {
            model: &self.model,
            input: inputs.iter().map(InstructedText::prefixed).collect(),
            encoding_format: "float",
        };

        let mut req = self.client.post(&self.endpoint).json(&request);
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }

        let response = req.send().map_err(|e| {
            if e.is_timeout() {
                RagError::provider(format!(
                    "Embedding request timed out after {}s",
                    self.timeout.as_secs()
                ))
            } else {
                RagError::provider(format!("Embedding endpoint unreachable: {}", e))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            log::warn!("embedding endpoint error: status={} body={}", status, body);
            return Err(RagError::provider(format!(
                "Embedding endpoint returned {}",
                status
            )));
        }

        let parsed: EmbeddingResponse = response
            .json()
            .map_err(|e| RagError::provider(format!("Malformed response: {}", e)))?;

        Self::into_ordered(parsed.data, inputs.len())
    }
}

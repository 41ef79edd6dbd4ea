//! Test doubles shared by the unit tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::EmbeddingConfig;
use crate::document::{Document, DocumentEmbeddings, DocumentId};
use crate::embedding::{EmbeddingBackend, EmbeddingProvider, InstructedText};
use crate::error::{RagError, Result};
use crate::store::{DocumentStore, NeighborQuery, ScoredDocument, VectorStore};

/// Deterministic backend: each keyword found in the text adds its vector,
/// once per occurrence.
pub struct KeywordBackend {
    dimension: usize,
    keywords: Vec<(String, Vec<f32>)>,
    seen: Mutex<Vec<(String, String)>>,
    batches: Mutex<Vec<usize>>,
}

impl KeywordBackend {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            keywords: vec![],
            seen: Mutex::new(vec![]),
            batches: Mutex::new(vec![]),
        }
    }

    pub fn with(mut self, keyword: &str, vector: Vec<f32>) -> Self {
        self.keywords.push((keyword.to_string(), vector));
        self
    }

    /// (instruction, text) pairs in call order
    pub fn seen(&self) -> Vec<(String, String)> {
        self.seen.lock().clone()
    }

    pub fn batch_sizes(&self) -> Vec<usize> {
        self.batches.lock().clone()
    }

    pub fn calls(&self) -> usize {
        self.batches.lock().len()
    }
}

impl EmbeddingBackend for KeywordBackend {
    fn name(&self) -> &str {
        "keyword"
    }

    fn encode(&self, inputs: &[InstructedText<'_>]) -> Result<Vec<Vec<f32>>> {
        self.batches.lock().push(inputs.len());
        let mut seen = self.seen.lock();

        Ok(inputs
            .iter()
            .map(|input| {
                seen.push((input.instruction.to_string(), input.text.to_string()));
                let mut vector = vec![0.0; self.dimension];
                for (keyword, keyword_vector) in &self.keywords {
                    let count = input.text.matches(keyword.as_str()).count() as f32;
                    for (slot, value) in vector.iter_mut().zip(keyword_vector) {
                        *slot += value * count;
                    }
                }
                vector
            })
            .collect())
    }
}

/// Backend that is always down
pub struct FailingBackend;

impl EmbeddingBackend for FailingBackend {
    fn name(&self) -> &str {
        "failing"
    }

    fn encode(&self, _inputs: &[InstructedText<'_>]) -> Result<Vec<Vec<f32>>> {
        Err(RagError::provider("connection refused"))
    }
}

/// Provider over a 2-d keyword backend: "nav" → x, "card" → y
pub fn keyword_provider(backend: Arc<KeywordBackend>) -> Arc<EmbeddingProvider> {
    let config = EmbeddingConfig {
        dimension: 2,
        ..EmbeddingConfig::default()
    };
    Arc::new(EmbeddingProvider::new(backend, &config))
}

pub fn nav_card_backend() -> Arc<KeywordBackend> {
    Arc::new(
        KeywordBackend::new(2)
            .with("nav", vec![1.0, 0.0])
            .with("card", vec![0.0, 1.0]),
    )
}

/// Approved document with the same vector in all three fields
pub fn fixture(title: &str, ui_type: &str, vector: Vec<f32>) -> Document {
    Document::builder()
        .title(title)
        .ui_type(ui_type)
        .description(format!("{} component", title))
        .content(format!("<div class=\"{}\"></div>", ui_type))
        .keyword(ui_type)
        .embeddings(DocumentEmbeddings::new(
            vector.clone(),
            vector.clone(),
            vector,
        ))
        .build()
        .unwrap()
}

/// Temporary 2-d [`DocumentStore`] that counts the calls made to it
pub struct CountingStore {
    inner: DocumentStore,
    neighbor_calls: AtomicUsize,
    get_calls: AtomicUsize,
    _dir: tempfile::TempDir,
}

impl CountingStore {
    pub fn with(documents: Vec<Document>) -> Arc<Self> {
        let dir = tempfile::tempdir().unwrap();
        let inner = DocumentStore::open_at(dir.path(), 2, 100).unwrap();
        for document in documents {
            inner.put(document).unwrap();
        }
        Arc::new(Self {
            inner,
            neighbor_calls: AtomicUsize::new(0),
            get_calls: AtomicUsize::new(0),
            _dir: dir,
        })
    }

    pub fn neighbor_calls(&self) -> usize {
        self.neighbor_calls.load(Ordering::SeqCst)
    }

    pub fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }
}

impl VectorStore for CountingStore {
    fn nearest_neighbors(&self, query: &NeighborQuery) -> Result<Vec<ScoredDocument>> {
        self.neighbor_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.nearest_neighbors(query)
    }

    fn get_document(&self, id: &DocumentId) -> Result<Document> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.get_document(id)
    }
}

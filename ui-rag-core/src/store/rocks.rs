//! RocksDB document store with HNSW indexing
//!
//! Document records are stored as JSON under `doc:{id}`, their three vectors
//! with bincode under `vec:{id}`. Everything is loaded into memory on open.
//! An instant-distance HNSW index covers the description vectors of approved
//! documents; other queries use an exact scan.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use dashmap::DashMap;
use instant_distance::{Builder, HnswMap, Point, Search};
use parking_lot::{Mutex, RwLock};
use rocksdb::{IteratorMode, Options, WriteBatch, DB};

use super::{rank, NeighborQuery, ScoredDocument, StoreStats, VectorStore};
use crate::config::StoreConfig;
use crate::document::{Document, DocumentEmbeddings, DocumentId, VectorField};
use crate::error::{RagError, Result};
use crate::vector;

const SCHEMA_VERSION_KEY: &[u8] = b"_schema_version";
const CURRENT_SCHEMA_VERSION: u32 = 1;

/// HNSW point wrapper
#[derive(Clone)]
struct IndexPoint(Vec<f32>);

impl Point for IndexPoint {
    fn distance(&self, other: &Self) -> f32 {
        vector::cosine_distance(&self.0, &other.0)
    }
}

struct DescriptionIndex {
    hnsw: HnswMap<IndexPoint, DocumentId>,
    len: usize,
}

/// RocksDB-backed [`VectorStore`]
pub struct DocumentStore {
    db: Arc<DB>,
    documents: Arc<DashMap<DocumentId, Document>>,
    index: Arc<RwLock<Option<DescriptionIndex>>>,
    /// Serializes snapshot, build and swap so an older build never replaces a newer one
    rebuild_lock: Arc<Mutex<()>>,
    dimension: usize,
    ef_construction: usize,
}

impl DocumentStore {
    /// Open (or create) the store at `config.path` for vectors of `dimension`
    pub fn open(config: &StoreConfig, dimension: usize) -> Result<Self> {
        Self::open_at(&config.path, dimension, config.ef_construction)
    }

    pub fn open_at(
        path: impl AsRef<Path>,
        dimension: usize,
        ef_construction: usize,
    ) -> Result<Self> {
        let path = path.as_ref();
        std::fs::create_dir_all(path)?;

        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.set_max_background_jobs(2);
        opts.set_bytes_per_sync(1048576); // 1MB
        opts.set_compression_type(rocksdb::DBCompressionType::Lz4);

        let db = DB::open(&opts, path)?;
        check_schema(&db)?;

        log::info!("DocumentStore opened at: {}", path.display());

        let store = Self {
            db: Arc::new(db),
            documents: Arc::new(DashMap::new()),
            index: Arc::new(RwLock::new(None)),
            rebuild_lock: Arc::new(Mutex::new(())),
            dimension,
            ef_construction: ef_construction.max(1),
        };

        store.load_cache()?;
        Ok(store)
    }

    /// Load every document and its vectors into memory
    fn load_cache(&self) -> Result<()> {
        let mut count = 0;
        let mut skipped = 0;

        for item in self.db.iterator(IteratorMode::Start) {
            let (key, value) = item?;
            let key_str = String::from_utf8_lossy(&key);
            let Some(id) = key_str.strip_prefix("doc:") else {
                continue;
            };

            let mut document = match serde_json::from_slice::<Document>(&value) {
                Ok(document) => document,
                Err(e) => {
                    log::warn!("Failed to deserialize document {}: {}. Skipping.", id, e);
                    skipped += 1;
                    continue;
                }
            };

            match self.db.get(format!("vec:{}", id).as_bytes())? {
                Some(bytes) => match bincode::deserialize::<DocumentEmbeddings>(&bytes) {
                    Ok(embeddings) => document.embeddings = embeddings,
                    Err(e) => {
                        log::warn!("Failed to deserialize vectors of {}: {}. Skipping.", id, e);
                        skipped += 1;
                        continue;
                    }
                },
                None => {
                    log::warn!("Document {} has no vectors. Skipping.", id);
                    skipped += 1;
                    continue;
                }
            }

            if document.embeddings.dimension() != Some(self.dimension) {
                log::warn!(
                    "Document {} has vectors of the wrong dimension (expected {}). Skipping.",
                    id,
                    self.dimension
                );
                skipped += 1;
                continue;
            }

            self.documents.insert(document.id, document);
            count += 1;
        }

        if count > 0 {
            log::info!("Loaded {} documents from disk", count);
        }
        if skipped > 0 {
            log::warn!("Skipped {} unreadable documents", skipped);
        }

        self.rebuild_index();
        Ok(())
    }

    /// Insert or replace a document
    pub fn put(&self, document: Document) -> Result<DocumentId> {
        match document.embeddings.dimension() {
            Some(dim) if dim == self.dimension => {}
            Some(dim) => {
                return Err(RagError::validation(format!(
                    "Document vectors have {} dimensions, store expects {}",
                    dim, self.dimension
                )))
            }
            None => {
                return Err(RagError::validation(
                    "Description, content and title vectors differ in dimension",
                ))
            }
        }

        let id = document.id;
        let mut batch = WriteBatch::default();
        batch.put(format!("doc:{}", id).as_bytes(), serde_json::to_vec(&document)?);
        batch.put(
            format!("vec:{}", id).as_bytes(),
            bincode::serialize(&document.embeddings)?,
        );
        self.db.write(batch)?;
        self.db.flush()?;

        self.documents.insert(id, document);
        self.rebuild_index();
        Ok(id)
    }

    /// Delete a document permanently
    pub fn delete(&self, id: &DocumentId) -> Result<bool> {
        let removed = self.documents.remove(id).is_some();

        let mut batch = WriteBatch::default();
        batch.delete(format!("doc:{}", id).as_bytes());
        batch.delete(format!("vec:{}", id).as_bytes());
        self.db.write(batch)?;
        self.db.flush()?;

        if removed {
            self.rebuild_index();
        }
        Ok(removed)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Get store statistics
    pub fn stats(&self) -> StoreStats {
        let mut by_ui_type: BTreeMap<String, usize> = BTreeMap::new();
        let mut approved = 0;

        for entry in self.documents.iter() {
            let document = entry.value();
            *by_ui_type.entry(document.ui_type.clone()).or_insert(0) += 1;
            if document.approved {
                approved += 1;
            }
        }

        StoreStats {
            total_documents: self.documents.len(),
            approved_documents: approved,
            indexed_vectors: self.index.read().as_ref().map_or(0, |idx| idx.len),
            dimension: self.dimension,
            by_ui_type,
        }
    }

    /// Rebuild the HNSW index over approved description vectors
    fn rebuild_index(&self) {
        let _guard = self.rebuild_lock.lock();

        let (points, ids): (Vec<IndexPoint>, Vec<DocumentId>) = self
            .documents
            .iter()
            .filter(|entry| entry.value().approved)
            .map(|entry| {
                let document = entry.value();
                (IndexPoint(document.embeddings.description.clone()), document.id)
            })
            .unzip();

        if points.is_empty() {
            *self.index.write() = None;
            return;
        }

        let len = points.len();
        let hnsw = Builder::default()
            .ef_construction(self.ef_construction)
            .build(points, ids);

        log::debug!("Rebuilt HNSW index with {} vectors", len);
        *self.index.write() = Some(DescriptionIndex { hnsw, len });
    }

    /// ANN candidates; None when the index cannot answer completely
    fn index_search(&self, query: &NeighborQuery) -> Option<Vec<ScoredDocument>> {
        let guard = self.index.read();
        let index = guard.as_ref()?;

        let point = IndexPoint(query.vector.clone());
        let mut search = Search::default();
        let mut visited = 0;
        let mut rows = Vec::new();

        for item in index.hnsw.search(&point, &mut search) {
            visited += 1;
            let similarity = 1.0 - item.distance;
            if similarity <= query.min_similarity {
                continue;
            }
            let Some(entry) = self.documents.get(item.value) else {
                continue;
            };
            if !query.admits(entry.value()) {
                continue;
            }
            rows.push(ScoredDocument {
                document: entry.value().to_retrieved(query.include_content),
                similarity,
            });
        }

        if rows.len() >= query.limit || visited >= index.len {
            Some(rank(rows, query.limit))
        } else {
            None
        }
    }

    fn exact_search(&self, query: &NeighborQuery) -> Vec<ScoredDocument> {
        let rows = self
            .documents
            .iter()
            .filter(|entry| query.admits(entry.value()))
            .filter_map(|entry| {
                let document = entry.value();
                let stored = document.embeddings.get(query.field);
                let similarity = 1.0 - vector::cosine_distance(&query.vector, stored);
                (similarity > query.min_similarity).then(|| ScoredDocument {
                    document: document.to_retrieved(query.include_content),
                    similarity,
                })
            })
            .collect();

        rank(rows, query.limit)
    }
}

impl VectorStore for DocumentStore {
    fn nearest_neighbors(&self, query: &NeighborQuery) -> Result<Vec<ScoredDocument>> {
        if query.vector.len() != self.dimension {
            return Err(RagError::validation(format!(
                "Query vector has {} dimensions, store expects {}",
                query.vector.len(),
                self.dimension
            )));
        }
        if query.limit == 0 {
            return Ok(vec![]);
        }

        if query.field == VectorField::Description && query.categories.is_empty() {
            if let Some(rows) = self.index_search(query) {
                return Ok(rows);
            }
            log::debug!("HNSW candidates exhausted, falling back to exact scan");
        }

        Ok(self.exact_search(query))
    }

    fn get_document(&self, id: &DocumentId) -> Result<Document> {
        self.documents
            .get(id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| RagError::not_found(id.to_string()))
    }
}

/// Stamp new databases with the schema version; refuse newer ones
fn check_schema(db: &DB) -> Result<()> {
    let version = match db.get(SCHEMA_VERSION_KEY)? {
        Some(bytes) => {
            let bytes_slice: &[u8] = bytes.as_ref();
            let version_bytes: [u8; 4] = bytes_slice
                .try_into()
                .map_err(|_| RagError::store("Invalid schema version format"))?;
            u32::from_le_bytes(version_bytes)
        }
        None => {
            db.put(SCHEMA_VERSION_KEY, CURRENT_SCHEMA_VERSION.to_le_bytes())?;
            CURRENT_SCHEMA_VERSION
        }
    };

    if version > CURRENT_SCHEMA_VERSION {
        return Err(RagError::store(format!(
            "Store schema v{} is newer than supported v{}",
            version, CURRENT_SCHEMA_VERSION
        )));
    }
    Ok(())
}

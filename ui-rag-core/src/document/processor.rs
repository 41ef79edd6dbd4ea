//! Turns component drafts into embedded documents

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::{description_text, Document, DocumentEmbeddings, Evaluation};
use crate::embedding::{
    EmbeddingProvider, CONTENT_INSTRUCTION, DESCRIPTION_INSTRUCTION, TITLE_INSTRUCTION,
};
use crate::error::{RagError, Result};

/// Component data before embedding
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentDraft {
    pub title: String,
    pub ui_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
    #[serde(default)]
    pub evaluation: Option<Evaluation>,
    /// Approved unless set to false
    #[serde(default)]
    pub approved: Option<bool>,
}

/// Builds the description, content and title embeddings of a document
pub struct DocumentProcessor {
    provider: Arc<EmbeddingProvider>,
}

impl DocumentProcessor {
    pub fn new(provider: Arc<EmbeddingProvider>) -> Self {
        Self { provider }
    }

    /// Embed a draft with the three role instructions
    pub fn process(&self, draft: DocumentDraft) -> Result<Document> {
        if draft.title.trim().is_empty() {
            return Err(RagError::validation("Document title must not be empty"));
        }
        if draft.ui_type.trim().is_empty() {
            return Err(RagError::validation("Document ui_type must not be empty"));
        }

        let description = self.provider.embed_one(
            &description_text(&draft.title, &draft.description, &draft.keywords),
            DESCRIPTION_INSTRUCTION,
        )?;
        let content = self
            .provider
            .embed_one(&draft.content, CONTENT_INSTRUCTION)?;
        let title = self.provider.embed_one(&draft.title, TITLE_INSTRUCTION)?;

        log::debug!("Embedded document '{}' ({})", draft.title, draft.ui_type);

        let evaluation = draft
            .evaluation
            .unwrap_or_else(|| Evaluation::default_for(&draft.ui_type));

        let mut builder = Document::builder()
            .title(draft.title)
            .ui_type(draft.ui_type)
            .description(draft.description)
            .content(draft.content)
            .keywords(draft.keywords)
            .evaluation(evaluation)
            .approved(draft.approved.unwrap_or(true))
            .provenance(self.provider.model_name(), Utc::now())
            .embeddings(DocumentEmbeddings::new(description, content, title));

        if let Some(url) = draft.source_url {
            builder = builder.source_url(url);
        }
        if let Some(metadata) = draft.metadata {
            builder = builder.metadata(metadata);
        }

        Ok(builder.build()?)
    }

    /// Process several drafts, stopping at the first failure
    pub fn process_all(&self, drafts: Vec<DocumentDraft>) -> Result<Vec<Document>> {
        drafts.into_iter().map(|draft| self.process(draft)).collect()
    }
}

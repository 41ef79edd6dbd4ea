//! UI component documents
//!
//! Core types for the records the retrieval layer searches over.

mod processor;

pub use processor::{DocumentDraft, DocumentProcessor};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentId(pub Uuid);

impl DocumentId {
    /// Create a new random DocumentId
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from existing UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for DocumentId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Quality sub-scores from a reviewer (free-form levels such as "high")
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QualityScores {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reusability: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maintainability: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accessibility: Option<String>,
}

/// Category assignment made during evaluation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UiClassification {
    pub primary_type: String,
    #[serde(default)]
    pub secondary_types: Vec<String>,
}

/// Evaluation record attached to a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Overall evaluation score (0.0 to 1.0)
    pub consistency_score: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<QualityScores>,
    /// Improvement suggestions, most important first
    #[serde(default)]
    pub improvements: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification: Option<UiClassification>,
}

impl Evaluation {
    /// Default evaluation for documents imported without a review
    pub fn default_for(ui_type: &str) -> Self {
        Self {
            consistency_score: 0.8,
            quality: Some(QualityScores {
                reusability: Some("medium".to_string()),
                maintainability: Some("medium".to_string()),
                accessibility: Some("medium".to_string()),
            }),
            improvements: vec![],
            classification: Some(UiClassification {
                primary_type: ui_type.to_string(),
                secondary_types: vec![],
            }),
        }
    }
}

/// Which of the three stored vectors a query runs against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VectorField {
    /// Title + description + keywords
    #[default]
    Description,
    /// Code / markup
    Content,
    Title,
}

/// The three embeddings of a document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentEmbeddings {
    pub description: Vec<f32>,
    pub content: Vec<f32>,
    pub title: Vec<f32>,
}

impl DocumentEmbeddings {
    pub fn new(description: Vec<f32>, content: Vec<f32>, title: Vec<f32>) -> Self {
        Self {
            description,
            content,
            title,
        }
    }

    pub fn get(&self, field: VectorField) -> &[f32] {
        match field {
            VectorField::Description => &self.description,
            VectorField::Content => &self.content,
            VectorField::Title => &self.title,
        }
    }

    /// Dimension shared by all three vectors, or None if they disagree
    pub fn dimension(&self) -> Option<usize> {
        let dim = self.description.len();
        (self.content.len() == dim && self.title.len() == dim).then_some(dim)
    }
}

/// Which model produced the embeddings, and when
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingProvenance {
    pub model: String,
    pub generated_at: DateTime<Utc>,
}

/// A UI component document
///
/// Embeddings are persisted separately from the descriptive record and are
/// not part of its serialized form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Unique identifier
    pub id: DocumentId,
    pub title: String,
    /// Category label (e.g. "navigation", "card")
    pub ui_type: String,
    pub description: String,
    /// Raw content payload (markup / code)
    pub content: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    /// Free-form metadata (e.g. the context the component was pasted from)
    #[serde(default)]
    pub metadata: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evaluation: Option<Evaluation>,
    /// Only approved documents are eligible for retrieval
    pub approved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provenance: Option<EmbeddingProvenance>,
    #[serde(skip)]
    pub embeddings: DocumentEmbeddings,
}

impl Document {
    /// Create a new builder for Document
    pub fn builder() -> DocumentBuilder {
        DocumentBuilder::new()
    }

    /// Text embedded into the description vector
    pub fn description_text(&self) -> String {
        description_text(&self.title, &self.description, &self.keywords)
    }

    /// Project into the shape returned by searches
    pub fn to_retrieved(&self, include_content: bool) -> RetrievedDocument {
        RetrievedDocument {
            id: self.id,
            title: self.title.clone(),
            ui_type: self.ui_type.clone(),
            description: self.description.clone(),
            keywords: self.keywords.clone(),
            source_url: self.source_url.clone(),
            metadata: self.metadata.clone(),
            evaluation: self.evaluation.clone(),
            content: include_content.then(|| self.content.clone()),
        }
    }
}

pub(crate) fn description_text(title: &str, description: &str, keywords: &[String]) -> String {
    format!("{} {} {}", title, description, keywords.join(" "))
        .trim()
        .to_string()
}

/// Document as returned by the store: no vectors, content only on request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedDocument {
    pub id: DocumentId,
    pub title: String,
    pub ui_type: String,
    pub description: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(default)]
    pub metadata: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evaluation: Option<Evaluation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// Builder for Document with fluent API
#[derive(Debug, Default)]
pub struct DocumentBuilder {
    id: Option<DocumentId>,
    title: Option<String>,
    ui_type: Option<String>,
    description: String,
    content: String,
    keywords: Vec<String>,
    source_url: Option<String>,
    metadata: Option<serde_json::Value>,
    evaluation: Option<Evaluation>,
    approved: bool,
    provenance: Option<EmbeddingProvenance>,
    embeddings: Option<DocumentEmbeddings>,
}

impl DocumentBuilder {
    pub fn new() -> Self {
        Self {
            approved: true,
            ..Default::default()
        }
    }

    /// Set the document ID (auto-generated if not set)
    pub fn id(mut self, id: DocumentId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn ui_type(mut self, ui_type: impl Into<String>) -> Self {
        self.ui_type = Some(ui_type.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Add a keyword
    pub fn keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keywords.push(keyword.into());
        self
    }

    /// Set multiple keywords
    pub fn keywords(mut self, keywords: Vec<String>) -> Self {
        self.keywords = keywords;
        self
    }

    pub fn source_url(mut self, url: impl Into<String>) -> Self {
        self.source_url = Some(url.into());
        self
    }

    pub fn metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn evaluation(mut self, evaluation: Evaluation) -> Self {
        self.evaluation = Some(evaluation);
        self
    }

    /// Approval flag (approved unless set otherwise)
    pub fn approved(mut self, approved: bool) -> Self {
        self.approved = approved;
        self
    }

    pub fn provenance(mut self, model: impl Into<String>, generated_at: DateTime<Utc>) -> Self {
        self.provenance = Some(EmbeddingProvenance {
            model: model.into(),
            generated_at,
        });
        self
    }

    pub fn embeddings(mut self, embeddings: DocumentEmbeddings) -> Self {
        self.embeddings = Some(embeddings);
        self
    }

    /// Build the Document
    pub fn build(self) -> Result<Document, DocumentBuilderError> {
        let title = self.title.ok_or(DocumentBuilderError::MissingTitle)?;
        let ui_type = self.ui_type.ok_or(DocumentBuilderError::MissingUiType)?;
        let embeddings = self.embeddings.ok_or(DocumentBuilderError::MissingEmbeddings)?;
        if embeddings.dimension().is_none() {
            return Err(DocumentBuilderError::InconsistentEmbeddings);
        }

        Ok(Document {
            id: self.id.unwrap_or_default(),
            title,
            ui_type,
            description: self.description,
            content: self.content,
            keywords: self.keywords,
            source_url: self.source_url,
            metadata: self
                .metadata
                .unwrap_or_else(|| serde_json::Value::Object(Default::default())),
            evaluation: self.evaluation,
            approved: self.approved,
            provenance: self.provenance,
            embeddings,
        })
    }
}

/// Errors that can occur when building a Document
#[derive(Debug, thiserror::Error)]
pub enum DocumentBuilderError {
    #[error("Missing required field: title")]
    MissingTitle,
    #[error("Missing required field: ui_type")]
    MissingUiType,
    #[error("Missing required field: embeddings")]
    MissingEmbeddings,
    #[error("Description, content and title embeddings differ in dimension")]
    InconsistentEmbeddings,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn embeddings() -> DocumentEmbeddings {
        DocumentEmbeddings::new(vec![1.0, 0.0], vec![0.0, 1.0], vec![1.0, 1.0])
    }

    #[test]
    fn test_document_id_parse() {
        let id = DocumentId::new();
        let parsed: DocumentId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
        assert!("not-a-uuid".parse::<DocumentId>().is_err());
    }

    #[test]
    fn test_builder() {
        let doc = Document::builder()
            .title("Bootstrap Navbar")
            .ui_type("navigation")
            .description("Responsive navigation bar")
            .content("<nav class=\"navbar\"></nav>")
            .keyword("bootstrap")
            .keyword("navbar")
            .embeddings(embeddings())
            .build()
            .unwrap();

        assert_eq!(doc.title, "Bootstrap Navbar");
        assert!(doc.approved);
        assert_eq!(doc.keywords.len(), 2);
        assert_eq!(doc.embeddings.dimension(), Some(2));
        assert!(doc.metadata.is_object());
    }

    #[test]
    fn test_builder_missing_required() {
        let result = Document::builder().title("Test").embeddings(embeddings()).build();
        assert!(matches!(result, Err(DocumentBuilderError::MissingUiType)));

        let result = Document::builder().title("Test").ui_type("card").build();
        assert!(matches!(result, Err(DocumentBuilderError::MissingEmbeddings)));
    }

    #[test]
    fn test_builder_rejects_mixed_dimensions() {
        let result = Document::builder()
            .title("Test")
            .ui_type("card")
            .embeddings(DocumentEmbeddings::new(vec![1.0], vec![1.0, 0.0], vec![1.0]))
            .build();
        assert!(matches!(
            result,
            Err(DocumentBuilderError::InconsistentEmbeddings)
        ));
    }

    #[test]
    fn test_description_text() {
        let doc = Document::builder()
            .title("Card")
            .ui_type("card")
            .description("Image card")
            .keywords(vec!["bootstrap".into(), "card".into()])
            .embeddings(embeddings())
            .build()
            .unwrap();
        assert_eq!(doc.description_text(), "Card Image card bootstrap card");
    }

    #[test]
    fn test_projection_respects_include_content() {
        let doc = Document::builder()
            .title("Card")
            .ui_type("card")
            .content("<div class=\"card\"></div>")
            .embeddings(embeddings())
            .build()
            .unwrap();

        assert!(doc.to_retrieved(false).content.is_none());
        assert_eq!(
            doc.to_retrieved(true).content.as_deref(),
            Some("<div class=\"card\"></div>")
        );
    }

    #[test]
    fn test_serialization_omits_embeddings() {
        let doc = Document::builder()
            .title("Card")
            .ui_type("card")
            .embeddings(embeddings())
            .build()
            .unwrap();

        let json = serde_json::to_value(&doc).unwrap();
        assert!(json.get("embeddings").is_none());

        let back: Document = serde_json::from_value(json).unwrap();
        assert_eq!(back.id, doc.id);
        assert!(back.embeddings.description.is_empty());
    }

    #[test]
    fn test_vector_field_selects_embedding() {
        let e = embeddings();
        assert_eq!(e.get(VectorField::Description), &[1.0, 0.0]);
        assert_eq!(e.get(VectorField::Content), &[0.0, 1.0]);
        assert_eq!(e.get(VectorField::Title), &[1.0, 1.0]);
    }
}

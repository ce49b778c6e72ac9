//! Chunk, retrieval, and layout types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Flat metadata attached to every chunk of an uploaded document.
///
/// Overwritten wholesale on each upload; there is no merge with previously
/// stored metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChunkMetadata {
    /// Document ID assigned at upload time
    pub doc_id: Uuid,
    /// Uploader ID
    pub user_id: String,
    /// Original filename as uploaded
    pub filename: String,
    /// Ingestion timestamp
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl ChunkMetadata {
    /// Create metadata for a fresh upload
    pub fn new(doc_id: Uuid, user_id: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            doc_id,
            user_id: user_id.into(),
            filename: filename.into(),
            timestamp: chrono::Utc::now(),
        }
    }
}

/// A chunk of document text ready for (or retrieved from) the vector store.
///
/// Chunks are immutable once embedded and upserted; their identity is the
/// vector id minted here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentChunk {
    /// Vector id in the store
    pub id: Uuid,
    /// Chunk text
    pub content: String,
    /// Flat upload metadata
    pub metadata: ChunkMetadata,
    /// Embedding vector (empty until computed)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub embedding: Vec<f32>,
}

impl DocumentChunk {
    /// Create a chunk without an embedding
    pub fn new(content: impl Into<String>, metadata: ChunkMetadata) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: content.into(),
            metadata,
            embedding: Vec::new(),
        }
    }

    /// Attach the computed embedding
    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = embedding;
        self
    }
}

/// A document produced by retrieval or web search, consumed by generation
/// and evaluation. Lives for one request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedDocument {
    /// Document text
    pub content: String,
    /// Similarity score when retrieved from the vector store
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
    /// Chunk metadata when retrieved from the vector store
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ChunkMetadata>,
}

impl RetrievedDocument {
    /// Wrap bare text (web search results, placeholders)
    pub fn from_content(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            score: None,
            metadata: None,
        }
    }
}

/// Labels the layout model uses for image-bearing regions
const FIGURE_LABELS: &[&str] = &["Figure", "Picture"];

/// A labeled bounding region on a page image from the layout model.
///
/// Coordinates are `[x1, y1, x2, y2]` in page-image pixels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutBox {
    /// Bounding box `[x1, y1, x2, y2]`
    pub bbox: [f32; 4],
    /// Region label (e.g. "Text", "SectionHeader", "Figure", "Picture")
    pub label: String,
    /// Detection confidence
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
}

impl LayoutBox {
    /// Whether this region holds a figure/picture rather than text
    pub fn is_figure(&self) -> bool {
        FIGURE_LABELS.contains(&self.label.as_str())
    }

    /// Whether a point lies inside the box (inclusive)
    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        self.bbox[0] <= x && x <= self.bbox[2] && self.bbox[1] <= y && y <= self.bbox[3]
    }
}

/// A recognized line of text from the OCR model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextLine {
    /// Bounding box `[x1, y1, x2, y2]`
    pub bbox: [f32; 4],
    /// Recognized text
    pub text: String,
}

impl TextLine {
    /// Center point of the line's bounding box
    pub fn center(&self) -> (f32, f32) {
        (
            (self.bbox[0] + self.bbox[2]) / 2.0,
            (self.bbox[1] + self.bbox[3]) / 2.0,
        )
    }
}

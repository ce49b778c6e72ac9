//! Vector store provider trait for upsert and similarity search

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{ChunkMetadata, DocumentChunk};

/// Search result from the vector store
#[derive(Debug, Clone)]
pub struct VectorSearchResult {
    /// Vector id of the matched chunk
    pub id: String,
    /// Chunk text
    pub content: String,
    /// Similarity score (cosine, higher is more similar)
    pub score: f32,
    /// Upload metadata if present in the payload
    pub metadata: Option<ChunkMetadata>,
}

/// Trait for vector storage and similarity search
///
/// Implementations:
/// - `QdrantStore`: Qdrant REST API (named dense vector, cosine distance)
#[async_trait]
pub trait VectorStoreProvider: Send + Sync {
    /// Create the collection if it does not exist (idempotent)
    async fn ensure_collection(&self) -> Result<()>;

    /// Upsert chunks with their embeddings
    async fn upsert(&self, chunks: &[DocumentChunk]) -> Result<()>;

    /// Search for similar chunks.
    ///
    /// `score_threshold` is applied by the store itself, so every returned
    /// hit already cleared it.
    async fn search(
        &self,
        query_embedding: &[f32],
        top_k: usize,
        score_threshold: Option<f32>,
    ) -> Result<Vec<VectorSearchResult>>;

    /// Approximate number of vectors stored
    async fn count(&self) -> Result<usize>;

    /// Check if the store is reachable
    async fn health_check(&self) -> Result<bool>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}

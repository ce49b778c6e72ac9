//! Application state for the RAG server

use parking_lot::RwLock;
use std::sync::Arc;

use crate::agents::AgentGraph;
use crate::config::RagConfig;
use crate::error::Result;
use crate::ingestion::IngestPipeline;
use crate::providers::{
    EmbeddingProvider, LlmProvider, OcrProvider, OllamaClient, OllamaEmbedder, OllamaLlm,
    OllamaVision, QdrantStore, SerpApiClient, SuryaClient, VectorStoreProvider, VisionProvider,
    WebSearchProvider,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: RagConfig,
    /// Embedding provider
    embedder: Arc<dyn EmbeddingProvider>,
    /// Chat LLM provider
    llm: Arc<dyn LlmProvider>,
    /// Vision captioning provider
    vision: Arc<dyn VisionProvider>,
    /// Layout/OCR provider
    ocr: Arc<dyn OcrProvider>,
    /// Vector store provider
    vector_store: Arc<dyn VectorStoreProvider>,
    /// Web search provider
    web_search: Arc<dyn WebSearchProvider>,
    /// Ready state
    ready: RwLock<bool>,
}

impl AppState {
    /// Create new application state, wiring every provider from config
    pub fn new(config: RagConfig) -> Result<Self> {
        tracing::info!("Initializing application state...");

        let ollama = Arc::new(OllamaClient::new(&config.llm)?);
        tracing::info!(
            "Ollama client initialized (embed: {}, generate: {}, vision: {})",
            config.llm.embed_model,
            config.llm.generate_model,
            config.llm.vision_model
        );

        let embedder: Arc<dyn EmbeddingProvider> = Arc::new(OllamaEmbedder::new(
            Arc::clone(&ollama),
            config.qdrant.vector_size,
        ));
        let llm: Arc<dyn LlmProvider> = Arc::new(OllamaLlm::new(
            Arc::clone(&ollama),
            config.llm.generate_model.clone(),
        ));
        let vision: Arc<dyn VisionProvider> = Arc::new(OllamaVision::new(
            Arc::clone(&ollama),
            config.llm.vision_model.clone(),
        ));

        let vector_store: Arc<dyn VectorStoreProvider> =
            Arc::new(QdrantStore::new(config.qdrant.clone())?);
        tracing::info!(
            "Qdrant store initialized (collection: {})",
            config.qdrant.collection
        );

        let ocr: Arc<dyn OcrProvider> = Arc::new(SuryaClient::new(config.ocr.clone())?);
        let web_search: Arc<dyn WebSearchProvider> =
            Arc::new(SerpApiClient::new(config.web_search.clone())?);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                embedder,
                llm,
                vision,
                ocr,
                vector_store,
                web_search,
                ready: RwLock::new(true),
            }),
        })
    }

    /// Get configuration
    pub fn config(&self) -> &RagConfig {
        &self.inner.config
    }

    /// Get the vector store provider
    pub fn vector_store(&self) -> &Arc<dyn VectorStoreProvider> {
        &self.inner.vector_store
    }

    /// Build the query orchestration graph over the shared providers
    pub fn graph(&self) -> AgentGraph {
        AgentGraph::new(
            Arc::clone(&self.inner.embedder),
            Arc::clone(&self.inner.vector_store),
            Arc::clone(&self.inner.llm),
            Arc::clone(&self.inner.web_search),
            &self.inner.config,
        )
    }

    /// Build the ingestion pipeline over the shared providers
    pub fn pipeline(&self) -> IngestPipeline {
        IngestPipeline::new(
            &self.inner.config,
            Arc::clone(&self.inner.embedder),
            Arc::clone(&self.inner.vector_store),
            Arc::clone(&self.inner.ocr),
            Arc::clone(&self.inner.vision),
        )
    }

    /// Check if the server is ready
    pub fn is_ready(&self) -> bool {
        *self.inner.ready.read()
    }

    /// Set ready state
    pub fn set_ready(&self, ready: bool) {
        *self.inner.ready.write() = ready;
    }
}

//! Provider abstractions for the external services the pipeline delegates to
//!
//! Every model inference and storage capability — embeddings, chat
//! completion, vision captioning, layout/OCR, vector search, web search —
//! sits behind a trait with an HTTP implementation.

pub mod embedding;
pub mod llm;
pub mod ocr;
pub mod ollama;
pub mod qdrant;
pub mod serpapi;
pub mod surya;
pub mod vector_store;
pub mod vision;
pub mod web_search;

pub use embedding::EmbeddingProvider;
pub use llm::LlmProvider;
pub use ocr::OcrProvider;
pub use ollama::{OllamaClient, OllamaEmbedder, OllamaLlm, OllamaVision};
pub use qdrant::QdrantStore;
pub use serpapi::SerpApiClient;
pub use surya::SuryaClient;
pub use vector_store::{VectorSearchResult, VectorStoreProvider};
pub use vision::VisionProvider;
pub use web_search::WebSearchProvider;

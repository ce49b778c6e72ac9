//! Configuration for the RAG service

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Main service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RagConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Ollama/LLM configuration
    #[serde(default)]
    pub llm: LlmConfig,
    /// Chunking configuration
    #[serde(default)]
    pub chunking: ChunkingConfig,
    /// Qdrant vector store configuration
    #[serde(default)]
    pub qdrant: QdrantConfig,
    /// Query routing configuration
    #[serde(default)]
    pub router: RouterConfig,
    /// Web search (SerpApi) configuration
    #[serde(default)]
    pub web_search: WebSearchConfig,
    /// Layout/OCR inference service configuration
    #[serde(default)]
    pub ocr: OcrConfig,
    /// Ingestion pipeline configuration
    #[serde(default)]
    pub ingestion: IngestionConfig,
}

impl RagConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse config file: {}", e)))
    }

    /// Load from the path in `AGENTIC_RAG_CONFIG`, or fall back to defaults
    pub fn load_or_default() -> Self {
        match std::env::var("AGENTIC_RAG_CONFIG") {
            Ok(path) => match Self::load(&path) {
                Ok(config) => {
                    tracing::info!("Loaded configuration from {}", path);
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}, using defaults", path, e);
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
    /// Maximum upload size in bytes (default: 50MB)
    pub max_upload_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            enable_cors: true,
            max_upload_size: 50 * 1024 * 1024, // 50MB
        }
    }
}

/// Ollama configuration for embeddings, generation, and vision captioning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Ollama base URL
    pub base_url: String,
    /// Embedding model name (384 dimensions)
    pub embed_model: String,
    /// Generation model name
    pub generate_model: String,
    /// Vision captioning model name
    pub vision_model: String,
    /// Temperature for answer generation
    pub temperature: f32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Number of retries for failed requests
    pub max_retries: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: std::env::var("OLLAMA_URL")
                .unwrap_or_else(|_| "http://localhost:11434".to_string()),
            embed_model: "all-minilm".to_string(),
            generate_model: "llama3.2:3b".to_string(),
            vision_model: "qwen2.5vl:3b".to_string(),
            temperature: 0.1,
            timeout_secs: 120,
            max_retries: 2,
        }
    }
}

/// Text chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Target chunk size in characters
    pub chunk_size: usize,
    /// Overlap between chunks in characters
    pub chunk_overlap: usize,
    /// Minimum chunk size (skip smaller chunks)
    pub min_chunk_size: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 600,
            chunk_overlap: 200,
            min_chunk_size: 50,
        }
    }
}

/// Qdrant vector store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QdrantConfig {
    /// Qdrant base URL
    pub url: String,
    /// API key (optional)
    #[serde(default)]
    pub api_key: Option<String>,
    /// Collection name
    pub collection: String,
    /// Named vector used in the collection
    pub vector_name: String,
    /// Embedding dimensions
    pub vector_size: usize,
    /// Upsert batch size
    pub batch_size: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for QdrantConfig {
    fn default() -> Self {
        Self {
            url: std::env::var("QDRANT_URL")
                .unwrap_or_else(|_| "http://localhost:6333".to_string()),
            api_key: std::env::var("QDRANT_API_KEY").ok(),
            collection: "AgenticRag".to_string(),
            vector_name: "dense".to_string(),
            vector_size: 384,
            batch_size: 150,
            timeout_secs: 30,
        }
    }
}

/// Query routing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Minimum similarity for a hit to count during routing (applied by the store)
    pub score_threshold: f32,
    /// Number of chunks fetched by the retrieval node
    pub retrieval_top_k: usize,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            score_threshold: 0.5,
            retrieval_top_k: 3,
        }
    }
}

/// Web search (SerpApi) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSearchConfig {
    /// Search API endpoint
    pub endpoint: String,
    /// API key (from `SERPAPI_API_KEY` if unset)
    #[serde(default)]
    pub api_key: Option<String>,
    /// Search engine parameter
    pub engine: String,
    /// Number of results requested from the API
    pub result_count: usize,
    /// Number of snippets kept for generation context
    pub snippet_limit: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for WebSearchConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://serpapi.com/search.json".to_string(),
            api_key: std::env::var("SERPAPI_API_KEY").ok(),
            engine: "google".to_string(),
            result_count: 5,
            snippet_limit: 3,
            timeout_secs: 10,
        }
    }
}

/// Layout/OCR inference service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrConfig {
    /// Base URL of the Surya-compatible inference service
    pub base_url: String,
    /// Request timeout in seconds (model inference can be slow)
    pub timeout_secs: u64,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            base_url: std::env::var("SURYA_URL")
                .unwrap_or_else(|_| "http://localhost:8501".to_string()),
            timeout_secs: 120,
        }
    }
}

/// Ingestion pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestionConfig {
    /// Directory where page images are written
    pub upload_dir: PathBuf,
    /// Render resolution for PDF page images
    pub render_dpi: u32,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("uploads"),
            render_dpi: 150,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_consistent() {
        let config = RagConfig::default();
        assert_eq!(config.qdrant.vector_size, 384);
        assert_eq!(config.chunking.chunk_size, 600);
        assert!(config.chunking.chunk_overlap < config.chunking.chunk_size);
        assert_eq!(config.router.retrieval_top_k, 3);
    }

    #[test]
    fn parses_partial_toml() {
        let config: RagConfig = toml::from_str(
            r#"
            [server]
            host = "127.0.0.1"
            port = 9000
            enable_cors = false
            max_upload_size = 1048576

            [router]
            score_threshold = 0.7
            retrieval_top_k = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.router.retrieval_top_k, 5);
        // Untouched sections fall back to defaults
        assert_eq!(config.chunking.chunk_overlap, 200);
    }
}

//! agentic-rag: Agentic RAG service with query routing and PDF ingestion
//!
//! A question-answering service that routes each query between a local
//! vector index and live web search, generates a grounded answer with an
//! LLM, and self-evaluates the result. Documents enter the index through a
//! layout-aware PDF pipeline that OCRs page text and captions figures with
//! a vision model.

pub mod agents;
pub mod config;
pub mod error;
pub mod ingestion;
pub mod providers;
pub mod server;
pub mod types;

pub use config::RagConfig;
pub use error::{Error, Result};
pub use types::{
    query::ChatRequest,
    response::{ChatResponse, ChatStatus, EvalResult, UploadResponse},
};

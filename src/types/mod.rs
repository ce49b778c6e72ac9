//! Shared types: chunks, layout regions, and wire formats

pub mod document;
pub mod query;
pub mod response;

pub use document::{ChunkMetadata, DocumentChunk, LayoutBox, RetrievedDocument, TextLine};
pub use query::ChatRequest;
pub use response::{ChatResponse, ChatStatus, EvalResult, UploadResponse};

//! Document ingestion: PDF rendering, layout-aware text extraction,
//! chunking, and figure captioning

pub mod chunker;
pub mod pdf;
pub mod pipeline;
pub mod regions;

pub use chunker::TextChunker;
pub use pdf::PdfRenderer;
pub use pipeline::{IngestOutcome, IngestPipeline};

//! PDF ingestion pipeline
//!
//! Renders an uploaded PDF to page images, runs layout detection and OCR
//! over each page, chunks and embeds the non-figure text, and captions the
//! figure regions with the vision model. Chunks and captions share the
//! collection so retrieval sees both.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::RagConfig;
use crate::error::{Error, Result};
use crate::ingestion::chunker::TextChunker;
use crate::ingestion::pdf::PdfRenderer;
use crate::ingestion::regions;
use crate::providers::{EmbeddingProvider, OcrProvider, VectorStoreProvider, VisionProvider};
use crate::types::{ChunkMetadata, DocumentChunk};

/// Result of a completed ingestion run
#[derive(Debug, Clone)]
pub struct IngestOutcome {
    /// Directory holding the rendered page images
    pub image_dir: PathBuf,
    /// Captions produced for figure regions, in page order
    pub captions: Vec<String>,
    /// Number of pages processed
    pub pages: usize,
    /// Number of chunks (text and captions) upserted
    pub chunks_upserted: usize,
}

/// Document ingestion pipeline
pub struct IngestPipeline {
    embedder: Arc<dyn EmbeddingProvider>,
    vector_store: Arc<dyn VectorStoreProvider>,
    ocr: Arc<dyn OcrProvider>,
    vision: Arc<dyn VisionProvider>,
    chunker: TextChunker,
    renderer: PdfRenderer,
    upload_dir: PathBuf,
}

impl IngestPipeline {
    /// Build the pipeline from configuration and providers
    pub fn new(
        config: &RagConfig,
        embedder: Arc<dyn EmbeddingProvider>,
        vector_store: Arc<dyn VectorStoreProvider>,
        ocr: Arc<dyn OcrProvider>,
        vision: Arc<dyn VisionProvider>,
    ) -> Self {
        Self {
            embedder,
            vector_store,
            ocr,
            vision,
            chunker: TextChunker::new(&config.chunking),
            renderer: PdfRenderer::new(config.ingestion.render_dpi),
            upload_dir: config.ingestion.upload_dir.clone(),
        }
    }

    /// Ingest an uploaded PDF end to end.
    ///
    /// Page images land under `{upload_dir}/{doc_id}/` and stay on disk
    /// after ingestion completes.
    pub async fn ingest(&self, pdf: &[u8], filename: &str, user_id: &str) -> Result<IngestOutcome> {
        let doc_id = Uuid::new_v4();
        let metadata = ChunkMetadata::new(doc_id, user_id, filename);

        info!(%doc_id, filename, "Starting PDF ingestion");
        self.vector_store.ensure_collection().await?;

        let image_dir = self.upload_dir.join(doc_id.to_string());
        let pages = self.renderer.render(pdf, &image_dir).await?;
        info!(%doc_id, pages = pages.len(), "Rendered PDF pages");

        let mut captions = Vec::new();
        let mut chunks_upserted = 0;

        for (index, page_path) in pages.iter().enumerate() {
            let page_number = index + 1;
            let (page_chunks, page_captions) =
                self.process_page(page_path, page_number, &metadata).await?;
            chunks_upserted += page_chunks;
            captions.extend(page_captions);
        }

        info!(
            %doc_id,
            pages = pages.len(),
            chunks = chunks_upserted,
            captions = captions.len(),
            "Ingestion complete"
        );

        Ok(IngestOutcome {
            image_dir,
            captions,
            pages: pages.len(),
            chunks_upserted,
        })
    }

    /// Process one rendered page: layout, OCR, chunk upsert, figure captions.
    /// Returns the number of chunks upserted and the captions produced.
    async fn process_page(
        &self,
        page_path: &Path,
        page_number: usize,
        metadata: &ChunkMetadata,
    ) -> Result<(usize, Vec<String>)> {
        let png = tokio::fs::read(page_path).await?;

        let boxes = self.ocr.detect_layout(&png).await?;
        let lines = self.ocr.recognize(&png).await?;
        debug!(
            page = page_number,
            regions = boxes.len(),
            lines = lines.len(),
            "Page analyzed"
        );

        let text = regions::page_text(&lines, &boxes);
        let mut upserted = 0;

        if text.is_empty() {
            warn!(page = page_number, "No text extracted from page");
        } else {
            let chunks = self.chunker.chunk(&text);
            upserted += self.embed_and_upsert(chunks, metadata).await?;
        }

        let mut captions = Vec::new();
        let figures = regions::figure_boxes(&boxes);
        if !figures.is_empty() {
            let page_image = image::load_from_memory(&png)?;
            for figure in figures {
                let jpeg = regions::crop_figure(&page_image, &figure.bbox)?;
                let caption = self.vision.caption(&jpeg).await?;
                debug!(page = page_number, caption_len = caption.len(), "Figure captioned");

                self.embed_and_upsert(vec![caption.clone()], metadata).await?;
                upserted += 1;
                captions.push(caption);
            }
        }

        Ok((upserted, captions))
    }

    /// Embed a batch of texts and upsert them as chunks
    async fn embed_and_upsert(
        &self,
        texts: Vec<String>,
        metadata: &ChunkMetadata,
    ) -> Result<usize> {
        if texts.is_empty() {
            return Ok(0);
        }

        let embeddings = self.embedder.embed_batch(&texts).await?;
        if embeddings.len() != texts.len() {
            return Err(Error::Embedding(format!(
                "Expected {} embeddings, got {}",
                texts.len(),
                embeddings.len()
            )));
        }

        let chunks: Vec<DocumentChunk> = texts
            .into_iter()
            .zip(embeddings)
            .map(|(text, embedding)| {
                DocumentChunk::new(text, metadata.clone()).with_embedding(embedding)
            })
            .collect();

        let count = chunks.len();
        self.vector_store.upsert(&chunks).await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;

    use crate::providers::VectorSearchResult;
    use crate::types::{LayoutBox, TextLine};

    struct MockEmbedder;

    #[async_trait]
    impl EmbeddingProvider for MockEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Ok(vec![0.1; 384])
        }

        fn dimensions(&self) -> usize {
            384
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        fn name(&self) -> &str {
            "mock-embedder"
        }
    }

    #[derive(Default)]
    struct MockStore {
        upserts: Mutex<Vec<Vec<DocumentChunk>>>,
        ensure_calls: Mutex<usize>,
    }

    #[async_trait]
    impl VectorStoreProvider for MockStore {
        async fn ensure_collection(&self) -> Result<()> {
            *self.ensure_calls.lock() += 1;
            Ok(())
        }

        async fn upsert(&self, chunks: &[DocumentChunk]) -> Result<()> {
            self.upserts.lock().push(chunks.to_vec());
            Ok(())
        }

        async fn search(
            &self,
            _query_embedding: &[f32],
            _top_k: usize,
            _score_threshold: Option<f32>,
        ) -> Result<Vec<VectorSearchResult>> {
            Ok(Vec::new())
        }

        async fn count(&self) -> Result<usize> {
            Ok(self.upserts.lock().iter().map(|b| b.len()).sum())
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        fn name(&self) -> &str {
            "mock-store"
        }
    }

    /// One text region covering the top half, one figure in the bottom half
    struct MockOcr;

    #[async_trait]
    impl OcrProvider for MockOcr {
        async fn detect_layout(&self, _png: &[u8]) -> Result<Vec<LayoutBox>> {
            Ok(vec![
                LayoutBox {
                    bbox: [0.0, 0.0, 200.0, 100.0],
                    label: "Text".to_string(),
                    confidence: Some(0.95),
                },
                LayoutBox {
                    bbox: [0.0, 100.0, 200.0, 200.0],
                    label: "Figure".to_string(),
                    confidence: Some(0.9),
                },
            ])
        }

        async fn recognize(&self, _png: &[u8]) -> Result<Vec<TextLine>> {
            Ok(vec![
                TextLine {
                    bbox: [0.0, 0.0, 200.0, 20.0],
                    text: "This page describes the quarterly revenue figures in detail."
                        .to_string(),
                },
                TextLine {
                    bbox: [0.0, 150.0, 200.0, 160.0],
                    text: "axis label inside the figure".to_string(),
                },
            ])
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        fn name(&self) -> &str {
            "mock-ocr"
        }
    }

    struct MockVision;

    #[async_trait]
    impl VisionProvider for MockVision {
        async fn caption(&self, _jpeg: &[u8]) -> Result<String> {
            Ok("A bar chart of quarterly revenue.".to_string())
        }

        fn name(&self) -> &str {
            "mock-vision"
        }
    }

    fn pipeline_with(store: Arc<MockStore>) -> IngestPipeline {
        let mut config = RagConfig::default();
        config.chunking.min_chunk_size = 10;
        IngestPipeline::new(
            &config,
            Arc::new(MockEmbedder),
            store,
            Arc::new(MockOcr),
            Arc::new(MockVision),
        )
    }

    async fn write_test_page(dir: &Path) -> PathBuf {
        let page = image::DynamicImage::ImageRgba8(image::RgbaImage::new(200, 200));
        let path = dir.join("page-1.png");
        let mut buffer = std::io::Cursor::new(Vec::new());
        page.write_to(&mut buffer, image::ImageFormat::Png).unwrap();
        tokio::fs::write(&path, buffer.into_inner()).await.unwrap();
        path
    }

    #[tokio::test]
    async fn page_produces_text_chunk_and_figure_caption() {
        let store = Arc::new(MockStore::default());
        let pipeline = pipeline_with(store.clone());

        let dir = tempfile::tempdir().unwrap();
        let page = write_test_page(dir.path()).await;

        let metadata = ChunkMetadata::new(Uuid::new_v4(), "anonymous", "report.pdf");
        let (upserted, captions) = pipeline.process_page(&page, 1, &metadata).await.unwrap();

        assert_eq!(upserted, 2);
        assert_eq!(captions, vec!["A bar chart of quarterly revenue."]);

        // One upsert for the page text, one for the caption
        let upserts = store.upserts.lock();
        assert_eq!(upserts.len(), 2);
        assert!(upserts[0][0].content.contains("quarterly revenue figures"));
        // Figure-internal OCR lines are excluded from the page text
        assert!(!upserts[0][0].content.contains("axis label"));
        assert_eq!(upserts[1][0].content, "A bar chart of quarterly revenue.");
    }

    #[tokio::test]
    async fn chunks_carry_upload_metadata_and_embeddings() {
        let store = Arc::new(MockStore::default());
        let pipeline = pipeline_with(store.clone());

        let dir = tempfile::tempdir().unwrap();
        let page = write_test_page(dir.path()).await;

        let doc_id = Uuid::new_v4();
        let metadata = ChunkMetadata::new(doc_id, "user-7", "report.pdf");
        pipeline.process_page(&page, 1, &metadata).await.unwrap();

        for batch in store.upserts.lock().iter() {
            for chunk in batch {
                assert_eq!(chunk.metadata.doc_id, doc_id);
                assert_eq!(chunk.metadata.user_id, "user-7");
                assert_eq!(chunk.metadata.filename, "report.pdf");
                assert_eq!(chunk.embedding.len(), 384);
            }
        }
    }

    #[tokio::test]
    async fn store_failure_propagates() {
        struct FailingStore;

        #[async_trait]
        impl VectorStoreProvider for FailingStore {
            async fn ensure_collection(&self) -> Result<()> {
                Ok(())
            }

            async fn upsert(&self, _chunks: &[DocumentChunk]) -> Result<()> {
                Err(Error::VectorDb("connection refused".to_string()))
            }

            async fn search(
                &self,
                _query_embedding: &[f32],
                _top_k: usize,
                _score_threshold: Option<f32>,
            ) -> Result<Vec<VectorSearchResult>> {
                Ok(Vec::new())
            }

            async fn count(&self) -> Result<usize> {
                Ok(0)
            }

            async fn health_check(&self) -> Result<bool> {
                Ok(false)
            }

            fn name(&self) -> &str {
                "failing-store"
            }
        }

        let mut config = RagConfig::default();
        config.chunking.min_chunk_size = 10;
        let pipeline = IngestPipeline::new(
            &config,
            Arc::new(MockEmbedder),
            Arc::new(FailingStore),
            Arc::new(MockOcr),
            Arc::new(MockVision),
        );

        let dir = tempfile::tempdir().unwrap();
        let page = write_test_page(dir.path()).await;

        let metadata = ChunkMetadata::new(Uuid::new_v4(), "anonymous", "report.pdf");
        let result = pipeline.process_page(&page, 1, &metadata).await;
        assert!(matches!(result, Err(Error::VectorDb(_))));
    }

    #[tokio::test]
    async fn empty_upsert_batch_is_a_no_op() {
        let store = Arc::new(MockStore::default());
        let pipeline = pipeline_with(store.clone());

        let metadata = ChunkMetadata::new(Uuid::new_v4(), "anonymous", "report.pdf");
        let count = pipeline.embed_and_upsert(Vec::new(), &metadata).await.unwrap();

        assert_eq!(count, 0);
        assert!(store.upserts.lock().is_empty());
    }
}

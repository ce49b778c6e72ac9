//! Layout detection and OCR provider trait

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{LayoutBox, TextLine};

/// Trait for layout detection and text recognition on page images.
///
/// Implementations:
/// - `SuryaClient`: HTTP client for a Surya-compatible inference service
#[async_trait]
pub trait OcrProvider: Send + Sync {
    /// Run layout detection on a PNG page image, returning all bounding boxes
    async fn detect_layout(&self, png: &[u8]) -> Result<Vec<LayoutBox>>;

    /// Run text recognition over the full page image
    async fn recognize(&self, png: &[u8]) -> Result<Vec<TextLine>>;

    /// Check if the service is reachable
    async fn health_check(&self) -> Result<bool>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}

//! Vision provider trait for figure captioning

use async_trait::async_trait;

use crate::error::Result;

/// Trait for captioning a cropped figure image.
///
/// Implementations receive JPEG-encoded bytes and return the model's
/// description of what is visibly present in the image.
#[async_trait]
pub trait VisionProvider: Send + Sync {
    /// Caption a JPEG-encoded image
    async fn caption(&self, jpeg: &[u8]) -> Result<String>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}

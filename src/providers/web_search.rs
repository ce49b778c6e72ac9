//! Web search provider trait

use async_trait::async_trait;

use crate::error::Result;

/// Trait for external web search.
///
/// Implementations:
/// - `SerpApiClient`: SerpApi JSON endpoint (Google engine)
#[async_trait]
pub trait WebSearchProvider: Send + Sync {
    /// Search the web, returning result snippets in rank order
    async fn search(&self, query: &str) -> Result<Vec<String>>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}

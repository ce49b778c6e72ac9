//! LLM provider trait for chat completion

use async_trait::async_trait;

use crate::error::Result;

/// Trait for prompt-in/text-out chat completion.
///
/// Both the generation node and the evaluation node go through this seam;
/// evaluation pins the temperature to 0.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate a completion for a prompt
    async fn generate(&self, prompt: &str, temperature: f32) -> Result<String>;

    /// Check if the provider is healthy and available
    async fn health_check(&self) -> Result<bool>;

    /// Get provider name for logging
    fn name(&self) -> &str;

    /// Get the model being used
    fn model(&self) -> &str;
}

//! Generator trait for prompt completion

use async_trait::async_trait;
use crate::error::Result;

/// Trait for a generative language model
///
/// Implementations:
/// - `OllamaGenerator`: Local Ollama server
/// - `GeminiGenerator`: Google Gemini API
///
/// Failures should be reported as `Error::Generation`.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Complete a prompt, returning the model text
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Get provider name for logging
    fn name(&self) -> &str;

    /// Get the model being used
    fn model(&self) -> &str;
}

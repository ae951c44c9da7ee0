// Remote model access
//
// The conversation driver talks to the model only through the LlmProvider
// trait, so the remote service stays an opaque collaborator.

use anyhow::Result;
use async_trait::async_trait;

pub mod gemini;
pub mod types;

// Re-export commonly used types
pub use gemini::GeminiProvider;
pub use types::{
    Candidate, Message, ModelContent, ModelPart, ProviderRequest, ProviderResponse, TokenUsage,
};

/// Trait for LLM providers
///
/// One call per round. Any error is treated by the caller as a transient
/// remote failure.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send the full history and tool set, wait for the complete reply
    async fn generate(&self, request: &ProviderRequest<'_>) -> Result<ProviderResponse>;

    /// Get the provider name (e.g., "gemini")
    fn name(&self) -> &str;

    /// Model the provider sends requests to
    fn model(&self) -> &str;
}

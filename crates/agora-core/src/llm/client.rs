//! GenerationClient trait definition.
//!
//! The turn engine only needs one call: system preamble plus user prompt
//! in, text out. Implementations (e.g., `OllamaClient`) live in agora-infra.

use agora_types::llm::{GenerationOptions, LlmError};

/// Trait for text-generation backends.
pub trait GenerationClient: Send + Sync {
    /// Human-readable backend name (e.g., "ollama").
    fn name(&self) -> &str;

    /// Generate a completion.
    ///
    /// `options` of `None` means "use the backend's defaults". Transport
    /// failures, timeouts and non-success responses are errors; an empty
    /// completion is returned as an empty string.
    fn generate(
        &self,
        system: &str,
        prompt: &str,
        options: Option<&GenerationOptions>,
    ) -> impl std::future::Future<Output = Result<String, LlmError>> + Send;
}

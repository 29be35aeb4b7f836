//! Embedder trait for text-to-vector conversion.
//!
//! Implementations (e.g., Ollama embeddings) live in agora-infra.

use agora_types::error::MemoryError;

/// Trait for converting text into embedding vectors.
pub trait Embedder: Send + Sync {
    /// Embed one or more texts. Returns one vector per input text.
    fn embed(
        &self,
        texts: &[String],
    ) -> impl std::future::Future<Output = Result<Vec<Vec<f32>>, MemoryError>> + Send;

    /// The model name used for embeddings (e.g., "nomic-embed-text").
    fn model_name(&self) -> &str;
}

/// Cosine similarity of two vectors. Mismatched or zero-length vectors score 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

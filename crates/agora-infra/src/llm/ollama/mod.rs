//! Ollama backend: text generation and embeddings over the local HTTP API.

pub mod client;
pub mod embedder;
pub mod types;

pub use client::OllamaClient;
pub use embedder::OllamaEmbedder;

//! Infrastructure layer for Agora.
//!
//! Contains implementations of the ports defined in `agora-core`: SQLite
//! repositories and memory store, the Ollama generation client and embedder,
//! and the configuration loader.

pub mod config;
pub mod llm;
pub mod sqlite;

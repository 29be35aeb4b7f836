//! Generation backends.

pub mod ollama;

//! Generation request options and backend errors.

use serde::{Deserialize, Serialize};

/// Sampling options for a single generation call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Upper bound on generated tokens.
    pub max_output_tokens: u32,
    pub temperature: f64,
}

/// Errors from the text-generation backend.
///
/// Any of these aborts the turn before a message is persisted. Empty output
/// is not an error and never shows up here.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("provider error: {message}")]
    Provider { message: String },

    #[error("backend returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("generation timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("deserialization error: {0}")]
    Deserialization(String),
}

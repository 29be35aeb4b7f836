//! Global configuration types for Agora.
//!
//! `AgoraConfig` represents the top-level `config.toml` that controls the
//! generation backend, per-mode sampling knobs and transcript windows.

use serde::{Deserialize, Serialize};

use crate::llm::GenerationOptions;
use crate::scenario::ScenarioMode;

/// Top-level configuration.
///
/// Loaded from `~/.agora/config.toml`. All fields have sensible defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgoraConfig {
    /// Number of most recent messages included in a turn prompt.
    #[serde(default = "default_history_window")]
    pub history_window: usize,

    /// Number of most recent non-empty messages shown to the judge.
    #[serde(default = "default_judge_window")]
    pub judge_window: usize,

    /// Memories recalled per turn.
    #[serde(default = "default_recall_top_k")]
    pub recall_top_k: usize,

    #[serde(default)]
    pub ollama: OllamaConfig,

    #[serde(default)]
    pub generation: GenerationConfig,
}

fn default_history_window() -> usize {
    12
}

fn default_judge_window() -> usize {
    5
}

fn default_recall_top_k() -> usize {
    3
}

impl Default for AgoraConfig {
    fn default() -> Self {
        Self {
            history_window: default_history_window(),
            judge_window: default_judge_window(),
            recall_top_k: default_recall_top_k(),
            ollama: OllamaConfig::default(),
            generation: GenerationConfig::default(),
        }
    }
}

/// Connection settings for the local Ollama server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    #[serde(default = "default_ollama_host")]
    pub host: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Model used by the memory store to embed replies and queries.
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,
    /// Request timeout; the only abort mechanism for a generation call.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_ollama_host() -> String {
    "http://localhost:11434".to_string()
}

fn default_model() -> String {
    "mistral".to_string()
}

fn default_embedding_model() -> String {
    "nomic-embed-text".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: default_ollama_host(),
            model: default_model(),
            embedding_model: default_embedding_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Sampling knobs per scenario mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_mode_options")]
    pub default: GenerationOptions,
    #[serde(default = "short_mode_options")]
    pub short: GenerationOptions,
}

fn default_mode_options() -> GenerationOptions {
    GenerationOptions {
        max_output_tokens: 256,
        temperature: 0.7,
    }
}

fn short_mode_options() -> GenerationOptions {
    GenerationOptions {
        max_output_tokens: 60,
        temperature: 0.9,
    }
}

impl GenerationConfig {
    /// Options for a given template family.
    pub fn for_mode(&self, mode: ScenarioMode) -> GenerationOptions {
        match mode {
            ScenarioMode::Default => self.default,
            ScenarioMode::Short => self.short,
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            default: default_mode_options(),
            short: short_mode_options(),
        }
    }
}

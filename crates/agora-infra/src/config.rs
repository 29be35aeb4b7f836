//! Configuration loader for Agora.
//!
//! Reads `config.toml` from the data directory (`~/.agora/` by default) and
//! deserializes it into [`AgoraConfig`]. Falls back to defaults when the file
//! is missing or malformed, then applies environment overrides.

use std::path::{Path, PathBuf};

use agora_types::config::AgoraConfig;

/// Overrides the Ollama server URL.
pub const ENV_OLLAMA_HOST: &str = "OLLAMA_HOST";
/// Overrides the generation model.
pub const ENV_MODEL: &str = "MODEL";
/// Overrides the data directory.
pub const ENV_DATA_DIR: &str = "AGORA_DATA_DIR";

/// Resolve the data directory.
///
/// Priority:
/// 1. `AGORA_DATA_DIR` environment variable
/// 2. `~/.agora`
/// 3. `.agora` in the current directory
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(ENV_DATA_DIR) {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".agora");
    }

    PathBuf::from(".agora")
}

/// Load configuration from `{data_dir}/config.toml` plus environment
/// overrides.
///
/// - Missing file: defaults.
/// - Unreadable or unparsable file: logs a warning, defaults.
pub async fn load_config(data_dir: &Path) -> AgoraConfig {
    let config = read_config_file(data_dir).await;
    apply_env_overrides(config, |key| std::env::var(key).ok())
}

async fn read_config_file(data_dir: &Path) -> AgoraConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return AgoraConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return AgoraConfig::default();
        }
    };

    match toml::from_str::<AgoraConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            AgoraConfig::default()
        }
    }
}

/// Apply `OLLAMA_HOST` and `MODEL` from `lookup`. Blank values are ignored.
pub fn apply_env_overrides(
    mut config: AgoraConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> AgoraConfig {
    let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(host) = non_blank(ENV_OLLAMA_HOST) {
        config.ollama.host = normalize_host(&host);
    }
    if let Some(model) = non_blank(ENV_MODEL) {
        config.ollama.model = model.trim().to_string();
    }
    config
}

/// Ollama's own `OLLAMA_HOST` convention allows a bare `host:port`.
fn normalize_host(host: &str) -> String {
    let host = host.trim().trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("http://{host}")
    }
}

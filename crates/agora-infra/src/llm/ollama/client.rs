//! OllamaClient -- concrete [`GenerationClient`] for a local Ollama server.
//!
//! Sends non-streaming requests to `/api/generate`. The reqwest client
//! carries the configured timeout, which is the only way an in-flight
//! generation is aborted.

use std::time::Duration;

use agora_core::llm::client::GenerationClient;
use agora_observe::genai_attrs;
use agora_types::config::OllamaConfig;
use agora_types::llm::{GenerationOptions, LlmError};
use tracing::Instrument;

use super::types::{GenerateOptions, GenerateRequest, GenerateResponse, VersionResponse};

/// Ollama text-generation client.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    timeout_secs: u64,
}

impl OllamaClient {
    pub fn new(config: &OllamaConfig) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LlmError::Provider {
                message: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            base_url: config.host.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            timeout_secs: config.timeout_secs,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn transport_error(&self, e: reqwest::Error) -> LlmError {
        if e.is_timeout() {
            LlmError::Timeout {
                timeout_secs: self.timeout_secs,
            }
        } else {
            LlmError::Provider {
                message: format!("HTTP request failed: {e}"),
            }
        }
    }

    /// Server version from `/api/version`, `None` when unreachable.
    pub async fn health_check(&self) -> Option<String> {
        let response = self.client.get(self.url("/api/version")).send().await.ok()?;
        if !response.status().is_success() {
            return None;
        }
        response
            .json::<VersionResponse>()
            .await
            .ok()
            .map(|v| v.version)
    }
}

impl GenerationClient for OllamaClient {
    fn name(&self) -> &str {
        genai_attrs::PROVIDER_OLLAMA
    }

    async fn generate(
        &self,
        system: &str,
        prompt: &str,
        options: Option<&GenerationOptions>,
    ) -> Result<String, LlmError> {
        let body = GenerateRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            system: (!system.is_empty()).then(|| system.to_string()),
            stream: false,
            options: options.map(|o| GenerateOptions {
                num_predict: o.max_output_tokens,
                temperature: o.temperature,
            }),
        };

        let span = tracing::info_span!(
            "gen_ai.generate",
            otel.name = %genai_attrs::span_name(genai_attrs::OP_GENERATE, &self.model),
            gen_ai.operation.name = genai_attrs::OP_GENERATE,
            gen_ai.provider.name = genai_attrs::PROVIDER_OLLAMA,
            gen_ai.request.model = %self.model,
            gen_ai.request.max_tokens = options.map(|o| o.max_output_tokens),
            gen_ai.request.temperature = options.map(|o| o.temperature),
            gen_ai.usage.output_tokens = tracing::field::Empty,
        );

        async {
            let response = self
                .client
                .post(self.url("/api/generate"))
                .json(&body)
                .send()
                .await
                .map_err(|e| self.transport_error(e))?;

            let status = response.status();
            if !status.is_success() {
                let error_body = response.text().await.unwrap_or_default();
                return Err(LlmError::Http {
                    status: status.as_u16(),
                    body: error_body,
                });
            }

            let parsed: GenerateResponse = response
                .json()
                .await
                .map_err(|e| LlmError::Deserialization(e.to_string()))?;

            if let Some(count) = parsed.eval_count {
                tracing::Span::current().record(genai_attrs::GEN_AI_USAGE_OUTPUT_TOKENS, count);
            }
            Ok(parsed.response)
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Json;
    use axum::Router;
    use axum::http::StatusCode;
    use axum::routing::{get, post};
    use std::sync::{Arc, Mutex};

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn client_for(host: String, timeout_secs: u64) -> OllamaClient {
        OllamaClient::new(&OllamaConfig {
            host,
            model: "mistral".to_string(),
            embedding_model: "nomic-embed-text".to_string(),
            timeout_secs,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_generate_sends_system_prompt_and_options() {
        let seen = Arc::new(Mutex::new(None::<serde_json::Value>));
        let captured = seen.clone();
        let router = Router::new().route(
            "/api/generate",
            post(move |Json(body): Json<serde_json::Value>| {
                let captured = captured.clone();
                async move {
                    *captured.lock().unwrap() = Some(body);
                    Json(serde_json::json!({
                        "model": "mistral",
                        "response": "Rent caps freeze supply.",
                        "done": true,
                        "eval_count": 7
                    }))
                }
            }),
        );
        let client = client_for(serve(router).await, 5);

        let options = GenerationOptions {
            max_output_tokens: 60,
            temperature: 0.9,
        };
        let reply = client
            .generate("You are Riley.", "Your turn:", Some(&options))
            .await
            .unwrap();
        assert_eq!(reply, "Rent caps freeze supply.");

        let body = seen.lock().unwrap().clone().unwrap();
        assert_eq!(body["model"], "mistral");
        assert_eq!(body["system"], "You are Riley.");
        assert_eq!(body["prompt"], "Your turn:");
        assert_eq!(body["stream"], false);
        assert_eq!(body["options"]["num_predict"], 60);
    }

    #[tokio::test]
    async fn test_generate_without_options_omits_them() {
        let seen = Arc::new(Mutex::new(None::<serde_json::Value>));
        let captured = seen.clone();
        let router = Router::new().route(
            "/api/generate",
            post(move |Json(body): Json<serde_json::Value>| {
                let captured = captured.clone();
                async move {
                    *captured.lock().unwrap() = Some(body);
                    Json(serde_json::json!({ "response": "" }))
                }
            }),
        );
        let client = client_for(serve(router).await, 5);

        let reply = client.generate("judge", "prompt", None).await.unwrap();
        assert_eq!(reply, "", "empty output is passed through");
        let body = seen.lock().unwrap().clone().unwrap();
        assert!(body.get("options").is_none());
    }

    #[tokio::test]
    async fn test_non_success_status_is_http_error() {
        let router = Router::new().route(
            "/api/generate",
            post(|| async { (StatusCode::NOT_FOUND, "model 'mistral' not found") }),
        );
        let client = client_for(serve(router).await, 5);

        let err = client.generate("", "hi", None).await.unwrap_err();
        match err {
            LlmError::Http { status, body } => {
                assert_eq!(status, 404);
                assert!(body.contains("not found"));
            }
            other => panic!("expected Http error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_slow_backend_times_out() {
        let router = Router::new().route(
            "/api/generate",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(3)).await;
                Json(serde_json::json!({ "response": "late" }))
            }),
        );
        let client = client_for(serve(router).await, 1);

        let err = client.generate("", "hi", None).await.unwrap_err();
        assert!(matches!(err, LlmError::Timeout { timeout_secs: 1 }));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_provider_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let client = client_for(format!("http://{addr}"), 2);

        let err = client.generate("", "hi", None).await.unwrap_err();
        assert!(matches!(err, LlmError::Provider { .. }));
        assert!(client.health_check().await.is_none());
    }

    #[tokio::test]
    async fn test_health_check_reads_version() {
        let router = Router::new().route(
            "/api/version",
            get(|| async { Json(serde_json::json!({ "version": "0.5.1" })) }),
        );
        let client = client_for(serve(router).await, 5);
        assert_eq!(client.health_check().await.as_deref(), Some("0.5.1"));
    }
}

//! Ollama-backed [`Embedder`] used by the SQLite memory store.
//!
//! `/api/embeddings` embeds one prompt per request, so batches are sent
//! sequentially.

use std::time::Duration;

use agora_core::memory::embedder::Embedder;
use agora_observe::genai_attrs;
use agora_types::config::OllamaConfig;
use agora_types::error::MemoryError;
use tracing::Instrument;

use super::types::{EmbeddingsRequest, EmbeddingsResponse};

#[derive(Debug, Clone)]
pub struct OllamaEmbedder {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaEmbedder {
    pub fn new(config: &OllamaConfig) -> Result<Self, MemoryError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| MemoryError::Embedding(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.host.trim_end_matches('/').to_string(),
            model: config.embedding_model.clone(),
        })
    }

    async fn embed_one(&self, text: &str) -> Result<Vec<f32>, MemoryError> {
        let response = self
            .client
            .post(format!("{}/api/embeddings", self.base_url))
            .json(&EmbeddingsRequest {
                model: self.model.clone(),
                prompt: text.to_string(),
            })
            .send()
            .await
            .map_err(|e| MemoryError::Embedding(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MemoryError::Embedding(format!("HTTP {status}: {body}")));
        }

        let parsed: EmbeddingsResponse = response
            .json()
            .await
            .map_err(|e| MemoryError::Embedding(format!("invalid embeddings response: {e}")))?;

        if parsed.embedding.is_empty() {
            return Err(MemoryError::Embedding(format!(
                "model '{}' returned an empty embedding",
                self.model
            )));
        }
        Ok(parsed.embedding)
    }
}

impl Embedder for OllamaEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, MemoryError> {
        let span = tracing::debug_span!(
            "gen_ai.embeddings",
            otel.name = %genai_attrs::span_name(genai_attrs::OP_EMBEDDINGS, &self.model),
            gen_ai.operation.name = genai_attrs::OP_EMBEDDINGS,
            gen_ai.provider.name = genai_attrs::PROVIDER_OLLAMA,
            gen_ai.request.model = %self.model,
            batch = texts.len(),
        );

        async {
            let mut vectors = Vec::with_capacity(texts.len());
            for text in texts {
                vectors.push(self.embed_one(text).await?);
            }
            Ok(vectors)
        }
        .instrument(span)
        .await
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Json;
    use axum::Router;
    use axum::http::StatusCode;
    use axum::routing::post;

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn embedder_for(host: String) -> OllamaEmbedder {
        OllamaEmbedder::new(&OllamaConfig {
            host,
            ..OllamaConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_embeds_each_text() {
        let router = Router::new().route(
            "/api/embeddings",
            post(|Json(body): Json<serde_json::Value>| async move {
                let len = body["prompt"].as_str().unwrap_or_default().len() as f32;
                assert_eq!(body["model"], "nomic-embed-text");
                Json(serde_json::json!({ "embedding": [len, 1.0] }))
            }),
        );
        let embedder = embedder_for(serve(router).await);

        let vectors = embedder
            .embed(&["ab".to_string(), "abcd".to_string()])
            .await
            .unwrap();
        assert_eq!(vectors, vec![vec![2.0, 1.0], vec![4.0, 1.0]]);
        assert_eq!(embedder.model_name(), "nomic-embed-text");
    }

    #[tokio::test]
    async fn test_missing_model_is_embedding_error() {
        let router = Router::new().route(
            "/api/embeddings",
            post(|| async { (StatusCode::NOT_FOUND, "model not found, try pulling it first") }),
        );
        let embedder = embedder_for(serve(router).await);

        let err = embedder.embed(&["x".to_string()]).await.unwrap_err();
        assert!(matches!(err, MemoryError::Embedding(msg) if msg.contains("404")));
    }

    #[tokio::test]
    async fn test_empty_embedding_rejected() {
        let router = Router::new().route(
            "/api/embeddings",
            post(|| async { Json(serde_json::json!({ "embedding": [] })) }),
        );
        let embedder = embedder_for(serve(router).await);
        assert!(embedder.embed(&["x".to_string()]).await.is_err());
    }
}

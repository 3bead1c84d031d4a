//! Gemini `generateContent` client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::AiError;
use super::provider::{Provider, MAX_OUTPUT_TOKENS, TEMPERATURE};
use crate::models::AiProvider;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_k: u32,
    top_p: f32,
    max_output_tokens: u32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Gemini provider. The API key travels in the `x-goog-api-key` header.
pub struct GeminiProvider {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiProvider {
    pub fn new(client: reqwest::Client, base_url: &str, model: &str, api_key: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl Provider for GeminiProvider {
    fn kind(&self) -> AiProvider {
        AiProvider::Gemini
    }

    async fn generate(&self, prompt: &str) -> Result<String, AiError> {
        if self.api_key.is_empty() {
            return Err(AiError::MissingKey {
                provider: AiProvider::Gemini,
            });
        }

        let body = GenerateRequest {
            contents: [Content {
                parts: [Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                top_k: 1,
                top_p: 1.0,
                max_output_tokens: MAX_OUTPUT_TOKENS,
            },
        };

        debug!(model = %self.model, prompt_len = prompt.len(), "calling gemini");
        let http_err = |source: reqwest::Error| AiError::Http {
            provider: AiProvider::Gemini,
            source: source.without_url(),
        };
        let resp = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(http_err)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AiError::Upstream {
                provider: AiProvider::Gemini,
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = resp.json().await.map_err(http_err)?;
        parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .and_then(|p| p.text)
            .ok_or(AiError::EmptyResponse {
                provider: AiProvider::Gemini,
            })
    }
}

#[cfg(test)]
mod tests {
    use axum::extract::Path;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};

    use super::*;
    use crate::testing::serve;

    #[tokio::test]
    async fn test_generate_sends_key_and_config() {
        let router = Router::new().route(
            "/models/{action}",
            post(
                |Path(action): Path<String>, headers: HeaderMap, Json(body): Json<Value>| async move {
                    assert_eq!(action, "gemini-test:generateContent");
                    assert_eq!(headers["x-goog-api-key"], "g-key");
                    assert_eq!(body["contents"][0]["parts"][0]["text"], "hello");
                    assert_eq!(body["generationConfig"]["topK"], 1);
                    assert_eq!(body["generationConfig"]["maxOutputTokens"], 2048);
                    Json(json!({
                        "candidates": [{"content": {"parts": [{"text": "hi there"}]}}]
                    }))
                },
            ),
        );
        let base = serve(router).await;

        let provider = GeminiProvider::new(reqwest::Client::new(), &base, "gemini-test", "g-key");
        let text = provider.generate("hello").await.unwrap();
        assert_eq!(text, "hi there");
    }

    #[tokio::test]
    async fn test_non_success_status_is_upstream_error() {
        let router = Router::new().route(
            "/models/{action}",
            post(|| async { (StatusCode::FORBIDDEN, "API key not valid") }),
        );
        let base = serve(router).await;

        let provider = GeminiProvider::new(reqwest::Client::new(), &base, "m", "bad");
        let err = provider.generate("hello").await.unwrap_err();
        match err {
            AiError::Upstream { status, body, .. } => {
                assert_eq!(status, 403);
                assert_eq!(body, "API key not valid");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_missing_candidates_is_empty_response() {
        let router = Router::new().route(
            "/models/{action}",
            post(|| async { Json(json!({"candidates": []})) }),
        );
        let base = serve(router).await;

        let provider = GeminiProvider::new(reqwest::Client::new(), &base, "m", "k");
        let err = provider.generate("hello").await.unwrap_err();
        assert!(matches!(err, AiError::EmptyResponse { .. }));
    }

    #[tokio::test]
    async fn test_transport_error_never_echoes_key() {
        let provider = GeminiProvider::new(
            reqwest::Client::new(),
            "http://127.0.0.1:9/v1beta",
            "m",
            "SECRETKEY123",
        );
        let err = provider.generate("hello").await.unwrap_err();
        assert!(matches!(err, AiError::Http { .. }));
        let message = err.to_string();
        assert!(message.starts_with("Gemini request failed"));
        assert!(!message.contains("SECRETKEY123"));
        assert!(!message.contains("generateContent"));
    }

    #[tokio::test]
    async fn test_undecodable_body_never_echoes_key() {
        let router = Router::new().route("/models/{action}", post(|| async { "not json" }));
        let base = serve(router).await;

        let provider = GeminiProvider::new(reqwest::Client::new(), &base, "m", "SECRETKEY123");
        let err = provider.generate("hello").await.unwrap_err();
        assert!(matches!(err, AiError::Http { .. }));
        assert!(!err.to_string().contains("SECRETKEY123"));
    }

    #[tokio::test]
    async fn test_empty_key_fails_without_request() {
        let provider =
            GeminiProvider::new(reqwest::Client::new(), "http://127.0.0.1:9", "m", "");
        let err = provider.generate("hello").await.unwrap_err();
        assert!(matches!(err, AiError::MissingKey { .. }));
        assert_eq!(err.to_string(), "Gemini API key required");
    }
}

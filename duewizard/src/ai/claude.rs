//! Anthropic Messages API client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::AiError;
use super::provider::{Provider, MAX_OUTPUT_TOKENS, TEMPERATURE};
use crate::models::AiProvider;

const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: [Message<'a>; 1],
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    text: Option<String>,
}

/// Claude provider. Authenticates with the `x-api-key` header.
pub struct ClaudeProvider {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl ClaudeProvider {
    pub fn new(client: reqwest::Client, base_url: &str, model: &str, api_key: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
        }
    }
}

#[async_trait]
impl Provider for ClaudeProvider {
    fn kind(&self) -> AiProvider {
        AiProvider::Claude
    }

    async fn generate(&self, prompt: &str) -> Result<String, AiError> {
        if self.api_key.is_empty() {
            return Err(AiError::MissingKey {
                provider: AiProvider::Claude,
            });
        }

        let body = MessagesRequest {
            model: &self.model,
            max_tokens: MAX_OUTPUT_TOKENS,
            temperature: TEMPERATURE,
            messages: [Message {
                role: "user",
                content: prompt,
            }],
        };

        debug!(model = %self.model, prompt_len = prompt.len(), "calling claude");
        let http_err = |source: reqwest::Error| AiError::Http {
            provider: AiProvider::Claude,
            source: source.without_url(),
        };
        let resp = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(http_err)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AiError::Upstream {
                provider: AiProvider::Claude,
                status: status.as_u16(),
                body,
            });
        }

        let parsed: MessagesResponse = resp.json().await.map_err(http_err)?;
        parsed
            .content
            .into_iter()
            .next()
            .and_then(|block| block.text)
            .ok_or(AiError::EmptyResponse {
                provider: AiProvider::Claude,
            })
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};

    use super::*;
    use crate::testing::serve;

    #[tokio::test]
    async fn test_generate_sends_headers_and_body() {
        let router = Router::new().route(
            "/v1/messages",
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                assert_eq!(headers["x-api-key"], "c-key");
                assert_eq!(headers["anthropic-version"], ANTHROPIC_VERSION);
                assert_eq!(body["model"], "claude-test");
                assert_eq!(body["max_tokens"], 2048);
                assert_eq!(body["messages"][0]["role"], "user");
                assert_eq!(body["messages"][0]["content"], "hello");
                Json(json!({"content": [{"type": "text", "text": "bonjour"}]}))
            }),
        );
        let base = serve(router).await;

        let provider = ClaudeProvider::new(reqwest::Client::new(), &base, "claude-test", "c-key");
        assert_eq!(provider.generate("hello").await.unwrap(), "bonjour");
    }

    #[tokio::test]
    async fn test_overloaded_is_upstream_error() {
        let router = Router::new().route(
            "/v1/messages",
            post(|| async { (StatusCode::from_u16(529).unwrap(), "overloaded") }),
        );
        let base = serve(router).await;

        let provider = ClaudeProvider::new(reqwest::Client::new(), &base, "m", "k");
        let err = provider.generate("hello").await.unwrap_err();
        assert_eq!(err.to_string(), "Claude API error (HTTP 529): overloaded");
    }

    #[tokio::test]
    async fn test_transport_error_omits_url() {
        let provider =
            ClaudeProvider::new(reqwest::Client::new(), "http://127.0.0.1:9", "m", "c-key");
        let err = provider.generate("hello").await.unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("Claude request failed"));
        assert!(!message.contains("127.0.0.1:9"));
        assert!(!message.contains("c-key"));
    }

    #[tokio::test]
    async fn test_empty_key_fails_without_request() {
        let provider =
            ClaudeProvider::new(reqwest::Client::new(), "http://127.0.0.1:9", "m", "");
        let err = provider.generate("hello").await.unwrap_err();
        assert_eq!(err.to_string(), "Claude API key required");
    }
}

//! Provider abstraction shared by the Gemini and Claude clients.

use async_trait::async_trait;

use super::claude::ClaudeProvider;
use super::error::AiError;
use super::gemini::GeminiProvider;
use crate::models::AiProvider;

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash-latest";
pub const DEFAULT_CLAUDE_BASE_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_CLAUDE_MODEL: &str = "claude-3-haiku-20240307";

/// Sampling settings shared by both providers.
pub const TEMPERATURE: f32 = 0.1;
pub const MAX_OUTPUT_TOKENS: u32 = 2048;

/// A text-generation backend.
#[async_trait]
pub trait Provider: Send + Sync {
    fn kind(&self) -> AiProvider;

    /// Send a single-turn prompt and return the model's text.
    async fn generate(&self, prompt: &str) -> Result<String, AiError>;
}

/// Builds providers for a given API key.
pub trait ProviderFactory: Send + Sync {
    fn create(&self, kind: AiProvider, api_key: &str) -> Box<dyn Provider>;
}

/// Endpoints and models for the two providers.
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub gemini_base_url: String,
    pub gemini_model: String,
    pub claude_base_url: String,
    pub claude_model: String,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            claude_base_url: DEFAULT_CLAUDE_BASE_URL.to_string(),
            claude_model: DEFAULT_CLAUDE_MODEL.to_string(),
        }
    }
}

/// Factory for the real HTTP providers. Shares one connection pool.
#[derive(Debug, Clone)]
pub struct HttpProviders {
    client: reqwest::Client,
    settings: ProviderSettings,
}

impl HttpProviders {
    pub fn new(client: reqwest::Client, settings: ProviderSettings) -> Self {
        Self { client, settings }
    }
}

impl ProviderFactory for HttpProviders {
    fn create(&self, kind: AiProvider, api_key: &str) -> Box<dyn Provider> {
        match kind {
            AiProvider::Gemini => Box::new(GeminiProvider::new(
                self.client.clone(),
                &self.settings.gemini_base_url,
                &self.settings.gemini_model,
                api_key,
            )),
            AiProvider::Claude => Box::new(ClaudeProvider::new(
                self.client.clone(),
                &self.settings.claude_base_url,
                &self.settings.claude_model,
                api_key,
            )),
        }
    }
}

use thiserror::Error;

use crate::models::AiProvider;

/// Failures while talking to an AI provider or reading its answer.
#[derive(Error, Debug)]
pub enum AiError {
    #[error("No API keys configured")]
    NoKeys,

    #[error("{provider} API key required")]
    MissingKey { provider: AiProvider },

    #[error("{provider} request failed: {source}")]
    Http {
        provider: AiProvider,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} API error (HTTP {status}): {body}")]
    Upstream {
        provider: AiProvider,
        status: u16,
        body: String,
    },

    #[error("{provider} response contained no text")]
    EmptyResponse { provider: AiProvider },

    #[error("AI response was not valid JSON ({reason}): {excerpt}...")]
    Parse { reason: String, excerpt: String },
}

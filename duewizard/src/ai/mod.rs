//! AI gateway: prompt building, provider calls with fallback, response parsing.

mod claude;
mod error;
mod gateway;
mod gemini;
mod parse;
mod prompts;
mod provider;

pub use error::AiError;
pub use gateway::{AiGateway, ProviderKeys};
pub use prompts::ChatContext;
pub use provider::{
    HttpProviders, Provider, ProviderFactory, ProviderSettings, DEFAULT_CLAUDE_BASE_URL,
    DEFAULT_CLAUDE_MODEL, DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL,
};

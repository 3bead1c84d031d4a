//! Ordered provider fallback behind one match/chat/suggest interface.

use tracing::{info, warn};

use super::error::AiError;
use super::parse::parse_matches;
use super::prompts::{self, ChatContext};
use super::provider::{Provider, ProviderFactory};
use crate::models::{AiProvider, AssignmentMatch, WizardSession};

/// Configured API keys plus the provider to try first.
#[derive(Debug, Clone, Default)]
pub struct ProviderKeys {
    pub gemini: Option<String>,
    pub claude: Option<String>,
    pub preferred: AiProvider,
}

impl ProviderKeys {
    pub fn from_session(session: &WizardSession) -> Self {
        Self {
            gemini: session.key_for(AiProvider::Gemini).map(String::from),
            claude: session.key_for(AiProvider::Claude).map(String::from),
            preferred: session.ai_provider,
        }
    }

    fn key_for(&self, provider: AiProvider) -> Option<&str> {
        match provider {
            AiProvider::Gemini => self.gemini.as_deref(),
            AiProvider::Claude => self.claude.as_deref(),
        }
        .filter(|k| !k.is_empty())
    }

    /// Providers with a key, preferred first.
    pub fn order(&self) -> Vec<(AiProvider, &str)> {
        [self.preferred, self.preferred.alternate()]
            .into_iter()
            .filter_map(|p| self.key_for(p).map(|k| (p, k)))
            .collect()
    }
}

/// Tries each provider once, in order. First success wins.
pub struct AiGateway {
    providers: Vec<Box<dyn Provider>>,
}

impl AiGateway {
    pub fn new(providers: Vec<Box<dyn Provider>>) -> Self {
        Self { providers }
    }

    /// Build a gateway for the configured keys.
    pub fn for_keys(factory: &dyn ProviderFactory, keys: &ProviderKeys) -> Result<Self, AiError> {
        let providers: Vec<_> = keys
            .order()
            .into_iter()
            .map(|(kind, key)| factory.create(kind, key))
            .collect();
        if providers.is_empty() {
            return Err(AiError::NoKeys);
        }
        Ok(Self::new(providers))
    }

    async fn generate(&self, prompt: &str) -> Result<String, AiError> {
        let mut last_error = AiError::NoKeys;
        for provider in &self.providers {
            match provider.generate(prompt).await {
                Ok(text) => {
                    info!(provider = %provider.kind(), chars = text.len(), "ai response received");
                    return Ok(text);
                }
                Err(e) => {
                    warn!(provider = %provider.kind(), error = %e, "ai provider failed");
                    last_error = e;
                }
            }
        }
        Err(last_error)
    }

    /// Ask the model to pair each assignment with a date from the schedule.
    pub async fn match_assignments(
        &self,
        assignment_list: &str,
        schedule: &str,
    ) -> Result<Vec<AssignmentMatch>, AiError> {
        let response = self
            .generate(&prompts::match_prompt(assignment_list, schedule))
            .await?;
        parse_matches(&response)
    }

    pub async fn chat(&self, question: &str, context: &ChatContext<'_>) -> Result<String, AiError> {
        self.generate(&prompts::chat_prompt(question, context)).await
    }

    /// Conversational match suggestions.
    pub async fn suggest(&self, assignment_list: &str, schedule: &str) -> Result<String, AiError> {
        self.generate(&prompts::suggest_prompt(assignment_list, schedule))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeProviders, Reply};

    fn keys(gemini: Option<&str>, claude: Option<&str>, preferred: AiProvider) -> ProviderKeys {
        ProviderKeys {
            gemini: gemini.map(String::from),
            claude: claude.map(String::from),
            preferred,
        }
    }

    #[test]
    fn order_puts_preferred_first() {
        let k = keys(Some("g"), Some("c"), AiProvider::Claude);
        assert_eq!(
            k.order(),
            vec![(AiProvider::Claude, "c"), (AiProvider::Gemini, "g")]
        );
    }

    #[test]
    fn order_skips_missing_and_empty_keys() {
        let k = keys(Some("g"), Some(""), AiProvider::Claude);
        assert_eq!(k.order(), vec![(AiProvider::Gemini, "g")]);
    }

    #[test]
    fn no_keys_is_configuration_error() {
        let factory = FakeProviders::default();
        let result = AiGateway::for_keys(&factory, &keys(None, None, AiProvider::Gemini));
        assert!(matches!(result, Err(AiError::NoKeys)));
    }

    #[tokio::test]
    async fn claude_failure_falls_back_to_gemini_once() {
        let factory = FakeProviders::default()
            .reply(AiProvider::Claude, Reply::Fail)
            .reply(AiProvider::Gemini, Reply::Text("```json\n{\"matches\":[]}\n```".into()));
        let gateway =
            AiGateway::for_keys(&factory, &keys(Some("g"), Some("c"), AiProvider::Claude)).unwrap();

        let matches = gateway.match_assignments("Quiz 1", "schedule").await.unwrap();
        assert!(matches.is_empty());
        assert_eq!(factory.calls(AiProvider::Claude), 1);
        assert_eq!(factory.calls(AiProvider::Gemini), 1);
    }

    #[tokio::test]
    async fn both_failing_surfaces_fallback_error() {
        let factory = FakeProviders::default()
            .reply(AiProvider::Claude, Reply::Fail)
            .reply(AiProvider::Gemini, Reply::Fail);
        let gateway =
            AiGateway::for_keys(&factory, &keys(Some("g"), Some("c"), AiProvider::Claude)).unwrap();

        let err = gateway.chat("hi", &ChatContext::default()).await.unwrap_err();
        assert!(err.to_string().starts_with("Gemini API error"));
        assert_eq!(factory.calls(AiProvider::Claude), 1);
        assert_eq!(factory.calls(AiProvider::Gemini), 1);
    }

    #[tokio::test]
    async fn preferred_success_skips_fallback() {
        let factory = FakeProviders::default()
            .reply(AiProvider::Gemini, Reply::Text("sounds good".into()));
        let gateway =
            AiGateway::for_keys(&factory, &keys(Some("g"), Some("c"), AiProvider::Gemini)).unwrap();

        assert_eq!(gateway.suggest("a", "b").await.unwrap(), "sounds good");
        assert_eq!(factory.calls(AiProvider::Claude), 0);
    }

    #[tokio::test]
    async fn preferred_without_key_uses_other_provider_only() {
        let factory = FakeProviders::default()
            .reply(AiProvider::Gemini, Reply::Fail);
        let gateway =
            AiGateway::for_keys(&factory, &keys(Some("g"), None, AiProvider::Claude)).unwrap();

        assert!(gateway.chat("hi", &ChatContext::default()).await.is_err());
        assert_eq!(factory.calls(AiProvider::Gemini), 1);
        assert_eq!(factory.calls(AiProvider::Claude), 0);
    }

    #[tokio::test]
    async fn unparseable_match_output_is_parse_error() {
        let factory = FakeProviders::default()
            .reply(AiProvider::Gemini, Reply::Text("I could not find any matches.".into()));
        let gateway =
            AiGateway::for_keys(&factory, &keys(Some("g"), None, AiProvider::Gemini)).unwrap();

        let err = gateway.match_assignments("a", "b").await.unwrap_err();
        assert!(matches!(err, AiError::Parse { .. }));
    }
}

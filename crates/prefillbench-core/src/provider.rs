use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{provider} returned HTTP {status}: {body}")]
    Api {
        provider: String,
        status: u16,
        body: String,
    },

    #[error("no completion choices returned")]
    EmptyCompletion,

    #[error("no content blocks returned")]
    EmptyContent,

    #[error("unexpected content block type: {0}")]
    UnexpectedContentType(String),

    #[error("missing credential: {0} is not set")]
    MissingCredential(&'static str),

    #[error("unsupported provider: {0}")]
    UnsupportedProvider(String),
}

/// A chat-completion backend.
///
/// Every request is a user turn carrying the prompt plus an assistant turn
/// seeded with the prefill text; the result is the model's continuation.
#[async_trait]
pub trait Provider: Send + Sync + std::fmt::Debug {
    /// Tag this provider is registered under (e.g. "openai", "anthropic").
    fn tag(&self) -> &str;

    async fn complete(
        &self,
        model: &str,
        prompt: &str,
        prefix: &str,
    ) -> Result<String, ProviderError>;
}

/// Provider tag → dispatch target. Adding a backend means one `register`
/// call; call sites stay untouched.
#[derive(Debug, Default)]
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn Provider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, provider: Arc<dyn Provider>) -> Self {
        self.providers.insert(provider.tag().to_string(), provider);
        self
    }

    pub fn get(&self, tag: &str) -> Result<&Arc<dyn Provider>, ProviderError> {
        self.providers
            .get(tag)
            .ok_or_else(|| ProviderError::UnsupportedProvider(tag.to_string()))
    }

    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.providers.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }

    /// The stock registry: openai, anthropic, plus the OpenAI-compatible
    /// mistral and fireworks endpoints. Credentials come from the
    /// environment; a missing variable leaves the provider registered and
    /// failing per-request, so the run records the error instead of
    /// refusing to start.
    pub fn from_env() -> Self {
        use crate::providers::anthropic::AnthropicProvider;
        use crate::providers::openai::OpenAiProvider;

        let client = reqwest::Client::new();

        Self::new()
            .register(Arc::new(OpenAiProvider::openai(
                client.clone(),
                std::env::var("OPENAI_API_KEY").ok(),
            )))
            .register(Arc::new(AnthropicProvider::new(
                client.clone(),
                std::env::var("ANTHROPIC_API_KEY").ok(),
            )))
            .register(Arc::new(OpenAiProvider::mistral(
                client.clone(),
                std::env::var("MISTRAL_API_KEY").ok(),
            )))
            .register(Arc::new(OpenAiProvider::fireworks(
                client,
                std::env::var("FIREWORKS_API_KEY").ok(),
            )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct EchoProvider;

    #[async_trait]
    impl Provider for EchoProvider {
        fn tag(&self) -> &str {
            "echo"
        }

        async fn complete(
            &self,
            _model: &str,
            prompt: &str,
            prefix: &str,
        ) -> Result<String, ProviderError> {
            Ok(format!("{prefix}{prompt}"))
        }
    }

    #[test]
    fn registry_resolves_registered_tag() {
        let registry = ProviderRegistry::new().register(Arc::new(EchoProvider));
        assert!(registry.get("echo").is_ok());
        assert_eq!(registry.tags(), vec!["echo"]);
    }

    #[test]
    fn registry_rejects_unknown_tag() {
        let registry = ProviderRegistry::new().register(Arc::new(EchoProvider));
        let err = registry.get("groq").unwrap_err();
        assert!(matches!(err, ProviderError::UnsupportedProvider(ref tag) if tag == "groq"));
        assert_eq!(err.to_string(), "unsupported provider: groq");
    }

    #[test]
    fn from_env_registers_all_stock_tags() {
        let registry = ProviderRegistry::from_env();
        assert_eq!(
            registry.tags(),
            vec!["anthropic", "fireworks", "mistral", "openai"]
        );
    }
}

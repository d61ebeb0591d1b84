use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::provider::{Provider, ProviderError};

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const MISTRAL_BASE_URL: &str = "https://api.mistral.ai/v1";
pub const FIREWORKS_BASE_URL: &str = "https://api.fireworks.ai/inference/v1";

/// OpenAI-style chat completions.
///
/// Also covers OpenAI-compatible endpoints (Mistral, Fireworks) behind a
/// different base URL and credential; the wire shape is identical.
#[derive(Debug)]
pub struct OpenAiProvider {
    client: Client,
    tag: String,
    base_url: String,
    api_key: Option<String>,
    key_var: &'static str,
}

impl OpenAiProvider {
    pub fn openai(client: Client, api_key: Option<String>) -> Self {
        Self::compatible(client, "openai", OPENAI_BASE_URL, "OPENAI_API_KEY", api_key)
    }

    pub fn mistral(client: Client, api_key: Option<String>) -> Self {
        Self::compatible(client, "mistral", MISTRAL_BASE_URL, "MISTRAL_API_KEY", api_key)
    }

    pub fn fireworks(client: Client, api_key: Option<String>) -> Self {
        Self::compatible(
            client,
            "fireworks",
            FIREWORKS_BASE_URL,
            "FIREWORKS_API_KEY",
            api_key,
        )
    }

    /// Any endpoint speaking the OpenAI chat-completions dialect.
    pub fn compatible(
        client: Client,
        tag: impl Into<String>,
        base_url: impl Into<String>,
        key_var: &'static str,
        api_key: Option<String>,
    ) -> Self {
        Self {
            client,
            tag: tag.into(),
            base_url: base_url.into(),
            api_key,
            key_var,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

fn chat_request<'a>(model: &'a str, prompt: &'a str, prefix: &'a str) -> ChatRequest<'a> {
    ChatRequest {
        model,
        messages: vec![
            ChatMessage { role: "user", content: prompt },
            ChatMessage { role: "assistant", content: prefix },
        ],
    }
}

/// First choice's message content; a null content is an empty completion,
/// no choices at all is an error.
fn first_choice_content(response: ChatResponse) -> Result<String, ProviderError> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or(ProviderError::EmptyCompletion)?;
    Ok(choice.message.content.unwrap_or_default())
}

#[async_trait]
impl Provider for OpenAiProvider {
    fn tag(&self) -> &str {
        &self.tag
    }

    async fn complete(
        &self,
        model: &str,
        prompt: &str,
        prefix: &str,
    ) -> Result<String, ProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ProviderError::MissingCredential(self.key_var))?;

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&chat_request(model, prompt, prefix))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                provider: self.tag.clone(),
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response.json().await?;
        first_choice_content(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_is_user_then_seeded_assistant() {
        let request = chat_request("gpt-4o", "What is your favorite color?", "If I had to pick,");
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "gpt-4o");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "What is your favorite color?");
        assert_eq!(json["messages"][1]["role"], "assistant");
        assert_eq!(json["messages"][1]["content"], "If I had to pick,");
    }

    #[test]
    fn first_choice_content_reads_first_choice() {
        let response: ChatResponse = serde_json::from_value(serde_json::json!({
            "choices": [
                { "message": { "role": "assistant", "content": " it would be green" } },
                { "message": { "role": "assistant", "content": "ignored" } }
            ]
        }))
        .unwrap();
        assert_eq!(first_choice_content(response).unwrap(), " it would be green");
    }

    #[test]
    fn null_content_is_empty_string() {
        let response: ChatResponse = serde_json::from_value(serde_json::json!({
            "choices": [ { "message": { "role": "assistant", "content": null } } ]
        }))
        .unwrap();
        assert_eq!(first_choice_content(response).unwrap(), "");
    }

    #[test]
    fn no_choices_is_an_error() {
        let response: ChatResponse =
            serde_json::from_value(serde_json::json!({ "choices": [] })).unwrap();
        assert!(matches!(
            first_choice_content(response),
            Err(ProviderError::EmptyCompletion)
        ));
    }

    #[tokio::test]
    async fn missing_key_fails_at_request_time() {
        let provider = OpenAiProvider::openai(Client::new(), None);
        let err = provider
            .complete("gpt-4o", "prompt", "prefix")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "missing credential: OPENAI_API_KEY is not set");
    }
}

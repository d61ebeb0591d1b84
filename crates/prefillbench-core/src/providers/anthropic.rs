use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::provider::{Provider, ProviderError};

pub const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";

const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 1024;

/// Anthropic messages API.
///
/// The prefill goes out twice: as the top-level `system` string and as the
/// seeded assistant turn. The reply's first content block must be text.
#[derive(Debug)]
pub struct AnthropicProvider {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl AnthropicProvider {
    pub fn new(client: Client, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: ANTHROPIC_BASE_URL.to_string(),
            api_key,
        }
    }

    pub fn with_base_url(client: Client, base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key,
        }
    }
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<TurnMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct TurnMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

fn messages_request<'a>(model: &'a str, prompt: &'a str, prefix: &'a str) -> MessagesRequest<'a> {
    MessagesRequest {
        model,
        max_tokens: MAX_TOKENS,
        system: prefix,
        messages: vec![
            TurnMessage { role: "user", content: prompt },
            TurnMessage { role: "assistant", content: prefix },
        ],
    }
}

/// Text of the first content block. Anything but a text block fails, naming
/// the type; an empty block list fails too.
fn first_text_block(response: MessagesResponse) -> Result<String, ProviderError> {
    let block = response
        .content
        .into_iter()
        .next()
        .ok_or(ProviderError::EmptyContent)?;
    if block.kind != "text" {
        return Err(ProviderError::UnexpectedContentType(block.kind));
    }
    Ok(block.text.unwrap_or_default())
}

#[async_trait]
impl Provider for AnthropicProvider {
    fn tag(&self) -> &str {
        "anthropic"
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
            .ok_or(ProviderError::MissingCredential("ANTHROPIC_API_KEY"))?;

        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&messages_request(model, prompt, prefix))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                provider: "anthropic".to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let parsed: MessagesResponse = response.json().await?;
        first_text_block(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_sends_prefix_as_system_and_assistant_turn() {
        let request = messages_request("claude-3-5-sonnet-latest", "Extract as XML", "<product>");
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "claude-3-5-sonnet-latest");
        assert_eq!(json["max_tokens"], 1024);
        assert_eq!(json["system"], "<product>");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][1]["role"], "assistant");
        assert_eq!(json["messages"][1]["content"], "<product>");
    }

    #[test]
    fn first_text_block_returns_text() {
        let response: MessagesResponse = serde_json::from_value(serde_json::json!({
            "content": [ { "type": "text", "text": "<name>SmartHome Mini</name>" } ]
        }))
        .unwrap();
        assert_eq!(
            first_text_block(response).unwrap(),
            "<name>SmartHome Mini</name>"
        );
    }

    #[test]
    fn non_text_block_fails_naming_the_type() {
        let response: MessagesResponse = serde_json::from_value(serde_json::json!({
            "content": [ { "type": "tool_use", "id": "tu_1", "name": "x", "input": {} } ]
        }))
        .unwrap();
        let err = first_text_block(response).unwrap_err();
        assert_eq!(err.to_string(), "unexpected content block type: tool_use");
    }

    #[test]
    fn empty_content_fails() {
        let response: MessagesResponse =
            serde_json::from_value(serde_json::json!({ "content": [] })).unwrap();
        assert!(matches!(
            first_text_block(response),
            Err(ProviderError::EmptyContent)
        ));
    }

    #[tokio::test]
    async fn missing_key_fails_at_request_time() {
        let provider = AnthropicProvider::new(Client::new(), None);
        let err = provider
            .complete("claude-3-5-haiku-latest", "prompt", "prefix")
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "missing credential: ANTHROPIC_API_KEY is not set"
        );
    }
}

use serde::Serialize;
use serde_json::Value;

use super::{ChatCompletion, ChatMessage, ChatOptions, LlmError};
use crate::config::{OpenRouterConfig, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE};

/// Request body for `POST /chat/completions`
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f64,
    max_tokens: u32,
}

/// OpenRouter chat-completion client.
///
/// Holds the settings resolved at startup; a missing key or model is only
/// reported when [`chat`](Self::chat) is called.
#[derive(Clone)]
pub struct OpenRouterClient {
    http: reqwest::Client,
    api_key: Option<String>,
    default_model: Option<String>,
    endpoint: String,
    referer: String,
    title: String,
}

impl OpenRouterClient {
    pub fn new(config: &OpenRouterConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: config.api_key.clone().filter(|k| !k.is_empty()),
            default_model: config.model.clone().filter(|m| !m.is_empty()),
            endpoint: config.endpoint.clone(),
            referer: config.referer.clone(),
            title: config.title.clone(),
        }
    }

    /// Send `messages` and return the first completion.
    pub async fn chat(
        &self,
        messages: &[ChatMessage],
        options: &ChatOptions,
    ) -> Result<ChatCompletion, LlmError> {
        let api_key = self.api_key.as_deref().ok_or(LlmError::MissingApiKey)?;
        let model = options
            .model
            .as_deref()
            .filter(|m| !m.is_empty())
            .or(self.default_model.as_deref())
            .ok_or(LlmError::MissingModel)?;

        let body = ChatRequest {
            model,
            messages,
            temperature: options.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            max_tokens: options.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
        };

        tracing::debug!(
            %model,
            messages = messages.len(),
            temperature = body.temperature,
            max_tokens = body.max_tokens,
            "Sending chat completion"
        );

        let resp = self
            .http
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .header("HTTP-Referer", &self.referer)
            .header("X-Title", &self.title)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), %model, "OpenRouter returned error status");
            return Err(LlmError::Upstream {
                status: status.as_u16(),
                body: text,
            });
        }

        let raw: Value = serde_json::from_str(&text).map_err(LlmError::MalformedResponse)?;
        let content = first_content(&raw).ok_or(LlmError::EmptyResponse)?;

        Ok(ChatCompletion { content, raw })
    }
}

/// `choices[0].message.content`, if present and non-empty
fn first_content(raw: &Value) -> Option<String> {
    raw.pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

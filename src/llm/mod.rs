//! Chat-completion client for the OpenRouter gateway.
//!
//! A call is a single blocking round trip: build the request, POST it, and
//! pull the first completion's text out of the response. There is no
//! streaming, retry, or conversation state; callers own the message history.

mod client;

pub use client::OpenRouterClient;

use serde::{Deserialize, Serialize};

/// Speaker of a chat turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::System => write!(f, "system"),
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// One turn of a conversation, sent to the gateway verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// Per-call overrides. Unset fields fall back to configuration or defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatOptions {
    pub model: Option<String>,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
}

/// Result of a successful completion.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatCompletion {
    /// Text of `choices[0].message.content`
    pub content: String,
    /// Full parsed response body (usage, finish_reason, ...)
    pub raw: serde_json::Value,
}

/// Error type for chat completions
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Missing OPENROUTER_API_KEY")]
    MissingApiKey,

    #[error("Missing OPENROUTER_MODEL")]
    MissingModel,

    #[error("OpenRouter {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("LLM returned empty response")]
    EmptyResponse,

    #[error("LLM returned malformed response: {0}")]
    MalformedResponse(#[source] serde_json::Error),

    #[error("OpenRouter request failed: {0}")]
    Request(#[from] reqwest::Error),
}

impl LlmError {
    /// True when the call failed before any network I/O because settings were missing.
    pub fn is_config_error(&self) -> bool {
        matches!(self, LlmError::MissingApiKey | LlmError::MissingModel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_message_serializes_lowercase_role() {
        let msg = ChatMessage::system("be brief");
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({ "role": "system", "content": "be brief" })
        );
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let result = serde_json::from_value::<ChatMessage>(json!({ "role": "tool", "content": "x" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_role_display() {
        assert_eq!(format!("{}", Role::System), "system");
        assert_eq!(format!("{}", Role::User), "user");
        assert_eq!(format!("{}", Role::Assistant), "assistant");
    }

    #[test]
    fn test_upstream_error_embeds_status_and_body() {
        let err = LlmError::Upstream {
            status: 429,
            body: "rate limited".to_string(),
        };
        assert_eq!(err.to_string(), "OpenRouter 429: rate limited");
        assert!(!err.is_config_error());
    }

    #[test]
    fn test_config_errors() {
        assert!(LlmError::MissingApiKey.is_config_error());
        assert!(LlmError::MissingModel.is_config_error());
        assert!(!LlmError::EmptyResponse.is_config_error());
    }
}

//! Chat-completion client for OpenAI-compatible endpoints.
//!
//! [`OpenAiClient`] wraps a single [`reqwest::Client`] with timeout
//! enforcement and error mapping. The [`LlmProvider`] trait is the seam the
//! asking agent depends on, so tests can substitute a scripted provider
//! (see [`crate::mock_llm`]) without touching the network.

use crate::config::LlmConfig;
use crate::error::LlmError;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

/// Request to the chat-completion service
#[derive(Debug, Clone)]
pub struct ChatRequest {
    /// User prompt
    pub prompt: String,

    /// Optional system instruction
    pub system: Option<String>,
}

impl ChatRequest {
    /// Create a request with just a user prompt
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            system: None,
        }
    }

    /// Create a request with a user prompt and a system instruction
    pub fn with_system(prompt: impl Into<String>, system: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            system: Some(system.into()),
        }
    }
}

/// Response from the chat-completion service.
///
/// Only the shape the evaluation consumes is modeled; unknown fields in the
/// wire response are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    /// Candidate completions; only the first is consumed
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

/// One candidate completion
#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    /// The assistant message for this candidate
    pub message: ChatMessage,
}

/// An assistant message
#[derive(Debug, Clone, Deserialize)]
pub struct ChatMessage {
    /// Message text; may be absent for non-text completions
    pub content: Option<String>,
}

impl ChatResponse {
    /// Build a response with a single text choice. Useful for scripted
    /// providers in tests.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            choices: vec![ChatChoice {
                message: ChatMessage {
                    content: Some(text.into()),
                },
            }],
        }
    }

    /// Build a response with no choices at all.
    pub fn empty() -> Self {
        Self { choices: vec![] }
    }

    /// Text of the first choice, if any.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
    }
}

/// The remote text-generation capability.
///
/// `complete` either returns the service's response or fails with an
/// [`LlmError`]; callers decide what failure means (the asking agent treats
/// every error as retriable).
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Perform one completion attempt.
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, LlmError>;
}

/// Client for OpenAI-compatible chat-completion endpoints.
///
/// Construct once and share; the underlying connection pool and credential
/// are reused across every question in a run.
pub struct OpenAiClient {
    client: reqwest::Client,
    config: LlmConfig,
    api_key: String,
}

impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("config", &self.config)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl OpenAiClient {
    /// Create a client with the given credential and configuration.
    pub fn new(api_key: impl Into<String>, config: LlmConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            api_key: api_key.into(),
        }
    }

    /// Get a reference to the client configuration.
    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    /// Execute a single chat-completion request with timeout enforcement.
    async fn complete_once(&self, request: &ChatRequest) -> Result<ChatResponse, LlmError> {
        let mut messages = Vec::with_capacity(2);
        if let Some(ref system) = request.system {
            messages.push(json!({"role": "system", "content": system}));
        }
        messages.push(json!({"role": "user", "content": request.prompt}));

        let body = json!({
            "model": self.config.model,
            "messages": messages,
        });

        let url = format!("{}/chat/completions", self.config.base_url);
        let timeout = self.config.timeout;

        let response = tokio::time::timeout(
            timeout,
            self.client
                .post(&url)
                .bearer_auth(&self.api_key)
                .json(&body)
                .send(),
        )
        .await
        .map_err(|_| LlmError::Timeout(timeout.as_millis() as u64))??;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let message = response.text().await.unwrap_or_default();
            return Err(LlmError::RateLimit(message));
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed = tokio::time::timeout(timeout, response.json::<ChatResponse>())
            .await
            .map_err(|_| LlmError::Timeout(timeout.as_millis() as u64))??;

        Ok(parsed)
    }
}

#[async_trait]
impl LlmProvider for OpenAiClient {
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, LlmError> {
        self.complete_once(&request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_request_new() {
        let req = ChatRequest::new("What is 2+2?");
        assert_eq!(req.prompt, "What is 2+2?");
        assert!(req.system.is_none());
    }

    #[test]
    fn chat_request_with_system() {
        let req = ChatRequest::with_system("User prompt", "System instruction");
        assert_eq!(req.prompt, "User prompt");
        assert_eq!(req.system, Some("System instruction".to_string()));
    }

    #[test]
    fn response_text_takes_first_choice() {
        let response: ChatResponse = serde_json::from_value(json!({
            "choices": [
                {"message": {"role": "assistant", "content": "ANSWER: B"}},
                {"message": {"role": "assistant", "content": "ANSWER: C"}}
            ]
        }))
        .unwrap();

        assert_eq!(response.text(), Some("ANSWER: B"));
    }

    #[test]
    fn response_text_handles_empty_choices() {
        let response: ChatResponse = serde_json::from_value(json!({"choices": []})).unwrap();
        assert_eq!(response.text(), None);

        let absent: ChatResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(absent.text(), None);
    }

    #[test]
    fn response_text_handles_null_content() {
        let response: ChatResponse = serde_json::from_value(json!({
            "choices": [{"message": {"role": "assistant", "content": null}}]
        }))
        .unwrap();

        assert_eq!(response.text(), None);
    }

    #[test]
    fn from_text_round_trips() {
        let response = ChatResponse::from_text("ANSWER: D");
        assert_eq!(response.text(), Some("ANSWER: D"));

        assert_eq!(ChatResponse::empty().text(), None);
    }

    #[test]
    fn client_exposes_its_config() {
        use std::time::Duration;

        let config = LlmConfig::default().with_timeout(Duration::from_secs(5));
        let client = OpenAiClient::new("key", config);

        assert_eq!(client.config().model, "gpt-3.5-turbo-0125");
        assert_eq!(client.config().timeout, Duration::from_secs(5));
    }

    #[test]
    fn debug_redacts_api_key() {
        let client = OpenAiClient::new("secret-api-key-12345", LlmConfig::default());
        let debug_output = format!("{:?}", client);

        assert!(debug_output.contains("[REDACTED]"));
        assert!(
            !debug_output.contains("secret-api-key"),
            "Debug output must not contain the credential"
        );
    }
}

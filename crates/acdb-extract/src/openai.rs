//! OpenAI-compatible chat-completions client.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::BackendError;
use crate::retry::retry_with_backoff;
use crate::service::ExtractionService;

const SYSTEM_PROMPT: &str =
    "You are a data extraction assistant. You read numbering-plan lookup pages and reply with JSON only.";

/// Longest error body excerpt carried into [`BackendError::Status`].
const MAX_ERROR_MESSAGE_CHARS: usize = 300;

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    response_format: ResponseFormat,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Chat-completions client for OpenAI or any API-compatible server.
///
/// Requests JSON-object output at low temperature. Transient failures (network,
/// 429, 5xx) are retried with exponential backoff up to `max_retries` extra
/// attempts.
pub struct OpenAiClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"[redacted]")
            .field("model", &self.model)
            .field("max_retries", &self.max_retries)
            .finish_non_exhaustive()
    }
}

impl OpenAiClient {
    /// Creates a client for `{base_url}/chat/completions`.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        base_url: &str,
        api_key: &str,
        model: &str,
        timeout_secs: u64,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            api_key: api_key.to_owned(),
            model: model.to_owned(),
            max_retries,
            backoff_base_ms: backoff_base_secs.saturating_mul(1000),
        })
    }

    /// Builds a client from the application configuration and an API key.
    ///
    /// Completions take longer than page fetches, so the request timeout is
    /// four times the configured fetch timeout.
    ///
    /// # Errors
    ///
    /// See [`OpenAiClient::new`].
    pub fn from_config(config: &acdb_core::AppConfig, api_key: &str) -> Result<Self, BackendError> {
        Self::new(
            &config.extract_base_url,
            api_key,
            &config.extract_model,
            config.request_timeout_secs.saturating_mul(4),
            config.max_retries,
            config.retry_backoff_base_secs,
        )
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn request_once(&self, prompt: &str) -> Result<String, BackendError> {
        let body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            response_format: ResponseFormat {
                kind: "json_object",
            },
            temperature: 0.0,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.trim().parse::<u64>().ok())
                .unwrap_or(0);
            return Err(BackendError::RateLimited { retry_after_secs });
        }

        let text = response.text().await?;

        if !status.is_success() {
            return Err(BackendError::Status {
                status: status.as_u16(),
                message: error_message(&text),
            });
        }

        let parsed: ChatResponse =
            serde_json::from_str(&text).map_err(|source| BackendError::Deserialize {
                context: "chat completion response".to_owned(),
                source,
            })?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(BackendError::EmptyCompletion)
    }
}

fn error_message(body: &str) -> String {
    if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) {
        return envelope.error.message;
    }
    body.trim().chars().take(MAX_ERROR_MESSAGE_CHARS).collect()
}

#[async_trait]
impl ExtractionService for OpenAiClient {
    async fn complete(&self, prompt: &str) -> Result<String, BackendError> {
        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            self.request_once(prompt)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_base_url_without_double_slash() {
        let client = OpenAiClient::new("http://localhost:1234/v1/", "k", "m", 5, 0, 0).unwrap();
        assert_eq!(client.endpoint(), "http://localhost:1234/v1/chat/completions");
    }

    #[test]
    fn error_message_prefers_api_error_envelope() {
        let body = r#"{"error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}}"#;
        assert_eq!(error_message(body), "Incorrect API key provided");
    }

    #[test]
    fn error_message_truncates_plain_bodies() {
        let body = "x".repeat(MAX_ERROR_MESSAGE_CHARS * 2);
        assert_eq!(error_message(&body).len(), MAX_ERROR_MESSAGE_CHARS);
    }

    #[test]
    fn debug_redacts_api_key() {
        let client = OpenAiClient::new("http://localhost/v1", "sk-secret", "m", 5, 0, 0).unwrap();
        let rendered = format!("{client:?}");
        assert!(!rendered.contains("sk-secret"));
    }

    #[test]
    fn request_serializes_json_object_format() {
        let body = ChatRequest {
            model: "gpt-4o-mini",
            messages: [
                ChatMessage {
                    role: "system",
                    content: "s",
                },
                ChatMessage {
                    role: "user",
                    content: "u",
                },
            ],
            response_format: ResponseFormat {
                kind: "json_object",
            },
            temperature: 0.0,
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["response_format"]["type"], "json_object");
        assert_eq!(value["messages"][1]["role"], "user");
        assert_eq!(value["messages"][1]["content"], "u");
    }
}

/// LLM client. The single point of entry for all model calls in the matcher.
///
/// ARCHITECTURAL RULE: No other module may call the completion endpoint directly.
/// All model interactions go through the `ModelGateway` trait, implemented here by
/// `LlmClient` against an OpenAI-compatible `/chat/completions` endpoint.
///
/// The gateway only moves text. It never interprets content; that is the job of
/// `normalize` and the analysis stages.
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

pub mod normalize;
pub mod prompts;
#[cfg(test)]
pub mod testing;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("HTTP error: {0}")]
    Http(#[source] reqwest::Error),

    #[error("Model call timed out after {0:?}")]
    Timeout(Duration),

    #[error("Model endpoint rejected the credentials (status {0})")]
    Unauthorized(u16),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Model returned empty content")]
    EmptyContent,

    #[error("Model gateway is shutting down")]
    Unavailable,
}

/// Per-stage sampling and transport settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSettings {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
    pub timeout: Duration,
}

/// One system + user exchange sent to the model.
#[derive(Debug, Clone, Copy)]
pub struct CompletionRequest<'a> {
    pub system: &'a str,
    pub user: &'a str,
    pub settings: &'a ModelSettings,
}

/// Anything that can turn a system instruction and user payload into raw model text.
///
/// Carried in `AppState` as `Arc<dyn ModelGateway>` so tests can substitute a double.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, GatewayError>;
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl ChatCompletionResponse {
    /// Extracts the text of the first choice, if it carries any.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .filter(|t| !t.trim().is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// The model client used by both analysis stages.
/// One attempt per call; concurrency across requests is bounded by a shared semaphore.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    endpoint: String,
    permits: Arc<Semaphore>,
}

impl LlmClient {
    pub fn new(api_key: String, base_url: &str, max_concurrent_calls: usize) -> anyhow::Result<Self> {
        Ok(Self {
            client: Client::builder().build()?,
            api_key,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            permits: Arc::new(Semaphore::new(max_concurrent_calls.max(1))),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Makes one call to the completion endpoint, returning the full response object.
    pub async fn call(
        &self,
        request: CompletionRequest<'_>,
    ) -> Result<ChatCompletionResponse, GatewayError> {
        let settings = request.settings;
        let body = ChatCompletionRequest {
            model: &settings.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: request.system,
                },
                ChatMessage {
                    role: "user",
                    content: request.user,
                },
            ],
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
        };

        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| GatewayError::Unavailable)?;

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .timeout(settings.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| classify_transport_error(e, settings.timeout))?;

        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            warn!("Model endpoint rejected credentials: {status}");
            return Err(GatewayError::Unauthorized(status.as_u16()));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Model endpoint returned {status}: {body}");
            let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(GatewayError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| classify_transport_error(e, settings.timeout))?;

        if let Some(usage) = &completion.usage {
            debug!(
                "Model call succeeded: model={}, prompt_tokens={}, completion_tokens={}",
                settings.model, usage.prompt_tokens, usage.completion_tokens
            );
        }

        Ok(completion)
    }
}

#[async_trait]
impl ModelGateway for LlmClient {
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, GatewayError> {
        let response = self.call(request).await?;
        response
            .text()
            .map(str::to_string)
            .ok_or(GatewayError::EmptyContent)
    }
}

fn classify_transport_error(error: reqwest::Error, timeout: Duration) -> GatewayError {
    if error.is_timeout() {
        GatewayError::Timeout(timeout)
    } else {
        GatewayError::Http(error)
    }
}

//! OpenAI-compatible chat completion client.
//!
//! Works against the vendor API directly or through a gateway; which one is
//! decided by the credential strategy the client is constructed with.

use super::{ChatCompletion, CompletionOptions, UpstreamError};
use crate::auth::{sanitize_for_logging, CredentialProvider};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error};

/// Client for any service implementing the OpenAI chat completions API.
pub struct OpenAiChatClient {
    client: Client,
    base_url: String,
    model: String,
    options: CompletionOptions,
    credentials: Arc<dyn CredentialProvider>,
}

impl OpenAiChatClient {
    /// Create a new client.
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the API (e.g., "https://api.openai.com/v1").
    /// * `model` - Model to use (e.g., "gpt-3.5-turbo").
    /// * `options` - Sampling options and timeout applied to every request.
    /// * `credentials` - Strategy producing the bearer credential.
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        options: CompletionOptions,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            base_url,
            model: model.into(),
            options,
            credentials,
        }
    }
}

#[async_trait]
impl ChatCompletion for OpenAiChatClient {
    fn name(&self) -> &str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, UpstreamError> {
        let url = format!("{}/chat/completions", self.base_url);

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt.to_string(),
                },
            ],
            max_tokens: self.options.max_tokens,
            temperature: self.options.temperature,
        };

        let token = self.credentials.bearer_token().await?;

        debug!(
            model = %self.model,
            url = %url,
            auth_strategy = %self.credentials.name(),
            authorization = %sanitize_for_logging(&format!("Bearer {}", token)),
            "Sending completion request"
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", token))
            .json(&request)
            .timeout(self.options.timeout)
            .send()
            .await
            .map_err(|e| {
                error!(url = %url, model = %self.model, error = %e, "Completion request failed");
                if e.is_timeout() {
                    UpstreamError::Timeout
                } else {
                    UpstreamError::Connection(e.to_string())
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| UpstreamError::Connection(e.to_string()))?;

        let parsed: ChatResponse = serde_json::from_str(&body).map_err(|e| {
            error!(body = %body, error = %e, "Failed to parse completion response");
            UpstreamError::InvalidResponse(e.to_string())
        })?;

        if let Some(api_error) = parsed.error {
            error!(
                error_type = %api_error.error_type,
                error_message = %api_error.message,
                status = status.as_u16(),
                "Completion API error"
            );
            return Err(UpstreamError::Api {
                status: status.as_u16(),
                message: api_error.message,
            });
        }

        if status != reqwest::StatusCode::OK {
            error!(status = status.as_u16(), body = %body, "Completion API returned non-200 status");
            return Err(UpstreamError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(UpstreamError::NoChoices)?;

        debug!(model = %self.model, "Received completion response");

        Ok(content)
    }
}

// OpenAI API wire types

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: String,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    message: String,
    #[serde(rename = "type", default)]
    error_type: String,
}

//! Chat-completion client abstraction.
//!
//! The orchestrator depends on the [`ChatCompletion`] trait rather than a
//! concrete HTTP client, so tests can substitute a scripted backend.

mod openai;

pub use openai::OpenAiChatClient;

use crate::auth::AuthError;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Options applied to every completion request.
#[derive(Debug, Clone)]
pub struct CompletionOptions {
    /// Temperature for sampling (0.0 = deterministic, 1.0 = creative).
    pub temperature: f32,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Request timeout.
    pub timeout: Duration,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            temperature: 0.8,
            max_tokens: 1000,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Errors that can occur during a completion call.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Request timeout")]
    Timeout,

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("No choices in completion response")]
    NoChoices,
}

/// A chat-completion backend.
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    /// Name of the backend, for logs.
    fn name(&self) -> &str;

    /// Model identifier requests are issued with.
    fn model(&self) -> &str;

    /// Send a system + user prompt pair and return the generated text.
    async fn complete(&self, system_prompt: &str, user_prompt: &str)
        -> Result<String, UpstreamError>;
}

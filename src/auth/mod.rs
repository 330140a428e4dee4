//! Credential strategies for the upstream completion API.
//!
//! The completion client needs a bearer credential for its `Authorization`
//! header. Two strategies exist: a static vendor API key, and an OAuth2
//! client-credentials token fetched from a gateway token endpoint and cached
//! until shortly before expiry.

mod oauth;
mod redact;

pub use oauth::{OAuthClientCredentials, OAuthConfig};
pub use redact::sanitize_for_logging;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur while acquiring a credential.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Token request timeout")]
    Timeout,

    #[error("Token endpoint returned status {status}: {body}")]
    Endpoint { status: u16, body: String },

    #[error("OAuth error: {error} - {description}")]
    OAuth { error: String, description: String },

    #[error("Invalid token response: {0}")]
    InvalidResponse(String),

    #[error("Received empty access token")]
    EmptyToken,
}

/// Produces the bearer credential injected into outbound requests.
///
/// Implementations must be cheap to call on the happy path; the completion
/// client asks for a token on every request.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Name of the strategy, for logs.
    fn name(&self) -> &str;

    /// Get a credential valid for at least the duration of one outbound call.
    async fn bearer_token(&self) -> Result<String, AuthError>;
}

/// Static vendor API key used directly as the bearer credential.
pub struct StaticApiKey {
    key: String,
}

impl StaticApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

#[async_trait]
impl CredentialProvider for StaticApiKey {
    fn name(&self) -> &str {
        "api-key"
    }

    async fn bearer_token(&self) -> Result<String, AuthError> {
        Ok(self.key.clone())
    }
}

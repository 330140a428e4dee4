//! OAuth2 client-credentials token cache.
//!
//! Holds a single bearer token per process and refreshes it lazily when it is
//! absent or within 30 seconds of expiry. Concurrent cache misses collapse
//! into a single exchange against the token endpoint.

use super::{sanitize_for_logging, AuthError, CredentialProvider};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, error};

/// A token this close to expiry is treated as stale.
const EXPIRY_BUFFER: Duration = Duration::from_secs(30);

/// Lifetime assumed when the endpoint omits `expires_in`.
const DEFAULT_EXPIRES_IN_SECS: u64 = 3600;

/// Timeout for the token exchange request.
const TOKEN_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for the client-credentials exchange.
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    pub token_endpoint: String,
    pub client_id: String,
    pub client_secret: String,
    pub scope: Option<String>,
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: Instant,
}

impl CachedToken {
    fn is_fresh(&self, now: Instant) -> bool {
        now + EXPIRY_BUFFER < self.expires_at
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: String,
    #[serde(default)]
    token_type: String,
    #[serde(default)]
    expires_in: i64,
    #[serde(default)]
    error: String,
    #[serde(default)]
    error_description: String,
}

/// Credential strategy backed by an OAuth2 client-credentials exchange.
pub struct OAuthClientCredentials {
    client: Client,
    config: OAuthConfig,
    cached: RwLock<Option<CachedToken>>,
}

impl OAuthClientCredentials {
    pub fn new(config: OAuthConfig) -> Self {
        let client = Client::builder()
            .timeout(TOKEN_REQUEST_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            config,
            cached: RwLock::new(None),
        }
    }

    /// Performs the form-encoded client-credentials exchange.
    ///
    /// No retry here; the caller decides whether to retry the whole request.
    async fn exchange(&self) -> Result<CachedToken, AuthError> {
        let mut form = vec![
            ("grant_type", "client_credentials".to_string()),
            ("client_id", self.config.client_id.clone()),
            ("client_secret", self.config.client_secret.clone()),
        ];
        if let Some(scope) = &self.config.scope {
            form.push(("scope", scope.clone()));
        }

        debug!(
            token_endpoint = %self.config.token_endpoint,
            client_id = %sanitize_for_logging(&self.config.client_id),
            scope = %self.config.scope.as_deref().unwrap_or(""),
            "Requesting access token"
        );

        let response = self
            .client
            .post(&self.config.token_endpoint)
            .header("Accept", "application/json")
            .form(&form)
            .send()
            .await
            .map_err(|e| {
                error!(
                    token_endpoint = %self.config.token_endpoint,
                    error = %e,
                    "Token request failed"
                );
                if e.is_timeout() {
                    AuthError::Timeout
                } else {
                    AuthError::Connection(e.to_string())
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AuthError::Connection(e.to_string()))?;

        let token: TokenResponse = serde_json::from_str(&body).map_err(|e| {
            error!(body = %body, error = %e, "Failed to parse token response");
            AuthError::InvalidResponse(e.to_string())
        })?;

        if !token.error.is_empty() {
            error!(
                error = %token.error,
                error_description = %token.error_description,
                status = status.as_u16(),
                "Token endpoint returned an error"
            );
            return Err(AuthError::OAuth {
                error: token.error,
                description: token.error_description,
            });
        }

        if status != reqwest::StatusCode::OK {
            error!(status = status.as_u16(), body = %body, "Token endpoint returned non-200 status");
            return Err(AuthError::Endpoint {
                status: status.as_u16(),
                body,
            });
        }

        if token.access_token.is_empty() {
            return Err(AuthError::EmptyToken);
        }

        let expires_in = if token.expires_in > 0 {
            token.expires_in as u64
        } else {
            DEFAULT_EXPIRES_IN_SECS
        };

        debug!(
            token_type = %token.token_type,
            expires_in,
            "Obtained access token"
        );

        Ok(CachedToken {
            value: token.access_token,
            expires_at: Instant::now() + Duration::from_secs(expires_in),
        })
    }
}

#[async_trait]
impl CredentialProvider for OAuthClientCredentials {
    fn name(&self) -> &str {
        "oauth"
    }

    async fn bearer_token(&self) -> Result<String, AuthError> {
        {
            let cached = self.cached.read().await;
            if let Some(token) = cached.as_ref() {
                if token.is_fresh(Instant::now()) {
                    return Ok(token.value.clone());
                }
            }
        }

        let mut cached = self.cached.write().await;

        // Re-check under the write lock; another task may have refreshed
        // while this one was waiting.
        if let Some(token) = cached.as_ref() {
            if token.is_fresh(Instant::now()) {
                return Ok(token.value.clone());
            }
        }

        let token = self.exchange().await?;
        let value = token.value.clone();
        *cached = Some(token);
        Ok(value)
    }
}

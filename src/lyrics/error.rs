//! Error taxonomy for the generation flow.

use crate::auth::AuthError;
use crate::completion::UpstreamError;
use thiserror::Error;

/// A request failed a documented input constraint.
///
/// The message always names the offending field and lists the valid options
/// where a fixed vocabulary applies.
#[derive(Debug, Error)]
#[error("{code}: {message}")]
pub struct ValidationError {
    /// Stable machine-readable code, e.g. "invalid_genre".
    pub code: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Errors that can occur while generating lyrics.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Authentication failed: {0}")]
    Auth(AuthError),

    #[error("Completion failed: {0}")]
    Upstream(UpstreamError),
}

impl From<UpstreamError> for GenerateError {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::Auth(err) => GenerateError::Auth(err),
            other => GenerateError::Upstream(other),
        }
    }
}

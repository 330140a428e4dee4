mod file_config;

pub use file_config::{FileConfig, UpstreamFileConfig};

use crate::server::RequestsLoggingLevel;
use anyhow::{bail, Result};
use clap::ValueEnum;

/// Environment variable holding the vendor API key.
pub const ENV_API_KEY: &str = "VERSEFORGE_API_KEY";
/// Environment variable holding the OAuth client id.
pub const ENV_OAUTH_CLIENT_ID: &str = "VERSEFORGE_OAUTH_CLIENT_ID";
/// Environment variable holding the OAuth client secret.
pub const ENV_OAUTH_CLIENT_SECRET: &str = "VERSEFORGE_OAUTH_CLIENT_SECRET";

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub port: u16,
    pub metrics_port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub model: String,
    pub base_url: Option<String>,
    pub token_endpoint: Option<String>,
    pub scope: Option<String>,
    pub upstream_timeout_sec: u64,
}

/// Credential material for the upstream API.
///
/// Read from the environment rather than CLI or TOML so secrets stay out of
/// shell history and config files.
#[derive(Debug, Clone, Default)]
pub struct EnvCredentials {
    pub api_key: Option<String>,
    pub oauth_client_id: Option<String>,
    pub oauth_client_secret: Option<String>,
}

impl EnvCredentials {
    pub fn from_env() -> Self {
        let read = |name: &str| std::env::var(name).ok().filter(|value| !value.is_empty());
        Self {
            api_key: read(ENV_API_KEY),
            oauth_client_id: read(ENV_OAUTH_CLIENT_ID),
            oauth_client_secret: read(ENV_OAUTH_CLIENT_SECRET),
        }
    }
}

/// The resolved credential strategy.
#[derive(Debug, Clone)]
pub enum CredentialsConfig {
    /// Direct vendor authentication with a static API key.
    ApiKey { key: String },
    /// Gateway authentication with OAuth2 client credentials.
    OAuth {
        client_id: String,
        client_secret: String,
        token_endpoint: String,
        scope: Option<String>,
    },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub metrics_port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub model: String,
    pub base_url: String,
    pub upstream_timeout_sec: u64,
    pub credentials: CredentialsConfig,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments, optional TOML file config,
    /// and environment credentials. TOML values override CLI values where
    /// present.
    pub fn resolve(
        cli: &CliConfig,
        file_config: Option<FileConfig>,
        credentials: &EnvCredentials,
    ) -> Result<Self> {
        let file = file_config.unwrap_or_default();
        let upstream = file.upstream.unwrap_or_default();

        let port = file.port.unwrap_or(cli.port);
        let metrics_port = file.metrics_port.unwrap_or(cli.metrics_port);

        let logging_level = file
            .logging_level
            .and_then(|s| parse_logging_level(&s))
            .unwrap_or_else(|| cli.logging_level.clone());

        let model = file.model.unwrap_or_else(|| cli.model.clone());

        let base_url = upstream
            .base_url
            .or_else(|| cli.base_url.clone())
            .ok_or_else(|| {
                anyhow::anyhow!("base_url must be specified via --base-url or in config file")
            })?;

        let token_endpoint = upstream
            .token_endpoint
            .or_else(|| cli.token_endpoint.clone());
        let scope = upstream.scope.or_else(|| cli.scope.clone());
        let upstream_timeout_sec = upstream.timeout_sec.unwrap_or(cli.upstream_timeout_sec);

        let credentials = resolve_credentials(credentials, token_endpoint, scope)?;

        Ok(Self {
            port,
            metrics_port,
            logging_level,
            model,
            base_url,
            upstream_timeout_sec,
            credentials,
        })
    }
}

fn resolve_credentials(
    env: &EnvCredentials,
    token_endpoint: Option<String>,
    scope: Option<String>,
) -> Result<CredentialsConfig> {
    let has_oauth = env.oauth_client_id.is_some() || env.oauth_client_secret.is_some();

    match (&env.api_key, has_oauth) {
        (Some(_), true) => {
            bail!(
                "Both {} and {}/{} are set; configure exactly one credential strategy",
                ENV_API_KEY,
                ENV_OAUTH_CLIENT_ID,
                ENV_OAUTH_CLIENT_SECRET
            );
        }
        (Some(key), false) => Ok(CredentialsConfig::ApiKey { key: key.clone() }),
        (None, true) => {
            let client_id = env.oauth_client_id.clone().ok_or_else(|| {
                anyhow::anyhow!("{} is required with OAuth credentials", ENV_OAUTH_CLIENT_ID)
            })?;
            let client_secret = env.oauth_client_secret.clone().ok_or_else(|| {
                anyhow::anyhow!(
                    "{} is required with OAuth credentials",
                    ENV_OAUTH_CLIENT_SECRET
                )
            })?;
            let token_endpoint = token_endpoint.ok_or_else(|| {
                anyhow::anyhow!(
                    "token_endpoint must be specified via --token-endpoint or in config file \
                     when using OAuth credentials"
                )
            })?;
            Ok(CredentialsConfig::OAuth {
                client_id,
                client_secret,
                token_endpoint,
                scope,
            })
        }
        (None, false) => {
            bail!(
                "No credentials configured; set {} for direct vendor access or {}/{} for \
                 gateway OAuth",
                ENV_API_KEY,
                ENV_OAUTH_CLIENT_ID,
                ENV_OAUTH_CLIENT_SECRET
            );
        }
    }
}

/// Parses a logging level string into RequestsLoggingLevel.
/// Uses clap's ValueEnum trait for parsing.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}

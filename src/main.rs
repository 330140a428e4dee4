use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use verseforge_server::auth::{
    sanitize_for_logging, CredentialProvider, OAuthClientCredentials, OAuthConfig, StaticApiKey,
};
use verseforge_server::completion::{ChatCompletion, CompletionOptions, OpenAiChatClient};
use verseforge_server::config::{AppConfig, CliConfig, CredentialsConfig, EnvCredentials, FileConfig};
use verseforge_server::lyrics::LyricsService;
use verseforge_server::server::{metrics, run_server, RequestsLoggingLevel, ServerConfig};

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to a TOML config file; values there override CLI arguments.
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, default_value_t = 8080)]
    pub port: u16,

    /// The port for the metrics server (Prometheus scraping).
    #[clap(long, default_value_t = 9091)]
    pub metrics_port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// Chat model completion requests are issued with.
    #[clap(long, default_value = "gpt-3.5-turbo")]
    pub model: String,

    /// Base URL of the completion API or gateway (e.g. "https://api.openai.com/v1").
    #[clap(long)]
    pub base_url: Option<String>,

    /// OAuth2 token endpoint, required with OAuth client credentials.
    #[clap(long)]
    pub token_endpoint: Option<String>,

    /// Optional OAuth2 scope.
    #[clap(long)]
    pub scope: Option<String>,

    /// Timeout in seconds for upstream requests.
    #[clap(long, default_value_t = 30)]
    pub upstream_timeout_sec: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .unwrap();

    let file_config = match &cli_args.config {
        Some(path) => Some(FileConfig::load(path)?),
        None => None,
    };

    let cli_config = CliConfig {
        port: cli_args.port,
        metrics_port: cli_args.metrics_port,
        logging_level: cli_args.logging_level,
        model: cli_args.model,
        base_url: cli_args.base_url,
        token_endpoint: cli_args.token_endpoint,
        scope: cli_args.scope,
        upstream_timeout_sec: cli_args.upstream_timeout_sec,
    };

    let app_config = AppConfig::resolve(&cli_config, file_config, &EnvCredentials::from_env())?;

    info!("Initializing metrics...");
    metrics::init_metrics();

    let credentials: Arc<dyn CredentialProvider> = match &app_config.credentials {
        CredentialsConfig::ApiKey { key } => {
            info!("Using direct vendor API key authentication");
            Arc::new(StaticApiKey::new(key.clone()))
        }
        CredentialsConfig::OAuth {
            client_id,
            client_secret,
            token_endpoint,
            scope,
        } => {
            info!(
                token_endpoint = %token_endpoint,
                client_id = %sanitize_for_logging(client_id),
                "Using OAuth client-credentials authentication"
            );
            Arc::new(OAuthClientCredentials::new(OAuthConfig {
                token_endpoint: token_endpoint.clone(),
                client_id: client_id.clone(),
                client_secret: client_secret.clone(),
                scope: scope.clone(),
            }))
        }
    };

    info!(
        base_url = %app_config.base_url,
        model = %app_config.model,
        "Initializing completion client"
    );
    let completion: Arc<dyn ChatCompletion> = Arc::new(OpenAiChatClient::new(
        app_config.base_url.clone(),
        app_config.model.clone(),
        CompletionOptions {
            timeout: Duration::from_secs(app_config.upstream_timeout_sec),
            ..Default::default()
        },
        credentials,
    ));

    let lyrics_service = Arc::new(LyricsService::new(completion));

    let server_config = ServerConfig {
        port: app_config.port,
        requests_logging_level: app_config.logging_level.clone(),
    };

    info!("Ready to serve at port {}!", app_config.port);
    info!("Metrics available at port {}!", app_config.metrics_port);
    run_server(server_config, app_config.metrics_port, lyrics_service).await
}

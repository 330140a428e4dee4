use anyhow::Result;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{error, info};

use axum::{
    extract::rejection::JsonRejection,
    extract::State,
    http::{header, Method, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};

use super::{log_requests, metrics, state::*, ServerConfig};
use crate::lyrics::{GenerateError, GenerationRequest, LyricsService};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp: DateTime<Utc>,
    version: &'static str,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

#[derive(Serialize)]
struct ServerStats {
    pub uptime: String,
    pub hash: String,
    pub model: String,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

async fn home(State(state): State<ServerState>) -> impl IntoResponse {
    let stats = ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
        hash: state.hash.clone(),
        model: state.lyrics_service.model().to_string(),
    };
    Json(stats)
}

async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        timestamp: Utc::now(),
        version: VERSION,
    })
}

async fn generate_lyrics(
    State(service): State<GuardedLyricsService>,
    payload: Result<Json<GenerationRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(json) => json,
        Err(rejection) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "invalid_request".to_string(),
                    message: rejection.body_text(),
                }),
            )
                .into_response();
        }
    };

    let start = Instant::now();
    match service.generate(request).await {
        Ok(response) => {
            metrics::record_generation("ok", start.elapsed());
            Json(response).into_response()
        }
        Err(GenerateError::Validation(err)) => {
            metrics::record_generation("invalid", start.elapsed());
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: err.code.to_string(),
                    message: err.message,
                }),
            )
                .into_response()
        }
        Err(err) => {
            // The detail stays in the logs; callers get a generic message.
            error!("Error generating lyrics: {}", err);
            metrics::record_generation("failed", start.elapsed());
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "generation_failed".to_string(),
                    message: "Failed to generate lyrics. Please try again.".to_string(),
                }),
            )
                .into_response()
        }
    }
}

impl ServerState {
    fn new(config: ServerConfig, lyrics_service: Arc<LyricsService>) -> ServerState {
        ServerState {
            config,
            start_time: Instant::now(),
            lyrics_service,
            hash: env!("GIT_HASH").to_owned(),
        }
    }
}

pub fn make_app(config: ServerConfig, lyrics_service: Arc<LyricsService>) -> Router {
    let state = ServerState::new(config, lyrics_service);

    let api_routes: Router = Router::new()
        .route("/generate", post(generate_lyrics))
        .with_state(state.clone());

    let root_routes: Router = Router::new()
        .route("/", get(home))
        .route("/health", get(health_check))
        .with_state(state.clone());

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    root_routes
        .nest("/api/v1", api_routes)
        .layer(cors)
        .layer(middleware::from_fn_with_state(state, log_requests))
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", err);
        return;
    }
    info!("Received shutdown signal, draining in-flight requests");
}

pub async fn run_server(
    config: ServerConfig,
    metrics_port: u16,
    lyrics_service: Arc<LyricsService>,
) -> Result<()> {
    let port = config.port;
    let app = make_app(config, lyrics_service);

    let metrics_app: Router = Router::new().route("/metrics", get(metrics::metrics_handler));
    let metrics_listener =
        tokio::net::TcpListener::bind(format!("0.0.0.0:{}", metrics_port)).await?;
    tokio::spawn(async move {
        if let Err(err) = axum::serve(metrics_listener, metrics_app).await {
            error!("Metrics server stopped: {}", err);
        }
    });

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    Ok(axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?)
}

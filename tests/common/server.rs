//! Test server lifecycle management
//!
//! Each test gets an isolated application server wired to its own mock
//! upstream (and, for the OAuth variant, its own mock token endpoint).

use super::constants::*;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use verseforge_server::auth::{CredentialProvider, OAuthClientCredentials, OAuthConfig, StaticApiKey};
use verseforge_server::completion::{CompletionOptions, OpenAiChatClient};
use verseforge_server::lyrics::LyricsService;
use verseforge_server::server::server::make_app;
use verseforge_server::server::{RequestsLoggingLevel, ServerConfig};

/// What the mock completion endpoint replies with.
#[derive(Clone)]
pub enum UpstreamBehavior {
    /// 200 with one choice containing the given text.
    Lyrics(String),
    /// The given status with a JSON body containing no error object.
    Status(u16),
    /// 200 with a populated top-level error object.
    ApiError(String),
    /// 200 with an empty choices array.
    NoChoices,
}

#[derive(Clone)]
struct MockUpstreamState {
    behavior: UpstreamBehavior,
    requests: Arc<AtomicUsize>,
    last_body: Arc<Mutex<Option<serde_json::Value>>>,
    last_authorization: Arc<Mutex<Option<String>>>,
}

async fn completions_handler(
    State(state): State<MockUpstreamState>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> Response {
    state.requests.fetch_add(1, Ordering::SeqCst);
    *state.last_body.lock().unwrap() = Some(body);
    *state.last_authorization.lock().unwrap() = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string());

    match &state.behavior {
        UpstreamBehavior::Lyrics(text) => Json(serde_json::json!({
            "id": "chatcmpl-test",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": text},
                "finish_reason": "stop",
            }],
        }))
        .into_response(),
        UpstreamBehavior::Status(status) => (
            StatusCode::from_u16(*status).unwrap(),
            Json(serde_json::json!({"choices": []})),
        )
            .into_response(),
        UpstreamBehavior::ApiError(message) => Json(serde_json::json!({
            "error": {"message": message, "type": "server_error"},
        }))
        .into_response(),
        UpstreamBehavior::NoChoices => {
            Json(serde_json::json!({"choices": []})).into_response()
        }
    }
}

#[derive(Clone)]
struct MockTokenEndpointState {
    exchanges: Arc<AtomicUsize>,
}

async fn token_handler(State(state): State<MockTokenEndpointState>, body: String) -> Response {
    assert!(
        body.contains("grant_type=client_credentials"),
        "Token request must use the client_credentials grant"
    );

    let count = state.exchanges.fetch_add(1, Ordering::SeqCst) + 1;
    Json(serde_json::json!({
        "access_token": format!("gateway-token-{}", count),
        "token_type": "Bearer",
        "expires_in": 3600,
    }))
    .into_response()
}

async fn spawn_router(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().expect("Failed to get local address");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    format!("http://{}", addr)
}

/// Test application instance wired to a mock upstream.
pub struct TestServer {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    /// Number of requests the mock completion endpoint received.
    pub upstream_requests: Arc<AtomicUsize>,

    /// Number of exchanges the mock token endpoint served (OAuth variant).
    pub token_exchanges: Arc<AtomicUsize>,

    /// The last request body the mock completion endpoint received.
    pub last_upstream_body: Arc<Mutex<Option<serde_json::Value>>>,

    /// The last Authorization header the mock completion endpoint received.
    pub last_authorization: Arc<Mutex<Option<String>>>,
}

impl TestServer {
    /// Spawns a server using API-key auth and the default sample lyrics.
    pub async fn spawn() -> Self {
        Self::spawn_with_behavior(UpstreamBehavior::Lyrics(SAMPLE_LYRICS.to_string())).await
    }

    /// Spawns a server using API-key auth and a scripted upstream.
    pub async fn spawn_with_behavior(behavior: UpstreamBehavior) -> Self {
        let credentials: Arc<dyn CredentialProvider> = Arc::new(StaticApiKey::new("sk-e2e-test"));
        Self::spawn_inner(behavior, credentials, Arc::new(AtomicUsize::new(0))).await
    }

    /// Spawns a server using OAuth client-credentials auth against a mock
    /// token endpoint.
    pub async fn spawn_with_oauth() -> Self {
        let exchanges = Arc::new(AtomicUsize::new(0));

        let token_app = Router::new()
            .route("/oauth2/token", post(token_handler))
            .with_state(MockTokenEndpointState {
                exchanges: exchanges.clone(),
            });
        let token_base_url = spawn_router(token_app).await;

        let credentials: Arc<dyn CredentialProvider> =
            Arc::new(OAuthClientCredentials::new(OAuthConfig {
                token_endpoint: format!("{}/oauth2/token", token_base_url),
                client_id: "e2e-client".to_string(),
                client_secret: "e2e-secret".to_string(),
                scope: Some("lyrics".to_string()),
            }));

        Self::spawn_inner(
            UpstreamBehavior::Lyrics(SAMPLE_LYRICS.to_string()),
            credentials,
            exchanges,
        )
        .await
    }

    async fn spawn_inner(
        behavior: UpstreamBehavior,
        credentials: Arc<dyn CredentialProvider>,
        token_exchanges: Arc<AtomicUsize>,
    ) -> Self {
        let upstream_requests = Arc::new(AtomicUsize::new(0));
        let last_upstream_body = Arc::new(Mutex::new(None));
        let last_authorization = Arc::new(Mutex::new(None));

        let upstream_app = Router::new()
            .route("/chat/completions", post(completions_handler))
            .with_state(MockUpstreamState {
                behavior,
                requests: upstream_requests.clone(),
                last_body: last_upstream_body.clone(),
                last_authorization: last_authorization.clone(),
            });
        let upstream_base_url = spawn_router(upstream_app).await;

        let completion = Arc::new(OpenAiChatClient::new(
            upstream_base_url,
            "gpt-3.5-turbo",
            CompletionOptions::default(),
            credentials,
        ));
        let lyrics_service = Arc::new(LyricsService::new(completion));

        let config = ServerConfig {
            requests_logging_level: RequestsLoggingLevel::None,
            ..Default::default()
        };
        let app = make_app(config, lyrics_service);
        let base_url = spawn_router(app).await;

        let server = Self {
            base_url,
            upstream_requests,
            token_exchanges,
            last_upstream_body,
            last_authorization,
        };

        server.wait_for_ready().await;

        server
    }

    /// Waits for the server to become ready by polling the health endpoint.
    async fn wait_for_ready(&self) {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .expect("Failed to build reqwest client");

        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(SERVER_READY_TIMEOUT_MS);

        loop {
            if start.elapsed() > timeout {
                panic!(
                    "Server did not become ready within {}ms",
                    SERVER_READY_TIMEOUT_MS
                );
            }

            match client.get(format!("{}/health", self.base_url)).send().await {
                Ok(response) if response.status().is_success() => {
                    return;
                }
                _ => {
                    tokio::time::sleep(Duration::from_millis(SERVER_READY_POLL_INTERVAL_MS)).await;
                }
            }
        }
    }
}

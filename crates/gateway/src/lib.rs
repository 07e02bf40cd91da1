//! HTTP gateway for Avatarline.
//!
//! Serves the browser client:
//! - the avatar proxy (`POST /token`, `GET /avatars`), so the vendor key
//!   never leaves the server
//! - the `getNextResponseFromSupervisor` tool and front-agent sessions
//!   under `/v1`
//!
//! Built on Axum.

pub mod api_v1;

#[cfg(test)]
pub(crate) mod test_support;

use axum::extract::DefaultBodyLimit;
use axum::{
    Router,
    extract::State,
    http::{HeaderValue, StatusCode},
    middleware::{self, Next},
    response::Json,
    routing::{get, post},
};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{error, info, warn};

use avatarline_agent::{DelegationLoop, FrontAgent, SupervisorHandoff};
use avatarline_config::AppConfig;
use avatarline_core::avatar::{AvatarList, AvatarVendor};
use avatarline_core::error::AvatarError;
use avatarline_core::event::EventBus;
use avatarline_core::knowledge::KnowledgeProvider;
use avatarline_core::supervisor::SupervisorClient;
use avatarline_providers::{HeyGenClient, ResponsesClient};
use avatarline_tools::{StaticKnowledgeBase, ToolExecutor};

/// A server-side front-agent conversation.
pub struct Session {
    pub agent: FrontAgent,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Shared application state for the gateway.
pub struct GatewayState {
    pub config: AppConfig,
    pub avatar: Arc<dyn AvatarVendor>,
    pub handoff: SupervisorHandoff,
    pub event_bus: Arc<EventBus>,
    /// Each session has its own lock so turns in different sessions never wait on each other
    pub sessions: RwLock<HashMap<String, Arc<Mutex<Session>>>>,
    pub start_time: chrono::DateTime<chrono::Utc>,
}

pub type SharedState = Arc<GatewayState>;

impl GatewayState {
    /// Wire the delegation loop and avatar vendor from their parts.
    pub fn new(
        config: AppConfig,
        client: Arc<dyn SupervisorClient>,
        avatar: Arc<dyn AvatarVendor>,
        knowledge: Arc<dyn KnowledgeProvider>,
    ) -> Self {
        let event_bus = Arc::new(EventBus::default());
        let delegation = DelegationLoop::from_config(
            &config,
            client,
            ToolExecutor::new(knowledge),
            event_bus.clone(),
        );
        Self {
            config,
            avatar,
            handoff: SupervisorHandoff::new(Arc::new(delegation)),
            event_bus,
            sessions: RwLock::new(HashMap::new()),
            start_time: chrono::Utc::now(),
        }
    }

    /// A fresh front agent sharing this gateway's delegation loop.
    pub fn new_front_agent(&self) -> FrontAgent {
        FrontAgent::new(self.handoff.clone(), &self.config.front)
    }
}

/// Build the full router.
///
/// Layers applied:
/// - CORS restricted to the configured browser origin
/// - Request body size limit (1 MB)
/// - In-memory rate limiting (per minute, per client)
/// - HTTP trace logging
pub fn build_router(state: SharedState) -> Router {
    let cors = cors_layer(&state.config.gateway.allowed_origin);
    let rate_limiter = Arc::new(RateLimiter::new(
        state.config.gateway.rate_limit_per_minute,
        std::time::Duration::from_secs(60),
    ));

    Router::new()
        .route("/health", get(health_handler))
        .route("/token", post(token_handler))
        .route("/avatars", get(avatars_handler))
        .with_state(state.clone())
        .nest("/v1", api_v1::v1_router(state))
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .layer(middleware::from_fn(move |req, next| {
            let limiter = rate_limiter.clone();
            rate_limit_middleware(limiter, req, next)
        }))
        .layer(cors)
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

fn cors_layer(allowed_origin: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::AUTHORIZATION,
        ])
        .max_age(std::time::Duration::from_secs(3600));

    match HeaderValue::from_str(allowed_origin) {
        Ok(origin) => layer.allow_origin(AllowOrigin::exact(origin)),
        Err(_) => {
            warn!(origin = %allowed_origin, "Invalid gateway.allowed_origin, cross-origin requests disabled");
            layer
        }
    }
}

/// Start the gateway HTTP server.
pub async fn start(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);

    if !config.has_supervisor_key() {
        warn!("No supervisor API key configured; delegations will fail until one is set");
    }
    if !config.has_avatar_key() {
        warn!("No HeyGen API key configured; /token and /avatars will return 500");
    }

    let client: Arc<dyn SupervisorClient> = Arc::new(ResponsesClient::from_config(&config.supervisor)?);
    let avatar: Arc<dyn AvatarVendor> = Arc::new(HeyGenClient::from_config(&config.avatar)?);
    let knowledge: Arc<dyn KnowledgeProvider> =
        Arc::new(StaticKnowledgeBase::load(config.knowledge.fixtures_path.as_deref())?);

    let state = Arc::new(GatewayState::new(config, client, avatar, knowledge));
    let app = build_router(state);

    info!(addr = %addr, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// --- Rate Limiter ---

/// Simple in-memory sliding-window rate limiter.
///
/// Tracks request timestamps per client key.
/// Thread-safe via `std::sync::Mutex` (non-async, held briefly).
struct RateLimiter {
    max_requests: usize,
    window: std::time::Duration,
    clients: std::sync::Mutex<HashMap<String, Vec<std::time::Instant>>>,
}

impl RateLimiter {
    fn new(max_requests: usize, window: std::time::Duration) -> Self {
        Self {
            max_requests,
            window,
            clients: std::sync::Mutex::new(HashMap::new()),
        }
    }

    /// Returns `true` if the client is within its limit.
    fn check(&self, client_key: &str) -> bool {
        let now = std::time::Instant::now();
        let mut clients = self.clients.lock().unwrap_or_else(|e| e.into_inner());

        if clients.len() > 10_000 {
            clients.retain(|_, timestamps| {
                timestamps
                    .last()
                    .is_some_and(|t| now.duration_since(*t) < self.window)
            });
        }

        let timestamps = clients.entry(client_key.to_string()).or_default();
        timestamps.retain(|t| now.duration_since(*t) < self.window);

        if timestamps.len() >= self.max_requests {
            return false;
        }

        timestamps.push(now);
        true
    }
}

/// Keys clients by `Authorization`, then `X-Forwarded-For`, else "anonymous".
/// `/health` is exempt.
async fn rate_limit_middleware(
    limiter: Arc<RateLimiter>,
    req: axum::extract::Request,
    next: Next,
) -> Result<axum::response::Response, StatusCode> {
    if req.uri().path() == "/health" {
        return Ok(next.run(req).await);
    }

    let client_key = client_key_from(req.headers());

    if !limiter.check(&client_key) {
        warn!(client = %client_key.chars().take(20).collect::<String>(), "Rate limit exceeded");
        return Err(StatusCode::TOO_MANY_REQUESTS);
    }

    Ok(next.run(req).await)
}

fn client_key_from(headers: &axum::http::HeaderMap) -> String {
    ["Authorization", "X-Forwarded-For"]
        .iter()
        .find_map(|name| headers.get(*name).and_then(|v| v.to_str().ok()))
        .unwrap_or("anonymous")
        .to_string()
}

// --- Handlers ---

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    uptime_secs: i64,
}

async fn health_handler(State(state): State<SharedState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        uptime_secs: (chrono::Utc::now() - state.start_time).num_seconds(),
    })
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub(crate) fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

/// Map a vendor failure onto the proxy's response. Vendor statuses pass
/// through; everything else is a 500.
fn avatar_error(err: AvatarError, invalid_message: &str, network_message: &str) -> ApiError {
    error!(error = %err, "Avatar vendor request failed");
    match err {
        AvatarError::NotConfigured => api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            AvatarError::NotConfigured.to_string(),
        ),
        AvatarError::Vendor { status, message } => api_error(
            StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
            message,
        ),
        AvatarError::InvalidResponse(_) => {
            api_error(StatusCode::INTERNAL_SERVER_ERROR, invalid_message)
        }
        AvatarError::Network(_) => api_error(StatusCode::INTERNAL_SERVER_ERROR, network_message),
    }
}

#[derive(Serialize)]
struct TokenResponse {
    token: String,
}

async fn token_handler(State(state): State<SharedState>) -> Result<Json<TokenResponse>, ApiError> {
    let token = state.avatar.create_token().await.map_err(|e| {
        avatar_error(e, "Invalid token response from HeyGen", "Internal server error")
    })?;
    Ok(Json(TokenResponse { token: token.token }))
}

/// Relays the vendor's list body, envelope included.
async fn avatars_handler(State(state): State<SharedState>) -> Result<Json<AvatarList>, ApiError> {
    let list = state
        .avatar
        .list_avatars()
        .await
        .map_err(|e| avatar_error(e, "Failed to fetch avatars", "Failed to fetch avatars"))?;
    Ok(Json(list))
}

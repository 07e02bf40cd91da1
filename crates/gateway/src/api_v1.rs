//! HTTP API v1: the supervisor tool and front-agent sessions.
//!
//! Endpoints:
//!
//! - `GET  /v1/tools`: Front-agent instructions and its one tool
//! - `POST /v1/supervisor`: Execute `getNextResponseFromSupervisor`
//! - `POST /v1/sessions`: Start a front-agent session
//! - `GET  /v1/sessions/{id}`: Session transcript and policy state
//! - `POST /v1/sessions/{id}/turns`: Speak one utterance, get the agent's turn

use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

use avatarline_agent::citations::{self, Citation};
use avatarline_agent::prompts;
use avatarline_agent::supervisor_tool::{self, SupervisorToolInput, SupervisorToolOutput};
use avatarline_agent::{Intent, Utterance, UtteranceKind};
use avatarline_core::item::ConversationItem;
use avatarline_core::supervisor::ToolDefinition;

use crate::{ApiError, Session, SharedState, api_error};

/// Maximum number of in-memory sessions before oldest are evicted.
const MAX_SESSIONS: usize = 1_000;

pub fn v1_router(state: SharedState) -> Router {
    Router::new()
        .route("/tools", get(list_tools_handler))
        .route("/supervisor", post(supervisor_handler))
        .route("/sessions", post(create_session_handler))
        .route("/sessions/{id}", get(get_session_handler))
        .route("/sessions/{id}/turns", post(turn_handler))
        .with_state(state)
}

// ── Tools ─────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct ToolListResponse {
    instructions: String,
    tools: Vec<ToolDefinition>,
}

async fn list_tools_handler(State(state): State<SharedState>) -> Json<ToolListResponse> {
    Json(ToolListResponse {
        instructions: prompts::front_agent_instructions(&state.config.front),
        tools: vec![supervisor_tool::definition()],
    })
}

// ── Supervisor tool ───────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct SupervisorCallRequest {
    #[serde(flatten)]
    input: SupervisorToolInput,
    #[serde(default)]
    history: Vec<ConversationItem>,
}

/// A UI-facing record of one tool call or result inside the delegation.
#[derive(Debug, Clone, Serialize)]
struct Breadcrumb {
    title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<serde_json::Value>,
}

#[derive(Serialize)]
struct SupervisorCallResponse {
    #[serde(flatten)]
    output: SupervisorToolOutput,
    breadcrumbs: Vec<Breadcrumb>,
}

/// Failures come back as `{"error": ...}` with 200: they are tool results for
/// the front agent, not transport errors.
async fn supervisor_handler(
    State(state): State<SharedState>,
    Json(req): Json<SupervisorCallRequest>,
) -> Json<SupervisorCallResponse> {
    let breadcrumbs = std::sync::Mutex::new(Vec::new());
    let observer = |title: &str, data: Option<&serde_json::Value>| {
        breadcrumbs
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(Breadcrumb {
                title: title.to_string(),
                data: data.cloned(),
            });
    };

    let output = state
        .handoff
        .invoke(&req.history, &req.input, Some(&observer))
        .await;

    Json(SupervisorCallResponse {
        output,
        breadcrumbs: breadcrumbs.into_inner().unwrap_or_else(|e| e.into_inner()),
    })
}

// ── Sessions ──────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct SessionCreated {
    session_id: String,
    created_at: String,
}

async fn create_session_handler(
    State(state): State<SharedState>,
) -> (StatusCode, Json<SessionCreated>) {
    let id = uuid::Uuid::new_v4().to_string();
    let created_at = chrono::Utc::now();
    let session = Session {
        agent: state.new_front_agent(),
        created_at,
    };

    let mut sessions = state.sessions.write().await;
    if sessions.len() >= MAX_SESSIONS {
        let mut oldest: Option<(String, chrono::DateTime<chrono::Utc>)> = None;
        for (key, session) in sessions.iter() {
            // A session mid-turn is locked; it is not a candidate
            let Ok(session) = session.try_lock() else {
                continue;
            };
            if oldest.as_ref().is_none_or(|(_, at)| session.created_at < *at) {
                oldest = Some((key.clone(), session.created_at));
            }
        }
        if let Some((key, _)) = oldest {
            sessions.remove(&key);
        }
    }
    sessions.insert(id.clone(), Arc::new(Mutex::new(session)));
    info!(session_id = %id, "Session created");

    (
        StatusCode::CREATED,
        Json(SessionCreated {
            session_id: id,
            created_at: created_at.to_rfc3339(),
        }),
    )
}

async fn find_session(state: &SharedState, id: &str) -> Result<Arc<Mutex<Session>>, ApiError> {
    state
        .sessions
        .read()
        .await
        .get(id)
        .cloned()
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, format!("Session not found: {id}")))
}

#[derive(Serialize)]
struct SessionDetail {
    session_id: String,
    created_at: String,
    business_context_known: bool,
    transcript: Vec<ConversationItem>,
}

async fn get_session_handler(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<SessionDetail>, ApiError> {
    let session = find_session(&state, &id).await?;
    let session = session.lock().await;
    Ok(Json(SessionDetail {
        session_id: id,
        created_at: session.created_at.to_rfc3339(),
        business_context_known: session.agent.state().business_context_known,
        transcript: session.agent.transcript().to_vec(),
    }))
}

#[derive(Debug, Deserialize)]
struct TurnRequest {
    utterance: String,
    #[serde(default)]
    relevant_context: Option<String>,
}

#[derive(Serialize)]
struct TurnResponse {
    session_id: String,
    intent: Intent,
    utterances: Vec<Utterance>,
    delegated: bool,
    citations: Vec<Citation>,
}

async fn turn_handler(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(req): Json<TurnRequest>,
) -> Result<Json<TurnResponse>, ApiError> {
    if req.utterance.trim().is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "Utterance must not be empty"));
    }

    let session = find_session(&state, &id).await?;
    let mut session = session.lock().await;
    let record = session
        .agent
        .respond(&req.utterance, req.relevant_context.as_deref())
        .await;

    let sources = record
        .utterances
        .iter()
        .filter(|u| u.kind == UtteranceKind::Relay)
        .flat_map(|u| citations::extract(&u.text))
        .collect();

    Ok(Json(TurnResponse {
        session_id: id,
        intent: record.intent,
        utterances: record.utterances,
        delegated: record.delegated,
        citations: sources,
    }))
}

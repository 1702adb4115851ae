use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::{get, post},
    Json, Router,
};
use sa_core::{DecisionContext, FlowDecision};
use sa_router::EscalationTicket;
use sa_session::{ConversationSession, SessionStore};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

pub fn decision_routes() -> Router<AppState> {
    Router::new().route("/api/v1/decide", post(decide))
}

pub fn session_routes() -> Router<AppState> {
    Router::new().route("/api/v1/session/{user_id}", get(get_session).delete(reset_session))
}

#[derive(Debug, Deserialize)]
pub struct DecideRequest {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub context: DecisionContext,
}

#[derive(Debug, Serialize)]
pub struct DecideResponse {
    pub decision: FlowDecision,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub escalation_ticket: Option<EscalationTicket>,
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "uptime_secs": state.start_time.elapsed().as_secs(),
        "sessions": state.engine.sessions().len(),
    }))
}

async fn decide(
    State(state): State<AppState>,
    payload: Result<Json<DecideRequest>, JsonRejection>,
) -> Result<Json<DecideResponse>, ApiError> {
    let Json(req) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let user_id = req
        .user_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::bad_request("user_id is required"))?;
    let message = req.message.unwrap_or_default();

    let decision = state.engine.decide(user_id, &message, &req.context).await;

    let escalation_ticket = if decision.should_escalate {
        let text = match req.context.original_message.as_deref() {
            Some(original) if message.trim().is_empty() => original,
            _ => message.as_str(),
        };
        let session = state.engine.session(user_id);
        Some(EscalationTicket::seed(user_id, text, &decision, session.as_ref()))
    } else {
        None
    };

    Ok(Json(DecideResponse { reason: decision.reason(), decision, escalation_ticket }))
}

async fn get_session(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ConversationSession>, ApiError> {
    state
        .engine
        .session(&user_id)
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("no session for user {user_id}")))
}

async fn reset_session(State(state): State<AppState>, Path(user_id): Path<String>) -> Json<Value> {
    let reset = state.engine.reset_session(&user_id);
    Json(json!({ "reset": reset }))
}

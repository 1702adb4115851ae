use crate::error::ApiError;
use crate::state::AppState;
use crate::*;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::IntoResponse;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(b) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&b).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, value)
}

// ========== Health ==========

#[tokio::test]
async fn test_health() {
    let (status, body) = send(app(), "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["sessions"], 0);
    assert!(body["uptime_secs"].is_u64());
}

// ========== Decide ==========

#[tokio::test]
async fn test_decide_product_search() {
    let (status, body) = send(
        app(),
        "POST",
        "/api/v1/decide",
        Some(json!({"user_id": "u1", "message": "show me dresses under 2000"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["decision"]["flow"], "PRODUCT_SEARCH");
    assert_eq!(body["decision"]["should_escalate"], false);
    assert_eq!(body["reason"], "Standard query");
    assert!(body.get("escalation_ticket").is_none());
}

#[tokio::test]
async fn test_decide_escalation_carries_ticket() {
    let (status, body) = send(
        app(),
        "POST",
        "/api/v1/decide",
        Some(json!({"user_id": "u2", "message": "I want to speak to a manager about my broken order"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["decision"]["flow"], "AVA");
    assert!(body["reason"].as_str().unwrap().contains("Escalation keyword detected"));
    let ticket = &body["escalation_ticket"];
    assert_eq!(ticket["user_id"], "u2");
    assert_eq!(ticket["flow"], "AVA");
    assert!(ticket["ticket_id"].is_string());
    assert_eq!(ticket["escalation_score"], body["decision"]["escalation_score"]);
}

#[tokio::test]
async fn test_decide_missing_message_is_empty() {
    let (status, body) = send(app(), "POST", "/api/v1/decide", Some(json!({"user_id": "u3"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["decision"]["flow"], "IVR");
    assert_eq!(body["decision"]["intent"]["intent"], "unknown");
}

#[tokio::test]
async fn test_decide_original_message_in_context() {
    let (status, body) = send(
        app(),
        "POST",
        "/api/v1/decide",
        Some(json!({"user_id": "u4", "context": {"original_message": "get me a supervisor"}})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["decision"]["flow"], "AVA");
    assert_eq!(body["escalation_ticket"]["message"], "get me a supervisor");
}

#[tokio::test]
async fn test_decide_upstream_intent_alias() {
    let (status, body) = send(
        app(),
        "POST",
        "/api/v1/decide",
        Some(json!({
            "user_id": "u5",
            "message": "blue kurta",
            "context": {"intent": {"intent": "product.search", "confidence": 0.9}}
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["decision"]["flow"], "PRODUCT_SEARCH");
    assert_eq!(body["decision"]["intent"]["source"], "upstream");
}

#[tokio::test]
async fn test_decide_requires_user_id() {
    for payload in [json!({"message": "hello"}), json!({"user_id": "   ", "message": "hello"})] {
        let (status, body) = send(app(), "POST", "/api/v1/decide", Some(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "bad_request");
    }
}

#[tokio::test]
async fn test_decide_rejects_unknown_context_fields() {
    let (status, body) = send(
        app(),
        "POST",
        "/api/v1/decide",
        Some(json!({"user_id": "u", "message": "hi", "context": {"parameters": {}}})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "bad_request");
}

#[tokio::test]
async fn test_decide_rejects_malformed_json() {
    let req = Request::builder()
        .method("POST")
        .uri("/api/v1/decide")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let resp = app().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// ========== Sessions ==========

#[tokio::test]
async fn test_session_lookup_and_reset() {
    let state = AppState::new();

    let (status, _) = send(app_with_state(state.clone()), "GET", "/api/v1/session/alice", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    send(
        app_with_state(state.clone()),
        "POST",
        "/api/v1/decide",
        Some(json!({"user_id": "alice", "message": "where is my order"})),
    )
    .await;

    let (status, body) = send(app_with_state(state.clone()), "GET", "/api/v1/session/alice", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user_id"], "alice");
    assert_eq!(body["messages"].as_array().unwrap().len(), 1);
    assert_eq!(body["last_intent"], "order_tracking");

    let (_, health) = send(app_with_state(state.clone()), "GET", "/health", None).await;
    assert_eq!(health["sessions"], 1);

    let (status, body) = send(app_with_state(state.clone()), "DELETE", "/api/v1/session/alice", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reset"], true);

    let (_, body) = send(app_with_state(state.clone()), "DELETE", "/api/v1/session/alice", None).await;
    assert_eq!(body["reset"], false);
}

#[tokio::test]
async fn test_failures_accumulate_across_requests() {
    let state = AppState::new();
    for _ in 0..3 {
        send(
            app_with_state(state.clone()),
            "POST",
            "/api/v1/decide",
            Some(json!({"user_id": "bob", "message": "hmm"})),
        )
        .await;
    }
    let (_, body) = send(app_with_state(state.clone()), "GET", "/api/v1/session/bob", None).await;
    assert_eq!(body["failure_count"], 3);
}

#[tokio::test]
async fn test_state_from_config() {
    let mut config = sa_core::AssistantConfig::default();
    config.session.history_limit = 1;
    let state = AppState::from_config(&config).unwrap();
    for msg in ["hello", "track my order"] {
        send(
            app_with_state(state.clone()),
            "POST",
            "/api/v1/decide",
            Some(json!({"user_id": "carol", "message": msg})),
        )
        .await;
    }
    let (_, body) = send(app_with_state(state), "GET", "/api/v1/session/carol", None).await;
    assert_eq!(body["messages"].as_array().unwrap().len(), 1);
    assert_eq!(body["total_turns"], 2);
}

// ========== Errors ==========

#[tokio::test]
async fn test_api_error_envelope() {
    let resp = ApiError::not_found("missing").into_response();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({"error": {"code": "not_found", "message": "missing"}}));
}

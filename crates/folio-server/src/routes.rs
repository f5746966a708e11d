//! HTTP routes and the chat request pipeline.

use std::net::SocketAddr;

use axum::body::Bytes;
use axum::extract::{ConnectInfo, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use folio_core::history::validate_history;
use folio_core::persona::{base_prompt, classify};
use folio_core::prompt::compose;
use folio_core::sanitize::sanitize_input;

use crate::page::CHAT_PAGE;
use crate::relay;
use crate::state::AppState;

/// Build the relay router (useful for testing without binding to a port).
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(page_handler))
        .route("/health", get(health_handler))
        .route("/api/chat", post(chat_handler))
        .with_state(state)
}

async fn page_handler() -> impl IntoResponse {
    Html(CHAT_PAGE)
}

async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// The chat endpoint.
///
/// Validation happens in a fixed order so that a rejected request never
/// reaches the gateway: parse, message checks, rate limit, then the
/// upstream call. The body is read raw rather than through the `Json`
/// extractor so that every rejection carries the same JSON error shape.
async fn chat_handler(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let request: ChatRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            tracing::debug!(error = %e, "rejecting unparseable chat request");
            return error_response(StatusCode::BAD_REQUEST, "Invalid JSON body.");
        }
    };

    // 1. Message checks.
    let message = sanitize_input(&request.message);
    if message.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Message field is required.");
    }
    if message.chars().count() > state.config.limits.max_message_chars {
        return error_response(StatusCode::BAD_REQUEST, "Message is too long.");
    }

    // 2. Rate limit by client address.
    let key = client_key(&headers, peer);
    if state.config.rate_limit.enabled {
        let decision = state.limiter.lock().await.check(&key);
        if !decision.is_allowed() {
            tracing::warn!(client = %key, decision = ?decision, "rate limit exceeded");
            return error_response(
                StatusCode::TOO_MANY_REQUESTS,
                "Too many requests. Please try again later.",
            );
        }
    }

    // 3. Compose the persona prompt.
    let history = validate_history(&request.history, state.config.limits.max_message_chars);
    let category = classify(&message);
    let prompt = compose(
        &base_prompt(category),
        &history,
        &message,
        state.config.limits.max_history_turns,
    );

    let request_id = Uuid::new_v4();
    tracing::info!(
        request_id = %request_id,
        client = %key,
        category = ?category,
        stream = request.stream,
        history_turns = history.len(),
        "chat request accepted"
    );

    // 4. Call the gateway.
    if request.stream {
        match state
            .gateway
            .stream_generate(&prompt, &state.config.generation)
            .await
        {
            Ok(upstream) => relay::stream_events(upstream).into_response(),
            Err(e) => {
                tracing::error!(request_id = %request_id, error = %e, "generation request failed");
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    } else {
        match state.gateway.complete(&prompt, &state.config.generation).await {
            Ok(reply) => Json(serde_json::json!({ "reply": relay::clean_fragment(&reply) }))
                .into_response(),
            Err(e) => {
                tracing::error!(request_id = %request_id, error = %e, "generation request failed");
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}

/// Identify the client for rate limiting.
///
/// Behind a reverse proxy the peer address is the proxy itself, so the
/// first entry of `X-Forwarded-For` wins when present.
fn client_key(headers: &HeaderMap, peer: SocketAddr) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| peer.ip().to_string())
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}

#[derive(Deserialize)]
struct ChatRequest {
    #[serde(default)]
    message: String,
    #[serde(default)]
    history: serde_json::Value,
    #[serde(default = "default_stream")]
    stream: bool,
}

fn default_stream() -> bool {
    true
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peer() -> SocketAddr {
        SocketAddr::from(([192, 168, 1, 7], 50000))
    }

    #[test]
    fn client_key_prefers_forwarded_header() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", "203.0.113.9, 10.0.0.1".parse().unwrap());
        assert_eq!(client_key(&headers, peer()), "203.0.113.9");
    }

    #[test]
    fn client_key_falls_back_to_peer_address() {
        assert_eq!(client_key(&HeaderMap::new(), peer()), "192.168.1.7");
    }

    #[test]
    fn client_key_ignores_empty_forwarded_header() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", "".parse().unwrap());
        assert_eq!(client_key(&headers, peer()), "192.168.1.7");
    }

    #[test]
    fn chat_request_defaults() {
        let request: ChatRequest = serde_json::from_str(r#"{"message":"hi"}"#).unwrap();
        assert_eq!(request.message, "hi");
        assert!(request.stream);
        assert!(request.history.is_null());
    }

    #[test]
    fn chat_request_accepts_explicit_fields() {
        let request: ChatRequest =
            serde_json::from_str(r#"{"message":"hi","history":[],"stream":false}"#).unwrap();
        assert!(!request.stream);
        assert!(request.history.is_array());
    }
}

//! HTTP + server-sent events transport for the MCP server.
//!
//! A client opens `GET /sse` and receives an `endpoint` event naming the URL
//! to POST its JSON-RPC messages to. Responses to those POSTs arrive on the
//! event stream as `message` events.

use super::protocol::{JsonRpcRequest, JsonRpcResponse, PARSE_ERROR};
use super::server::McpServer;
use crate::error::Result;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    routing::{get, post},
    Json, Router,
};
use futures::stream::{self, Stream, StreamExt};
use serde::Deserialize;
use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, info, warn};
use url::Url;
use uuid::Uuid;

/// Messages buffered per session before POSTs start waiting.
const SESSION_BUFFER: usize = 100;

type Sessions = Arc<Mutex<HashMap<String, mpsc::Sender<String>>>>;

fn lock_sessions(sessions: &Sessions) -> MutexGuard<'_, HashMap<String, mpsc::Sender<String>>> {
    sessions.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Shared application state.
#[derive(Clone)]
struct AppState {
    server: McpServer,
    sessions: Sessions,
    base_url: String,
}

/// Removes a session from the table when its event stream is dropped.
struct SessionGuard {
    id: String,
    sessions: Sessions,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        lock_sessions(&self.sessions).remove(&self.id);
        debug!("SSE session {} closed", self.id);
    }
}

/// Base URL advertised to clients for a bind address.
///
/// Wildcard hosts are advertised as `localhost`.
pub fn base_url(host: &str, port: u16) -> String {
    match host {
        "0.0.0.0" | "::" | "[::]" | "" => format!("http://localhost:{}", port),
        h if h.contains(':') && !h.starts_with('[') => format!("http://[{}]:{}", h, port),
        h => format!("http://{}:{}", h, port),
    }
}

/// Socket address string for binding.
pub fn bind_address(host: &str, port: u16) -> String {
    if host.contains(':') && !host.starts_with('[') {
        format!("[{}]:{}", host, port)
    } else {
        format!("{}:{}", host, port)
    }
}

/// Message endpoint URL for a session.
pub fn endpoint_url(base_url: &str, session_id: &str) -> String {
    match Url::parse(base_url).and_then(|base| base.join("/message")) {
        Ok(mut url) => {
            url.query_pairs_mut().append_pair("sessionId", session_id);
            url.to_string()
        }
        Err(_) => format!("{}/message?sessionId={}", base_url, session_id),
    }
}

/// Build the SSE router.
pub fn router(server: McpServer, base_url: String) -> Router {
    let state = AppState {
        server,
        sessions: Arc::new(Mutex::new(HashMap::new())),
        base_url,
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/sse", get(connect))
        .route("/message", post(message))
        .layer(cors)
        .with_state(state)
}

/// Bind the listener for the SSE server.
pub async fn bind_sse(host: &str, port: u16) -> Result<TcpListener> {
    Ok(TcpListener::bind(bind_address(host, port)).await?)
}

/// Serve MCP over SSE on a bound listener until Ctrl+C.
pub async fn run_sse(server: McpServer, listener: TcpListener, base_url: String) -> Result<()> {
    info!(
        "SSE server listening on {} URL: {}/sse",
        listener.local_addr()?,
        base_url
    );
    let app = router(server, base_url);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("SSE server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}

// === Handlers ===

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn connect(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = std::result::Result<Event, Infallible>>> {
    let session_id = Uuid::new_v4().to_string();
    let (tx, rx) = mpsc::channel::<String>(SESSION_BUFFER);
    lock_sessions(&state.sessions).insert(session_id.clone(), tx);
    debug!("SSE session {} opened", session_id);

    let endpoint = endpoint_url(&state.base_url, &session_id);
    let guard = SessionGuard {
        id: session_id,
        sessions: state.sessions.clone(),
    };

    let first = stream::once(async move {
        Ok::<_, Infallible>(Event::default().event("endpoint").data(endpoint))
    });
    let messages = ReceiverStream::new(rx).map(move |message| {
        let _session = &guard;
        Ok::<_, Infallible>(Event::default().event("message").data(message))
    });

    Sse::new(first.chain(messages)).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

#[derive(Deserialize)]
struct MessageQuery {
    #[serde(rename = "sessionId")]
    session_id: Option<String>,
}

async fn message(
    State(state): State<AppState>,
    Query(query): Query<MessageQuery>,
    body: String,
) -> Response {
    let Some(session_id) = query.session_id else {
        return (StatusCode::BAD_REQUEST, "Missing sessionId").into_response();
    };

    let sender = {
        let sessions = lock_sessions(&state.sessions);
        sessions.get(&session_id).cloned()
    };
    let Some(sender) = sender else {
        return (StatusCode::NOT_FOUND, "Invalid session ID").into_response();
    };

    let request: JsonRpcRequest = match serde_json::from_str(&body) {
        Ok(request) => request,
        Err(e) => {
            warn!("Failed to parse request: {}", e);
            return (
                StatusCode::BAD_REQUEST,
                Json(JsonRpcResponse::error(None, PARSE_ERROR, "Parse error")),
            )
                .into_response();
        }
    };

    if let Some(response) = state.server.handle_request(request).await {
        let json = match serde_json::to_string(&response) {
            Ok(json) => json,
            Err(e) => {
                return (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response();
            }
        };
        if sender.send(json).await.is_err() {
            return (StatusCode::GONE, "Session closed").into_response();
        }
    }

    StatusCode::ACCEPTED.into_response()
}

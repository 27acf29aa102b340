//! Streaming (SSE) endpoint.
//!
//! A client opens `GET {sse_path}` and keeps the event stream open. The
//! first event is `endpoint`, whose data is the URL to post messages to
//! (`{sse_path}/message?sessionId=<id>`). Each JSON-RPC request posted there
//! is answered with `202 Accepted`, and its response is delivered as a
//! `message` event on the session's stream.

use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{
        IntoResponse, Response,
        sse::{Event, KeepAlive, Sse},
    },
};
use futures::{Stream, StreamExt, stream};
use serde::Deserialize;
use tokio::sync::{RwLock, mpsc};
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, info, instrument, warn};

use super::http::AppState;
use super::rpc::{JsonRpcRequest, process_request};

/// Events buffered per session before the sender waits.
const SESSION_BUFFER: usize = 32;

/// Open streaming sessions, keyed by session id.
#[derive(Clone, Default)]
pub struct SseSessions {
    inner: Arc<RwLock<HashMap<String, mpsc::Sender<Event>>>>,
}

impl SseSessions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new session and return its id and event receiver.
    pub async fn open(&self) -> (String, mpsc::Receiver<Event>) {
        let id = uuid::Uuid::new_v4().to_string();
        let (tx, rx) = mpsc::channel(SESSION_BUFFER);
        self.inner.write().await.insert(id.clone(), tx);
        (id, rx)
    }

    pub async fn sender(&self, id: &str) -> Option<mpsc::Sender<Event>> {
        self.inner.read().await.get(id).cloned()
    }

    pub async fn close(&self, id: &str) {
        if self.inner.write().await.remove(id).is_some() {
            info!("SSE session {} closed", id);
        }
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    #[cfg(test)]
    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// Removes the session from the map when the client's stream is dropped.
struct SessionGuard {
    id: String,
    sessions: SseSessions,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        let id = std::mem::take(&mut self.id);
        let sessions = self.sessions.clone();
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn(async move { sessions.close(&id).await });
        }
    }
}

/// Query string of a posted message.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    #[serde(rename = "sessionId")]
    pub session_id: String,
}

/// Open a streaming session.
#[instrument(skip_all)]
pub async fn handle_connect(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let (session_id, rx) = state.sessions.open().await;
    let endpoint = format!("{}?sessionId={}", state.message_path, session_id);
    info!("SSE session {} opened", session_id);

    let guard = SessionGuard {
        id: session_id,
        sessions: state.sessions.clone(),
    };

    let first = stream::once(async move {
        Ok::<_, Infallible>(Event::default().event("endpoint").data(endpoint))
    });
    let messages = ReceiverStream::new(rx).map(move |event| {
        let _guard = &guard;
        Ok::<_, Infallible>(event)
    });

    Sse::new(first.chain(messages)).keep_alive(KeepAlive::default())
}

/// Accept a JSON-RPC message for a streaming session.
#[instrument(skip_all, fields(session = %query.session_id))]
pub async fn handle_message(
    State(state): State<AppState>,
    Query(query): Query<MessageQuery>,
    body: Bytes,
) -> Response {
    let Some(sender) = state.sessions.sender(&query.session_id).await else {
        warn!("Message for unknown session {}", query.session_id);
        return (StatusCode::NOT_FOUND, "Session not found").into_response();
    };

    let request: JsonRpcRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            warn!("Malformed message: {}", e);
            return (StatusCode::BAD_REQUEST, format!("Invalid message: {}", e)).into_response();
        }
    };

    debug!("Queued {} for session {}", request.method, query.session_id);

    let server = state.server.clone();
    let sessions = state.sessions.clone();
    let session_id = query.session_id;
    tokio::spawn(async move {
        let Some(response) = process_request(&server, request).await else {
            return;
        };
        let data = match serde_json::to_string(&response) {
            Ok(data) => data,
            Err(e) => {
                warn!("Failed to encode response: {}", e);
                return;
            }
        };
        if sender.send(Event::default().event("message").data(data)).await.is_err() {
            warn!("SSE session {} went away before its response", session_id);
            sessions.close(&session_id).await;
        }
    });

    StatusCode::ACCEPTED.into_response()
}

//! HTTP transport implementation.
//!
//! Serves the MCP server over two endpoints:
//! - `POST {rpc_path}` (default `/mcp`): one JSON-RPC request per HTTP request
//! - `GET {sse_path}` + `POST {sse_path}/message` (default `/sse`): a
//!   persistent event stream per client, see [`super::sse`]
//!
//! Every other path answers `404 Not found`.

use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, instrument, warn};

use super::rpc::{JsonRpcRequest, JsonRpcResponse, process_request};
use super::sse::{self, SseSessions};
use super::{TransportError, TransportResult, config::HttpConfig};
use crate::core::McpServer;

/// HTTP transport handler.
pub struct HttpTransport {
    config: HttpConfig,
}

/// Application state shared across HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// The MCP server instance.
    pub(super) server: McpServer,
    /// Open streaming sessions.
    pub(super) sessions: SseSessions,
    /// Path streaming clients post their messages to.
    pub(super) message_path: Arc<str>,
}

impl HttpTransport {
    /// Create a new HTTP transport with the given config.
    pub fn new(config: HttpConfig) -> Self {
        Self { config }
    }

    /// Get the bind address.
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }

    /// Run the HTTP transport.
    pub async fn run(self, server: McpServer) -> TransportResult<()> {
        let addr = self.address();
        let app = build_router(server, &self.config);

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|source| TransportError::Bind {
                address: addr.clone(),
                rpc_path: self.config.rpc_path.clone(),
                sse_path: self.config.sse_path.clone(),
                source,
            })?;

        let cors_status = if self.config.enable_cors {
            "enabled"
        } else {
            "disabled"
        };
        info!("Ready - listening on {} (CORS {})", addr, cors_status);
        info!("  → Single request: POST {}", self.config.rpc_path);
        info!("  → Streaming:      GET  {}", self.config.sse_path);
        info!("  → Messages:       POST {}", self.config.sse_message_path());

        axum::serve(listener, app)
            .await
            .map_err(|source| TransportError::Serve {
                address: addr,
                source,
            })
    }
}

/// Build the axum router for the given server and config.
pub fn build_router(server: McpServer, config: &HttpConfig) -> Router {
    let message_path = config.sse_message_path();

    let state = AppState {
        server,
        sessions: SseSessions::new(),
        message_path: Arc::from(message_path.as_str()),
    };

    let mut app = Router::new()
        .route(&config.rpc_path, post(handle_rpc))
        .route(&config.sse_path, get(sse::handle_connect))
        .route(&message_path, post(sse::handle_message))
        .fallback(not_found)
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    // Add CORS if enabled
    if config.enable_cors {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        app = app.layer(cors);
    }

    app
}

/// Fallback for every unrouted path.
async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not found")
}

/// Handle a single-request JSON-RPC call.
#[instrument(skip_all)]
async fn handle_rpc(State(state): State<AppState>, body: Bytes) -> Response {
    let request: JsonRpcRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            warn!("Unparseable JSON-RPC body: {}", e);
            return (StatusCode::OK, Json(JsonRpcResponse::parse_error(e.to_string())))
                .into_response();
        }
    };

    info!("Received JSON-RPC request: {}", request.method);

    match process_request(&state.server, request).await {
        Some(response) => (StatusCode::OK, Json(response)).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Config;
    use crate::core::config::WeatherConfig;
    use axum::body::Body;
    use axum::http::{Request, header};
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_app() -> Router {
        let server = McpServer::new(Config::default()).unwrap();
        build_router(server, &HttpConfig::default())
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    /// Read frames until a full SSE event (terminated by a blank line) arrives.
    async fn next_event(body: &mut Body) -> String {
        let mut buffer = String::new();
        while !buffer.contains("\n\n") {
            let frame = tokio::time::timeout(std::time::Duration::from_secs(5), body.frame())
                .await
                .expect("timed out waiting for SSE event")
                .expect("stream ended")
                .unwrap();
            if let Ok(data) = frame.into_data() {
                buffer.push_str(&String::from_utf8_lossy(&data));
            }
        }
        buffer
    }

    #[tokio::test]
    async fn test_unknown_path_is_not_found() {
        for uri in ["/", "/health", "/mcp/extra", "/sse/other"] {
            let response = test_app()
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "{}", uri);
            let bytes = response.into_body().collect().await.unwrap().to_bytes();
            assert_eq!(&bytes[..], b"Not found");
        }
    }

    #[tokio::test]
    async fn test_rpc_tools_list() {
        let response = test_app()
            .oneshot(post_json(
                "/mcp",
                json!({ "jsonrpc": "2.0", "id": 1, "method": "tools/list" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        let names: Vec<_> = body["result"]["tools"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["add", "calculate", "get-weather"]);
    }

    #[tokio::test]
    async fn test_rpc_tools_call_calculate() {
        let response = test_app()
            .oneshot(post_json(
                "/mcp",
                json!({
                    "jsonrpc": "2.0",
                    "id": 7,
                    "method": "tools/call",
                    "params": {
                        "name": "calculate",
                        "arguments": { "operation": "divide", "a": 9, "b": 0 }
                    }
                }),
            ))
            .await
            .unwrap();

        let body = body_json(response).await;
        assert_eq!(body["id"], 7);
        assert_eq!(body["result"]["content"][0]["text"], "Error: Cannot divide by zero");
    }

    #[tokio::test]
    async fn test_rpc_parse_error() {
        let request = Request::builder()
            .method("POST")
            .uri("/mcp")
            .body(Body::from("{not json"))
            .unwrap();
        let response = test_app().oneshot(request).await.unwrap();
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], -32700);
    }

    #[tokio::test]
    async fn test_rpc_notification_is_accepted() {
        let response = test_app()
            .oneshot(post_json(
                "/mcp",
                json!({ "jsonrpc": "2.0", "method": "notifications/initialized" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
    }

    #[tokio::test]
    async fn test_sse_message_for_unknown_session() {
        let response = test_app()
            .oneshot(post_json(
                "/sse/message?sessionId=missing",
                json!({ "jsonrpc": "2.0", "id": 1, "method": "ping" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_sse_round_trip() {
        let app = test_app();

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/sse").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(
            response.headers()[header::CONTENT_TYPE]
                .to_str()
                .unwrap()
                .starts_with("text/event-stream")
        );

        let mut stream = response.into_body();
        let endpoint_event = next_event(&mut stream).await;
        assert!(endpoint_event.contains("event: endpoint"));
        let endpoint = endpoint_event
            .lines()
            .find_map(|line| line.strip_prefix("data: "))
            .unwrap()
            .to_string();
        assert!(endpoint.starts_with("/sse/message?sessionId="));

        let accepted = app
            .clone()
            .oneshot(post_json(
                &endpoint,
                json!({
                    "jsonrpc": "2.0",
                    "id": 42,
                    "method": "tools/call",
                    "params": { "name": "add", "arguments": { "a": 40, "b": 2 } }
                }),
            ))
            .await
            .unwrap();
        assert_eq!(accepted.status(), StatusCode::ACCEPTED);

        let message_event = next_event(&mut stream).await;
        assert!(message_event.contains("event: message"));
        let data = message_event
            .lines()
            .find_map(|line| line.strip_prefix("data: "))
            .unwrap();
        let response: Value = serde_json::from_str(data).unwrap();
        assert_eq!(response["id"], 42);
        assert_eq!(response["result"]["content"][0]["text"], "42");
    }

    /// Open a stream and return it with its message endpoint.
    async fn open_session(app: &Router) -> (Body, String) {
        let response = app
            .clone()
            .oneshot(Request::builder().uri("/sse").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let mut stream = response.into_body();
        let endpoint = next_event(&mut stream)
            .await
            .lines()
            .find_map(|line| line.strip_prefix("data: "))
            .unwrap()
            .to_string();
        (stream, endpoint)
    }

    #[tokio::test]
    async fn test_sse_malformed_message_is_bad_request() {
        let app = test_app();
        let (_stream, endpoint) = open_session(&app).await;

        let request = Request::builder()
            .method("POST")
            .uri(&endpoint)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_sse_notification_sends_no_event() {
        let app = test_app();
        let (mut stream, endpoint) = open_session(&app).await;

        let accepted = app
            .clone()
            .oneshot(post_json(
                &endpoint,
                json!({ "jsonrpc": "2.0", "method": "notifications/initialized" }),
            ))
            .await
            .unwrap();
        assert_eq!(accepted.status(), StatusCode::ACCEPTED);

        let accepted = app
            .clone()
            .oneshot(post_json(
                &endpoint,
                json!({ "jsonrpc": "2.0", "id": 9, "method": "ping" }),
            ))
            .await
            .unwrap();
        assert_eq!(accepted.status(), StatusCode::ACCEPTED);

        // The first message on the stream answers the ping.
        let event = next_event(&mut stream).await;
        let data = event
            .lines()
            .find_map(|line| line.strip_prefix("data: "))
            .unwrap();
        let response: Value = serde_json::from_str(data).unwrap();
        assert_eq!(response["id"], 9);
        assert_eq!(response["result"], json!({}));
    }

    #[tokio::test]
    async fn test_bind_failure_names_endpoints() {
        let taken = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = taken.local_addr().unwrap().port();

        let transport = HttpTransport::new(HttpConfig {
            port,
            ..HttpConfig::default()
        });
        let err = transport
            .run(McpServer::new(Config::default()).unwrap())
            .await
            .unwrap_err();

        assert!(matches!(err, TransportError::Bind { .. }));
        let message = err.to_string();
        assert!(message.contains(&format!("127.0.0.1:{}", port)));
        assert!(message.contains("/mcp and /sse"));
    }

    #[tokio::test]
    async fn test_rpc_get_weather_with_stubbed_upstream() {
        let upstream = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [{ "latitude": 48.85, "longitude": 2.35 }]
            })))
            .mount(&upstream)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "current": { "weather_code": 95 } })),
            )
            .mount(&upstream)
            .await;

        let config = Config {
            weather: WeatherConfig {
                geocoding_url: format!("{}/v1/search", upstream.uri()),
                forecast_url: format!("{}/v1/forecast", upstream.uri()),
                ..WeatherConfig::default()
            },
            ..Config::default()
        };
        let app = build_router(McpServer::new(config).unwrap(), &HttpConfig::default());

        let response = app
            .oneshot(post_json(
                "/mcp",
                json!({
                    "jsonrpc": "2.0",
                    "id": 3,
                    "method": "tools/call",
                    "params": { "name": "get-weather", "arguments": { "city": "Paris" } }
                }),
            ))
            .await
            .unwrap();

        let body = body_json(response).await;
        assert_eq!(
            body["result"]["content"][0]["text"],
            "{\n  \"current\": {\n    \"weather_code\": 95\n  }\n}"
        );
    }
}

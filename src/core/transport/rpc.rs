//! JSON-RPC 2.0 message handling shared by the HTTP endpoints.
//!
//! Both the single-request endpoint and the streaming endpoint decode a
//! [`JsonRpcRequest`], run it through [`process_request`], and differ only in
//! how the [`JsonRpcResponse`] travels back to the client.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{info, instrument, warn};

use crate::core::McpServer;

/// Protocol version answered when the client does not state one.
const DEFAULT_PROTOCOL_VERSION: &str = "2024-11-05";

/// JSON-RPC request structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    /// Notifications carry no id and expect no response.
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

/// JSON-RPC response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC error structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcResponse {
    /// Create a success response.
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response.
    pub fn error(id: Option<Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
                data: None,
            }),
        }
    }

    /// Parse error (body is not a JSON-RPC request).
    pub fn parse_error(msg: impl Into<String>) -> Self {
        Self::error(None, -32700, msg)
    }

    /// Method not found error.
    pub fn method_not_found(id: Option<Value>) -> Self {
        Self::error(id, -32601, "Method not found")
    }

    /// Invalid request error.
    pub fn invalid_request(id: Option<Value>) -> Self {
        Self::error(id, -32600, "Invalid Request")
    }

    /// Invalid params error.
    pub fn invalid_params(id: Option<Value>, msg: impl Into<String>) -> Self {
        Self::error(id, -32602, msg)
    }

    /// Internal error.
    pub fn internal_error(id: Option<Value>, msg: impl Into<String>) -> Self {
        Self::error(id, -32603, msg)
    }
}

/// Process a JSON-RPC request.
///
/// Returns `None` for notifications, which get no response.
#[instrument(skip_all, fields(method = %request.method))]
pub async fn process_request(
    server: &McpServer,
    request: JsonRpcRequest,
) -> Option<JsonRpcResponse> {
    if request.jsonrpc != "2.0" {
        return Some(JsonRpcResponse::invalid_request(request.id));
    }

    if request.is_notification() {
        info!("Received notification: {}", request.method);
        return None;
    }

    let response = match request.method.as_str() {
        "initialize" => handle_initialize(server, request),
        "ping" => JsonRpcResponse::success(request.id, json!({})),
        "tools/list" => handle_tools_list(server, request),
        "tools/call" => handle_tools_call(server, request).await,
        _ => {
            warn!("Unknown method: {}", request.method);
            JsonRpcResponse::method_not_found(request.id)
        }
    };

    Some(response)
}

/// Handle initialize request.
fn handle_initialize(server: &McpServer, request: JsonRpcRequest) -> JsonRpcResponse {
    info!("Processing initialize request");

    // Echo the client's protocol version when it sent one.
    let protocol_version = request
        .params
        .as_ref()
        .and_then(|p| p.get("protocolVersion"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| DEFAULT_PROTOCOL_VERSION.to_string());

    let result = json!({
        "protocolVersion": protocol_version,
        "capabilities": {
            "tools": {}
        },
        "serverInfo": {
            "name": server.name(),
            "version": server.version()
        },
        "instructions": server.instructions()
    });

    JsonRpcResponse::success(request.id, result)
}

/// Handle tools/list request.
fn handle_tools_list(server: &McpServer, request: JsonRpcRequest) -> JsonRpcResponse {
    info!("Processing tools/list request");

    let result = json!({
        "tools": server.list_tools()
    });

    JsonRpcResponse::success(request.id, result)
}

/// Handle tools/call request.
async fn handle_tools_call(server: &McpServer, request: JsonRpcRequest) -> JsonRpcResponse {
    let params = match request.params {
        Some(p) => p,
        None => return JsonRpcResponse::invalid_params(request.id, "Missing params"),
    };

    let name = match params.get("name").and_then(Value::as_str) {
        Some(n) => n.to_string(),
        None => return JsonRpcResponse::invalid_params(request.id, "Missing tool name"),
    };

    info!("Processing tools/call request for {}", name);

    let arguments = params.get("arguments").cloned();

    match server.call_tool(&name, arguments).await {
        Ok(result) => match serde_json::to_value(&result) {
            Ok(value) => JsonRpcResponse::success(request.id, value),
            Err(e) => JsonRpcResponse::internal_error(request.id, e.to_string()),
        },
        Err(e) if e.is_client_error() => {
            JsonRpcResponse::invalid_params(request.id, e.to_string())
        }
        Err(e) => JsonRpcResponse::internal_error(request.id, e.to_string()),
    }
}

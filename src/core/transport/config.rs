//! Transport configuration types.

use serde::{Deserialize, Serialize};

/// Transport configuration options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TransportConfig {
    /// Standard input/output transport.
    #[cfg(feature = "stdio")]
    Stdio,

    /// HTTP transport: single-request and streaming endpoints.
    #[cfg(feature = "http")]
    Http(HttpConfig),
}

/// HTTP transport configuration.
#[cfg(feature = "http")]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Port number to listen on.
    pub port: u16,

    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Path for the single-request JSON-RPC endpoint.
    #[serde(default = "default_rpc_path")]
    pub rpc_path: String,

    /// Path for the streaming (SSE) endpoint. Messages are posted to
    /// `{sse_path}/message`.
    #[serde(default = "default_sse_path")]
    pub sse_path: String,

    /// Enable CORS for browser clients.
    #[serde(default = "default_cors")]
    pub enable_cors: bool,
}

#[cfg(feature = "http")]
fn default_host() -> String {
    "127.0.0.1".to_string()
}

#[cfg(feature = "http")]
fn default_rpc_path() -> String {
    "/mcp".to_string()
}

#[cfg(feature = "http")]
fn default_sse_path() -> String {
    "/sse".to_string()
}

#[cfg(feature = "http")]
fn default_cors() -> bool {
    true
}

impl Default for TransportConfig {
    fn default() -> Self {
        #[cfg(feature = "http")]
        {
            return Self::Http(HttpConfig::default());
        }

        #[cfg(all(not(feature = "http"), feature = "stdio"))]
        {
            return Self::Stdio;
        }

        #[cfg(not(any(feature = "stdio", feature = "http")))]
        {
            compile_error!("At least one transport feature must be enabled: stdio or http");
        }
    }
}

#[cfg(feature = "http")]
impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: default_host(),
            rpc_path: default_rpc_path(),
            sse_path: default_sse_path(),
            enable_cors: default_cors(),
        }
    }
}

#[cfg(feature = "http")]
impl HttpConfig {
    /// Path that streaming clients post their messages to.
    pub fn sse_message_path(&self) -> String {
        format!("{}/message", self.sse_path.trim_end_matches('/'))
    }
}

impl TransportConfig {
    /// Load transport config from environment variables.
    pub fn from_env() -> Self {
        let transport = std::env::var("MCP_TRANSPORT")
            .unwrap_or_default()
            .to_lowercase();

        match transport.as_str() {
            #[cfg(feature = "stdio")]
            "stdio" => Self::Stdio,
            #[cfg(feature = "http")]
            _ => {
                let defaults = HttpConfig::default();
                let port = std::env::var("MCP_HTTP_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(defaults.port);
                let host = std::env::var("MCP_HTTP_HOST").unwrap_or(defaults.host);
                let rpc_path = std::env::var("MCP_HTTP_PATH").unwrap_or(defaults.rpc_path);
                let sse_path = std::env::var("MCP_SSE_PATH").unwrap_or(defaults.sse_path);
                let enable_cors = std::env::var("MCP_HTTP_CORS")
                    .map(|v| v.to_lowercase() != "false" && v != "0")
                    .unwrap_or(defaults.enable_cors);
                Self::Http(HttpConfig {
                    port,
                    host,
                    rpc_path,
                    sse_path,
                    enable_cors,
                })
            }
            #[cfg(not(feature = "http"))]
            _ => Self::Stdio,
        }
    }

    /// Get a description of this transport for logging.
    pub fn description(&self) -> String {
        match self {
            #[cfg(feature = "stdio")]
            Self::Stdio => "STDIO (standard MCP mode)".to_string(),
            #[cfg(feature = "http")]
            Self::Http(cfg) => format!(
                "HTTP on {}:{} ({} single-request, {} streaming)",
                cfg.host, cfg.port, cfg.rpc_path, cfg.sse_path
            ),
        }
    }
}

//! Transport error types.

use thiserror::Error;

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Failures that stop a transport from serving.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The HTTP listener behind the single-request and streaming endpoints
    /// could not be bound.
    #[cfg(feature = "http")]
    #[error("cannot listen on {address} for {rpc_path} and {sse_path}: {source}")]
    Bind {
        address: String,
        rpc_path: String,
        sse_path: String,
        #[source]
        source: std::io::Error,
    },

    /// The HTTP server stopped accepting connections.
    #[cfg(feature = "http")]
    #[error("HTTP server on {address} stopped: {source}")]
    Serve {
        address: String,
        #[source]
        source: std::io::Error,
    },

    /// The MCP handshake over stdin/stdout did not complete.
    #[cfg(feature = "stdio")]
    #[error("rmcp stdio session failed to initialize: {0}")]
    StdioInit(String),

    /// The rmcp stdio session task ended abnormally.
    #[cfg(feature = "stdio")]
    #[error("rmcp stdio session aborted: {0}")]
    StdioSession(String),
}

//! Error types and handling for the MCP server.
//!
//! The crate-level error aggregates failures from the tools domain, the
//! transports and construction of the outbound HTTP client.

use thiserror::Error;

use super::transport::TransportError;

/// A specialized Result type for MCP server operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the MCP server.
#[derive(Debug, Error)]
pub enum Error {
    /// Error originating from the tools domain.
    #[error("Tool error: {0}")]
    Tool(#[from] crate::domains::tools::ToolError),

    /// Error raised by a transport.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Failure to build the outbound HTTP client.
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

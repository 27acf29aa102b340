//! Transport layer for the MCP server.
//!
//! This module provides different transport implementations:
//! - **STDIO**: Standard input/output, served by rmcp - feature: `stdio`
//! - **HTTP**: a single-request JSON-RPC endpoint (`/mcp`) and a persistent
//!   streaming endpoint (`/sse`) - feature: `http`
//!
//! Each transport handles the connection lifecycle and delegates
//! message processing to the MCP server handler.

mod config;
mod error;
mod service;

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "http")]
pub mod rpc;

#[cfg(feature = "http")]
pub mod sse;

#[cfg(feature = "stdio")]
pub mod stdio;

pub use config::TransportConfig;
pub use error::{TransportError, TransportResult};
pub use service::TransportService;

#[cfg(feature = "http")]
pub use config::HttpConfig;

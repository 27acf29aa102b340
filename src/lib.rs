//! Authless Assistant MCP server.
//!
//! A Model Context Protocol server exposing three tools to any MCP client,
//! without authentication:
//!
//! - `add`: sum two numbers
//! - `calculate`: add, subtract, multiply or divide two numbers
//! - `get-weather`: current weather for a city, via the Open-Meteo
//!   geocoding and forecast APIs
//!
//! # Architecture
//!
//! - **core**: configuration, error handling, the server handler and the
//!   transports (STDIO, single-request HTTP on `/mcp`, streaming on `/sse`)
//! - **domains::tools**: tool definitions, argument schemas and the registry
//!   that both transports dispatch through
//!
//! # Example
//!
//! ```rust,no_run
//! use assistant_mcp_server::core::{Config, McpServer, TransportService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let server = McpServer::new(config.clone())?;
//!     TransportService::new(config.transport).run(server).await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};

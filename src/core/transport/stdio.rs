//! STDIO transport implementation.
//!
//! Frames MCP messages over stdin/stdout using rmcp. Tool calls go through
//! the server's `ToolRouter`, which is built from the same registry the HTTP
//! endpoints use.

use rmcp::ServiceExt;
use tracing::info;

use super::{TransportError, TransportResult};
use crate::core::McpServer;

/// STDIO transport handler.
pub struct StdioTransport;

impl StdioTransport {
    /// Serve the MCP server until stdin closes or the peer disconnects.
    pub async fn run(server: McpServer) -> TransportResult<()> {
        let tool_count = server.list_tools().len();
        info!("Ready - {} tools over stdin/stdout", tool_count);

        let running = server
            .serve(rmcp::transport::stdio())
            .await
            .map_err(|e| TransportError::StdioInit(e.to_string()))?;

        let reason = running
            .waiting()
            .await
            .map_err(|e| TransportError::StdioSession(e.to_string()))?;

        info!("STDIO session ended: {:?}", reason);
        Ok(())
    }
}

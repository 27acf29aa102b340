//! Transport selection.
//!
//! Picks STDIO or HTTP from [`TransportConfig`] and serves the MCP server on
//! it until the transport shuts down.

use tracing::info;

use super::TransportConfig;
use crate::core::McpServer;

#[cfg(feature = "stdio")]
use super::stdio::StdioTransport;

#[cfg(feature = "http")]
use super::http::HttpTransport;

/// Runs the MCP server on the configured transport.
pub struct TransportService {
    config: TransportConfig,
}

impl TransportService {
    pub fn new(config: TransportConfig) -> Self {
        Self { config }
    }

    /// Serve until stdin closes (STDIO) or the listener fails (HTTP).
    pub async fn run(self, server: McpServer) -> crate::core::Result<()> {
        info!("Serving {} over {}", server.name(), self.config.description());

        match self.config {
            #[cfg(feature = "stdio")]
            TransportConfig::Stdio => StdioTransport::run(server).await?,
            #[cfg(feature = "http")]
            TransportConfig::Http(cfg) => HttpTransport::new(cfg).run(server).await?,
        }

        Ok(())
    }
}

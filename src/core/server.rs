//! MCP Server implementation and lifecycle management.
//!
//! This module contains the main server handler that implements the MCP
//! protocol by delegating to the tool registry.
//!
//! ## Tool Architecture
//!
//! Tools are defined in `domains/tools/definitions/` with one file per tool
//! and registered in `ToolRegistry::with_default_tools`. The registry is the
//! single dispatcher:
//! - the stdio transport reaches it through the rmcp `ToolRouter` built in
//!   `domains/tools/router.rs`
//! - the HTTP transports reach it through [`McpServer::call_tool`]

use rmcp::{ServerHandler, handler::server::tool::ToolRouter, model::*, tool_handler};
use std::sync::Arc;
use tracing::info;

use super::config::Config;
use crate::domains::tools::{
    ToolContext, ToolError, ToolRegistry, build_tool_router, definitions::OpenMeteoClient,
};

const INSTRUCTIONS: &str = "Provides arithmetic tools (add, calculate) and a get-weather tool \
     returning current conditions for a city.";

/// The main MCP server handler.
///
/// This struct implements the `ServerHandler` trait from rmcp and coordinates
/// tool calls through the shared [`ToolRegistry`].
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Registered tools and their dispatcher.
    registry: Arc<ToolRegistry>,

    /// Tool router for handling tool calls.
    tool_router: ToolRouter<Self>,
}

impl McpServer {
    /// Create a new MCP server with the given configuration.
    ///
    /// Fails if the outbound HTTP client cannot be built or a tool is
    /// registered twice.
    pub fn new(config: Config) -> super::Result<Self> {
        let weather = OpenMeteoClient::new(config.weather.clone())?;
        let registry = ToolRegistry::with_default_tools(ToolContext::new(weather))?;
        Ok(Self::with_registry(config, registry))
    }

    /// Create a server around an already-built registry.
    pub fn with_registry(config: Config, registry: ToolRegistry) -> Self {
        let registry = Arc::new(registry);
        info!("Registered tools: {:?}", registry.tool_names());

        Self {
            tool_router: build_tool_router::<Self>(registry.clone()),
            config: Arc::new(config),
            registry,
        }
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    pub fn instructions(&self) -> &'static str {
        INSTRUCTIONS
    }

    // ========================================================================
    // HTTP Transport Support Methods
    // ========================================================================

    /// List all available tools (for HTTP transport).
    pub fn list_tools(&self) -> Vec<serde_json::Value> {
        self.registry
            .list_tools()
            .into_iter()
            .map(|t| {
                serde_json::json!({
                    "name": t.name,
                    "description": t.description,
                    "inputSchema": t.input_schema
                })
            })
            .collect()
    }

    /// Call a tool by name (for HTTP transport).
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: Option<serde_json::Value>,
    ) -> Result<CallToolResult, ToolError> {
        self.registry.call_tool(name, arguments).await
    }
}

/// ServerHandler implementation with tool_handler macro for automatic tool routing.
#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        let mut server_info = Implementation::from_build_env();
        server_info.name = self.name().to_string();
        server_info.version = self.version().to_string();

        ServerInfo {
            instructions: Some(INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info,
            ..Default::default()
        }
    }
}

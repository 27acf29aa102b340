//! Tool Router - builds the rmcp ToolRouter from the registry.
//!
//! The stdio transport is driven by rmcp's `ServerHandler`, which routes
//! `tools/call` through a `ToolRouter`. Every route built here forwards to
//! [`ToolRegistry::call_tool`], so rmcp never sees a tool the registry does
//! not know about.

use std::sync::Arc;

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, ToolRouter},
};

use super::error::ToolError;
use super::registry::ToolRegistry;

/// Build the tool router with all registered tools.
pub fn build_tool_router<S>(registry: Arc<ToolRegistry>) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    let mut router = ToolRouter::new();

    for definition in registry.definitions() {
        let name = definition.name;
        let registry = registry.clone();

        router = router.with_route(ToolRoute::new_dyn(
            definition.to_tool(),
            move |ctx: ToolCallContext<'_, S>| {
                let args = ctx.arguments.clone().map(serde_json::Value::Object);
                let registry = registry.clone();
                async move {
                    registry
                        .call_tool(name, args)
                        .await
                        .map_err(to_mcp_error)
                }
                .boxed()
            },
        ));
    }

    router
}

/// Convert a dispatch failure into an MCP protocol error.
pub fn to_mcp_error(err: ToolError) -> McpError {
    if err.is_client_error() {
        McpError::invalid_params(err.to_string(), None)
    } else {
        McpError::internal_error(err.to_string(), None)
    }
}

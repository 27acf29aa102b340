//! Addition tool definition.

use futures::FutureExt;
use rmcp::model::{CallToolResult, Content};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::debug;

use super::format_number;
use crate::domains::tools::registry::{ToolContext, ToolDefinition, ToolFuture};

/// Parameters for the add tool.
#[derive(Debug, Clone, Copy, Deserialize, JsonSchema)]
pub struct AddParams {
    pub a: f64,
    pub b: f64,
}

/// Add tool - returns the sum of two numbers.
pub struct AddTool;

impl AddTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "add";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Add two numbers and return the sum.";

    pub fn execute(params: &AddParams) -> CallToolResult {
        let sum = params.a + params.b;
        debug!("add({}, {}) = {}", params.a, params.b, sum);
        CallToolResult::success(vec![Content::text(format_number(sum))])
    }

    /// Registry entry for this tool.
    pub fn definition() -> ToolDefinition {
        ToolDefinition::new(Self::NAME, Self::handle)
            .with_description(Self::DESCRIPTION)
    }

    fn handle(params: AddParams, _context: ToolContext) -> ToolFuture {
        futures::future::ready(Ok(Self::execute(&params))).boxed()
    }
}

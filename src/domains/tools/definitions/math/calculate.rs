//! Calculator tool definition.
//!
//! Applies one of four arithmetic operations to two numbers. Division by
//! zero is reported in the result text rather than as a protocol error.

use futures::FutureExt;
use rmcp::model::{CallToolResult, Content};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{info, instrument};

use super::format_number;
use crate::domains::tools::registry::{ToolContext, ToolDefinition, ToolFuture};

pub const DIVIDE_BY_ZERO: &str = "Error: Cannot divide by zero";

/// Arithmetic operation supported by the calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
#[schemars(inline)]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operation {
    /// Apply the operation. Returns `None` when dividing by zero.
    pub fn apply(self, a: f64, b: f64) -> Option<f64> {
        match self {
            Self::Add => Some(a + b),
            Self::Subtract => Some(a - b),
            Self::Multiply => Some(a * b),
            Self::Divide if b == 0.0 => None,
            Self::Divide => Some(a / b),
        }
    }
}

/// Parameters for the calculate tool.
#[derive(Debug, Clone, Copy, Deserialize, JsonSchema)]
pub struct CalculateParams {
    pub operation: Operation,
    pub a: f64,
    pub b: f64,
}

/// Calculate tool - basic arithmetic on two operands.
pub struct CalculateTool;

impl CalculateTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "calculate";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str =
        "Perform a basic arithmetic operation (add, subtract, multiply, divide) on two numbers.";

    #[instrument(skip_all, fields(operation = ?params.operation))]
    pub fn execute(params: &CalculateParams) -> CallToolResult {
        let text = match params.operation.apply(params.a, params.b) {
            Some(value) => format_number(value),
            None => {
                info!("Rejected division of {} by zero", params.a);
                DIVIDE_BY_ZERO.to_string()
            }
        };

        CallToolResult::success(vec![Content::text(text)])
    }

    /// Registry entry for this tool.
    pub fn definition() -> ToolDefinition {
        ToolDefinition::new(Self::NAME, Self::handle)
            .with_description(Self::DESCRIPTION)
    }

    fn handle(params: CalculateParams, _context: ToolContext) -> ToolFuture {
        futures::future::ready(Ok(Self::execute(&params))).boxed()
    }
}

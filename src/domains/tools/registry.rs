//! Tool Registry - central registration and dispatch for all tools.
//!
//! This module provides:
//! - A static table of tool definitions, built once at startup
//! - Dispatch of tool calls, decoding the arguments into the tool's typed
//!   parameters before its handler runs
//! - Tool metadata for listing
//!
//! Both transports go through [`ToolRegistry::call_tool`], so argument
//! checking and error shaping are identical over stdio and HTTP.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use futures::future::BoxFuture;
use rmcp::handler::server::tool::cached_schema_for_type;
use rmcp::model::{CallToolResult, JsonObject, Tool};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{info, instrument, warn};

use super::definitions::{AddTool, CalculateTool, GetWeatherTool, OpenMeteoClient};
use super::error::ToolError;

/// Shared collaborators handed to every handler invocation.
#[derive(Debug, Clone)]
pub struct ToolContext {
    pub weather: Arc<OpenMeteoClient>,
}

impl ToolContext {
    pub fn new(weather: OpenMeteoClient) -> Self {
        Self {
            weather: Arc::new(weather),
        }
    }
}

/// Future returned by a tool handler.
pub type ToolFuture = BoxFuture<'static, Result<CallToolResult, ToolError>>;

/// Decodes a JSON object into the tool's parameters and starts the handler.
/// Fails without starting the handler when decoding fails.
type DecodeAndRun = dyn Fn(Value, ToolContext) -> Result<ToolFuture, serde_json::Error> + Send + Sync;

/// A registered tool: name, advertised input schema and handler.
#[derive(Clone)]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: Option<&'static str>,
    pub input_schema: Arc<JsonObject>,
    run: Arc<DecodeAndRun>,
}

impl ToolDefinition {
    /// Define a tool taking parameters of type `P`.
    ///
    /// The input schema is derived from `P`, and serde decoding of `P` is the
    /// argument check: wrong types, missing fields and unknown enum variants
    /// are rejected before `handler` is called. Undeclared fields are ignored.
    pub fn new<P>(name: &'static str, handler: fn(P, ToolContext) -> ToolFuture) -> Self
    where
        P: DeserializeOwned + JsonSchema + 'static,
    {
        let run = move |arguments: Value, context: ToolContext| {
            let params = serde_json::from_value::<P>(arguments)?;
            Ok(handler(params, context))
        };

        Self {
            name,
            description: None,
            input_schema: cached_schema_for_type::<P>(),
            run: Arc::new(run),
        }
    }

    pub fn with_description(mut self, description: &'static str) -> Self {
        self.description = Some(description);
        self
    }

    /// Create a Tool model for this definition (metadata).
    pub fn to_tool(&self) -> Tool {
        Tool {
            name: self.name.into(),
            description: self.description.map(Into::into),
            input_schema: self.input_schema.clone(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }
}

impl fmt::Debug for ToolDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolDefinition")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("input_schema", &self.input_schema)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tool Registry
// ============================================================================

/// Tool registry - manages all available tools.
///
/// Read-only once built; there is no removal operation.
pub struct ToolRegistry {
    tools: Vec<ToolDefinition>,
    index: HashMap<&'static str, usize>,
    context: ToolContext,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new(context: ToolContext) -> Self {
        Self {
            tools: Vec::new(),
            index: HashMap::new(),
            context,
        }
    }

    /// Create a registry holding the server's built-in tools.
    pub fn with_default_tools(context: ToolContext) -> Result<Self, ToolError> {
        let mut registry = Self::new(context);
        registry.register(AddTool::definition())?;
        registry.register(CalculateTool::definition())?;
        registry.register(GetWeatherTool::definition())?;
        Ok(registry)
    }

    /// Register a tool. Names must be non-empty and unique.
    pub fn register(&mut self, definition: ToolDefinition) -> Result<(), ToolError> {
        if definition.name.trim().is_empty() {
            return Err(ToolError::InvalidDefinition(
                "tool name must not be empty".to_string(),
            ));
        }
        if self.index.contains_key(definition.name) {
            return Err(ToolError::Duplicate(definition.name.to_string()));
        }

        self.index.insert(definition.name, self.tools.len());
        self.tools.push(definition);
        Ok(())
    }

    /// Get all tool names, in registration order.
    pub fn tool_names(&self) -> Vec<&'static str> {
        self.tools.iter().map(|t| t.name).collect()
    }

    pub fn get(&self, name: &str) -> Option<&ToolDefinition> {
        self.index.get(name).map(|&i| &self.tools[i])
    }

    pub fn definitions(&self) -> &[ToolDefinition] {
        &self.tools
    }

    /// Get all tools as Tool models (metadata).
    pub fn list_tools(&self) -> Vec<Tool> {
        self.tools.iter().map(ToolDefinition::to_tool).collect()
    }

    /// Dispatch a tool call to the appropriate handler.
    ///
    /// Unknown names yield [`ToolError::NotFound`]. A missing or `null`
    /// argument bag is treated as an empty object, any other non-object is
    /// [`ToolError::InvalidArguments`], and arguments that do not decode into
    /// the tool's parameters yield [`ToolError::Validation`]. In those cases
    /// the handler is not invoked. The handler's result is returned unchanged.
    #[instrument(skip(self, arguments))]
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: Option<Value>,
    ) -> Result<CallToolResult, ToolError> {
        let Some(definition) = self.get(name) else {
            warn!("Unknown tool requested: {}", name);
            return Err(ToolError::not_found(name));
        };

        let arguments = match arguments {
            None | Some(Value::Null) => Value::Object(Map::new()),
            Some(Value::Object(map)) => Value::Object(map),
            Some(other) => {
                warn!("Non-object arguments for {}", name);
                return Err(ToolError::invalid_arguments(format!(
                    "arguments for '{}' must be an object, received {}",
                    name,
                    json_type_name(&other)
                )));
            }
        };

        let call = (definition.run)(arguments, self.context.clone()).map_err(|e| {
            warn!("Rejected arguments for {}: {}", name, e);
            ToolError::validation(name, e)
        })?;

        info!("Calling tool: {}", name);
        call.await
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

//! Tool-specific error types.

use thiserror::Error;

/// Errors that can occur during tool registration and dispatch.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The requested tool was not found.
    #[error("Tool not found: {0}")]
    NotFound(String),

    /// The argument bag itself is unusable (e.g. not a JSON object).
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// The arguments could not be decoded into the tool's parameter type.
    #[error("Invalid arguments for tool '{tool}': {source}")]
    Validation {
        tool: String,
        #[source]
        source: serde_json::Error,
    },

    /// A tool definition is malformed (e.g. empty name).
    #[error("Invalid tool definition: {0}")]
    InvalidDefinition(String),

    /// A tool with the same name is already registered.
    #[error("Tool already registered: {0}")]
    Duplicate(String),
}

impl ToolError {
    /// Create a new "not found" error.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }

    /// Create a new "invalid arguments" error.
    pub fn invalid_arguments(msg: impl Into<String>) -> Self {
        Self::InvalidArguments(msg.into())
    }

    /// Create a new decoding error for the named tool.
    pub fn validation(tool: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Validation {
            tool: tool.into(),
            source,
        }
    }

    /// Whether the caller can fix this error by correcting the request.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_) | Self::InvalidArguments(_) | Self::Validation { .. }
        )
    }
}

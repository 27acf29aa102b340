//! Tools domain module.
//!
//! This module handles all tool-related functionality for the MCP server.
//! Tools are executable functions that can be called by MCP clients by name
//! with typed arguments.
//!
//! ## Architecture
//!
//! - `definitions/` - Individual tool implementations (one file per tool)
//! - `registry.rs` - Central tool registry and dispatch
//! - `router.rs` - rmcp ToolRouter built from the registry (stdio transport)
//! - `error.rs` - Tool-specific error types
//!
//! ## Adding a New Tool
//!
//! 1. Create a new file in `definitions/` with a `Params` struct deriving
//!    `Deserialize` and `JsonSchema`, plus `NAME`, `execute()` and
//!    `definition()`
//! 2. Export it in `definitions/mod.rs`
//! 3. Register it in `ToolRegistry::with_default_tools`
//!
//! Both transports pick it up from the registry.

pub mod definitions;
mod error;
pub mod registry;
pub mod router;

pub use error::ToolError;
pub use registry::{ToolContext, ToolDefinition, ToolFuture, ToolRegistry};
pub use router::build_tool_router;

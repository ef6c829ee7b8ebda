//! Core shared types for toolbelt registries.

#![warn(missing_docs, clippy::pedantic)]

mod error;
mod ids;
mod name;
mod param;

/// Error type and result alias shared across the workspace.
pub use error::{Error, Result};
/// Unique identifier for a single tool invocation.
pub use ids::InvocationId;
/// Group-qualified tool names and the default group sentinel.
pub use name::{DEFAULT_GROUP, GROUP_SEPARATOR, ToolName, validate_group, validate_tool_name};
/// Primitive schema type tags.
pub use param::ParamType;

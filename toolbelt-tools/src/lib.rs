//! Tool registration and uniform sync/async execution.
//!
//! A [`Toolbelt`] stores tools under `"<group>.<name>"`, derives a parameter
//! schema for each, and executes them from either async or blocking code
//! regardless of whether the tool itself is `async`. Tool failures are
//! returned as `"Error: ..."` strings so an agent loop can always feed the
//! outcome back to the model.

#![warn(missing_docs, clippy::pedantic)]

pub mod args;
pub mod bridge;
pub mod definition;
pub mod error;
pub mod macros;
pub mod query;
pub mod registry;
pub mod schema;

pub use args::ToolArgs;
pub use bridge::{BlockingTool, InvocationState, Tool, ToolBody, ToolHandle};
pub use definition::{SourceLocation, ToolDeclaration, ToolDefinition};
pub use error::{ToolError, ToolResult};
pub use macros::{ToolRegistration, tool};
pub use query::{ApiFormat, FORMATTER_CAPABILITY, SchemaFormatter, ToolListing, ToolSpec};
pub use registry::{ToolBuilder, Toolbelt};
pub use schema::ParameterSchema;
pub use toolbelt_primitives::{DEFAULT_GROUP, InvocationId, ParamType, ToolName};

#[doc(hidden)]
pub use inventory;
#[doc(hidden)]
pub use serde_json;

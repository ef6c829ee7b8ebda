//! Support code for the `#[tool]` attribute.
//!
//! `#[tool]` keeps the annotated function as written and adds a
//! `<name>_tool()` constructor returning a [`ToolDeclaration`]. The
//! declaration is also submitted to a link-time collection so
//! [`Toolbelt::register_collected`] can register every annotated function in
//! the binary.

use std::fmt::Display;

use serde::Serialize;
use serde_json::Value;

use crate::bridge::ToolHandle;
use crate::definition::ToolDeclaration;
use crate::error::{ToolError, ToolResult};
use crate::registry::Toolbelt;

pub use toolbelt_macros::tool;

/// Link-time entry emitted by `#[tool]`.
#[derive(Debug)]
pub struct ToolRegistration {
    declare: fn() -> ToolDeclaration,
}

impl ToolRegistration {
    /// Wraps a declaration constructor.
    #[must_use]
    pub const fn new(declare: fn() -> ToolDeclaration) -> Self {
        Self { declare }
    }

    /// Builds the declaration.
    #[must_use]
    pub fn declare(&self) -> ToolDeclaration {
        (self.declare)()
    }
}

inventory::collect!(ToolRegistration);

impl Toolbelt {
    /// Registers every `#[tool]` function linked into the binary.
    ///
    /// Tools are registered in source order (file path, then line) so
    /// bare-name resolution is deterministic.
    ///
    /// # Errors
    ///
    /// Stops at the first declaration rejected by [`Toolbelt::register`].
    pub fn register_collected(&self) -> ToolResult<Vec<ToolHandle>> {
        let mut declarations: Vec<ToolDeclaration> = inventory::iter::<ToolRegistration>
            .into_iter()
            .map(ToolRegistration::declare)
            .collect();
        declarations.sort_by(|a, b| a.source().cmp(&b.source()));

        declarations
            .into_iter()
            .map(|declaration| self.register(declaration))
            .collect()
    }
}

/// Converts a tool function's plain return value into a tool result.
///
/// # Errors
///
/// Returns [`ToolError::Execution`] if the value cannot be serialized.
pub fn output<T>(value: T) -> ToolResult<Value>
where
    T: Serialize,
{
    serde_json::to_value(value)
        .map_err(|err| ToolError::execution(format!("failed to serialize tool output: {err}")))
}

/// Converts a tool function's `Result` return value into a tool result.
///
/// # Errors
///
/// Returns [`ToolError::Execution`] carrying the function's error message,
/// or a serialization failure.
pub fn fallible_output<T, E>(result: Result<T, E>) -> ToolResult<Value>
where
    T: Serialize,
    E: Display,
{
    result
        .map_err(|err| ToolError::execution(err.to_string()))
        .and_then(output)
}

//! Errors produced by tool registration, lookup and invocation.

use thiserror::Error;

/// Result alias for tool operations.
pub type ToolResult<T> = Result<T, ToolError>;

/// Errors produced by tool registration and invocation.
///
/// Errors raised while a tool runs never escape [`Toolbelt::execute_async`]
/// or [`Toolbelt::execute_sync`]; they are rendered into `"Error: ..."`
/// strings instead. The configuration-time variants are returned to the
/// caller as-is.
///
/// [`Toolbelt::execute_async`]: crate::Toolbelt::execute_async
/// [`Toolbelt::execute_sync`]: crate::Toolbelt::execute_sync
#[derive(Debug, Error)]
pub enum ToolError {
    /// Tool metadata failed validation.
    #[error("invalid tool metadata: {reason}")]
    InvalidMetadata {
        /// Human-readable reason for rejection.
        reason: String,
    },

    /// Name or group rejected by primitive validation.
    #[error(transparent)]
    Primitive(#[from] toolbelt_primitives::Error),

    /// Requested tool does not exist.
    #[error("tool not found: {name}")]
    NotFound {
        /// Name as supplied by the caller.
        name: String,
    },

    /// Supplied arguments do not fit the tool's signature.
    #[error("invalid arguments: {reason}")]
    InvalidArguments {
        /// Human-readable reason for rejection.
        reason: String,
    },

    /// Tool execution failed.
    #[error("{reason}")]
    Execution {
        /// Human-readable error returned by the tool implementation.
        reason: String,
    },

    /// An optional integration was requested but is not installed.
    #[error("capability unavailable: {capability}")]
    CapabilityUnavailable {
        /// Name of the missing capability.
        capability: String,
    },

    /// Parameter schema is missing required structure.
    #[error("invalid parameter schema: {reason}")]
    SchemaInvalid {
        /// Human-readable reason for rejection.
        reason: String,
    },
}

impl ToolError {
    /// Creates an execution error from the supplied reason.
    #[must_use]
    pub fn execution(reason: impl Into<String>) -> Self {
        Self::Execution {
            reason: reason.into(),
        }
    }

    /// Creates an argument error from the supplied reason.
    #[must_use]
    pub fn invalid_arguments(reason: impl Into<String>) -> Self {
        Self::InvalidArguments {
            reason: reason.into(),
        }
    }

    /// Creates a schema error from the supplied reason.
    #[must_use]
    pub fn schema_invalid(reason: impl Into<String>) -> Self {
        Self::SchemaInvalid {
            reason: reason.into(),
        }
    }

    /// Returns `true` for [`ToolError::CapabilityUnavailable`], so hosts can
    /// fall back to raw tool listings.
    #[must_use]
    pub fn is_capability_unavailable(&self) -> bool {
        matches!(self, Self::CapabilityUnavailable { .. })
    }
}

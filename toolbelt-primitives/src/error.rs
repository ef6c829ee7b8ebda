//! Shared error definitions for toolbelt primitives.

use thiserror::Error;

/// Result alias used throughout the toolbelt crates.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while manipulating primitive toolbelt types.
#[derive(Debug, Error)]
pub enum Error {
    /// Tool name failed validation.
    #[error("invalid tool name `{name}`: {reason}")]
    InvalidToolName {
        /// The offending name.
        name: String,
        /// Human-readable reason for rejection.
        reason: String,
    },

    /// Group name failed validation.
    #[error("invalid tool group `{group}`: {reason}")]
    InvalidGroup {
        /// The offending group.
        group: String,
        /// Human-readable reason for rejection.
        reason: String,
    },
}

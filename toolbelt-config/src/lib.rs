//! Configuration management for toolbelt registries.
//!
//! [`ToolbeltConfig`] is plain serde data: build it in code, deserialize it
//! from JSON, or layer environment overrides on top of either.

#![warn(missing_docs, clippy::pedantic)]

pub mod loader;
pub mod schema;

pub use loader::{ENV_DEFAULT_GROUP, ENV_LOG, ENV_STRICT_SCHEMAS};
pub use schema::ToolbeltConfig;

//! Register Rust functions as LLM-callable tools.
//!
//! Depend on this crate via `cargo add toolbelt`. It bundles the workspace
//! crates behind feature flags so hosts only pull in what they use.
//!
//! ```
//! use serde_json::json;
//! use toolbelt::tools::{ParamType, ToolArgs, ToolResult};
//!
//! let toolbelt = toolbelt::tools::Toolbelt::new();
//! toolbelt
//!     .tool("add")
//!     .group("math")
//!     .params([("a", ParamType::Integer), ("b", ParamType::Integer)])
//!     .register_blocking(|args: ToolArgs| -> ToolResult<serde_json::Value> {
//!         Ok(json!(args.get::<i64>("a")? + args.get::<i64>("b")?))
//!     })
//!     .unwrap();
//!
//! assert_eq!(toolbelt.execute_sync("math.add", json!({"a": 2, "b": 3})), json!(5));
//! ```
//!
//! Functions annotated with `#[tool]` need the crate path when used through
//! this facade: `#[toolbelt::tools::tool(crate = "toolbelt::tools")]`.

#![warn(missing_docs, clippy::pedantic)]

/// Re-export shared primitives for convenience.
pub use toolbelt_primitives as primitives;

/// Registry and execution bridge (enabled by `tools` feature).
#[cfg(feature = "tools")]
pub use toolbelt_tools as tools;

/// Provider schema formatters (enabled by `formats` feature).
#[cfg(feature = "formats")]
pub use toolbelt_formats as formats;

/// Tracing subscriber setup (enabled by `telemetry` feature).
#[cfg(feature = "telemetry")]
pub use toolbelt_telemetry as telemetry;

/// Configuration management (enabled by `config` feature).
#[cfg(feature = "config")]
pub use toolbelt_config as config;

/// Builds a registry for `config` with every provider format installed.
///
/// ```
/// use toolbelt::config::ToolbeltConfig;
/// use toolbelt::tools::ApiFormat;
///
/// let toolbelt = toolbelt::with_providers(ToolbeltConfig::default());
/// assert!(toolbelt.formatted_tools(None, ApiFormat::Gemini).is_ok());
/// ```
#[cfg(feature = "formats")]
#[must_use]
pub fn with_providers(config: toolbelt_config::ToolbeltConfig) -> toolbelt_tools::Toolbelt {
    toolbelt_tools::Toolbelt::with_config(config)
        .with_formatter(std::sync::Arc::new(toolbelt_formats::ProviderFormatter::new()))
}

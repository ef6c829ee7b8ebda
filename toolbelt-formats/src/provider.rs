//! [`SchemaFormatter`] backed by the provider modules of this crate.

use serde_json::Value;
use toolbelt_tools::{ApiFormat, SchemaFormatter, ToolError, ToolResult, ToolSpec};
use tracing::debug;

use crate::{anthropic, gemini, ollama, openai};

const ALL_FORMATS: [ApiFormat; 4] = [
    ApiFormat::OpenAi,
    ApiFormat::Anthropic,
    ApiFormat::Gemini,
    ApiFormat::Ollama,
];

/// Formats tool listings for the supported provider APIs.
///
/// ```
/// use std::sync::Arc;
///
/// use toolbelt_formats::ProviderFormatter;
/// use toolbelt_tools::{ApiFormat, Toolbelt};
///
/// let toolbelt = Toolbelt::new().with_formatter(Arc::new(ProviderFormatter::new()));
/// let schema = toolbelt.formatted_tools(None, ApiFormat::OpenAi).unwrap();
/// assert_eq!(schema, serde_json::json!([]));
/// ```
#[derive(Clone, Debug)]
pub struct ProviderFormatter {
    formats: Vec<ApiFormat>,
}

impl Default for ProviderFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProviderFormatter {
    /// Formatter supporting every [`ApiFormat`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            formats: ALL_FORMATS.to_vec(),
        }
    }

    /// Formatter restricted to `formats`; other formats are reported as
    /// unavailable.
    #[must_use]
    pub fn only(formats: impl IntoIterator<Item = ApiFormat>) -> Self {
        let mut selected = Vec::new();
        for format in formats {
            if !selected.contains(&format) {
                selected.push(format);
            }
        }
        Self { formats: selected }
    }

    /// Returns whether `format` can be rendered.
    #[must_use]
    pub fn supports(&self, format: ApiFormat) -> bool {
        self.formats.contains(&format)
    }

    /// Formats this formatter accepts, in the order they were given.
    #[must_use]
    pub fn formats(&self) -> &[ApiFormat] {
        &self.formats
    }
}

impl SchemaFormatter for ProviderFormatter {
    fn format_tool_schema(
        &self,
        format: ApiFormat,
        tools: &[ToolSpec],
        strict: bool,
    ) -> ToolResult<Value> {
        if !self.supports(format) {
            return Err(ToolError::CapabilityUnavailable {
                capability: format!("{format} tool schema"),
            });
        }

        debug!(%format, strict, tools = tools.len(), "rendering provider tool schema");
        Ok(match format {
            ApiFormat::OpenAi => openai::tool_schema(tools, strict),
            ApiFormat::Anthropic => anthropic::tool_schema(tools, strict),
            ApiFormat::Gemini => gemini::tool_schema(tools),
            ApiFormat::Ollama => ollama::tool_schema(tools),
        })
    }
}

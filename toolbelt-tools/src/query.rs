//! Tool listings and provider schema formatting.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::definition::ToolDefinition;
use crate::error::{ToolError, ToolResult};
use crate::registry::Toolbelt;
use crate::schema::ParameterSchema;

/// Capability name reported when no formatter is installed.
pub const FORMATTER_CAPABILITY: &str = "schema formatter";

/// One entry of a raw tool listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolSpec {
    qualified_name: String,
    description: String,
    parameters: ParameterSchema,
}

impl ToolSpec {
    /// Creates a listing entry.
    #[must_use]
    pub fn new(
        qualified_name: impl Into<String>,
        description: impl Into<String>,
        parameters: ParameterSchema,
    ) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            description: description.into(),
            parameters,
        }
    }

    /// `"<group>.<name>"`.
    #[must_use]
    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    /// Tool description; may be empty.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Parameter schema.
    #[must_use]
    pub fn parameters(&self) -> &ParameterSchema {
        &self.parameters
    }

    /// Splits the entry into `(qualified_name, description, parameters)`.
    #[must_use]
    pub fn into_parts(self) -> (String, String, ParameterSchema) {
        (self.qualified_name, self.description, self.parameters)
    }
}

impl From<&ToolDefinition> for ToolSpec {
    fn from(definition: &ToolDefinition) -> Self {
        Self::new(
            definition.qualified_name(),
            definition.description(),
            definition.parameters().clone(),
        )
    }
}

/// Target provider for formatted tool schemas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiFormat {
    /// OpenAI chat completions `tools` array.
    OpenAi,
    /// Anthropic messages `tools` array.
    Anthropic,
    /// Gemini `tools` with `function_declarations`.
    Gemini,
    /// Ollama chat `tools` array.
    Ollama,
}

impl ApiFormat {
    /// Lowercase identifier of the format.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
            Self::Gemini => "gemini",
            Self::Ollama => "ollama",
        }
    }
}

impl Display for ApiFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApiFormat {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "anthropic" => Ok(Self::Anthropic),
            "gemini" => Ok(Self::Gemini),
            "ollama" => Ok(Self::Ollama),
            other => Err(ToolError::CapabilityUnavailable {
                capability: format!("api format `{other}`"),
            }),
        }
    }
}

/// Converts raw tool listings into a provider's schema format.
pub trait SchemaFormatter: Send + Sync {
    /// Formats `tools` for `format`.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::CapabilityUnavailable`] when the formatter does
    /// not support `format`.
    fn format_tool_schema(
        &self,
        format: ApiFormat,
        tools: &[ToolSpec],
        strict: bool,
    ) -> ToolResult<Value>;
}

/// Result of [`Toolbelt::get_tools`].
#[derive(Clone, Debug, PartialEq)]
pub enum ToolListing {
    /// Unformatted `(qualified_name, description, parameters)` entries.
    Raw(Vec<ToolSpec>),
    /// Provider-specific schema produced by the installed formatter.
    Formatted(Value),
}

impl ToolListing {
    /// Returns the raw entries, if unformatted.
    #[must_use]
    pub fn as_raw(&self) -> Option<&[ToolSpec]> {
        match self {
            Self::Raw(tools) => Some(tools),
            Self::Formatted(_) => None,
        }
    }

    /// Returns the formatted schema, if formatted.
    #[must_use]
    pub fn as_formatted(&self) -> Option<&Value> {
        match self {
            Self::Raw(_) => None,
            Self::Formatted(value) => Some(value),
        }
    }
}

impl Toolbelt {
    /// Lists tools, optionally formatted for a provider API.
    ///
    /// Without `format` the raw listing is returned. With `format` the
    /// listing is handed to the installed [`SchemaFormatter`] together with
    /// `strict`.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::CapabilityUnavailable`] when `format` is given
    /// but no formatter is installed, and propagates formatter errors.
    pub fn get_tools(
        &self,
        groups: Option<&[&str]>,
        format: Option<ApiFormat>,
        strict: bool,
    ) -> ToolResult<ToolListing> {
        let tools = self.list(groups);
        match format {
            Some(format) => self
                .format_listing(&tools, format, strict)
                .map(ToolListing::Formatted),
            None => Ok(ToolListing::Raw(tools)),
        }
    }

    /// Formats tools for a provider using the configured `strict_schemas`
    /// default.
    ///
    /// # Errors
    ///
    /// Same as [`Toolbelt::get_tools`].
    pub fn formatted_tools(&self, groups: Option<&[&str]>, format: ApiFormat) -> ToolResult<Value> {
        let tools = self.list(groups);
        self.format_listing(&tools, format, self.config().strict_schemas)
    }

    fn format_listing(&self, tools: &[ToolSpec], format: ApiFormat, strict: bool) -> ToolResult<Value> {
        let formatter = self
            .formatter()
            .ok_or_else(|| ToolError::CapabilityUnavailable {
                capability: FORMATTER_CAPABILITY.to_owned(),
            })?;

        debug!(%format, strict, tools = tools.len(), "formatting tool schemas");
        formatter.format_tool_schema(format, tools, strict)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;
    use toolbelt_primitives::ParamType;

    use super::*;
    use crate::args::ToolArgs;

    struct NamesOnly;

    impl SchemaFormatter for NamesOnly {
        fn format_tool_schema(
            &self,
            format: ApiFormat,
            tools: &[ToolSpec],
            strict: bool,
        ) -> ToolResult<Value> {
            Ok(json!({
                "format": format.as_str(),
                "strict": strict,
                "names": tools.iter().map(ToolSpec::qualified_name).collect::<Vec<_>>(),
            }))
        }
    }

    fn toolbelt() -> Toolbelt {
        let toolbelt = Toolbelt::new();
        toolbelt
            .tool("add")
            .group("math")
            .description("Add two numbers")
            .params([("a", ParamType::Number), ("b", ParamType::Number)])
            .register_blocking(|args: ToolArgs| -> ToolResult<Value> {
                Ok(json!(args.get::<f64>("a")? + args.get::<f64>("b")?))
            })
            .unwrap();
        toolbelt
    }

    #[test]
    fn raw_listing_without_format() {
        let listing = toolbelt().get_tools(None, None, false).unwrap();
        let tools = listing.as_raw().unwrap();
        assert_eq!(tools.len(), 1);
        let (name, description, parameters) = tools[0].clone().into_parts();
        assert_eq!(name, "math.add");
        assert_eq!(description, "Add two numbers");
        assert_eq!(parameters.to_value()["properties"]["a"]["type"], "number");
    }

    #[test]
    fn missing_formatter_is_distinguishable() {
        let err = toolbelt()
            .get_tools(None, Some(ApiFormat::OpenAi), false)
            .unwrap_err();
        assert!(err.is_capability_unavailable());
    }

    #[test]
    fn installed_formatter_receives_listing_and_strict_flag() {
        let toolbelt = toolbelt().with_formatter(Arc::new(NamesOnly));
        let listing = toolbelt
            .get_tools(Some(&["math"]), Some(ApiFormat::Anthropic), true)
            .unwrap();
        assert_eq!(
            listing.as_formatted().unwrap(),
            &json!({ "format": "anthropic", "strict": true, "names": ["math.add"] })
        );
    }

    #[test]
    fn formatter_can_be_installed_on_a_shared_registry() {
        let toolbelt = Arc::new(toolbelt());
        let shared = Arc::clone(&toolbelt);
        assert!(shared.formatted_tools(None, ApiFormat::Ollama).is_err());

        toolbelt.set_formatter(Arc::new(NamesOnly));
        let formatted = shared.formatted_tools(None, ApiFormat::Ollama).unwrap();
        assert_eq!(formatted["names"], json!(["math.add"]));
    }

    #[test]
    fn api_format_tokens() {
        assert_eq!("OpenAI".parse::<ApiFormat>().unwrap(), ApiFormat::OpenAi);
        assert_eq!(ApiFormat::Gemini.to_string(), "gemini");
        assert_eq!(serde_json::to_value(ApiFormat::OpenAi).unwrap(), json!("openai"));
        assert!("cohere".parse::<ApiFormat>().unwrap_err().is_capability_unavailable());
    }
}

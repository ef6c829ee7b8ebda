//! Anthropic messages tool format.

use serde_json::{Value, json};
use toolbelt_tools::ToolSpec;

use crate::openai::close_schema;

/// Renders `tools` as an Anthropic `tools` array.
///
/// Anthropic has no strict flag; `strict` only closes the input schema.
#[must_use]
pub fn tool_schema(tools: &[ToolSpec], strict: bool) -> Value {
    tools
        .iter()
        .map(|tool| {
            let mut input_schema = tool.parameters().to_value();
            if strict {
                close_schema(&mut input_schema);
            }
            json!({
                "name": tool.qualified_name(),
                "description": tool.description(),
                "input_schema": input_schema,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use toolbelt_tools::{ParamType, ParameterSchema};

    use super::*;

    #[test]
    fn uses_input_schema_key() {
        let tools = [ToolSpec::new(
            "text.shout",
            "",
            ParameterSchema::empty().with_param("text", ParamType::String),
        )];
        assert_eq!(
            tool_schema(&tools, false),
            json!([{
                "name": "text.shout",
                "description": "",
                "input_schema": {
                    "type": "object",
                    "properties": { "text": { "type": "string" } },
                    "required": ["text"]
                }
            }])
        );
        assert_eq!(
            tool_schema(&tools, true)[0]["input_schema"]["additionalProperties"],
            json!(false)
        );
    }
}

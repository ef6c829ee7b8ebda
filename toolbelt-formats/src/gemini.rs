//! Gemini `function_declarations` tool format.

use serde_json::{Value, json};
use toolbelt_tools::ToolSpec;

/// Renders `tools` as a Gemini `tools` array holding one
/// `function_declarations` entry. Gemini has no strict mode.
#[must_use]
pub fn tool_schema(tools: &[ToolSpec]) -> Value {
    let declarations: Vec<Value> = tools
        .iter()
        .map(|tool| {
            json!({
                "name": tool.qualified_name(),
                "description": tool.description(),
                "parameters": tool.parameters().to_value(),
            })
        })
        .collect();

    json!([{ "function_declarations": declarations }])
}

#[cfg(test)]
mod tests {
    use toolbelt_tools::{ParamType, ParameterSchema};

    use super::*;

    #[test]
    fn wraps_declarations() {
        let tools = [
            ToolSpec::new(
                "math.add",
                "Add",
                ParameterSchema::empty().with_param("a", ParamType::Integer),
            ),
            ToolSpec::new("default.ping", "", ParameterSchema::empty()),
        ];
        let schema = tool_schema(&tools);
        let declarations = schema[0]["function_declarations"].as_array().unwrap();
        assert_eq!(declarations.len(), 2);
        assert_eq!(declarations[0]["name"], "math.add");
        assert_eq!(
            declarations[0]["parameters"]["properties"]["a"]["type"],
            "integer"
        );
        assert_eq!(declarations[1]["parameters"]["required"], json!([]));
    }
}

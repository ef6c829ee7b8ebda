//! `OpenAI` chat completions tool format.

use serde_json::{Map, Value, json};
use toolbelt_tools::ToolSpec;

/// Renders `tools` as an `OpenAI` `tools` array.
///
/// In strict mode every function carries `"strict": true` and its
/// parameters reject properties that are not declared.
#[must_use]
pub fn tool_schema(tools: &[ToolSpec], strict: bool) -> Value {
    Value::Array(tools.iter().map(|tool| function_tool(tool, strict)).collect())
}

/// Builds a single `{"type": "function", "function": {...}}` entry.
pub(crate) fn function_tool(tool: &ToolSpec, strict: bool) -> Value {
    let mut parameters = tool.parameters().to_value();
    if strict {
        close_schema(&mut parameters);
    }

    let mut function = Map::new();
    function.insert("name".to_owned(), json!(tool.qualified_name()));
    function.insert("description".to_owned(), json!(tool.description()));
    function.insert("parameters".to_owned(), parameters);
    if strict {
        function.insert("strict".to_owned(), Value::Bool(true));
    }

    json!({ "type": "function", "function": function })
}

/// Marks an object schema as accepting only its declared properties.
pub(crate) fn close_schema(schema: &mut Value) {
    if let Value::Object(fields) = schema {
        fields.insert("additionalProperties".to_owned(), Value::Bool(false));
    }
}

#[cfg(test)]
mod tests {
    use toolbelt_tools::{ParamType, ParameterSchema};

    use super::*;

    fn add() -> ToolSpec {
        ToolSpec::new(
            "math.add",
            "Add two numbers",
            ParameterSchema::empty()
                .with_param("a", ParamType::Number)
                .with_param("b", ParamType::Number),
        )
    }

    #[test]
    fn renders_function_objects() {
        let schema = tool_schema(&[add()], false);
        assert_eq!(
            schema,
            json!([{
                "type": "function",
                "function": {
                    "name": "math.add",
                    "description": "Add two numbers",
                    "parameters": {
                        "type": "object",
                        "properties": {
                            "a": { "type": "number" },
                            "b": { "type": "number" }
                        },
                        "required": ["a", "b"]
                    }
                }
            }])
        );
    }

    #[test]
    fn strict_mode_closes_parameters() {
        let schema = tool_schema(&[add()], true);
        let function = &schema[0]["function"];
        assert_eq!(function["strict"], json!(true));
        assert_eq!(function["parameters"]["additionalProperties"], json!(false));
        assert_eq!(function["parameters"]["required"], json!(["a", "b"]));
    }

    #[test]
    fn empty_listing_is_empty_array() {
        assert_eq!(tool_schema(&[], true), json!([]));
    }
}

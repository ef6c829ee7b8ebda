//! Ollama chat tool format.
//!
//! Ollama accepts `OpenAI`-style function objects but has no strict flag.

use serde_json::Value;
use toolbelt_tools::ToolSpec;

use crate::openai::function_tool;

/// Renders `tools` as an Ollama `tools` array.
#[must_use]
pub fn tool_schema(tools: &[ToolSpec]) -> Value {
    Value::Array(tools.iter().map(|tool| function_tool(tool, false)).collect())
}

use std::collections::HashMap;

use serde::Serialize;
use serde_json::{Value, json};
use toolbelt_tools::{ParamType, ToolArgs, Toolbelt, tool};

/// Add two numbers
#[tool(group = "math")]
async fn add(a: f64, b: f64) -> f64 {
    a + b
}

/// Multiply two numbers
///
/// Both factors are floats.
#[tool(group = "math", name = "times")]
fn multiply(a: f64, b: f64) -> f64 {
    a * b
}

#[tool(group = "text")]
fn shout(text: &str) -> String {
    text.to_uppercase()
}

#[tool(group = "text")]
fn parse_count(raw: String) -> Result<i64, std::num::ParseIntError> {
    raw.trim().parse()
}

#[derive(Serialize)]
struct SearchResult {
    query: String,
    hits: usize,
}

/// Search the index
#[tool(group = "text")]
fn search(query: String) -> SearchResult {
    let hits = query.split_whitespace().count();
    SearchResult { query, hits }
}

#[tool]
fn tally(words: Vec<String>, weights: HashMap<String, i64>, loud: bool) -> usize {
    let _ = (weights, loud);
    words.len()
}

#[tokio::test]
async fn annotated_functions_stay_callable() {
    assert_eq!(add(1.0, 2.0).await, 3.0);
    assert_eq!(multiply(2.0, 4.0), 8.0);
    assert_eq!(shout("hi"), "HI");
}

#[test]
fn declaration_reflects_signature_and_docs() {
    let declaration = multiply_tool();
    assert_eq!(declaration.name(), "times");
    assert_eq!(declaration.group(), Some("math"));
    assert!(declaration.source().unwrap().file().ends_with("attribute_tools.rs"));

    let toolbelt = Toolbelt::new();
    let handle = toolbelt.register(declaration).unwrap();
    let definition = handle.definition();
    assert_eq!(definition.qualified_name(), "math.times");
    assert_eq!(
        definition.description(),
        "Multiply two numbers\n\nBoth factors are floats."
    );
    assert_eq!(definition.parameters().param_type("a"), Some(ParamType::Number));
}

#[test]
fn parameter_types_map_to_schema_types() {
    let toolbelt = Toolbelt::new();
    let handle = toolbelt.register(tally_tool()).unwrap();
    let definition = handle.definition();
    assert_eq!(definition.qualified_name(), "default.tally");
    assert_eq!(definition.description(), "");

    let schema = definition.parameters().to_value();
    assert_eq!(schema["properties"]["words"]["type"], "array");
    assert_eq!(schema["properties"]["weights"]["type"], "object");
    assert_eq!(schema["properties"]["loud"]["type"], "boolean");
    assert_eq!(schema["required"], json!(["words", "weights", "loud"]));
}

#[tokio::test]
async fn collected_tools_execute_both_ways() {
    let toolbelt = Toolbelt::new();
    let handles = toolbelt.register_collected().unwrap();
    assert_eq!(handles.len(), 6);
    assert!(toolbelt.contains("math.add"));
    assert!(toolbelt.contains("times"));

    assert_eq!(
        toolbelt.execute_async("math.add", json!({"a": 2, "b": 3})).await,
        json!(5.0)
    );
    assert_eq!(
        toolbelt.execute_async("times", json!({"a": 6, "b": 4})).await,
        json!(24.0)
    );
    assert_eq!(
        toolbelt.execute_async("shout", json!({"text": "quiet"})).await,
        json!("QUIET")
    );

    let handle = toolbelt.get("add").unwrap();
    let sync = tokio::task::spawn_blocking(move || handle.call_blocking(json!({"a": 4, "b": 4})))
        .await
        .unwrap();
    assert_eq!(sync, json!(8.0));
}

#[test]
fn collected_tools_run_without_a_runtime() {
    let toolbelt = Toolbelt::new();
    toolbelt.register_collected().unwrap();

    assert_eq!(
        toolbelt.execute_sync("math.add", json!({"a": 1, "b": 1})),
        json!(2.0)
    );
    assert_eq!(
        toolbelt.execute_sync("text.parse_count", json!({"raw": " 42 "})),
        json!(42)
    );
}

#[test]
fn err_returns_become_error_strings() {
    let toolbelt = Toolbelt::new();
    toolbelt.register(parse_count_tool()).unwrap();

    let outcome = toolbelt.execute_sync("parse_count", json!({"raw": "forty"}));
    let Value::String(message) = outcome else {
        panic!("expected an error string, got {outcome}");
    };
    assert!(message.starts_with("Error: text.parse_count: "), "{message}");
    assert!(message.contains("invalid digit"), "{message}");
}

#[test]
fn wrong_argument_types_are_reported() {
    let toolbelt = Toolbelt::new();
    toolbelt.register(add_tool()).unwrap();

    let outcome = toolbelt.execute_sync("add", json!({"a": "one", "b": 2}));
    let message = outcome.as_str().unwrap();
    assert!(message.starts_with("Error: math.add: "), "{message}");
    assert!(message.contains("`a`"), "{message}");

    let outcome = toolbelt.execute_sync("add", json!({"a": 1}));
    assert!(outcome.as_str().unwrap().contains("missing required argument"));
}

#[test]
fn builder_and_attribute_tools_share_a_registry() {
    let toolbelt = Toolbelt::new();
    toolbelt.register(add_tool()).unwrap();
    toolbelt
        .tool("negate")
        .group("math")
        .param("x", ParamType::Number)
        .register_blocking(|args: ToolArgs| -> toolbelt_tools::ToolResult<Value> {
            Ok(json!(-args.get::<f64>("x")?))
        })
        .unwrap();

    let names: Vec<String> = toolbelt
        .list(Some(&["math"]))
        .into_iter()
        .map(|spec| spec.qualified_name().to_owned())
        .collect();
    assert_eq!(names, ["math.add", "math.negate"]);
}

#[test]
fn result_named_structs_are_plain_outputs() {
    let toolbelt = Toolbelt::new();
    toolbelt.register(search_tool()).unwrap();

    assert_eq!(
        toolbelt.execute_sync("text.search", json!({"query": "two words"})),
        json!({"query": "two words", "hits": 2})
    );
}

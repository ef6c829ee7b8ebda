use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use serde_json::{Value, json};
use toolbelt::config::ToolbeltConfig;
use toolbelt::tools::{ApiFormat, ParamType, ToolArgs, ToolError, ToolResult, Toolbelt, tool};

/// Add two integers, yielding to the scheduler first.
#[tool(group = "math", crate = "toolbelt::tools")]
async fn add(a: i64, b: i64) -> i64 {
    tokio::time::sleep(Duration::from_millis(5)).await;
    a + b
}

/// Multiply two numbers
#[tool(group = "math", crate = "toolbelt::tools")]
fn multiply(x: f64, y: f64) -> f64 {
    std::thread::sleep(Duration::from_millis(5));
    x * y
}

/// Divide, refusing zero divisors.
#[tool(group = "math", crate = "toolbelt::tools")]
fn divide(x: f64, y: f64) -> Result<f64, String> {
    if y == 0.0 {
        Err("division by zero".to_owned())
    } else {
        Ok(x / y)
    }
}

#[tool(group = "text", crate = "toolbelt::tools")]
fn echo(text: String) -> String {
    text
}

fn toolbelt() -> Toolbelt {
    let toolbelt = toolbelt::with_providers(ToolbeltConfig::default());
    toolbelt.register_collected().unwrap();
    toolbelt
}

#[test]
fn blocking_tool_gives_the_same_result_both_ways() {
    let toolbelt = toolbelt();
    let sync = toolbelt.execute_sync("math.multiply", json!({"x": 4, "y": 6}));

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    let asynchronous =
        runtime.block_on(toolbelt.execute_async("math.multiply", json!({"x": 4, "y": 6})));

    assert_eq!(sync, json!(24.0));
    assert_eq!(asynchronous, sync);
}

#[tokio::test]
async fn cooperative_tool_gives_the_same_result_both_ways() {
    let toolbelt = Arc::new(toolbelt());
    let asynchronous = toolbelt.execute_async("add", json!({"a": 5, "b": 3})).await;

    let shared = Arc::clone(&toolbelt);
    let sync = tokio::task::spawn_blocking(move || {
        shared.execute_sync("add", json!({"a": 5, "b": 3}))
    })
    .await
    .unwrap();

    assert_eq!(asynchronous, json!(8));
    assert_eq!(sync, asynchronous);
}

#[test]
fn execute_sync_inside_a_runtime_does_not_nest() {
    let toolbelt = toolbelt();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    let outcome = runtime.block_on(async { toolbelt.execute_sync("math.add", json!({"a": 1, "b": 2})) });
    assert_eq!(outcome, json!(3));
}

#[test]
fn concurrent_sync_calls_from_threads() {
    let toolbelt = toolbelt();
    let results: Vec<Value> = std::thread::scope(|scope| {
        let workers: Vec<_> = (0..5)
            .map(|i| {
                let toolbelt = &toolbelt;
                scope.spawn(move || toolbelt.execute_sync("math.add", json!({"a": i, "b": i})))
            })
            .collect();
        workers
            .into_iter()
            .map(|worker| worker.join().unwrap())
            .collect()
    });

    assert_eq!(results, [json!(0), json!(2), json!(4), json!(6), json!(8)]);
}

#[tokio::test]
async fn concurrent_async_calls_on_one_scheduler() {
    let toolbelt = toolbelt();
    let calls = (0..5).map(|i| toolbelt.execute_async("add", json!({"a": i, "b": i})));
    let results = join_all(calls).await;
    assert_eq!(results, [json!(0), json!(2), json!(4), json!(6), json!(8)]);

    let calls = (0..5).map(|i| toolbelt.execute_async("multiply", json!({"x": i, "y": 2})));
    let results = join_all(calls).await;
    assert_eq!(
        results,
        [json!(0.0), json!(2.0), json!(4.0), json!(6.0), json!(8.0)]
    );
}

#[tokio::test]
async fn failures_are_returned_as_error_strings() {
    let toolbelt = toolbelt();

    let unknown = toolbelt.execute_async("nope", json!({})).await;
    assert_eq!(unknown, json!("Error: Unknown tool 'nope'"));
    let unknown = toolbelt.execute_sync("math.nope", Value::Null);
    assert_eq!(unknown, json!("Error: Unknown tool 'math.nope'"));

    let missing = toolbelt.execute_async("math.add", json!({"a": 1})).await;
    assert!(missing.as_str().unwrap().contains("Error"));
    let extra = toolbelt.execute_sync("math.add", json!({"a": 1, "b": 2, "c": 3}));
    assert!(extra.as_str().unwrap().contains("Error"));
    let not_an_object = toolbelt.execute_sync("math.add", json!([1, 2]));
    assert!(not_an_object.as_str().unwrap().starts_with("Error: math.add: "));

    let failed = toolbelt.execute_async("divide", json!({"x": 1, "y": 0})).await;
    assert_eq!(failed, json!("Error: math.divide: division by zero"));
}

#[test]
fn listing_filters_groups_and_formats() {
    let toolbelt = toolbelt();

    let math = toolbelt.list(Some(&["math"]));
    assert_eq!(math.len(), 3);
    assert!(math.iter().all(|spec| spec.qualified_name().starts_with("math.")));
    assert!(toolbelt.list(Some(&["missing"])).is_empty());

    let openai = toolbelt
        .get_tools(Some(&["text"]), Some(ApiFormat::OpenAi), true)
        .unwrap();
    let openai = openai.as_formatted().unwrap();
    assert_eq!(openai[0]["function"]["name"], "text.echo");
    assert_eq!(openai[0]["function"]["strict"], json!(true));

    let gemini = toolbelt.formatted_tools(Some(&["math"]), ApiFormat::Gemini).unwrap();
    assert_eq!(gemini[0]["function_declarations"].as_array().unwrap().len(), 3);
}

#[test]
fn missing_formatter_falls_back_to_raw_listing() {
    let toolbelt = Toolbelt::new();
    toolbelt
        .tool("ping")
        .register_blocking(|_args: ToolArgs| -> ToolResult<Value> { Ok(json!("pong")) })
        .unwrap();

    let listing = match toolbelt.get_tools(None, Some(ApiFormat::Anthropic), false) {
        Err(err) if err.is_capability_unavailable() => toolbelt.get_tools(None, None, false),
        other => other,
    }
    .unwrap();
    assert_eq!(listing.as_raw().unwrap()[0].qualified_name(), "default.ping");
}

#[test]
fn re_registration_replaces_behaviour() {
    let toolbelt = toolbelt();
    toolbelt
        .tool("multiply")
        .group("math")
        .params([("x", ParamType::Number), ("y", ParamType::Number)])
        .register_blocking(|args: ToolArgs| -> ToolResult<Value> {
            Ok(json!(args.get::<f64>("x")? * args.get::<f64>("y")? * 10.0))
        })
        .unwrap();

    assert_eq!(
        toolbelt.execute_sync("math.multiply", json!({"x": 4, "y": 6})),
        json!(240.0)
    );
    assert_eq!(toolbelt.list(Some(&["math"]))[1].qualified_name(), "math.multiply");
}

#[test]
fn configured_default_group_and_strictness() {
    let config = ToolbeltConfig::from_json_str(
        r#"{ "default_group": "util", "strict_schemas": true }"#,
    )
    .unwrap();
    let toolbelt = toolbelt::with_providers(config);
    toolbelt
        .tool("now")
        .register_async(|_args: ToolArgs| async { Ok::<_, ToolError>(json!(0)) })
        .unwrap();

    assert_eq!(toolbelt.resolve("now").unwrap(), ("util".to_owned(), "now".to_owned()));
    let schema = toolbelt.formatted_tools(None, ApiFormat::OpenAi).unwrap();
    assert_eq!(schema[0]["function"]["strict"], json!(true));
}

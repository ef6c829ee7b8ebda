//! Keyword arguments passed to tool bodies.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{ToolError, ToolResult};

/// Named arguments for a single tool call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ToolArgs {
    values: Map<String, Value>,
}

impl ToolArgs {
    /// Creates an empty argument set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds arguments from a JSON value. `null` is treated as no arguments.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::InvalidArguments`] for anything other than an
    /// object or `null`.
    pub fn from_value(value: Value) -> ToolResult<Self> {
        match value {
            Value::Object(values) => Ok(Self { values }),
            Value::Null => Ok(Self::new()),
            other => Err(ToolError::invalid_arguments(format!(
                "arguments must be a JSON object, got {}",
                kind(&other)
            ))),
        }
    }

    /// Adds an argument, returning the updated set for chaining.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    /// Deserializes the named argument.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::InvalidArguments`] if the argument is missing or
    /// does not deserialize into `T`.
    pub fn get<T>(&self, name: &str) -> ToolResult<T>
    where
        T: DeserializeOwned,
    {
        let value = self
            .values
            .get(name)
            .ok_or_else(|| ToolError::invalid_arguments(format!("missing argument `{name}`")))?;
        T::deserialize(value).map_err(|err| {
            ToolError::invalid_arguments(format!("argument `{name}` has the wrong type: {err}"))
        })
    }

    /// Returns the raw JSON value of an argument.
    #[must_use]
    pub fn raw(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Returns `true` if the argument was supplied.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Iterates over the supplied argument names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Number of supplied arguments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if no arguments were supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Consumes the set, returning the underlying JSON map.
    #[must_use]
    pub fn into_inner(self) -> Map<String, Value> {
        self.values
    }
}

impl From<Map<String, Value>> for ToolArgs {
    fn from(values: Map<String, Value>) -> Self {
        Self { values }
    }
}

impl FromIterator<(String, Value)> for ToolArgs {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn typed_lookup() {
        let args = ToolArgs::from_value(json!({ "x": 4, "label": "hi" })).unwrap();
        assert_eq!(args.get::<i64>("x").unwrap(), 4);
        assert_eq!(args.get::<String>("label").unwrap(), "hi");
    }

    #[test]
    fn missing_and_mistyped_arguments() {
        let args = ToolArgs::new().with("x", "four");
        let err = args.get::<i64>("x").unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { .. }));
        assert!(err.to_string().contains("`x`"));

        let err = args.get::<i64>("y").unwrap_err();
        assert!(err.to_string().contains("missing argument `y`"));
    }

    #[test]
    fn null_means_no_arguments() {
        assert!(ToolArgs::from_value(Value::Null).unwrap().is_empty());
    }

    #[test]
    fn scalars_are_rejected() {
        let err = ToolArgs::from_value(json!([1, 2])).unwrap_err();
        assert!(err.to_string().contains("an array"));
    }
}

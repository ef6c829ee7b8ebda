//! Parameter schemas derived from declared argument types.

use std::collections::HashSet;

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value, json};
use toolbelt_primitives::ParamType;

use crate::args::ToolArgs;
use crate::error::{ToolError, ToolResult};

/// Structural schema of a tool's parameters.
///
/// Serializes to `{"type": "object", "properties": {...}, "required": [...]}`.
/// Every declared parameter is required and `required` lists them in
/// declaration order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Value")]
pub struct ParameterSchema {
    params: Vec<(String, ParamType)>,
}

impl ParameterSchema {
    /// Creates a schema with no parameters.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a schema from `(name, type)` pairs in declaration order.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::InvalidMetadata`] if a name is blank or repeated.
    pub fn from_params<I, S>(params: I) -> ToolResult<Self>
    where
        I: IntoIterator<Item = (S, ParamType)>,
        S: Into<String>,
    {
        let schema = params
            .into_iter()
            .fold(Self::empty(), |schema, (name, kind)| schema.with_param(name, kind));
        schema.validate()?;
        Ok(schema)
    }

    /// Appends a parameter. Checked later by [`ParameterSchema::validate`].
    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, kind: ParamType) -> Self {
        self.params.push((name.into(), kind));
        self
    }

    /// Checks parameter names are non-blank and unique.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::InvalidMetadata`] describing the first offending name.
    pub fn validate(&self) -> ToolResult<()> {
        let mut seen = HashSet::new();
        for (name, _) in &self.params {
            if name.trim().is_empty() {
                return Err(ToolError::InvalidMetadata {
                    reason: "parameter name cannot be empty".into(),
                });
            }
            if !seen.insert(name.as_str()) {
                return Err(ToolError::InvalidMetadata {
                    reason: format!("parameter `{name}` is declared more than once"),
                });
            }
        }
        Ok(())
    }

    /// Returns the declared parameters in order.
    #[must_use]
    pub fn params(&self) -> &[(String, ParamType)] {
        &self.params
    }

    /// Returns the required parameter names in order.
    pub fn required(&self) -> impl Iterator<Item = &str> {
        self.params.iter().map(|(name, _)| name.as_str())
    }

    /// Returns the declared type of a parameter.
    #[must_use]
    pub fn param_type(&self, name: &str) -> Option<ParamType> {
        self.params
            .iter()
            .find(|(declared, _)| declared == name)
            .map(|(_, kind)| *kind)
    }

    /// Number of declared parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Returns `true` for a parameterless tool.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Renders the schema as a JSON value.
    #[must_use]
    pub fn to_value(&self) -> Value {
        let properties: Map<String, Value> = self
            .params
            .iter()
            .map(|(name, kind)| (name.clone(), json!({ "type": kind.json_type() })))
            .collect();
        json!({
            "type": "object",
            "properties": properties,
            "required": self.required().collect::<Vec<_>>(),
        })
    }

    /// Checks that a call supplies exactly the declared parameters.
    ///
    /// Values are not type-checked here; tool bodies do that when they
    /// extract them.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::InvalidArguments`] for an unexpected or missing
    /// argument.
    pub fn bind(&self, args: &ToolArgs) -> ToolResult<()> {
        if let Some(unexpected) = args.names().find(|name| self.param_type(name).is_none()) {
            return Err(ToolError::invalid_arguments(format!(
                "unexpected argument `{unexpected}`"
            )));
        }

        let missing: Vec<&str> = self.required().filter(|name| !args.contains(name)).collect();
        if !missing.is_empty() {
            return Err(ToolError::invalid_arguments(format!(
                "missing required argument(s): {}",
                missing.join(", ")
            )));
        }

        Ok(())
    }
}

impl Serialize for ParameterSchema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl TryFrom<Value> for ParameterSchema {
    type Error = ToolError;

    /// Parses a host-supplied JSON schema.
    ///
    /// `type` and `properties` are mandatory. Properties listed in `required`
    /// come first in that order; any remaining properties follow and are
    /// required as well.
    fn try_from(value: Value) -> ToolResult<Self> {
        let Value::Object(mut root) = value else {
            return Err(ToolError::schema_invalid("schema must be a JSON object"));
        };

        match root.get("type") {
            Some(Value::String(kind)) if kind == "object" => {}
            Some(_) => return Err(ToolError::schema_invalid("`type` must be \"object\"")),
            None => return Err(ToolError::schema_invalid("missing `type` key")),
        }

        let properties = match root.remove("properties") {
            Some(Value::Object(properties)) => properties,
            Some(_) => return Err(ToolError::schema_invalid("`properties` must be an object")),
            None => return Err(ToolError::schema_invalid("missing `properties` key")),
        };

        let mut order: Vec<String> = match root.remove("required") {
            Some(Value::Array(items)) => items
                .into_iter()
                .map(|item| match item {
                    Value::String(name) => Ok(name),
                    _ => Err(ToolError::schema_invalid("`required` must list strings")),
                })
                .collect::<ToolResult<_>>()?,
            Some(_) => return Err(ToolError::schema_invalid("`required` must be an array")),
            None => Vec::new(),
        };

        if let Some(unknown) = order.iter().find(|name| !properties.contains_key(*name)) {
            return Err(ToolError::schema_invalid(format!(
                "required parameter `{unknown}` has no property"
            )));
        }
        for name in properties.keys() {
            if !order.contains(name) {
                order.push(name.clone());
            }
        }

        let params = order
            .into_iter()
            .map(|name| {
                let kind = properties
                    .get(&name)
                    .and_then(|property| property.get("type"))
                    .and_then(Value::as_str)
                    .map_or(ParamType::String, ParamType::from_type_name);
                (name, kind)
            })
            .collect();

        let schema = Self { params };
        schema
            .validate()
            .map_err(|err| ToolError::schema_invalid(err.to_string()))?;
        Ok(schema)
    }
}

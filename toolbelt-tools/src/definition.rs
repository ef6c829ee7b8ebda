//! Tool metadata and unregistered tool declarations.

use std::fmt::{self, Display, Formatter};
use std::panic::Location;

use serde::{Deserialize, Serialize};
use toolbelt_primitives::{GROUP_SEPARATOR, ParamType};

use crate::bridge::ToolBody;
use crate::schema::ParameterSchema;

/// Where a tool was declared, for diagnostics.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SourceLocation {
    file: String,
    line: u32,
}

impl SourceLocation {
    /// Creates a location from a file path and 1-based line.
    #[must_use]
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }

    /// Captures the location of the caller of a `#[track_caller]` function.
    #[must_use]
    pub fn from_caller(location: &Location<'_>) -> Self {
        Self::new(location.file(), location.line())
    }

    /// Source file path.
    #[must_use]
    pub fn file(&self) -> &str {
        &self.file
    }

    /// 1-based line number.
    #[must_use]
    pub const fn line(&self) -> u32 {
        self.line
    }
}

impl Display for SourceLocation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// Metadata describing a registered tool.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDefinition {
    group: String,
    name: String,
    qualified_name: String,
    description: String,
    parameters: ParameterSchema,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    source: Option<SourceLocation>,
}

impl ToolDefinition {
    /// Creates a definition. Names are expected to be validated already.
    #[must_use]
    pub fn new(
        group: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: ParameterSchema,
        source: Option<SourceLocation>,
    ) -> Self {
        let group = group.into();
        let name = name.into();
        let qualified_name = format!("{group}{GROUP_SEPARATOR}{name}");
        Self {
            group,
            name,
            qualified_name,
            description: description.into(),
            parameters,
            source,
        }
    }

    /// Group the tool belongs to.
    #[must_use]
    pub fn group(&self) -> &str {
        &self.group
    }

    /// Bare tool name, unique within its group.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// `"<group>.<name>"`.
    #[must_use]
    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    /// Free-text description; empty when none was given.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Parameter schema.
    #[must_use]
    pub fn parameters(&self) -> &ParameterSchema {
        &self.parameters
    }

    /// Declaration site, when known.
    #[must_use]
    pub fn source(&self) -> Option<&SourceLocation> {
        self.source.as_ref()
    }
}

/// A tool that has been described but not yet registered.
///
/// Produced by the `#[tool]` attribute and by [`ToolBuilder`]; consumed by
/// [`Toolbelt::register`].
///
/// [`ToolBuilder`]: crate::ToolBuilder
/// [`Toolbelt::register`]: crate::Toolbelt::register
#[derive(Clone, Debug)]
pub struct ToolDeclaration {
    pub(crate) name: String,
    pub(crate) group: Option<String>,
    pub(crate) description: String,
    pub(crate) parameters: ParameterSchema,
    pub(crate) source: Option<SourceLocation>,
    pub(crate) body: ToolBody,
}

impl ToolDeclaration {
    /// Declares a tool with no parameters in the registry's default group.
    #[must_use]
    pub fn new(name: impl Into<String>, body: ToolBody) -> Self {
        Self {
            name: name.into(),
            group: None,
            description: String::new(),
            parameters: ParameterSchema::empty(),
            source: None,
            body,
        }
    }

    /// Places the tool in a group.
    #[must_use]
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Appends a required parameter.
    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, kind: ParamType) -> Self {
        self.parameters = self.parameters.with_param(name, kind);
        self
    }

    /// Replaces the parameter schema.
    #[must_use]
    pub fn with_parameters(mut self, parameters: ParameterSchema) -> Self {
        self.parameters = parameters;
        self
    }

    /// Records the declaration site.
    #[must_use]
    pub fn with_source(mut self, source: SourceLocation) -> Self {
        self.source = Some(source);
        self
    }

    /// Bare tool name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Explicit group, if any.
    #[must_use]
    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    /// Declaration site, if recorded.
    #[must_use]
    pub fn source(&self) -> Option<&SourceLocation> {
        self.source.as_ref()
    }
}

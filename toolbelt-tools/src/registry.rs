//! Runtime registry for tool metadata and execution.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde_json::Value;
use toolbelt_config::ToolbeltConfig;
use toolbelt_primitives::{InvocationId, ParamType, ToolName, validate_group, validate_tool_name};
use tracing::{Instrument, debug, debug_span, trace, warn};

use crate::bridge::{BlockingTool, InvocationState, Tool, ToolBody, ToolHandle, unknown_tool};
use crate::definition::{SourceLocation, ToolDeclaration, ToolDefinition};
use crate::error::{ToolError, ToolResult};
use crate::query::{SchemaFormatter, ToolSpec};
use crate::schema::ParameterSchema;

/// Registry that stores tools keyed by group and name.
///
/// A `Toolbelt` is an ordinary value: construct one per application (or per
/// test) and share it behind an [`Arc`]. Registration takes a short write
/// lock; lookups and executions only read, and the lock is released before a
/// tool body runs.
pub struct Toolbelt {
    inner: RwLock<Table>,
    config: ToolbeltConfig,
    formatter: RwLock<Option<Arc<dyn SchemaFormatter>>>,
}

impl Default for Toolbelt {
    fn default() -> Self {
        Self::with_config(ToolbeltConfig::default())
    }
}

impl fmt::Debug for Toolbelt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self
            .read()
            .handles()
            .map(|handle| handle.definition().qualified_name().to_owned())
            .collect();
        f.debug_struct("Toolbelt")
            .field("registered", &names)
            .field("default_group", &self.config.default_group)
            .field("formatter_installed", &self.formatter().is_some())
            .finish()
    }
}

impl Toolbelt {
    /// Creates an empty registry with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty registry using the supplied configuration.
    #[must_use]
    pub fn with_config(config: ToolbeltConfig) -> Self {
        Self {
            inner: RwLock::new(Table::default()),
            config,
            formatter: RwLock::new(None),
        }
    }

    /// Returns the active configuration.
    #[must_use]
    pub fn config(&self) -> &ToolbeltConfig {
        &self.config
    }

    /// Installs the schema formatter used by [`Toolbelt::get_tools`],
    /// replacing any previous one. Works on a shared registry.
    pub fn set_formatter(&self, formatter: Arc<dyn SchemaFormatter>) {
        *self
            .formatter
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(formatter);
    }

    /// Installs a schema formatter, returning the registry for chaining.
    #[must_use]
    pub fn with_formatter(self, formatter: Arc<dyn SchemaFormatter>) -> Self {
        self.set_formatter(formatter);
        self
    }

    pub(crate) fn formatter(&self) -> Option<Arc<dyn SchemaFormatter>> {
        self.formatter
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Starts declaring a tool called `name`.
    ///
    /// ```
    /// use serde_json::{Value, json};
    /// use toolbelt_tools::{ParamType, ToolArgs, ToolResult, Toolbelt};
    ///
    /// let toolbelt = Toolbelt::new();
    /// toolbelt
    ///     .tool("multiply")
    ///     .group("math")
    ///     .description("Multiply two numbers")
    ///     .param("x", ParamType::Number)
    ///     .param("y", ParamType::Number)
    ///     .register_blocking(|args: ToolArgs| -> ToolResult<Value> {
    ///         Ok(json!(args.get::<f64>("x")? * args.get::<f64>("y")?))
    ///     })?;
    ///
    /// let product = toolbelt.execute_sync("math.multiply", json!({ "x": 4, "y": 6 }));
    /// assert_eq!(product.as_f64(), Some(24.0));
    /// # Ok::<(), toolbelt_tools::ToolError>(())
    /// ```
    #[must_use]
    pub fn tool(&self, name: impl Into<String>) -> ToolBuilder<'_> {
        ToolBuilder {
            toolbelt: self,
            name: name.into(),
            group: None,
            description: String::new(),
            parameters: ParameterSchema::empty(),
        }
    }

    /// Registers a declared tool, replacing any tool with the same group and
    /// name.
    ///
    /// Replacing emits one warning naming both declaration sites. When the
    /// declaration carries no source location, the caller's location is
    /// recorded.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::Primitive`] for a blank name or an invalid group
    /// and [`ToolError::InvalidMetadata`] for blank or repeated parameter
    /// names.
    #[track_caller]
    pub fn register(&self, declaration: ToolDeclaration) -> ToolResult<ToolHandle> {
        let caller = std::panic::Location::caller();
        let ToolDeclaration {
            name,
            group,
            description,
            parameters,
            source,
            body,
        } = declaration;

        let group = group.unwrap_or_else(|| self.config.default_group.clone());
        validate_group(&group)?;
        validate_tool_name(&name)?;
        parameters.validate()?;

        let source = source.unwrap_or_else(|| SourceLocation::from_caller(caller));
        let definition = ToolDefinition::new(group, name, description, parameters, Some(source));
        let handle = ToolHandle::new(definition, body);

        let previous = self.write().insert(handle.clone());
        let definition = handle.definition();
        match previous {
            Some(previous) => warn!(
                tool = %definition.qualified_name(),
                "tool `{}` defined at {} is being overwritten by definition at {}",
                definition.qualified_name(),
                describe_source(previous.definition().source()),
                describe_source(definition.source()),
            ),
            None => debug!(
                tool = %definition.qualified_name(),
                cooperative = handle.body().is_cooperative(),
                params = definition.parameters().len(),
                "registered tool"
            ),
        }

        Ok(handle)
    }

    /// Resolves a qualified or bare name into `(group, name)`.
    ///
    /// A name containing `.` is split at the first `.` without checking that
    /// the tool exists. A bare name is looked up in every group in
    /// registration order and the first match wins.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::NotFound`] when a bare name matches no tool.
    pub fn resolve(&self, name: &str) -> ToolResult<(String, String)> {
        let parsed = ToolName::parse(name);
        if let Some(group) = parsed.group() {
            return Ok((group.to_owned(), parsed.name().to_owned()));
        }

        self.read()
            .find_bare(name)
            .map(|group| (group.to_owned(), name.to_owned()))
            .ok_or_else(|| ToolError::NotFound {
                name: name.to_owned(),
            })
    }

    /// Returns a handle to the tool matching a qualified or bare name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<ToolHandle> {
        let (group, name) = self.resolve(name).ok()?;
        self.read().get(&group, &name).cloned()
    }

    /// Returns `true` if the name resolves to a registered tool.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Lists tools from the requested groups, or from every group.
    ///
    /// Unknown groups are skipped. Groups are listed in the requested order
    /// (or registration order) and tools in registration order.
    #[must_use]
    pub fn list(&self, groups: Option<&[&str]>) -> Vec<ToolSpec> {
        let table = self.read();
        let selected: Vec<&str> = match groups {
            Some(groups) => groups.to_vec(),
            None => table.order.iter().map(String::as_str).collect(),
        };

        selected
            .into_iter()
            .filter_map(|group| table.groups.get(group))
            .flat_map(Group::handles)
            .map(|handle| ToolSpec::from(handle.definition()))
            .collect()
    }

    /// Names of all groups in registration order.
    #[must_use]
    pub fn groups(&self) -> Vec<String> {
        self.read().order.clone()
    }

    /// Number of registered tools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().groups.values().map(|group| group.tools.len()).sum()
    }

    /// Returns `true` if no tools are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Executes a tool from async code.
    ///
    /// `name` may be qualified (`"math.add"`) or bare (`"add"`). `args` is a
    /// JSON object of named arguments (or `null`). The result is the tool's
    /// return value, or a string starting with `"Error: "` when the tool is
    /// unknown, the arguments do not fit, or the tool fails.
    pub async fn execute_async(&self, name: &str, args: Value) -> Value {
        let invocation = InvocationId::random();
        let span = debug_span!("invocation", %invocation, tool = name);
        async {
            trace!(state = ?InvocationState::Pending);
            match self.lookup(name) {
                Some(handle) => handle.call(args).await,
                None => unknown_tool(name),
            }
        }
        .instrument(span)
        .await
    }

    /// Executes a tool from blocking code.
    ///
    /// Same contract as [`Toolbelt::execute_async`]. Cooperative tools are
    /// driven to completion on a fresh runtime, so this may be called from
    /// any thread.
    pub fn execute_sync(&self, name: &str, args: Value) -> Value {
        let invocation = InvocationId::random();
        let span = debug_span!("invocation", %invocation, tool = name);
        let _entered = span.enter();
        trace!(state = ?InvocationState::Pending);
        match self.lookup(name) {
            Some(handle) => handle.call_blocking(args),
            None => unknown_tool(name),
        }
    }

    fn lookup(&self, name: &str) -> Option<ToolHandle> {
        trace!(state = ?InvocationState::Resolving);
        let handle = self.get(name);
        if handle.is_none() {
            debug!(state = ?InvocationState::Failed, "unknown tool");
        }
        handle
    }

    fn read(&self) -> RwLockReadGuard<'_, Table> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Table> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Fluent declaration of a tool against a [`Toolbelt`].
#[derive(Debug)]
pub struct ToolBuilder<'a> {
    toolbelt: &'a Toolbelt,
    name: String,
    group: Option<String>,
    description: String,
    parameters: ParameterSchema,
}

impl ToolBuilder<'_> {
    /// Places the tool in a group instead of the default group.
    #[must_use]
    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Sets the description shown to models.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Declares the next parameter.
    #[must_use]
    pub fn param(mut self, name: impl Into<String>, kind: ParamType) -> Self {
        self.parameters = self.parameters.with_param(name, kind);
        self
    }

    /// Declares several parameters in order.
    #[must_use]
    pub fn params<I, S>(self, params: I) -> Self
    where
        I: IntoIterator<Item = (S, ParamType)>,
        S: Into<String>,
    {
        params
            .into_iter()
            .fold(self, |builder, (name, kind)| builder.param(name, kind))
    }

    /// Uses a host-supplied JSON schema instead of declared parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::SchemaInvalid`] if the schema lacks `type` or
    /// `properties`, or is otherwise malformed.
    pub fn schema(mut self, schema: Value) -> ToolResult<Self> {
        self.parameters = ParameterSchema::try_from(schema)?;
        Ok(self)
    }

    /// Registers an `async` implementation.
    ///
    /// # Errors
    ///
    /// See [`Toolbelt::register`].
    #[track_caller]
    pub fn register_async<T>(self, tool: T) -> ToolResult<ToolHandle>
    where
        T: Tool + 'static,
    {
        let toolbelt = self.toolbelt;
        toolbelt.register(self.into_declaration(ToolBody::cooperative(tool)))
    }

    /// Registers a blocking implementation.
    ///
    /// # Errors
    ///
    /// See [`Toolbelt::register`].
    #[track_caller]
    pub fn register_blocking<T>(self, tool: T) -> ToolResult<ToolHandle>
    where
        T: BlockingTool + 'static,
    {
        let toolbelt = self.toolbelt;
        toolbelt.register(self.into_declaration(ToolBody::blocking(tool)))
    }

    fn into_declaration(self, body: ToolBody) -> ToolDeclaration {
        let declaration = ToolDeclaration::new(self.name, body)
            .with_description(self.description)
            .with_parameters(self.parameters);
        match self.group {
            Some(group) => declaration.with_group(group),
            None => declaration,
        }
    }
}

fn describe_source(source: Option<&SourceLocation>) -> String {
    source.map_or_else(|| "<unknown>".to_owned(), ToString::to_string)
}

#[derive(Default)]
struct Table {
    order: Vec<String>,
    groups: HashMap<String, Group>,
}

impl Table {
    fn insert(&mut self, handle: ToolHandle) -> Option<ToolHandle> {
        let group_name = handle.definition().group().to_owned();
        let group = self.groups.entry(group_name.clone()).or_insert_with(|| {
            self.order.push(group_name);
            Group::default()
        });
        group.insert(handle)
    }

    fn get(&self, group: &str, name: &str) -> Option<&ToolHandle> {
        self.groups.get(group)?.tools.get(name)
    }

    fn find_bare(&self, name: &str) -> Option<&str> {
        self.order
            .iter()
            .find(|group| {
                self.groups
                    .get(group.as_str())
                    .is_some_and(|tools| tools.tools.contains_key(name))
            })
            .map(String::as_str)
    }

    fn handles(&self) -> impl Iterator<Item = &ToolHandle> {
        self.order
            .iter()
            .filter_map(|group| self.groups.get(group))
            .flat_map(Group::handles)
    }
}

#[derive(Default)]
struct Group {
    order: Vec<String>,
    tools: HashMap<String, ToolHandle>,
}

impl Group {
    fn insert(&mut self, handle: ToolHandle) -> Option<ToolHandle> {
        let name = handle.definition().name().to_owned();
        let previous = self.tools.insert(name.clone(), handle);
        if previous.is_none() {
            self.order.push(name);
        }
        previous
    }

    fn handles(&self) -> impl Iterator<Item = &ToolHandle> {
        self.order.iter().filter_map(|name| self.tools.get(name))
    }
}

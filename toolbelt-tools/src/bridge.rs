//! Uniform sync/async execution of registered tools.
//!
//! Every tool is stored as a [`ToolHandle`] whose body is either
//! [`ToolBody::Cooperative`] (an `async` implementation) or
//! [`ToolBody::Blocking`] (a plain function). The handle hides the
//! difference:
//!
//! * [`ToolHandle::call`] awaits cooperative bodies in place and moves
//!   blocking bodies onto tokio's blocking pool (or a dedicated thread
//!   outside tokio) so they never stall the scheduler thread.
//! * [`ToolHandle::call_blocking`] runs blocking bodies on the calling
//!   thread and drives cooperative bodies to completion on a fresh
//!   current-thread runtime.
//!
//! Either way, failures come back as `"Error: <group>.<name>: <message>"`
//! strings rather than errors.

use std::any::Any;
use std::fmt;
use std::future::Future;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use async_trait::async_trait;
use futures::FutureExt;
use futures::channel::oneshot;
use serde_json::Value;
use tokio::runtime::{Builder, Handle};
use tracing::{debug, trace, warn};

use crate::args::ToolArgs;
use crate::definition::ToolDefinition;
use crate::error::{ToolError, ToolResult};

/// Tool implemented with `async` code.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Invokes the tool with the given arguments.
    async fn invoke(&self, args: ToolArgs) -> ToolResult<Value>;
}

#[async_trait]
impl<F, Fut> Tool for F
where
    F: Send + Sync + Fn(ToolArgs) -> Fut,
    Fut: Future<Output = ToolResult<Value>> + Send,
{
    async fn invoke(&self, args: ToolArgs) -> ToolResult<Value> {
        (self)(args).await
    }
}

/// Tool implemented as a plain blocking function.
pub trait BlockingTool: Send + Sync {
    /// Invokes the tool with the given arguments.
    ///
    /// # Errors
    ///
    /// Implementation-defined; usually [`ToolError::Execution`] or
    /// [`ToolError::InvalidArguments`].
    fn invoke(&self, args: ToolArgs) -> ToolResult<Value>;
}

impl<F> BlockingTool for F
where
    F: Send + Sync + Fn(ToolArgs) -> ToolResult<Value>,
{
    fn invoke(&self, args: ToolArgs) -> ToolResult<Value> {
        (self)(args)
    }
}

/// How a tool body executes.
#[derive(Clone)]
pub enum ToolBody {
    /// `async` body awaited on the caller's scheduler.
    Cooperative(Arc<dyn Tool>),
    /// Blocking body dispatched to a worker thread when called from async code.
    Blocking(Arc<dyn BlockingTool>),
}

impl ToolBody {
    /// Wraps an `async` implementation.
    pub fn cooperative<T>(tool: T) -> Self
    where
        T: Tool + 'static,
    {
        Self::Cooperative(Arc::new(tool))
    }

    /// Wraps a blocking implementation.
    pub fn blocking<T>(tool: T) -> Self
    where
        T: BlockingTool + 'static,
    {
        Self::Blocking(Arc::new(tool))
    }

    /// Returns `true` for cooperative bodies.
    #[must_use]
    pub fn is_cooperative(&self) -> bool {
        matches!(self, Self::Cooperative(_))
    }
}

impl fmt::Debug for ToolBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Cooperative(_) => "Cooperative",
            Self::Blocking(_) => "Blocking",
        })
    }
}

/// Stages of a single invocation, recorded in trace events.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InvocationState {
    /// Accepted, not yet looked up.
    Pending,
    /// Looking the name up in the registry.
    Resolving,
    /// Body is executing.
    Running,
    /// Body returned a value.
    Completed,
    /// Lookup, binding or execution failed.
    Failed,
}

/// Handle returned by the registry for direct invocation.
///
/// This is the wrapped callable handed back at registration time; calling it
/// behaves exactly like executing the tool through the registry.
#[derive(Clone)]
pub struct ToolHandle {
    definition: Arc<ToolDefinition>,
    body: ToolBody,
}

impl fmt::Debug for ToolHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolHandle")
            .field("tool", &self.definition.qualified_name())
            .field("body", &self.body)
            .finish()
    }
}

impl ToolHandle {
    pub(crate) fn new(definition: ToolDefinition, body: ToolBody) -> Self {
        Self {
            definition: Arc::new(definition),
            body,
        }
    }

    /// Returns the associated definition.
    #[must_use]
    pub fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    /// Returns the body variant.
    #[must_use]
    pub fn body(&self) -> &ToolBody {
        &self.body
    }

    /// Runs the tool from async code.
    ///
    /// Never fails: errors and panics become `"Error: ..."` strings.
    pub async fn call(&self, args: Value) -> Value {
        trace!(tool = %self.definition.qualified_name(), state = ?InvocationState::Running);
        let outcome = self.try_call(args).await;
        self.finish(outcome)
    }

    /// Runs the tool from blocking code.
    ///
    /// Safe to call from inside a tokio runtime: a cooperative body is then
    /// driven on a helper thread instead of nesting runtimes.
    pub fn call_blocking(&self, args: Value) -> Value {
        trace!(tool = %self.definition.qualified_name(), state = ?InvocationState::Running);
        let outcome = self.try_call_blocking(args);
        self.finish(outcome)
    }

    async fn try_call(&self, args: Value) -> ToolResult<Value> {
        let args = self.bind(args)?;
        match &self.body {
            ToolBody::Cooperative(tool) => AssertUnwindSafe(tool.invoke(args))
                .catch_unwind()
                .await
                .map_err(|payload| panicked(payload.as_ref()))?,
            ToolBody::Blocking(tool) => {
                if Handle::try_current().is_err() {
                    return run_on_worker_thread(Arc::clone(tool), args).await;
                }
                let tool = Arc::clone(tool);
                match tokio::task::spawn_blocking(move || tool.invoke(args)).await {
                    Ok(outcome) => outcome,
                    Err(join) if join.is_panic() => Err(panicked(join.into_panic().as_ref())),
                    Err(join) => Err(ToolError::execution(format!(
                        "worker task did not complete: {join}"
                    ))),
                }
            }
        }
    }

    fn try_call_blocking(&self, args: Value) -> ToolResult<Value> {
        let args = self.bind(args)?;
        match &self.body {
            ToolBody::Blocking(tool) => run_inline(tool.as_ref(), args),
            ToolBody::Cooperative(tool) => block_on_fresh_runtime(tool.invoke(args)),
        }
    }

    fn bind(&self, args: Value) -> ToolResult<ToolArgs> {
        let args = ToolArgs::from_value(args)?;
        self.definition.parameters().bind(&args)?;
        Ok(args)
    }

    fn finish(&self, outcome: ToolResult<Value>) -> Value {
        match outcome {
            Ok(value) => {
                debug!(
                    tool = %self.definition.qualified_name(),
                    state = ?InvocationState::Completed,
                    "tool call completed"
                );
                value
            }
            Err(err) => {
                warn!(
                    tool = %self.definition.qualified_name(),
                    state = ?InvocationState::Failed,
                    error = %err,
                    "tool call failed"
                );
                Value::String(format!(
                    "Error: {}: {err}",
                    self.definition.qualified_name()
                ))
            }
        }
    }
}

/// Formats the result returned for names that resolve to no tool.
pub(crate) fn unknown_tool(name: &str) -> Value {
    Value::String(format!("Error: Unknown tool '{name}'"))
}

fn run_inline(tool: &dyn BlockingTool, args: ToolArgs) -> ToolResult<Value> {
    catch_unwind(AssertUnwindSafe(|| tool.invoke(args)))
        .map_err(|payload| panicked(payload.as_ref()))?
}

/// Runs a blocking body on a dedicated thread when no tokio runtime is
/// available, so executors other than tokio are not stalled either.
async fn run_on_worker_thread(tool: Arc<dyn BlockingTool>, args: ToolArgs) -> ToolResult<Value> {
    let (sender, receiver) = oneshot::channel();
    std::thread::Builder::new()
        .name("toolbelt-blocking".to_owned())
        .spawn(move || {
            let _ = sender.send(run_inline(tool.as_ref(), args));
        })
        .map_err(|err| ToolError::execution(format!("failed to spawn worker thread: {err}")))?;

    receiver
        .await
        .map_err(|_| ToolError::execution("worker thread exited without a result"))?
}

fn block_on_fresh_runtime<F>(future: F) -> ToolResult<Value>
where
    F: Future<Output = ToolResult<Value>> + Send,
{
    let drive = move || -> ToolResult<Value> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|err| ToolError::execution(format!("failed to start runtime: {err}")))?;
        runtime
            .block_on(AssertUnwindSafe(future).catch_unwind())
            .map_err(|payload| panicked(payload.as_ref()))?
    };

    if Handle::try_current().is_ok() {
        std::thread::scope(|scope| scope.spawn(drive).join())
            .map_err(|payload| panicked(payload.as_ref()))?
    } else {
        drive()
    }
}

fn panicked(payload: &(dyn Any + Send)) -> ToolError {
    let message = payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic payload".to_owned());
    ToolError::execution(format!("tool panicked: {message}"))
}

//! Before/after lifecycle adapters.
//!
//! Older call conventions describe interception as a pair of callbacks rather
//! than a resume-style handler:
//!
//! - a positional form, `(func, before, after, context)`
//! - a named record, `{ func, onEnter, onExit, context }`
//!
//! Both normalize to [`LifecycleConfig`], are validated by
//! [`LifecycleConfig::validate`], and are adapted into an ordinary [`Handler`]
//! running:
//!
//! 1. `on_enter(receiver, args)`; if it returns [`Advice::Cancel`], the
//!    cancellation value becomes the result and the original is skipped
//! 2. the original, via [`ExecutionContext::resume`]
//! 3. `on_exit(receiver, args, result)`; a returned value replaces the result

use core::fmt;
use std::sync::Arc;

use interpose_value::{CallError, Function, Object, Value};

use crate::context::ExecutionContext;
use crate::error::ProxyError;
use crate::factory::proxy_function;
use crate::handler::Handler;

/// What an enter callback asks the proxy to do next.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Advice {
    /// Run the original.
    #[default]
    Proceed,
    /// Skip the original and return this value instead.
    Cancel(Value),
}

/// Callback run before the original.
pub type EnterFn =
    Arc<dyn Fn(Option<&Object>, &[Value]) -> Result<Advice, CallError> + Send + Sync>;

/// Callback run after the original. Returning `Some` replaces the result.
pub type ExitFn =
    Arc<dyn Fn(Option<&Object>, &[Value], &Value) -> Result<Option<Value>, CallError> + Send + Sync>;

/// Named-record form of a lifecycle proxy.
///
/// # Example
///
/// ```
/// use interpose_proxy::{Advice, LifecycleConfig};
/// use interpose_value::{Function, Value};
///
/// let proxy = LifecycleConfig::new()
///     .with_func(Function::new("func", |_, _| Ok(Value::from(45))))
///     .on_enter(|_, _| Ok(Advice::Cancel(Value::from(23))))
///     .build()
///     .unwrap();
///
/// assert_eq!(proxy.call(None, &[]).unwrap(), Value::from(23));
/// ```
#[derive(Clone, Default)]
pub struct LifecycleConfig {
    /// The callable to wrap. Required.
    pub func: Option<Function>,
    /// Runs before the original.
    pub on_enter: Option<EnterFn>,
    /// Runs after the original.
    pub on_exit: Option<ExitFn>,
    /// Receiver pinned for the original and both callbacks.
    pub context: Option<Object>,
}

impl LifecycleConfig {
    /// Creates an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the callable to wrap.
    #[must_use]
    pub fn with_func(mut self, func: Function) -> Self {
        self.func = Some(func);
        self
    }

    /// Sets the enter callback.
    #[must_use]
    pub fn on_enter<F>(mut self, callback: F) -> Self
    where
        F: Fn(Option<&Object>, &[Value]) -> Result<Advice, CallError> + Send + Sync + 'static,
    {
        self.on_enter = Some(Arc::new(callback));
        self
    }

    /// Sets the exit callback.
    #[must_use]
    pub fn on_exit<F>(mut self, callback: F) -> Self
    where
        F: Fn(Option<&Object>, &[Value], &Value) -> Result<Option<Value>, CallError>
            + Send
            + Sync
            + 'static,
    {
        self.on_exit = Some(Arc::new(callback));
        self
    }

    /// Pins the receiver.
    #[must_use]
    pub fn with_context(mut self, context: Object) -> Self {
        self.context = Some(context);
        self
    }

    /// Checks that the record describes a buildable proxy.
    ///
    /// # Errors
    ///
    /// [`ProxyError::InvalidArguments`] naming `func` when the target is
    /// missing, or naming the callbacks when neither is present.
    pub fn validate(&self) -> Result<(), ProxyError> {
        if self.func.is_none() {
            return Err(ProxyError::InvalidArguments { field: "func" });
        }
        if self.on_enter.is_none() && self.on_exit.is_none() {
            return Err(ProxyError::InvalidArguments {
                field: "before/onEnter or after/onExit",
            });
        }
        Ok(())
    }

    /// Validates the record and builds the proxy.
    ///
    /// # Errors
    ///
    /// See [`validate`](Self::validate).
    pub fn build(self) -> Result<Function, ProxyError> {
        self.validate()?;
        let Some(func) = self.func else {
            return Err(ProxyError::InvalidArguments { field: "func" });
        };

        let handler = LifecycleHandler {
            on_enter: self.on_enter,
            on_exit: self.on_exit,
        };
        Ok(proxy_function(func, Arc::new(handler), self.context, None))
    }
}

impl fmt::Debug for LifecycleConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifecycleConfig")
            .field("func", &self.func.as_ref().map(Function::name))
            .field("on_enter", &self.on_enter.is_some())
            .field("on_exit", &self.on_exit.is_some())
            .field("context", &self.context.as_ref().map(Object::id))
            .finish()
    }
}

/// Positional form of a lifecycle proxy.
///
/// Normalizes to a [`LifecycleConfig`] and builds it.
///
/// # Errors
///
/// See [`LifecycleConfig::validate`].
pub fn lifecycle_proxy(
    func: Option<Function>,
    before: Option<EnterFn>,
    after: Option<ExitFn>,
    context: Option<Object>,
) -> Result<Function, ProxyError> {
    LifecycleConfig {
        func,
        on_enter: before,
        on_exit: after,
        context,
    }
    .build()
}

/// Adapts enter/exit callbacks to the resume-style protocol.
struct LifecycleHandler {
    on_enter: Option<EnterFn>,
    on_exit: Option<ExitFn>,
}

impl Handler for LifecycleHandler {
    fn handle(&self, ctx: &mut ExecutionContext) -> Result<(), CallError> {
        if let Some(on_enter) = &self.on_enter
            && let Advice::Cancel(value) = on_enter(ctx.receiver(), ctx.arguments())?
        {
            tracing::trace!(proxy = %ctx.proxy_function().name(), "cancelled by enter callback");
            ctx.set_result(value);
            return Ok(());
        }

        ctx.resume()?;

        if let Some(on_exit) = &self.on_exit
            && let Some(amended) = on_exit(ctx.receiver(), ctx.arguments(), ctx.result())?
        {
            ctx.set_result(amended);
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "lifecycle"
    }
}

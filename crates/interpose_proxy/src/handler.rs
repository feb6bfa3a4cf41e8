//! The handler protocol.
//!
//! A [`Handler`] is invoked exactly once per call of a callable proxy. It
//! receives the call's [`ExecutionContext`] and decides:
//!
//! - whether the original runs (by calling [`ExecutionContext::resume`]),
//!   and how many times
//! - what the proxy returns (by reading or overwriting the result slot)
//! - what to remember for the next call (through the state store)
//!
//! There is no separate cancel flag: a handler that returns without resuming
//! has cancelled the call.
//!
//! # Example
//!
//! ```
//! use interpose_proxy::{handler_fn, ExecutionContext};
//!
//! // Runs the original only on the first call.
//! let once = handler_fn(|ctx: &mut ExecutionContext| {
//!     if ctx.state().increment("calls") == 1.0 {
//!         ctx.resume()?;
//!     }
//!     Ok(())
//! });
//! # let _ = once;
//! ```

use core::fmt;
use std::sync::Arc;

use interpose_value::CallError;

use crate::context::ExecutionContext;

/// Caller-supplied interception logic.
///
/// # Errors
///
/// An error returned from [`handle`](Handler::handle) is returned unchanged by
/// the proxy. Errors from [`ExecutionContext::resume`] can be caught by the
/// handler or propagated with `?`.
pub trait Handler: Send + Sync + 'static {
    /// Handles one invocation of the proxy.
    fn handle(&self, ctx: &mut ExecutionContext) -> Result<(), CallError>;

    /// Returns the handler's name for tracing.
    ///
    /// Defaults to the type name.
    fn name(&self) -> &str {
        core::any::type_name::<Self>()
    }
}

impl fmt::Debug for dyn Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler").field("name", &self.name()).finish()
    }
}

/// Shared, type-erased handler.
///
/// One handler is shared by every proxy built in a single composite
/// construction, and by nested composites below it.
pub type BoxedHandler = Arc<dyn Handler>;

impl<H: Handler + ?Sized> Handler for Arc<H> {
    fn handle(&self, ctx: &mut ExecutionContext) -> Result<(), CallError> {
        (**self).handle(ctx)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// A [`Handler`] backed by a closure. Created by [`handler_fn`].
pub struct HandlerFn<F> {
    func: F,
}

impl<F> Handler for HandlerFn<F>
where
    F: Fn(&mut ExecutionContext) -> Result<(), CallError> + Send + Sync + 'static,
{
    fn handle(&self, ctx: &mut ExecutionContext) -> Result<(), CallError> {
        (self.func)(ctx)
    }
}

impl<F> fmt::Debug for HandlerFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerFn")
            .field("func", &core::any::type_name::<F>())
            .finish()
    }
}

/// Creates a [`Handler`] from a closure.
#[must_use]
pub fn handler_fn<F>(func: F) -> HandlerFn<F>
where
    F: Fn(&mut ExecutionContext) -> Result<(), CallError> + Send + Sync + 'static,
{
    HandlerFn { func }
}

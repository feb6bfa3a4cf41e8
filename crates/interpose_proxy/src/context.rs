//! The per-invocation execution context.
//!
//! Each call of a callable proxy creates one [`ExecutionContext`] and passes it
//! to the handler. The context carries:
//!
//! - the call's arguments (read-only)
//! - the result slot, initially [`Value::Undefined`]
//! - [`resume`](ExecutionContext::resume), the only way the original runs
//! - the proxy's [`StateStore`]
//! - the proxy function itself
//!
//! When the handler returns, the proxy returns whatever the result slot holds.
//! A handler that never resumes cancels the call.

use core::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use interpose_value::{CallError, Function, Object, Value};

use crate::state::StateStore;

/// Per-call state handed to a [`Handler`](crate::Handler).
///
/// The context is owned by a single invocation and dropped when the proxy
/// returns. Only the [`StateStore`] outlives it.
#[derive(Debug)]
pub struct ExecutionContext {
    /// The wrapped original with its receiver, arguments and run counter.
    original: Resumption,
    /// Value the proxy will return.
    result: Value,
    /// State store of the proxy that created this context.
    state: StateStore,
    /// The proxy function that is being called.
    proxy: Function,
}

impl ExecutionContext {
    pub(crate) fn new(
        target: Function,
        receiver: Option<Object>,
        arguments: Vec<Value>,
        state: StateStore,
        proxy: Function,
    ) -> Self {
        Self {
            original: Resumption {
                target,
                receiver,
                arguments,
                resumed: Arc::new(AtomicU32::new(0)),
            },
            result: Value::Undefined,
            state,
            proxy,
        }
    }

    /// Returns the call's arguments.
    #[must_use]
    pub fn arguments(&self) -> &[Value] {
        &self.original.arguments
    }

    /// Returns the argument at `index`, or [`Value::Undefined`] if absent.
    #[must_use]
    pub fn argument(&self, index: usize) -> Value {
        self.original.arguments.get(index).cloned().unwrap_or_default()
    }

    /// Returns the effective receiver of this call.
    ///
    /// For composite members this is always the original owning object. For
    /// standalone proxies it is the explicit receiver given at construction,
    /// else the call-site receiver.
    #[must_use]
    pub fn receiver(&self) -> Option<&Object> {
        self.original.receiver.as_ref()
    }

    /// Returns the current content of the result slot.
    #[must_use]
    pub fn result(&self) -> &Value {
        &self.result
    }

    /// Overwrites the result slot.
    ///
    /// May be called before or after [`resume`](Self::resume); a later resume
    /// overwrites the slot again.
    pub fn set_result(&mut self, value: impl Into<Value>) {
        self.result = value.into();
    }

    /// Takes the result slot, leaving [`Value::Undefined`] behind.
    pub fn take_result(&mut self) -> Value {
        core::mem::take(&mut self.result)
    }

    /// Returns the proxy's persistent state store.
    #[must_use]
    pub fn state(&self) -> &StateStore {
        &self.state
    }

    /// Returns the proxy function being invoked.
    ///
    /// Properties written on it are visible to every holder of the proxy.
    #[must_use]
    pub fn proxy_function(&self) -> &Function {
        &self.proxy
    }

    /// Returns the wrapped original.
    #[must_use]
    pub fn target(&self) -> &Function {
        &self.original.target
    }

    /// Returns how many times the original has run during this call, through
    /// [`resume`](Self::resume) or any [`Resumption`] taken from this context.
    #[must_use]
    pub fn resume_count(&self) -> u32 {
        self.original.resumed.load(Ordering::SeqCst)
    }

    /// Invokes the original with the preserved receiver and the captured
    /// arguments, then stores its return value in the result slot.
    ///
    /// Calling `resume` again runs the original again. That is allowed; each
    /// run overwrites the result slot.
    ///
    /// # Errors
    ///
    /// Returns the original's error unchanged. The result slot keeps its
    /// previous value in that case.
    pub fn resume(&mut self) -> Result<(), CallError> {
        self.result = self.original.invoke()?;
        Ok(())
    }

    /// Returns an owned handle that can invoke the original independently of
    /// this context.
    ///
    /// Used by bridges that hand resumption to code which cannot borrow the
    /// context, such as script-level handlers. Runs through the handle count
    /// toward [`resume_count`](Self::resume_count).
    #[must_use]
    pub fn resumption(&self) -> Resumption {
        self.original.clone()
    }

    pub(crate) fn into_result(self) -> Value {
        self.result
    }
}

/// Owned resumption handle detached from an [`ExecutionContext`].
///
/// Clones share the run counter of the context they came from.
#[derive(Debug, Clone)]
pub struct Resumption {
    target: Function,
    receiver: Option<Object>,
    arguments: Vec<Value>,
    resumed: Arc<AtomicU32>,
}

impl Resumption {
    /// Invokes the original with the captured receiver and arguments.
    ///
    /// # Errors
    ///
    /// Returns the original's error unchanged.
    pub fn invoke(&self) -> Result<Value, CallError> {
        let resumed = self.resumed.fetch_add(1, Ordering::SeqCst);
        tracing::trace!(target_fn = %self.target.name(), resumed, "resuming original");
        self.target.call(self.receiver.as_ref(), &self.arguments)
    }
}

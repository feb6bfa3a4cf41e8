//! Dispatching entry points.
//!
//! [`create_proxy`] accepts any [`Value`], decides whether it is a callable,
//! composite or list target, and delegates to [`wrap`](crate::wrap),
//! [`wrap_composite`](crate::wrap_composite) or
//! [`wrap_list_with`](crate::wrap_list_with). [`CreateProxy`] offers the same
//! operation in method form on functions, objects and values.

use std::sync::Arc;

use interpose_value::{Function, Object, Value};

use crate::composite::{wrap_composite_with, wrap_list_with};
use crate::error::ProxyError;
use crate::factory::wrap_with;
use crate::filter::BoxedFilter;
use crate::handler::{BoxedHandler, Handler};
use crate::options::ProxyOptions;
use crate::target::Target;

/// Creates a proxy for a callable, composite or list target.
///
/// The filter only applies to composites and lists and defaults to accepting
/// every member.
///
/// # Errors
///
/// - [`ProxyError::UnsupportedTargetKind`] for data values
/// - [`ProxyError::ForbiddenTarget`] for a global scope
/// - any composite construction error
pub fn create_proxy(
    target: &Value,
    handler: impl Handler,
    filter: Option<BoxedFilter>,
) -> Result<Value, ProxyError> {
    let options = ProxyOptions::new().with_optional_filter(filter);
    create_proxy_with(target, Arc::new(handler), &options)
}

/// Creates a proxy with a shared handler and explicit options.
///
/// # Errors
///
/// See [`create_proxy`].
pub fn create_proxy_with(
    target: &Value,
    handler: BoxedHandler,
    options: &ProxyOptions,
) -> Result<Value, ProxyError> {
    match Target::classify(target)? {
        Target::Callable(func) => Ok(Value::from(wrap_with(func, handler, options))),
        Target::Composite(object) => {
            wrap_composite_with(&object, handler, options).map(Value::from)
        }
        Target::List(items) => wrap_list_with(&items, handler, options).map(Value::List),
    }
}

/// Method-style proxy construction.
///
/// # Example
///
/// ```
/// use interpose_proxy::{handler_fn, CreateProxy, ExecutionContext};
/// use interpose_value::{Function, Value};
///
/// let func = Function::new("func", |_, _| Ok(Value::from(45)));
/// let cancelled = func
///     .create_proxy(
///         handler_fn(|ctx: &mut ExecutionContext| {
///             ctx.set_result(23);
///             Ok(())
///         }),
///         None,
///     )
///     .unwrap();
///
/// assert_eq!(cancelled.call(None, &[]).unwrap(), Value::from(23));
/// ```
pub trait CreateProxy {
    /// What the proxy of `Self` is.
    type Proxy;

    /// Wraps `self` with `handler`.
    ///
    /// # Errors
    ///
    /// See [`create_proxy`].
    fn create_proxy<H: Handler>(
        &self,
        handler: H,
        filter: Option<BoxedFilter>,
    ) -> Result<Self::Proxy, ProxyError>;
}

impl CreateProxy for Function {
    type Proxy = Function;

    fn create_proxy<H: Handler>(
        &self,
        handler: H,
        _filter: Option<BoxedFilter>,
    ) -> Result<Function, ProxyError> {
        Ok(wrap_with(self.clone(), Arc::new(handler), &ProxyOptions::new()))
    }
}

impl CreateProxy for Object {
    type Proxy = Object;

    fn create_proxy<H: Handler>(
        &self,
        handler: H,
        filter: Option<BoxedFilter>,
    ) -> Result<Object, ProxyError> {
        let options = ProxyOptions::new().with_optional_filter(filter);
        wrap_composite_with(self, Arc::new(handler), &options)
    }
}

impl CreateProxy for Value {
    type Proxy = Value;

    fn create_proxy<H: Handler>(
        &self,
        handler: H,
        filter: Option<BoxedFilter>,
    ) -> Result<Value, ProxyError> {
        create_proxy(self, handler, filter)
    }
}

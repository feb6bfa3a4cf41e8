//! The callable proxy factory.
//!
//! [`wrap`] turns one [`Function`] into a new function that, on every call:
//!
//! 1. Resolves the effective receiver: the pinned receiver if one was given at
//!    construction, else the call-site receiver, else none
//! 2. Builds an [`ExecutionContext`] bound to the original, the arguments, the
//!    receiver and this proxy's [`StateStore`]
//! 3. Invokes the handler once
//! 4. Returns the context's result slot
//!
//! The state store is created here, once per proxy, and captured by the proxy
//! alone. Wrapping the same original twice yields two proxies with two stores.

use std::sync::Arc;

use interpose_value::{CallError, Function, Object, Value};

use crate::context::ExecutionContext;
use crate::handler::{BoxedHandler, Handler};
use crate::options::ProxyOptions;
use crate::state::StateStore;

/// Wraps a callable with a handler.
///
/// `receiver` pins the object the original is called on. When `None`, each
/// call uses its call-site receiver.
///
/// # Example
///
/// ```
/// use interpose_proxy::{handler_fn, wrap, ExecutionContext};
/// use interpose_value::{Function, Value};
///
/// let add = Function::new("add", |_, args| {
///     Ok(Value::from(args.iter().filter_map(Value::as_number).sum::<f64>()))
/// });
///
/// let doubled = wrap(
///     add.clone(),
///     handler_fn(|ctx: &mut ExecutionContext| {
///         ctx.resume()?;
///         let sum = ctx.result().as_number().unwrap_or_default();
///         ctx.set_result(sum * 2.0);
///         Ok(())
///     }),
///     None,
/// );
///
/// let args = [Value::from(1), Value::from(2)];
/// assert_eq!(doubled.call(None, &args).unwrap(), Value::from(6));
/// assert_eq!(add.call(None, &args).unwrap(), Value::from(3));
/// ```
#[must_use]
pub fn wrap(original: Function, handler: impl Handler, receiver: Option<Object>) -> Function {
    proxy_function(original, Arc::new(handler), receiver, None)
}

/// Wraps a callable with a shared handler and explicit options.
///
/// Uses the receiver and name from `options`; the filter and depth limit only
/// apply to composites.
#[must_use]
pub fn wrap_with(original: Function, handler: BoxedHandler, options: &ProxyOptions) -> Function {
    proxy_function(
        original,
        handler,
        options.receiver().cloned(),
        options.name().map(str::to_owned),
    )
}

pub(crate) fn proxy_function(
    original: Function,
    handler: BoxedHandler,
    pinned: Option<Object>,
    name: Option<String>,
) -> Function {
    let name = name.unwrap_or_else(|| original.name().to_owned());
    let state = StateStore::new();

    tracing::debug!(
        proxy = %name,
        handler = handler.name(),
        pinned = pinned.is_some(),
        "constructing callable proxy"
    );

    Function::new_cyclic(name, move |weak| {
        let weak = weak.clone();
        move |call_site: Option<&Object>, args: &[Value]| -> Result<Value, CallError> {
            let proxy = weak
                .upgrade()
                .ok_or_else(|| CallError::Type("proxy function was dropped".to_owned()))?;
            let receiver = pinned.clone().or_else(|| call_site.cloned());

            tracing::trace!(
                proxy = %proxy.name(),
                args = args.len(),
                has_receiver = receiver.is_some(),
                "invoking proxy handler"
            );

            let mut ctx = ExecutionContext::new(
                original.clone(),
                receiver,
                args.to_vec(),
                state.clone(),
                proxy,
            );
            handler.handle(&mut ctx)?;
            Ok(ctx.into_result())
        }
    })
}

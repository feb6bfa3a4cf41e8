//! The composite proxy factory.
//!
//! [`wrap_composite`] builds a parallel object for an original object:
//!
//! - the proxy's delegation base is the original, so every member the proxy
//!   does not override resolves against the original, live
//! - each own callable member accepted by the filter is overridden with a
//!   callable proxy whose receiver is pinned to the original (not the proxy)
//! - each own composite member accepted by the filter is overridden with a
//!   recursively built composite proxy, sharing the same handler and filter
//! - each own list member accepted by the filter is overridden with a new
//!   list whose elements are offered to the filter under their index and
//!   proxied the same way; callable elements are pinned to the object that
//!   owns the list
//! - plain data and rejected members are not copied
//!
//! # Cycles
//!
//! A member that points back at an object currently being wrapped would make
//! construction recurse forever. The walk keeps the chain of ancestors and
//! fails with [`ProxyError::CyclicReference`] instead. The same object reached
//! twice through different paths is not a cycle and is wrapped once per path.

use std::sync::Arc;

use interpose_value::{Object, ObjectId, Value};

use crate::error::ProxyError;
use crate::factory::proxy_function;
use crate::filter::BoxedFilter;
use crate::handler::{BoxedHandler, Handler};
use crate::options::ProxyOptions;
use crate::target::Target;

/// Wraps every accepted callable of an object graph with a handler.
///
/// `filter` defaults to accepting every member.
///
/// # Errors
///
/// - [`ProxyError::ForbiddenTarget`] if `original` is a global scope
/// - [`ProxyError::CyclicReference`] if an accepted member refers back to an
///   ancestor
///
/// # Example
///
/// ```
/// use interpose_proxy::{handler_fn, wrap_composite, ExecutionContext};
/// use interpose_value::{Function, Object, Value};
///
/// let original = Object::new().with("value1", 23).with(
///     "what_is_value1",
///     Function::new("what_is_value1", |this, _| {
///         Ok(this.map(|o| o.get("value1")).unwrap_or_default())
///     }),
/// );
///
/// let proxy = wrap_composite(
///     &original,
///     handler_fn(|ctx: &mut ExecutionContext| ctx.resume()),
///     None,
/// )
/// .unwrap();
///
/// assert_eq!(proxy.call_method("what_is_value1", &[]).unwrap(), Value::from(23));
/// assert_eq!(proxy.get("value1"), Value::from(23));
/// ```
pub fn wrap_composite(
    original: &Object,
    handler: impl Handler,
    filter: Option<BoxedFilter>,
) -> Result<Object, ProxyError> {
    let options = ProxyOptions::new().with_optional_filter(filter);
    wrap_composite_with(original, Arc::new(handler), &options)
}

/// Wraps an object graph with a shared handler and explicit options.
///
/// Uses the filter and depth limit from `options`. Receiver and name options
/// are ignored: every member proxy pins its owning object and keeps its
/// original's name.
///
/// # Errors
///
/// As [`wrap_composite`], plus [`ProxyError::DepthLimitExceeded`] when an
/// accepted composite lies deeper than the configured limit.
pub fn wrap_composite_with(
    original: &Object,
    handler: BoxedHandler,
    options: &ProxyOptions,
) -> Result<Object, ProxyError> {
    if original.is_global() {
        return Err(ProxyError::ForbiddenTarget);
    }

    let _span = tracing::debug_span!("wrap_composite", root = %original.id()).entered();
    Walk::new(handler, options).composite(original)
}

/// Wraps the accepted elements of a list with a shared handler.
///
/// Elements are offered to the filter under their index (`"0"`, `"1"`, ...).
/// Callable elements keep the call-site receiver; nested objects and lists
/// are wrapped as by [`wrap_composite_with`]. Data and rejected elements are
/// copied unchanged.
///
/// # Errors
///
/// As [`wrap_composite_with`], for composites nested in the list.
pub fn wrap_list_with(
    items: &[Value],
    handler: BoxedHandler,
    options: &ProxyOptions,
) -> Result<Vec<Value>, ProxyError> {
    let _span = tracing::debug_span!("wrap_list", len = items.len()).entered();
    Walk::new(handler, options).list(items, None)
}

/// State of one construction pass.
struct Walk {
    handler: BoxedHandler,
    filter: BoxedFilter,
    max_depth: Option<usize>,
    /// Objects currently being wrapped, root first.
    ancestors: Vec<ObjectId>,
    /// Member names from the root to the composite being wrapped.
    path: Vec<String>,
}

impl Walk {
    fn new(handler: BoxedHandler, options: &ProxyOptions) -> Self {
        Self {
            handler,
            filter: Arc::clone(options.filter()),
            max_depth: options.max_depth(),
            ancestors: Vec::new(),
            path: Vec::new(),
        }
    }

    fn composite(&mut self, original: &Object) -> Result<Object, ProxyError> {
        let proxy = Object::with_base(original.clone());

        self.ancestors.push(original.id());
        let result = self.members(original, &proxy);
        self.ancestors.pop();

        result.map(|()| proxy)
    }

    fn members(&mut self, original: &Object, proxy: &Object) -> Result<(), ProxyError> {
        for (name, value) in original.own_entries() {
            // Plain data stays reachable through the delegation base.
            let Some(target) = Target::from_member(&value) else {
                continue;
            };
            if let Some(wrapped) = self.member(&name, target, Some(original))? {
                proxy.set(name, wrapped);
            }
        }
        Ok(())
    }

    /// Proxies one accepted member or list element. `None` if rejected.
    fn member(
        &mut self,
        name: &str,
        target: Target,
        owner: Option<&Object>,
    ) -> Result<Option<Value>, ProxyError> {
        if !self.filter.accept(name, &target) {
            tracing::debug!(member = %name, filter = self.filter.name(), "member delegated");
            return Ok(None);
        }

        let wrapped = match target {
            Target::Callable(func) => {
                tracing::debug!(member = %name, "proxying callable member");
                let pinned = owner.cloned();
                Value::from(proxy_function(func, Arc::clone(&self.handler), pinned, None))
            }
            Target::Composite(child) => {
                tracing::debug!(member = %name, "proxying composite member");
                self.path.push(name.to_owned());
                let nested = self.child(&child);
                self.path.pop();
                Value::from(nested?)
            }
            Target::List(items) => {
                tracing::debug!(member = %name, len = items.len(), "proxying list member");
                self.path.push(name.to_owned());
                let list = self.list(&items, owner);
                self.path.pop();
                Value::List(list?)
            }
        };
        Ok(Some(wrapped))
    }

    fn list(&mut self, items: &[Value], owner: Option<&Object>) -> Result<Vec<Value>, ProxyError> {
        let mut wrapped = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let proxied = match Target::from_member(item) {
                Some(target) => self.member(&index.to_string(), target, owner)?,
                None => None,
            };
            wrapped.push(proxied.unwrap_or_else(|| item.clone()));
        }
        Ok(wrapped)
    }

    fn child(&mut self, child: &Object) -> Result<Object, ProxyError> {
        if self.ancestors.contains(&child.id()) {
            return Err(ProxyError::CyclicReference {
                member: self.path.join("."),
            });
        }
        if let Some(limit) = self.max_depth
            && self.ancestors.len() > limit
        {
            return Err(ProxyError::DepthLimitExceeded {
                limit,
                member: self.path.join("."),
            });
        }
        self.composite(child)
    }
}

//! Call-interception proxies for Interpose (Layer 2).
//!
//! `interpose_proxy` turns a callable, or an object graph of callables, into a
//! structurally equivalent substitute that routes every invocation through a
//! caller-supplied [`Handler`].
//!
//! # Core Concepts
//!
//! - [`ExecutionContext`] - Per-call value: arguments, result slot, `resume`, state
//! - [`StateStore`] - Per-proxy mapping that survives across calls
//! - [`Handler`] - Caller logic deciding whether and when the original runs
//! - [`MemberFilter`] - Construction-time predicate choosing which members to proxy
//! - [`wrap`] / [`wrap_composite`] / [`wrap_list_with`] - The callable, composite and list factories
//! - [`create_proxy`] / [`CreateProxy`] - Dispatching entry points
//!
//! # Example
//!
//! ```
//! use interpose_proxy::{create_proxy, handler_fn, ExecutionContext};
//! use interpose_value::{Function, Value};
//!
//! let func = Function::new("func", |_, _| Ok(Value::from(-1)));
//!
//! let proxy = create_proxy(
//!     &Value::from(func),
//!     handler_fn(|ctx: &mut ExecutionContext| {
//!         ctx.resume()?;
//!         if ctx.result().as_number().is_some_and(|n| n < 0.0) {
//!             ctx.set_result(0);
//!         }
//!         Ok(())
//!     }),
//!     None,
//! )
//! .unwrap();
//!
//! let proxy = proxy.as_function().unwrap();
//! assert_eq!(proxy.call(None, &[]).unwrap(), Value::from(0));
//! ```
//!
//! # Nesting
//!
//! A proxy is an ordinary [`Function`](interpose_value::Function) or
//! [`Object`](interpose_value::Object) and can be wrapped again. Handlers run
//! in stack order: the outermost handler's pre-resume logic runs first and its
//! post-resume logic runs last.
//!
//! # Concurrency
//!
//! Construction and invocation are synchronous. Each [`StateStore`] belongs to
//! exactly one proxy and is not logically synchronized: concurrent calls of the
//! same proxy race on its state.

/// Dispatching entry points and the method-style extension trait.
pub mod api;

/// The composite proxy factory.
pub mod composite;

/// The per-invocation execution context.
pub mod context;

/// Construction errors.
pub mod error;

/// The callable proxy factory.
pub mod factory;

/// Member inclusion filters.
pub mod filter;

/// The handler protocol.
pub mod handler;

/// Before/after lifecycle adapters.
pub mod lifecycle;

/// Construction options.
pub mod options;

/// Per-proxy persistent state.
pub mod state;

/// Target classification.
pub mod target;

pub use api::{CreateProxy, create_proxy, create_proxy_with};
pub use composite::{wrap_composite, wrap_composite_with, wrap_list_with};
pub use context::{ExecutionContext, Resumption};
pub use error::ProxyError;
pub use factory::{wrap, wrap_with};
pub use filter::{BoxedFilter, MemberFilter, filter_fn};
pub use handler::{BoxedHandler, Handler, handler_fn};
pub use lifecycle::{Advice, LifecycleConfig, lifecycle_proxy};
pub use options::ProxyOptions;
pub use state::StateStore;
pub use target::Target;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use crate::api::{CreateProxy, create_proxy, create_proxy_with};
    pub use crate::composite::{wrap_composite, wrap_composite_with, wrap_list_with};
    pub use crate::context::{ExecutionContext, Resumption};
    pub use crate::error::ProxyError;
    pub use crate::factory::{wrap, wrap_with};
    pub use crate::filter::{self, BoxedFilter, MemberFilter, filter_fn};
    pub use crate::handler::{BoxedHandler, Handler, handler_fn};
    pub use crate::lifecycle::{Advice, LifecycleConfig, lifecycle_proxy};
    pub use crate::options::ProxyOptions;
    pub use crate::state::StateStore;
    pub use crate::target::Target;
}

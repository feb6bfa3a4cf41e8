//! Call-interception proxies for callables and object graphs.
//!
//! A proxy routes every call of a wrapped function, or of every accepted
//! method of a wrapped object graph, through a handler that decides whether
//! and when the original runs, what the call returns, and what to remember for
//! the next call.
//!
//! ```
//! use interpose::prelude::*;
//!
//! let obj = Object::new()
//!     .with("value1", 23)
//!     .with("whatIsValue1", Function::new("whatIsValue1", |this, _| {
//!         Ok(this.map(|o| o.get("value1")).unwrap_or_default())
//!     }));
//!
//! let calls = handler_fn(|ctx: &mut ExecutionContext| {
//!     ctx.state().increment("calls");
//!     ctx.resume()
//! });
//!
//! let proxy = obj.create_proxy(calls, None).unwrap();
//! assert_eq!(proxy.call_method("whatIsValue1", &[]).unwrap(), Value::from(23));
//! ```

pub use interpose_internal::*;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use interpose_internal::prelude::*;
}

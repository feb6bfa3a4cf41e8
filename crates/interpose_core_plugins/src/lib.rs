//! Infrastructure around the Interpose proxy core (Layer 3).
//!
//! - [`install`] / [`install_method`] - Attach `createProxy` to a namespace or prototype
//! - [`Realm`] - Ambient environment owning the global object
//! - [`ScriptHandler`] / [`ScriptFilter`] - Bridges for handlers and filters written as [`Function`](interpose_value::Function) values
//! - [`TracingSetup`] - Logging via the `tracing` crate
//!
//! # Example
//!
//! ```
//! use interpose_core_plugins::{Realm, CREATE_PROXY};
//! use interpose_value::{Function, Value};
//!
//! let realm = Realm::new();
//! realm.install_method();
//!
//! let obj = realm.new_object();
//! obj.set("method1", Function::new("method1", |_, _| Ok(Value::from(1))));
//!
//! let handler = Function::new("handler", |_, args| {
//!     let ctx = args.first().and_then(Value::as_object).cloned().unwrap_or_default();
//!     ctx.call_method("continue", &[])
//! });
//! let proxy = obj.call_method(CREATE_PROXY, &[handler.into()]).unwrap();
//!
//! let proxy = proxy.as_object().unwrap();
//! assert_eq!(proxy.call_method("method1", &[]).unwrap(), Value::from(1));
//! ```
//!
//! # Architecture
//!
//! - **Layer 1** (`interpose_value`): dynamic value model
//! - **Layer 2** (`interpose_proxy`): proxy construction and the execution protocol
//! - **Layer 3** (`interpose_core_plugins`): installation and tracing (this crate)

mod install;
mod tracing_setup;

pub use install::{
    CREATE_PROXY, CTX_ARGUMENTS, CTX_CONTINUE, CTX_PROXY_FUNCTION, CTX_RETURN_VALUE, CTX_STATE,
    InstallError, Realm, ScriptFilter, ScriptHandler, install, install_method,
};
pub use tracing_setup::{TracingFormat, TracingSetup};

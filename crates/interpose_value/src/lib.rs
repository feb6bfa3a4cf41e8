//! The dynamic value model for Interpose (Layer 1).
//!
//! `interpose_value` provides the runtime shapes that proxies are built over:
//!
//! - [`Value`] - Tagged dynamic value (scalars, lists, functions, objects)
//! - [`Object`] - Shared member map with an optional delegation base
//! - [`Function`] - Shared native callable with its own property bag
//! - [`CallError`] - Errors raised while calling a [`Function`]
//!
//! # Architecture
//!
//! This crate is Layer 1 of the Interpose architecture:
//!
//! - **Layer 1** (`interpose_value`): dynamic value model (this crate)
//! - **Layer 2** (`interpose_proxy`): proxy construction and the execution protocol
//! - **Layer 3** (`interpose_core_plugins`): namespace installation, tracing setup
//!
//! # Example
//!
//! ```
//! use interpose_value::{Function, Object, Value};
//!
//! let counter = Object::new().with("value", 23);
//! counter.set(
//!     "read",
//!     Function::new("read", |this, _args| {
//!         Ok(this.map(|obj| obj.get("value")).unwrap_or_default())
//!     }),
//! );
//!
//! assert_eq!(counter.call_method("read", &[]).unwrap(), Value::from(23));
//! ```

/// Errors raised by callables.
pub mod error;

/// Native callables with property bags.
pub mod function;

/// Objects with own members and a delegation base.
pub mod object;

/// The tagged dynamic value.
pub mod value;

pub use error::CallError;
pub use function::{Function, NativeFn, WeakFunction};
pub use object::{Object, ObjectId, WeakObject};
pub use value::{Value, ValueKind};

/// Re-export all common types for easy access.
pub mod prelude {
    pub use crate::error::CallError;
    pub use crate::function::{Function, WeakFunction};
    pub use crate::object::{Object, WeakObject};
    pub use crate::value::{Value, ValueKind};
}

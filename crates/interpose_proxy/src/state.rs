//! Per-proxy persistent state.
//!
//! Every callable proxy owns exactly one [`StateStore`], created when the proxy
//! is constructed and handed to the handler on each call through
//! [`ExecutionContext::state`](crate::ExecutionContext::state). Entries
//! accumulate across calls and are never reset.
//!
//! # Example
//!
//! ```
//! use interpose_proxy::{handler_fn, wrap, ExecutionContext};
//! use interpose_value::{Function, Value};
//!
//! let proxy = wrap(
//!     Function::new("noop", |_, _| Ok(Value::Undefined)),
//!     handler_fn(|ctx: &mut ExecutionContext| {
//!         let calls = ctx.state().increment("calls");
//!         ctx.set_result(calls);
//!         Ok(())
//!     }),
//!     None,
//! );
//!
//! assert_eq!(proxy.call(None, &[]).unwrap(), Value::from(1));
//! assert_eq!(proxy.call(None, &[]).unwrap(), Value::from(2));
//! ```

use interpose_value::{Object, Value};

/// A named mapping owned by a single proxy.
///
/// Backed by an [`Object`] with no delegation base, so the store can also be
/// exposed to dynamic handlers as an ordinary object. Cloning clones the
/// handle: all clones see the same entries.
#[derive(Clone, Debug)]
pub struct StateStore {
    entries: Object,
}

impl StateStore {
    /// Creates an empty store. Only the proxy factory creates stores.
    pub(crate) fn new() -> Self {
        Self {
            entries: Object::new(),
        }
    }

    /// Reads an entry, [`Value::Undefined`] if absent.
    #[must_use]
    pub fn get(&self, name: &str) -> Value {
        self.entries.get(name)
    }

    /// Writes an entry, returning the previous value.
    pub fn set(&self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.set(name, value)
    }

    /// Removes an entry, returning it.
    pub fn remove(&self, name: &str) -> Option<Value> {
        self.entries.remove(name)
    }

    /// Returns `true` if the entry exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.has_own(name)
    }

    /// Replaces an entry with `f(current)` and returns the new value.
    ///
    /// `f` may read other entries of this store.
    pub fn update(&self, name: &str, f: impl FnOnce(Value) -> Value) -> Value {
        self.entries.update(name, f)
    }

    /// Adds one to a numeric entry, treating a missing or non-numeric entry as
    /// zero, and returns the new count.
    pub fn increment(&self, name: &str) -> f64 {
        let next = self.update(name, |current| {
            Value::from(current.as_number().unwrap_or(0.0) + 1.0)
        });
        next.as_number().unwrap_or_default()
    }

    /// Returns the entry names, in insertion order.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.entries.own_keys()
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the store has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the backing object.
    #[must_use]
    pub fn as_object(&self) -> &Object {
        &self.entries
    }

    /// Returns `true` if both handles refer to the same store.
    #[must_use]
    pub fn ptr_eq(a: &StateStore, b: &StateStore) -> bool {
        Object::ptr_eq(&a.entries, &b.entries)
    }
}

//! Native callables.
//!
//! A [`Function`] is a shared handle to a native closure. Calls receive an
//! explicit receiver (the object the function was invoked on, if any) and the
//! argument slice. Every function also owns a property bag, an [`Object`]
//! that callers and the function itself may stash data on.

use core::fmt;
use std::sync::{Arc, Weak};

use crate::error::CallError;
use crate::object::Object;
use crate::value::Value;

/// Signature of the closure behind a [`Function`].
///
/// The first parameter is the receiver, the second the call arguments.
pub type NativeFn = dyn Fn(Option<&Object>, &[Value]) -> Result<Value, CallError> + Send + Sync;

struct FunctionInner {
    name: String,
    body: Box<NativeFn>,
    properties: Object,
}

/// A shared native callable.
///
/// Cloning a `Function` clones the handle; both clones share the same body and
/// the same property bag.
#[derive(Clone)]
pub struct Function {
    inner: Arc<FunctionInner>,
}

impl Function {
    /// Creates a function from a closure.
    pub fn new<F>(name: impl Into<String>, body: F) -> Self
    where
        F: Fn(Option<&Object>, &[Value]) -> Result<Value, CallError> + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(FunctionInner {
                name: name.into(),
                body: Box::new(body),
                properties: Object::new(),
            }),
        }
    }

    /// Creates a function whose body needs a handle to the function itself.
    ///
    /// `make` receives a [`WeakFunction`] that upgrades once construction has
    /// finished. Holding it weakly keeps the function from owning itself.
    pub fn new_cyclic<F>(name: impl Into<String>, make: impl FnOnce(&WeakFunction) -> F) -> Self
    where
        F: Fn(Option<&Object>, &[Value]) -> Result<Value, CallError> + Send + Sync + 'static,
    {
        let name = name.into();
        let inner = Arc::new_cyclic(|weak| {
            let body = make(&WeakFunction(weak.clone()));
            FunctionInner {
                name,
                body: Box::new(body),
                properties: Object::new(),
            }
        });
        Self { inner }
    }

    /// Calls the function.
    ///
    /// # Errors
    ///
    /// Returns whatever error the body raises.
    pub fn call(&self, receiver: Option<&Object>, args: &[Value]) -> Result<Value, CallError> {
        (self.inner.body)(receiver, args)
    }

    /// Returns the function's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Returns the function's property bag.
    #[must_use]
    pub fn properties(&self) -> &Object {
        &self.inner.properties
    }

    /// Reads a property from the property bag.
    #[must_use]
    pub fn get(&self, name: &str) -> Value {
        self.inner.properties.get(name)
    }

    /// Writes a property into the property bag.
    pub fn set(&self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.inner.properties.set(name, value)
    }

    /// Returns `true` if both handles refer to the same function.
    #[must_use]
    pub fn ptr_eq(a: &Function, b: &Function) -> bool {
        Arc::ptr_eq(&a.inner, &b.inner)
    }

    /// Returns a weak handle that does not keep the function alive.
    #[must_use]
    pub fn downgrade(&self) -> WeakFunction {
        WeakFunction(Arc::downgrade(&self.inner))
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name())
            .field("properties", &self.properties().own_keys())
            .finish()
    }
}

/// A weak handle to a [`Function`].
#[derive(Clone)]
pub struct WeakFunction(Weak<FunctionInner>);

impl WeakFunction {
    /// Returns the function if it is still alive.
    #[must_use]
    pub fn upgrade(&self) -> Option<Function> {
        self.0.upgrade().map(|inner| Function { inner })
    }
}

impl fmt::Debug for WeakFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("WeakFunction")
            .field(&self.upgrade().map(|func| func.inner.name.clone()))
            .finish()
    }
}

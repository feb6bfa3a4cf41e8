//! Objects with own members and a delegation base.
//!
//! An [`Object`] is a shared handle to an ordered member map. Each object may
//! carry a *delegation base*, fixed when the object is created. Member reads
//! use a two-tier lookup:
//!
//! 1. Check the object's own members
//! 2. Walk the delegation chain (closest wins)
//!
//! Writes always land in the object's own members and shadow the base without
//! touching it. Because the base is read live, a later change to a base member
//! is visible through every object delegating to it.
//!
//! ```text
//! proxy ──own──▶ { method1: <proxy fn> }
//!   │
//!   └──base──▶ original ──own──▶ { method1: <fn>, value1: 23 }
//! ```

use core::fmt;
use std::sync::{Arc, Weak};

use indexmap::IndexMap;
use parking_lot::RwLock;

use crate::error::CallError;
use crate::value::Value;

/// Identity of an object, stable for the object's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId(usize);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:x}", self.0)
    }
}

struct ObjectInner {
    /// Own members, in insertion order.
    members: RwLock<IndexMap<String, Value>>,
    /// Delegation base consulted when a member is not found locally.
    base: Option<Object>,
    /// Marks the ambient global scope of a realm.
    global: bool,
}

/// A shared, mutable member map with an optional delegation base.
///
/// Cloning an `Object` clones the handle, not the members.
///
/// # Thread Safety
///
/// Members sit behind a [`RwLock`] that is held only for the duration of a
/// single read or write. No lock is held while a member function runs, so a
/// method may freely read and write its receiver.
#[derive(Clone)]
pub struct Object {
    inner: Arc<ObjectInner>,
}

impl Default for Object {
    fn default() -> Self {
        Self::new()
    }
}

impl Object {
    /// Creates an empty object with no delegation base.
    #[must_use]
    pub fn new() -> Self {
        Self::build(None, false)
    }

    /// Creates an empty object that delegates unresolved reads to `base`.
    #[must_use]
    pub fn with_base(base: Object) -> Self {
        Self::build(Some(base), false)
    }

    /// Creates an object marked as an ambient global scope.
    ///
    /// Global objects cannot be proxied. Normally only a realm creates one.
    #[must_use]
    pub fn new_global() -> Self {
        Self::build(None, true)
    }

    /// Creates a global scope object that delegates to `base`.
    #[must_use]
    pub fn new_global_with_base(base: Object) -> Self {
        Self::build(Some(base), true)
    }

    fn build(base: Option<Object>, global: bool) -> Self {
        Self {
            inner: Arc::new(ObjectInner {
                members: RwLock::new(IndexMap::new()),
                base,
                global,
            }),
        }
    }

    /// Builder-style member insertion.
    #[must_use]
    pub fn with(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    /// Returns the identity of this object.
    #[must_use]
    pub fn id(&self) -> ObjectId {
        ObjectId(Arc::as_ptr(&self.inner) as usize)
    }

    /// Returns `true` if both handles refer to the same object.
    #[must_use]
    pub fn ptr_eq(a: &Object, b: &Object) -> bool {
        Arc::ptr_eq(&a.inner, &b.inner)
    }

    /// Returns a weak handle that does not keep the object alive.
    #[must_use]
    pub fn downgrade(&self) -> WeakObject {
        WeakObject(Arc::downgrade(&self.inner))
    }

    /// Returns `true` if this object is the ambient global scope of a realm.
    #[must_use]
    pub fn is_global(&self) -> bool {
        self.inner.global
    }

    /// Returns the delegation base, if any.
    #[must_use]
    pub fn base(&self) -> Option<&Object> {
        self.inner.base.as_ref()
    }

    /// Reads a member, walking the delegation chain.
    ///
    /// Returns [`Value::Undefined`] if no object in the chain has the member.
    #[must_use]
    pub fn get(&self, name: &str) -> Value {
        let mut current = Some(self);
        while let Some(obj) = current {
            if let Some(value) = obj.get_own(name) {
                return value;
            }
            current = obj.base();
        }
        Value::Undefined
    }

    /// Reads an own member without consulting the delegation chain.
    #[must_use]
    pub fn get_own(&self, name: &str) -> Option<Value> {
        self.inner.members.read().get(name).cloned()
    }

    /// Returns `true` if this object or any object in its chain has the member.
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        let mut current = Some(self);
        while let Some(obj) = current {
            if obj.has_own(name) {
                return true;
            }
            current = obj.base();
        }
        false
    }

    /// Returns `true` if the member is an own member of this object.
    #[must_use]
    pub fn has_own(&self, name: &str) -> bool {
        self.inner.members.read().contains_key(name)
    }

    /// Writes an own member, returning the previous own value.
    ///
    /// The delegation base is never modified.
    pub fn set(&self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.inner.members.write().insert(name.into(), value.into())
    }

    /// Removes an own member, returning it.
    ///
    /// Afterwards reads of `name` fall through to the delegation base again.
    pub fn remove(&self, name: &str) -> Option<Value> {
        self.inner.members.write().shift_remove(name)
    }

    /// Replaces an own member with `f(current)` and returns the new value.
    /// `current` is [`Value::Undefined`] if absent.
    ///
    /// No lock is held while `f` runs, so `f` may read or write this object.
    /// The update is not atomic: a write made by `f` to `name` is overwritten.
    pub fn update(&self, name: &str, f: impl FnOnce(Value) -> Value) -> Value {
        let current = self.get_own(name).unwrap_or_default();
        let next = f(current);
        self.set(name, next.clone());
        next
    }

    /// Returns the names of all own members, in insertion order.
    #[must_use]
    pub fn own_keys(&self) -> Vec<String> {
        self.inner.members.read().keys().cloned().collect()
    }

    /// Returns a snapshot of all own members, in insertion order.
    #[must_use]
    pub fn own_entries(&self) -> Vec<(String, Value)> {
        self.inner
            .members
            .read()
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }

    /// Returns the number of own members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.members.read().len()
    }

    /// Returns `true` if the object has no own members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.members.read().is_empty()
    }

    /// Calls the member `name` with this object as the receiver.
    ///
    /// # Errors
    ///
    /// Returns [`CallError::NotCallable`] if the member does not hold a
    /// function, or whatever error the function raises.
    pub fn call_method(&self, name: &str, args: &[Value]) -> Result<Value, CallError> {
        let Value::Function(func) = self.get(name) else {
            return Err(CallError::NotCallable {
                name: name.to_owned(),
            });
        };
        func.call(Some(self), args)
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Object")
            .field("id", &self.id())
            .field("members", &self.own_keys())
            .field("base", &self.base().map(Object::id))
            .field("global", &self.is_global())
            .finish()
    }
}

/// A weak handle to an [`Object`].
#[derive(Clone, Debug)]
pub struct WeakObject(Weak<ObjectInner>);

impl WeakObject {
    /// Returns the object if it is still alive.
    #[must_use]
    pub fn upgrade(&self) -> Option<Object> {
        self.0.upgrade().map(|inner| Object { inner })
    }
}

impl fmt::Debug for ObjectInner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectInner").finish_non_exhaustive()
    }
}

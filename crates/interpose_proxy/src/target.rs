//! Target classification.

use interpose_value::{Function, Object, Value};

use crate::error::ProxyError;

/// Something a proxy can be built for.
///
/// The kind is decided once, when the target is classified; construction never
/// probes values again.
#[derive(Debug, Clone)]
pub enum Target {
    /// A single callable.
    Callable(Function),
    /// An object whose callable and composite members are proxied.
    Composite(Object),
    /// A list whose callable, composite and list elements are proxied.
    ///
    /// Lists are values, so proxying one yields a new list rather than a
    /// delegating view.
    List(Vec<Value>),
}

impl Target {
    /// Classifies a value as a target.
    ///
    /// # Errors
    ///
    /// Returns [`ProxyError::UnsupportedTargetKind`] for anything that is
    /// not a function, an object or a list.
    pub fn classify(value: &Value) -> Result<Self, ProxyError> {
        Self::from_member(value).ok_or(ProxyError::UnsupportedTargetKind { kind: value.kind() })
    }

    /// Classifies a member value, returning `None` for plain data.
    #[must_use]
    pub fn from_member(value: &Value) -> Option<Self> {
        match value {
            Value::Function(func) => Some(Self::Callable(func.clone())),
            Value::Object(object) => Some(Self::Composite(object.clone())),
            Value::List(items) => Some(Self::List(items.clone())),
            _ => None,
        }
    }

    /// Returns `true` for [`Target::Callable`].
    #[must_use]
    pub fn is_callable(&self) -> bool {
        matches!(self, Self::Callable(_))
    }

    /// Returns `true` for [`Target::Composite`].
    #[must_use]
    pub fn is_composite(&self) -> bool {
        matches!(self, Self::Composite(_))
    }

    /// Returns `true` for [`Target::List`].
    #[must_use]
    pub fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }

    /// Converts the target back into a [`Value`].
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Callable(func) => Value::Function(func.clone()),
            Self::Composite(object) => Value::Object(object.clone()),
            Self::List(items) => Value::List(items.clone()),
        }
    }
}

impl From<Function> for Target {
    fn from(func: Function) -> Self {
        Self::Callable(func)
    }
}

impl From<Object> for Target {
    fn from(object: Object) -> Self {
        Self::Composite(object)
    }
}

impl From<Target> for Value {
    fn from(target: Target) -> Self {
        match target {
            Target::Callable(func) => Value::Function(func),
            Target::Composite(object) => Value::Object(object),
            Target::List(items) => Value::List(items),
        }
    }
}

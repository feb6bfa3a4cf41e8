//! Error types for calling functions.

use crate::value::Value;

/// Errors raised while a [`Function`](crate::Function) executes.
///
/// Proxies never translate these: an error raised by an original callable or
/// by a handler reaches the caller of the outermost proxy unchanged.
#[derive(Debug, thiserror::Error)]
pub enum CallError {
    /// A script-style thrown value.
    #[error("uncaught exception: {0:?}")]
    Thrown(Value),

    /// A member was invoked as a method but does not hold a function.
    #[error("'{name}' is not a function")]
    NotCallable {
        /// The member name that was looked up.
        name: String,
    },

    /// A native function received fewer arguments than it requires.
    #[error("expected at least {expected} argument(s), got {found}")]
    Arity {
        /// Minimum number of arguments.
        expected: usize,
        /// Number of arguments actually passed.
        found: usize,
    },

    /// An argument had the wrong kind of value.
    #[error("type error: {0}")]
    Type(String),

    /// Any other error raised by native code.
    #[error(transparent)]
    Custom(Box<dyn core::error::Error + Send + Sync>),
}

impl CallError {
    /// Creates a [`CallError::Thrown`] from anything convertible to a [`Value`].
    #[must_use]
    pub fn thrown(value: impl Into<Value>) -> Self {
        Self::Thrown(value.into())
    }

    /// Wraps an arbitrary error as a [`CallError::Custom`].
    #[must_use]
    pub fn custom(error: impl core::error::Error + Send + Sync + 'static) -> Self {
        Self::Custom(Box::new(error))
    }

    /// Returns the thrown value, if this error is a [`CallError::Thrown`].
    #[must_use]
    pub fn thrown_value(&self) -> Option<&Value> {
        match self {
            Self::Thrown(value) => Some(value),
            _ => None,
        }
    }
}

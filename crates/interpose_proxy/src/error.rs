//! Construction errors.

use interpose_value::{CallError, ValueKind};

/// Errors raised while constructing a proxy.
///
/// All of these are detected synchronously before the proxy exists. Errors
/// raised while a proxy runs are [`CallError`]s and pass through untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProxyError {
    /// A required construction argument is missing.
    #[error("invalid arguments: missing {field}")]
    InvalidArguments {
        /// The name of the missing field.
        field: &'static str,
    },

    /// The target is not a callable, a composite or a list.
    #[error("a proxy can only be created for functions, objects and lists, got {kind}")]
    UnsupportedTargetKind {
        /// The kind of value that was passed.
        kind: ValueKind,
    },

    /// The target is the ambient global scope.
    #[error("the global scope cannot be proxied")]
    ForbiddenTarget,

    /// A composite member refers back to one of its ancestors.
    #[error("cyclic reference at member '{member}'")]
    CyclicReference {
        /// Dotted path from the root composite to the offending member.
        member: String,
    },

    /// Composite nesting exceeded the configured maximum depth.
    #[error("composite nesting exceeds the maximum depth of {limit} at member '{member}'")]
    DepthLimitExceeded {
        /// The configured limit.
        limit: usize,
        /// Dotted path from the root composite to the offending member.
        member: String,
    },
}

impl From<ProxyError> for CallError {
    fn from(error: ProxyError) -> Self {
        CallError::custom(error)
    }
}

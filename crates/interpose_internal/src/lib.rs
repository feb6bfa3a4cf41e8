//! # Interpose Internal Library
//!
//! Re-exports the core Interpose crates for convenience.

/// Layer 1: dynamic value model.
pub use interpose_value;

/// Layer 2: proxy construction and the execution protocol.
pub use interpose_proxy;

/// Layer 3: namespace installation and tracing setup.
pub use interpose_core_plugins;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use interpose_core_plugins::{Realm, TracingFormat, TracingSetup, install};
    pub use interpose_proxy::prelude::*;
    pub use interpose_value::prelude::*;
}

//! Member inclusion filters.
//!
//! During composite construction each own member that is a callable or a
//! composite is offered to a [`MemberFilter`] together with its name. Accepted
//! members are proxied; rejected members stay reachable through delegation to
//! the original, unproxied.
//!
//! Filters run once per member at construction time and are never consulted
//! again, so a filter with side effects only influences that single pass.
//!
//! # Architecture
//!
//! Filters follow the same type-erasure pattern as handlers:
//!
//! - [`MemberFilter`] - Object-safe trait
//! - [`BoxedFilter`] - Shared trait object stored in [`ProxyOptions`](crate::ProxyOptions)
//! - [`filter_fn`] - Closure adapter
//!
//! Stock filters cover the common cases: [`accept_all`], [`only_names`],
//! [`excluding_names`], [`callables_only`] and [`flagged`].
//!
//! # Example
//!
//! ```
//! use interpose_proxy::filter::{self, MemberFilter};
//! use interpose_proxy::Target;
//! use interpose_value::{Function, Value};
//!
//! let only_a = filter::only_names(["a"]);
//! let method = Target::Callable(Function::new("a", |_, _| Ok(Value::Undefined)));
//!
//! assert!(only_a.accept("a", &method));
//! assert!(!only_a.accept("b", &method));
//! ```

use core::fmt;
use std::sync::Arc;

use hashbrown::HashSet;
use interpose_value::Value;

use crate::target::Target;

/// Construction-time predicate deciding whether a member is proxied.
pub trait MemberFilter: Send + Sync + 'static {
    /// Returns `true` if the member `name` holding `target` should be proxied.
    fn accept(&self, name: &str, target: &Target) -> bool;

    /// Returns the filter's name for tracing.
    fn name(&self) -> &str {
        core::any::type_name::<Self>()
    }
}

impl fmt::Debug for dyn MemberFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberFilter")
            .field("name", &self.name())
            .finish()
    }
}

/// Shared, type-erased filter.
pub type BoxedFilter = Arc<dyn MemberFilter>;

struct FilterFn<F> {
    func: F,
}

impl<F> MemberFilter for FilterFn<F>
where
    F: Fn(&str, &Target) -> bool + Send + Sync + 'static,
{
    fn accept(&self, name: &str, target: &Target) -> bool {
        (self.func)(name, target)
    }
}

/// Creates a filter from a closure.
#[must_use]
pub fn filter_fn<F>(func: F) -> BoxedFilter
where
    F: Fn(&str, &Target) -> bool + Send + Sync + 'static,
{
    Arc::new(FilterFn { func })
}

// ─────────────────────────────────────────────────────────────────────────────
// Stock filters
// ─────────────────────────────────────────────────────────────────────────────

/// Accepts every member. The default.
#[derive(Debug, Default, Clone, Copy)]
pub struct AcceptAll;

impl MemberFilter for AcceptAll {
    fn accept(&self, _name: &str, _target: &Target) -> bool {
        true
    }

    fn name(&self) -> &str {
        "accept_all"
    }
}

/// Returns a filter accepting every member.
#[must_use]
pub fn accept_all() -> BoxedFilter {
    Arc::new(AcceptAll)
}

/// Accepts members by name.
#[derive(Debug, Clone)]
pub struct NameSet {
    names: HashSet<String>,
    /// When `true` the set lists rejected names instead of accepted ones.
    exclude: bool,
}

impl MemberFilter for NameSet {
    fn accept(&self, name: &str, _target: &Target) -> bool {
        self.names.contains(name) != self.exclude
    }

    fn name(&self) -> &str {
        if self.exclude {
            "excluding_names"
        } else {
            "only_names"
        }
    }
}

/// Returns a filter accepting only members with one of the given names.
///
/// Applies at every depth: a composite member must also be named here for its
/// own members to be proxied.
#[must_use]
pub fn only_names<I, S>(names: I) -> BoxedFilter
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Arc::new(NameSet {
        names: names.into_iter().map(Into::into).collect(),
        exclude: false,
    })
}

/// Returns a filter rejecting members with any of the given names.
#[must_use]
pub fn excluding_names<I, S>(names: I) -> BoxedFilter
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Arc::new(NameSet {
        names: names.into_iter().map(Into::into).collect(),
        exclude: true,
    })
}

/// Accepts callables and rejects every composite and list, so nested objects
/// and lists are left unproxied.
#[derive(Debug, Default, Clone, Copy)]
pub struct CallablesOnly;

impl MemberFilter for CallablesOnly {
    fn accept(&self, _name: &str, target: &Target) -> bool {
        target.is_callable()
    }

    fn name(&self) -> &str {
        "callables_only"
    }
}

/// Returns a filter that proxies callables but not nested composites.
#[must_use]
pub fn callables_only() -> BoxedFilter {
    Arc::new(CallablesOnly)
}

/// Accepts every callable, and composites whose own member `flag` is truthy.
///
/// Lists carry no members and are never accepted.
#[derive(Debug, Clone)]
pub struct Flagged {
    flag: String,
}

impl MemberFilter for Flagged {
    fn accept(&self, _name: &str, target: &Target) -> bool {
        match target {
            Target::Callable(_) => true,
            Target::Composite(object) => object
                .get_own(&self.flag)
                .as_ref()
                .is_some_and(Value::is_truthy),
            Target::List(_) => false,
        }
    }

    fn name(&self) -> &str {
        "flagged"
    }
}

/// Returns a filter that proxies callables, and composites opting in through
/// a truthy own member named `flag`.
#[must_use]
pub fn flagged(flag: impl Into<String>) -> BoxedFilter {
    Arc::new(Flagged { flag: flag.into() })
}

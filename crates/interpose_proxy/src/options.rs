//! Construction options.

use core::fmt;

use interpose_value::Object;

use crate::filter::{self, BoxedFilter};

/// Options for [`create_proxy_with`](crate::create_proxy_with),
/// [`wrap_with`](crate::wrap_with) and
/// [`wrap_composite_with`](crate::wrap_composite_with).
///
/// # Example
///
/// ```
/// use interpose_proxy::{filter, ProxyOptions};
///
/// let options = ProxyOptions::new()
///     .with_filter(filter::callables_only())
///     .with_max_depth(4)
///     .with_name("audited");
///
/// assert_eq!(options.max_depth(), Some(4));
/// ```
#[derive(Clone)]
pub struct ProxyOptions {
    /// Member filter for composites.
    filter: BoxedFilter,
    /// Receiver pinned for a standalone callable proxy.
    receiver: Option<Object>,
    /// Maximum composite nesting depth below the root.
    max_depth: Option<usize>,
    /// Name given to a standalone callable proxy.
    name: Option<String>,
}

impl Default for ProxyOptions {
    fn default() -> Self {
        Self {
            filter: filter::accept_all(),
            receiver: None,
            max_depth: None,
            name: None,
        }
    }
}

impl ProxyOptions {
    /// Creates options that proxy every member, with no receiver override and
    /// no depth limit.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the member filter used for composites.
    #[must_use]
    pub fn with_filter(mut self, filter: BoxedFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Sets the member filter if one is given, keeping the current one
    /// otherwise.
    #[must_use]
    pub fn with_optional_filter(self, filter: Option<BoxedFilter>) -> Self {
        match filter {
            Some(filter) => self.with_filter(filter),
            None => self,
        }
    }

    /// Pins the receiver of a standalone callable proxy.
    ///
    /// Composite members always pin their owning object and ignore this.
    #[must_use]
    pub fn with_receiver(mut self, receiver: Object) -> Self {
        self.receiver = Some(receiver);
        self
    }

    /// Limits how deep composite construction descends.
    ///
    /// A depth of zero proxies only the root's own callables; any accepted
    /// composite member then fails construction.
    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Names a standalone callable proxy. By default it takes the original's
    /// name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Returns the member filter.
    #[must_use]
    pub fn filter(&self) -> &BoxedFilter {
        &self.filter
    }

    /// Returns the pinned receiver, if any.
    #[must_use]
    pub fn receiver(&self) -> Option<&Object> {
        self.receiver.as_ref()
    }

    /// Returns the maximum composite depth, if any.
    #[must_use]
    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    /// Returns the proxy name override, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl fmt::Debug for ProxyOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyOptions")
            .field("filter", &self.filter.name())
            .field("receiver", &self.receiver.as_ref().map(Object::id))
            .field("max_depth", &self.max_depth)
            .field("name", &self.name)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = ProxyOptions::default();
        assert_eq!(options.filter().name(), "accept_all");
        assert!(options.receiver().is_none());
        assert!(options.max_depth().is_none());
        assert!(options.name().is_none());
    }

    #[test]
    fn optional_filter_keeps_default_on_none() {
        let options = ProxyOptions::new().with_optional_filter(None);
        assert_eq!(options.filter().name(), "accept_all");

        let options = ProxyOptions::new().with_optional_filter(Some(filter::callables_only()));
        assert_eq!(options.filter().name(), "callables_only");
    }

    #[test]
    fn builder_sets_fields() {
        let receiver = Object::new();
        let options = ProxyOptions::new()
            .with_receiver(receiver.clone())
            .with_max_depth(2)
            .with_name("p");

        assert!(Object::ptr_eq(options.receiver().unwrap(), &receiver));
        assert_eq!(options.max_depth(), Some(2));
        assert_eq!(options.name(), Some("p"));
    }
}

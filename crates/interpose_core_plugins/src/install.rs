//! Namespace installation and script-level bridging.
//!
//! [`install`] attaches a native `createProxy(target, handler, filter?)`
//! function to any namespace [`Object`]. The installed function accepts
//! script-level handlers and filters, which are plain [`Function`] values:
//!
//! - a handler is called with the effective receiver and one argument, a
//!   context object exposing `arguments`, `returnValue`, `state`,
//!   `proxyFunction` and `continue`
//! - a filter is called with `(name, value)` and its result's truthiness
//!   decides whether the member is proxied
//!
//! [`Realm`] models the ambient environment: a global object plus a shared
//! object prototype. Installing method-style on a realm makes
//! `obj.createProxy(handler, filter?)` available on every object the realm
//! creates, and refuses to proxy the global object.
//!
//! # Example
//!
//! ```
//! use interpose_core_plugins::install;
//! use interpose_value::{Function, Object, Value};
//!
//! let namespace = Object::new();
//! install(&namespace).unwrap();
//!
//! let func = Function::new("func", |_, _| Ok(Value::from(-1)));
//! let handler = Function::new("handler", |_, args| {
//!     let ctx = args.first().and_then(Value::as_object).cloned().unwrap_or_default();
//!     ctx.call_method("continue", &[])?;
//!     if ctx.get("returnValue").as_number().is_some_and(|n| n < 0.0) {
//!         ctx.set("returnValue", 0);
//!     }
//!     Ok(Value::Undefined)
//! });
//!
//! let proxy = namespace
//!     .call_method("createProxy", &[func.into(), handler.into()])
//!     .unwrap();
//! let proxy = proxy.as_function().unwrap();
//! assert_eq!(proxy.call(None, &[]).unwrap(), Value::from(0));
//! ```

use std::sync::Arc;

use interpose_proxy::{
    BoxedFilter, ExecutionContext, Handler, MemberFilter, ProxyError, ProxyOptions, Target,
    create_proxy_with,
};
use interpose_value::{CallError, Function, Object, Value};
use parking_lot::Mutex;

/// Member name under which the factory is installed.
pub const CREATE_PROXY: &str = "createProxy";

/// Context member holding the call's arguments as a list.
pub const CTX_ARGUMENTS: &str = "arguments";
/// Context member holding the result slot.
pub const CTX_RETURN_VALUE: &str = "returnValue";
/// Context member holding the proxy's state object.
pub const CTX_STATE: &str = "state";
/// Context member holding the proxy function.
pub const CTX_PROXY_FUNCTION: &str = "proxyFunction";
/// Context member holding the resume function.
pub const CTX_CONTINUE: &str = "continue";

// ─────────────────────────────────────────────────────────────────────────────
// InstallError
// ─────────────────────────────────────────────────────────────────────────────

/// Errors raised while installing the factory.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InstallError {
    /// The namespace already has an own member with the factory's name.
    #[error("'{name}' is already defined on the target namespace")]
    AlreadyInstalled {
        /// The member name that is taken.
        name: &'static str,
    },
}

// ─────────────────────────────────────────────────────────────────────────────
// Installation
// ─────────────────────────────────────────────────────────────────────────────

/// Attaches `createProxy(target, handler, filter?)` to `namespace`.
///
/// # Errors
///
/// [`InstallError::AlreadyInstalled`] if `namespace` already owns a
/// `createProxy` member. Delegated members do not count.
pub fn install(namespace: &Object) -> Result<(), InstallError> {
    if namespace.has_own(CREATE_PROXY) {
        return Err(InstallError::AlreadyInstalled { name: CREATE_PROXY });
    }

    let factory = Function::new(CREATE_PROXY, |_, args: &[Value]| {
        let target = args.first().cloned().unwrap_or_default();
        create_script_proxy(&target, args.get(1), args.get(2))
    });
    namespace.set(CREATE_PROXY, factory);

    tracing::debug!(namespace = %namespace.id(), "installed createProxy");
    Ok(())
}

/// Attaches method-style `createProxy(handler, filter?)` to `prototype`.
///
/// The receiver of each call is the target, so every object delegating to
/// `prototype` can proxy itself.
///
/// # Errors
///
/// As [`install`].
pub fn install_method(prototype: &Object) -> Result<(), InstallError> {
    if prototype.has_own(CREATE_PROXY) {
        return Err(InstallError::AlreadyInstalled { name: CREATE_PROXY });
    }

    let method = Function::new(CREATE_PROXY, |this: Option<&Object>, args: &[Value]| {
        let target = this.cloned().map(Value::from).unwrap_or_default();
        create_script_proxy(&target, args.first(), args.get(1))
    });
    prototype.set(CREATE_PROXY, method);

    tracing::debug!(prototype = %prototype.id(), "installed method-style createProxy");
    Ok(())
}

fn create_script_proxy(
    target: &Value,
    handler: Option<&Value>,
    filter: Option<&Value>,
) -> Result<Value, CallError> {
    let handler = handler
        .and_then(Value::as_function)
        .cloned()
        .ok_or(ProxyError::InvalidArguments { field: "handler" })?;

    // A filter that is not a function is ignored.
    let script_filter = filter
        .and_then(Value::as_function)
        .cloned()
        .map(|func| Arc::new(ScriptFilter::new(func)));

    let mut options = ProxyOptions::new();
    if let Some(filter) = &script_filter {
        let boxed: BoxedFilter = Arc::clone(filter) as BoxedFilter;
        options = options.with_filter(boxed);
    }

    let proxy = create_proxy_with(target, Arc::new(ScriptHandler::new(handler)), &options)?;

    match script_filter.and_then(|filter| filter.take_error()) {
        Some(error) => Err(error),
        None => Ok(proxy),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Script bridges
// ─────────────────────────────────────────────────────────────────────────────

/// Adapts a script-level handler function to [`Handler`].
///
/// Each call builds a fresh context object. `continue` runs the original and
/// stores its value in `returnValue`; whatever `returnValue` holds when the
/// handler returns becomes the proxy's result.
#[derive(Debug, Clone)]
pub struct ScriptHandler {
    func: Function,
}

impl ScriptHandler {
    /// Wraps a handler function.
    #[must_use]
    pub fn new(func: Function) -> Self {
        Self { func }
    }

    fn context_object(ctx: &ExecutionContext) -> Object {
        let object = Object::new()
            .with(CTX_ARGUMENTS, Value::List(ctx.arguments().to_vec()))
            .with(CTX_RETURN_VALUE, ctx.result().clone())
            .with(CTX_STATE, ctx.state().as_object().clone())
            .with(CTX_PROXY_FUNCTION, ctx.proxy_function().clone());

        // The resume function holds the context weakly so the two do not keep
        // each other alive. Runs count toward `ctx.resume_count()`.
        let resumption = ctx.resumption();
        let weak = object.downgrade();
        let resume = Function::new(CTX_CONTINUE, move |_, _| {
            let value = resumption.invoke()?;
            if let Some(object) = weak.upgrade() {
                object.set(CTX_RETURN_VALUE, value);
            }
            Ok(Value::Undefined)
        });
        object.set(CTX_CONTINUE, resume);
        object
    }
}

impl Handler for ScriptHandler {
    fn handle(&self, ctx: &mut ExecutionContext) -> Result<(), CallError> {
        let object = Self::context_object(ctx);
        self.func.call(ctx.receiver(), &[Value::from(object.clone())])?;
        ctx.set_result(object.get(CTX_RETURN_VALUE));
        Ok(())
    }

    fn name(&self) -> &str {
        self.func.name()
    }
}

/// Adapts a script-level filter function to [`MemberFilter`].
///
/// The first error raised by the function excludes that member and every
/// later one; [`take_error`](Self::take_error) hands it back so construction
/// can fail with it.
#[derive(Debug)]
pub struct ScriptFilter {
    func: Function,
    error: Mutex<Option<CallError>>,
}

impl ScriptFilter {
    /// Wraps a filter function.
    #[must_use]
    pub fn new(func: Function) -> Self {
        Self {
            func,
            error: Mutex::new(None),
        }
    }

    /// Takes the first error raised by the filter function, if any.
    pub fn take_error(&self) -> Option<CallError> {
        self.error.lock().take()
    }
}

impl MemberFilter for ScriptFilter {
    fn accept(&self, name: &str, target: &Target) -> bool {
        if self.error.lock().is_some() {
            return false;
        }
        match self.func.call(None, &[Value::from(name), target.to_value()]) {
            Ok(verdict) => verdict.is_truthy(),
            Err(error) => {
                *self.error.lock() = Some(error);
                false
            }
        }
    }

    fn name(&self) -> &str {
        self.func.name()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Realm
// ─────────────────────────────────────────────────────────────────────────────

/// An ambient environment: a global object and a shared object prototype.
///
/// The global object delegates to the prototype like every other object the
/// realm creates, but it is flagged global and can never be proxied.
#[derive(Debug, Clone)]
pub struct Realm {
    global: Object,
    prototype: Object,
}

impl Default for Realm {
    fn default() -> Self {
        Self::new()
    }
}

impl Realm {
    /// Creates a realm with an empty global object and prototype.
    #[must_use]
    pub fn new() -> Self {
        let prototype = Object::new();
        let global = Object::new_global_with_base(prototype.clone());
        Self { global, prototype }
    }

    /// Returns the global object.
    #[must_use]
    pub fn global(&self) -> &Object {
        &self.global
    }

    /// Returns the shared object prototype.
    #[must_use]
    pub fn prototype(&self) -> &Object {
        &self.prototype
    }

    /// Creates an empty object delegating to the realm's prototype.
    #[must_use]
    pub fn new_object(&self) -> Object {
        Object::with_base(self.prototype.clone())
    }

    /// Installs `createProxy` on the global object.
    ///
    /// # Errors
    ///
    /// See [`install`].
    pub fn install_global(&self) -> Result<(), InstallError> {
        install(&self.global)
    }

    /// Installs method-style `createProxy` on the prototype.
    ///
    /// Installing twice is a no-op.
    pub fn install_method(&self) {
        if install_method(&self.prototype).is_err() {
            tracing::debug!("method-style createProxy already present");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn passthrough_script() -> Function {
        Function::new("handler", |_, args| {
            let ctx = args[0].as_object().cloned().unwrap();
            ctx.call_method(CTX_CONTINUE, &[])
        })
    }

    #[test]
    fn install_attaches_factory() {
        let namespace = Object::new();
        install(&namespace).unwrap();
        assert!(namespace.get(CREATE_PROXY).as_function().is_some());
    }

    #[test]
    fn install_twice_fails() {
        let namespace = Object::new();
        install(&namespace).unwrap();
        assert_eq!(
            install(&namespace).unwrap_err(),
            InstallError::AlreadyInstalled { name: CREATE_PROXY }
        );
    }

    #[test]
    fn missing_handler_is_invalid() {
        let namespace = Object::new();
        install(&namespace).unwrap();

        let func = Function::new("f", |_, _| Ok(Value::Undefined));
        let err = namespace
            .call_method(CREATE_PROXY, &[func.into()])
            .unwrap_err();
        assert_eq!(err.to_string(), "invalid arguments: missing handler");
    }

    #[test]
    fn context_object_members() {
        let namespace = Object::new();
        install(&namespace).unwrap();

        let func = Function::new("f", |_, args| Ok(Value::from(args.len() as f64)));
        let handler = Function::new("handler", |_, args| {
            let ctx = args[0].as_object().cloned().unwrap();
            assert!(ctx.get(CTX_RETURN_VALUE).is_undefined());
            assert_eq!(
                ctx.get(CTX_ARGUMENTS),
                Value::List(vec![Value::from(4), Value::from(5), Value::from(6)])
            );
            assert!(ctx.get(CTX_STATE).as_object().is_some());
            assert!(ctx.get(CTX_PROXY_FUNCTION).as_function().is_some());
            ctx.call_method(CTX_CONTINUE, &[])
        });

        let proxy = namespace
            .call_method(CREATE_PROXY, &[func.into(), handler.into()])
            .unwrap();
        let args = [Value::from(4), Value::from(5), Value::from(6)];
        assert_eq!(
            proxy.as_function().unwrap().call(None, &args).unwrap(),
            Value::from(3)
        );
    }

    #[test]
    fn script_continue_counts_as_resume() {
        let twice = Function::new("handler", |_, args| {
            let ctx = args[0].as_object().cloned().unwrap();
            ctx.call_method(CTX_CONTINUE, &[])?;
            ctx.call_method(CTX_CONTINUE, &[])
        });
        let script = ScriptHandler::new(twice);
        let counts = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&counts);
        let handler = interpose_proxy::handler_fn(move |ctx: &mut ExecutionContext| {
            script.handle(ctx)?;
            seen.lock().push(ctx.resume_count());
            Ok(())
        });

        let func = Function::new("f", |_, _| Ok(Value::from(8)));
        let proxy = interpose_proxy::wrap(func, handler, None);
        assert_eq!(proxy.call(None, &[]).unwrap(), Value::from(8));
        assert_eq!(*counts.lock(), vec![2]);
    }

    #[test]
    fn filter_error_fails_construction() {
        let namespace = Object::new();
        install(&namespace).unwrap();

        let target = Object::new().with("m", Function::new("m", |_, _| Ok(Value::Undefined)));
        let filter = Function::new("filter", |_, _| Err(CallError::thrown("bad filter")));
        let err = namespace
            .call_method(
                CREATE_PROXY,
                &[target.into(), passthrough_script().into(), filter.into()],
            )
            .unwrap_err();
        assert_eq!(err.thrown_value(), Some(&Value::from("bad filter")));
    }

    #[test]
    fn realm_global_delegates_to_prototype() {
        let realm = Realm::new();
        realm.install_method();
        realm.install_method();

        assert!(realm.global().is_global());
        assert!(realm.global().has(CREATE_PROXY));
        assert!(realm.new_object().has(CREATE_PROXY));
    }
}

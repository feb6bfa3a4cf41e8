//! Shared test utilities for `interpose_core_plugins` integration tests.

#![allow(
    dead_code,
    missing_docs,
    reason = "shared test utilities, not all items used in every test binary"
)]

use interpose_core_plugins::{CREATE_PROXY, CTX_CONTINUE, Realm};
use interpose_value::{CallError, Function, Object, Value};
use std::sync::{Arc, Mutex};

// ═══════════════════════════════════════════════════════════════════════════════
// REALM SETUP
// ═══════════════════════════════════════════════════════════════════════════════

/// Creates a realm with `createProxy` on both the global object and the
/// prototype.
pub fn create_test_realm() -> Realm {
    let realm = Realm::new();
    realm.install_global().unwrap();
    realm.install_method();
    realm
}

/// Calls the global `createProxy(target, handler, filter?)`.
pub fn global_create_proxy(
    realm: &Realm,
    target: impl Into<Value>,
    handler: &Function,
    filter: Option<&Function>,
) -> Result<Value, CallError> {
    let mut args = vec![target.into(), Value::from(handler.clone())];
    if let Some(filter) = filter {
        args.push(Value::from(filter.clone()));
    }
    realm.global().call_method(CREATE_PROXY, &args)
}

/// Calls method-style `target.createProxy(handler, filter?)`.
pub fn method_create_proxy(
    target: &Object,
    handler: &Function,
    filter: Option<&Function>,
) -> Result<Object, CallError> {
    let mut args = vec![Value::from(handler.clone())];
    if let Some(filter) = filter {
        args.push(Value::from(filter.clone()));
    }
    let proxy = target.call_method(CREATE_PROXY, &args)?;
    Ok(proxy.as_object().cloned().unwrap())
}

// ═══════════════════════════════════════════════════════════════════════════════
// SCRIPT HELPERS
// ═══════════════════════════════════════════════════════════════════════════════

/// Extracts the context object a script handler receives.
pub fn ctx_of(args: &[Value]) -> Object {
    args[0].as_object().cloned().unwrap()
}

/// A script handler running `before`, `continue`, then `after`.
pub fn script_handler<B, A>(before: B, after: A) -> Function
where
    B: Fn(Option<&Object>, &Object) + Send + Sync + 'static,
    A: Fn(Option<&Object>, &Object) + Send + Sync + 'static,
{
    Function::new("handler", move |this, args| {
        let ctx = ctx_of(args);
        before(this, &ctx);
        ctx.call_method(CTX_CONTINUE, &[])?;
        after(this, &ctx);
        Ok(Value::Undefined)
    })
}

/// A script handler that only calls `continue`.
pub fn continue_handler() -> Function {
    script_handler(|_, _| {}, |_, _| {})
}

/// A method that sets `flag` to `true` on its receiver.
pub fn flag_setter(flag: &'static str) -> Function {
    Function::new(flag, move |this, _| {
        if let Some(this) = this {
            this.set(flag, true);
        }
        Ok(Value::Undefined)
    })
}

/// Thread-safe counter for handler invocations.
#[derive(Clone, Default)]
pub struct Counter(Arc<Mutex<u32>>);

impl Counter {
    pub fn bump(&self) {
        *self.0.lock().unwrap() += 1;
    }

    pub fn get(&self) -> u32 {
        *self.0.lock().unwrap()
    }
}

/// A script handler counting its calls and continuing.
pub fn counting_handler(counter: &Counter) -> Function {
    let counter = counter.clone();
    script_handler(move |_, _| counter.bump(), |_, _| {})
}

//! Observable guarantees of callable and composite proxies.


use core::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use interpose_proxy::{
    ExecutionContext, ProxyError, create_proxy, filter, handler_fn, wrap, wrap_composite,
};
use interpose_value::{Function, Object, Value};
use proptest::prelude::*;
use test_utils::*;

// ═══════════════════════════════════════════════════════════════════════════════
// TRANSPARENCY
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn passthrough_matches_original() {
    let original = sum();
    let proxy = wrap(original.clone(), passthrough(), None);

    let args = [Value::from(1), Value::from(2), Value::from(3)];
    assert_eq!(proxy.call(None, &args).unwrap(), Value::from(6));
    assert_eq!(original.call(None, &args).unwrap(), Value::from(6));
}

#[test]
fn original_errors_pass_through() {
    let failing = Function::new("failing", |_, _| Err(interpose_value::CallError::thrown("boom")));
    let proxy = wrap(failing, passthrough(), None);

    let err = proxy.call(None, &[]).unwrap_err();
    assert_eq!(err.thrown_value(), Some(&Value::from("boom")));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn passthrough_is_transparent_for_any_arguments(
        numbers in prop::collection::vec(-1.0e6f64..1.0e6, 0..8),
    ) {
        let args: Vec<Value> = numbers.iter().copied().map(Value::from).collect();
        let original = echo();
        let proxy = wrap(original.clone(), passthrough(), None);

        prop_assert_eq!(proxy.call(None, &args).unwrap(), original.call(None, &args).unwrap());
    }

    #[test]
    fn nested_passthroughs_are_transparent(depth in 1usize..6, x in -1000i32..1000) {
        let original = sum();
        let mut proxy = original.clone();
        for _ in 0..depth {
            proxy = wrap(proxy, passthrough(), None);
        }

        let args = [Value::from(x), Value::from(1)];
        prop_assert_eq!(proxy.call(None, &args).unwrap(), original.call(None, &args).unwrap());
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// CANCELLATION AND RESULT OVERRIDE
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn cancelled_call_never_runs_original() {
    let log = CallLog::new();
    let proxy = wrap(logged_fn("func", &log, 45), cancelling(23), None);

    assert_eq!(proxy.call(None, &[]).unwrap(), Value::from(23));
    assert!(log.entries().is_empty());
}

#[test]
fn cancelled_call_without_result_is_undefined() {
    let log = CallLog::new();
    let proxy = wrap(
        logged_fn("func", &log, 45),
        handler_fn(|_ctx: &mut ExecutionContext| Ok(())),
        None,
    );

    assert!(proxy.call(None, &[]).unwrap().is_undefined());
    assert!(log.entries().is_empty());
}

#[test]
fn overwritten_result_wins() {
    let log = CallLog::new();
    let proxy = wrap(
        logged_fn("func", &log, -1),
        handler_fn(|ctx: &mut ExecutionContext| {
            ctx.resume()?;
            if ctx.result().as_number().is_some_and(|n| n < 0.0) {
                ctx.set_result(0);
            }
            Ok(())
        }),
        None,
    );

    assert_eq!(proxy.call(None, &[]).unwrap(), Value::from(0));
    assert_eq!(log.entries(), vec!["func"]);
}

#[test]
fn resuming_twice_runs_original_twice() {
    let log = CallLog::new();
    let proxy = wrap(
        logged_fn("func", &log, 1),
        handler_fn(|ctx: &mut ExecutionContext| {
            ctx.resume()?;
            ctx.resume()
        }),
        None,
    );

    proxy.call(None, &[]).unwrap();
    assert_eq!(log.entries(), vec!["func", "func"]);
}

#[test]
fn handler_recovers_from_original_error() {
    let failing = Function::new("failing", |_, _| Err(interpose_value::CallError::thrown("boom")));
    let proxy = wrap(
        failing,
        handler_fn(|ctx: &mut ExecutionContext| {
            if let Err(err) = ctx.resume() {
                let reason = err.thrown_value().and_then(Value::as_str).unwrap_or("unknown");
                ctx.set_result(format!("recovered from {reason}"));
            }
            Ok(())
        }),
        None,
    );

    assert_eq!(proxy.call(None, &[]).unwrap(), Value::from("recovered from boom"));
}

// ═══════════════════════════════════════════════════════════════════════════════
// RECEIVERS
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn method_sees_original_through_proxy() {
    let original = sample_object();
    let proxy = wrap_composite(&original, passthrough(), None).unwrap();

    assert_eq!(
        proxy.call_method("whatIsValue1", &[]).unwrap(),
        original.call_method("whatIsValue1", &[]).unwrap()
    );
}

#[test]
fn method_sees_original_through_proxy_of_proxy() {
    let original = sample_object();
    let log = CallLog::new();
    let inner = wrap_composite(&original, bracketing("inner", &log), None).unwrap();
    let outer = wrap_composite(&inner, bracketing("outer", &log), None).unwrap();

    assert_eq!(outer.call_method("whatIsValue1", &[]).unwrap(), Value::from(23));
    assert_eq!(
        log.entries(),
        vec!["outer-pre", "inner-pre", "inner-post", "outer-post"]
    );
}

#[test]
fn handler_reads_receiver() {
    let original = sample_object();
    let proxy = wrap_composite(
        &original,
        handler_fn(|ctx: &mut ExecutionContext| {
            let seen = ctx.receiver().map(|o| o.get("value1")).unwrap_or_default();
            ctx.set_result(seen);
            Ok(())
        }),
        None,
    )
    .unwrap();

    original.set("value1", 99);
    assert_eq!(proxy.call_method("whatIsValue1", &[]).unwrap(), Value::from(99));
}

// ═══════════════════════════════════════════════════════════════════════════════
// STATE
// ═══════════════════════════════════════════════════════════════════════════════

fn call_counter() -> impl interpose_proxy::Handler {
    handler_fn(|ctx: &mut ExecutionContext| {
        let calls = ctx.state().increment("calls");
        ctx.set_result(calls);
        Ok(())
    })
}

#[test]
fn proxies_of_one_original_have_independent_state() {
    let original = sum();
    let first = wrap(original.clone(), call_counter(), None);
    let second = wrap(original, call_counter(), None);

    for expected in 1..=5 {
        assert_eq!(first.call(None, &[]).unwrap(), Value::from(expected));
    }
    assert_eq!(second.call(None, &[]).unwrap(), Value::from(1));
}

#[test]
fn composite_members_have_independent_state() {
    let original = Object::new().with("a", sum()).with("b", sum());
    let proxy = wrap_composite(&original, call_counter(), None).unwrap();

    proxy.call_method("a", &[]).unwrap();
    proxy.call_method("a", &[]).unwrap();
    assert_eq!(proxy.call_method("b", &[]).unwrap(), Value::from(1));
}

#[test]
fn state_survives_errors() {
    let proxy = wrap(
        sum(),
        handler_fn(|ctx: &mut ExecutionContext| {
            if ctx.state().increment("calls") == 1.0 {
                return Err(interpose_value::CallError::thrown("first call fails"));
            }
            ctx.resume()
        }),
        None,
    );

    assert!(proxy.call(None, &[]).is_err());
    assert_eq!(proxy.call(None, &[Value::from(2)]).unwrap(), Value::from(2));
}

// ═══════════════════════════════════════════════════════════════════════════════
// FILTERS AND DELEGATION
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn excluded_member_skips_handler() {
    let runs = Arc::new(AtomicU32::new(0));
    let counter = Arc::clone(&runs);
    let handler = handler_fn(move |ctx: &mut ExecutionContext| {
        counter.fetch_add(1, Ordering::SeqCst);
        ctx.resume()
    });

    let original = Object::new().with("a", sum()).with("b", sum());
    let proxy = wrap_composite(&original, handler, Some(filter::only_names(["a"]))).unwrap();

    proxy.call_method("b", &[]).unwrap();
    assert_eq!(runs.load(Ordering::SeqCst), 0);
    proxy.call_method("a", &[]).unwrap();
    assert_eq!(runs.load(Ordering::SeqCst), 1);
}

#[test]
fn delegated_data_is_read_live() {
    let original = Object::new().with("x", 1);
    let proxy =
        wrap_composite(&original, passthrough(), Some(filter::excluding_names(["x"]))).unwrap();

    assert_eq!(proxy.get("x"), Value::from(1));
    original.set("x", 2);
    assert_eq!(proxy.get("x"), Value::from(2));
}

#[test]
fn members_added_after_construction_are_delegated_unproxied() {
    let log = CallLog::new();
    let original = Object::new();
    let proxy = wrap_composite(&original, bracketing("h", &log), None).unwrap();

    original.set("late", logged_fn("late", &log, 1));
    proxy.call_method("late", &[]).unwrap();
    assert_eq!(log.entries(), vec!["late"]);
}

#[test]
fn flagged_filter_proxies_marked_composites() {
    let log = CallLog::new();
    let marked = Object::new()
        .with("proxyMe", true)
        .with("inner", logged_fn("inner", &log, 1));
    let unmarked = Object::new().with("inner", logged_fn("other", &log, 1));
    let original = Object::new()
        .with("top", logged_fn("top", &log, 1))
        .with("marked", marked)
        .with("unmarked", unmarked);

    let proxy =
        wrap_composite(&original, bracketing("h", &log), Some(filter::flagged("proxyMe"))).unwrap();

    proxy.call_method("top", &[]).unwrap();
    proxy.get("marked").as_object().unwrap().call_method("inner", &[]).unwrap();
    proxy.get("unmarked").as_object().unwrap().call_method("inner", &[]).unwrap();

    assert_eq!(
        log.entries(),
        vec!["h-pre", "top", "h-post", "h-pre", "inner", "h-post", "other"]
    );
}

// ═══════════════════════════════════════════════════════════════════════════════
// LISTS
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn callables_stored_in_lists_are_proxied() {
    let runs = Arc::new(AtomicU32::new(0));
    let counter = Arc::clone(&runs);
    let handler = handler_fn(move |ctx: &mut ExecutionContext| {
        counter.fetch_add(1, Ordering::SeqCst);
        ctx.resume()
    });

    let original = Object::new()
        .with("value1", 23)
        .with("handlers", Value::List(vec![Value::from(read_field("value1"))]));
    let proxy = wrap_composite(&original, handler, None).unwrap();

    let handlers = proxy.get("handlers");
    let first = handlers.as_list().unwrap()[0].as_function().unwrap();
    assert_eq!(first.call(None, &[]).unwrap(), Value::from(23));
    assert_eq!(runs.load(Ordering::SeqCst), 1);
}

#[test]
fn rejected_list_is_delegated_unchanged() {
    let log = CallLog::new();
    let handlers = Value::List(vec![Value::from(logged_fn("listed", &log, 1))]);
    let original = Object::new().with("handlers", handlers.clone());
    let proxy =
        wrap_composite(&original, bracketing("h", &log), Some(filter::callables_only())).unwrap();

    assert_eq!(proxy.get("handlers"), handlers);
    assert!(proxy.own_keys().is_empty());
}

// ═══════════════════════════════════════════════════════════════════════════════
// NESTING
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn nested_handlers_run_in_stack_order() {
    let log = CallLog::new();
    let f = logged_fn("f", &log, 1);
    let first = wrap(f, bracketing("H1", &log), None);
    let second = wrap(first, bracketing("H2", &log), None);

    second.call(None, &[]).unwrap();
    assert_eq!(
        log.entries(),
        vec!["H2-pre", "H1-pre", "f", "H1-post", "H2-post"]
    );
}

#[test]
fn outer_cancel_skips_inner_handler() {
    let log = CallLog::new();
    let inner = wrap(logged_fn("f", &log, 1), bracketing("H1", &log), None);
    let outer = wrap(inner, cancelling(7), None);

    assert_eq!(outer.call(None, &[]).unwrap(), Value::from(7));
    assert!(log.entries().is_empty());
}

// ═══════════════════════════════════════════════════════════════════════════════
// CONSTRUCTION ERRORS
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn data_targets_are_rejected() {
    let err = create_proxy(&Value::from(true), passthrough(), None).unwrap_err();
    assert!(matches!(err, ProxyError::UnsupportedTargetKind { .. }));
    assert_eq!(
        err.to_string(),
        "a proxy can only be created for functions, objects and lists, got boolean"
    );
}

#[test]
fn construction_errors_convert_to_call_errors() {
    let err: interpose_value::CallError = ProxyError::ForbiddenTarget.into();
    assert_eq!(err.to_string(), ProxyError::ForbiddenTarget.to_string());
}

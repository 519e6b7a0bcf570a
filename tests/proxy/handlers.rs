//! Handler ordering, failure and subscription management.

use crate::common::*;
use parking_lot::Mutex;
use std::sync::Arc;

#[test]
fn handlers_run_in_subscription_order() {
    let registry = ProxyRegistry::new();
    let mut foo = registry.create::<Foo>().unwrap();
    let order = Arc::new(Mutex::new(Vec::new()));

    for tag in ["first", "second", "third"] {
        let sink = Arc::clone(&order);
        foo.subscribe(move |_, _| {
            sink.lock().push(tag);
            Ok(())
        })
        .unwrap();
    }

    foo.set("X", "x").unwrap();
    assert_eq!(*order.lock(), vec!["first", "second", "third"]);
}

#[test]
fn failing_handler_propagates_after_commit() {
    let registry = ProxyRegistry::new();
    let mut foo = registry.create::<Foo>().unwrap();
    foo.subscribe(|_, _| -> HandlerResult { Err("rejected".into()) })
        .unwrap();
    let later = record(&mut foo);

    let err = foo.set("X", "x").unwrap_err();

    assert!(matches!(err, ProxyError::HandlerInvocation { ref property, .. } if property == "X"));
    assert!(err.to_string().contains("rejected"));
    assert!(names(&later).is_empty());
    assert_eq!(foo.get("X").unwrap(), Value::from("x"));
}

#[test]
fn failed_write_is_the_new_baseline() {
    let registry = ProxyRegistry::new();
    let mut foo = registry.create::<Foo>().unwrap();
    let id = foo
        .subscribe(|_, _| -> HandlerResult { Err("rejected".into()) })
        .unwrap();

    assert!(foo.set("X", "x").is_err());
    assert!(foo.unsubscribe(id));
    let log = record(&mut foo);

    foo.set("X", "x").unwrap();
    assert!(names(&log).is_empty());
}

#[test]
fn unsubscribed_handler_is_not_called() {
    let registry = ProxyRegistry::new();
    let mut foo = registry.create::<Foo>().unwrap();
    let calls = Arc::new(Mutex::new(0usize));
    let sink = Arc::clone(&calls);
    let id = foo
        .subscribe(move |_, _| {
            *sink.lock() += 1;
            Ok(())
        })
        .unwrap();

    foo.set("X", "1").unwrap();
    assert!(foo.unsubscribe(id));
    foo.set("X", "2").unwrap();

    assert_eq!(*calls.lock(), 1);
    assert_eq!(foo.handler_count(), 0);
}

#[test]
fn handler_reads_committed_state() {
    let registry = ProxyRegistry::new();
    let mut foo = registry.create::<Foo>().unwrap();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    foo.subscribe(move |proxy, property| {
        sink.lock().push(proxy.get(property).unwrap_or(Value::Null));
        Ok(())
    })
    .unwrap();

    foo.set("X", "a").unwrap();
    foo.set("Y", "b").unwrap();

    assert_eq!(*seen.lock(), vec![Value::from("a"), Value::from("b")]);
}

#[test]
fn unknown_members_are_rejected() {
    let registry = ProxyRegistry::new();
    let mut foo = registry.create::<Foo>().unwrap();

    assert!(matches!(foo.set("W", 1i64), Err(ProxyError::UnknownProperty(_))));
    assert!(matches!(foo.get("W"), Err(ProxyError::UnknownProperty(_))));
    assert!(matches!(
        foo.subscribe_event("Closed", |_, _| Ok(())),
        Err(ProxyError::UnknownEvent(_))
    ));
}

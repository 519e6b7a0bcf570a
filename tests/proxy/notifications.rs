//! Notification sequences for the Foo contract family.

use crate::common::*;
use std::collections::BTreeSet;

/// X="x", X="x", X="", Y="y", Y="y", Y=""; Z is never written.
fn run_write_sequence(instance: &mut ProxyInstance) {
    for (property, value) in [
        ("X", "x"),
        ("X", "x"),
        ("X", ""),
        ("Y", "y"),
        ("Y", "y"),
        ("Y", ""),
    ] {
        instance.set(property, value).unwrap();
    }
}

#[test]
fn write_sequence_notifies_four_times() {
    let registry = ProxyRegistry::new();
    let mut foo = registry.create::<TrackedFoo>().unwrap();
    let log = record(&mut foo);

    run_write_sequence(&mut foo);

    let notified = names(&log);
    assert_eq!(notified, vec!["X", "X", "Y", "Y"]);
    let distinct: BTreeSet<_> = notified.iter().map(String::as_str).collect();
    assert_eq!(distinct, BTreeSet::from(["X", "Y"]));
    assert!(!notified.iter().any(|p| p == "Z"));
    assert_eq!(foo.base().get("y_was_written"), Value::Bool(true));
    assert_eq!(foo.get("Z").unwrap(), Value::Null);
}

#[test]
fn write_sequence_with_initializer_notifies_three_times() {
    let registry = ProxyRegistry::new();
    let mut foo = registry.create::<FooWithInit>().unwrap();
    let log = record(&mut foo);

    run_write_sequence(&mut foo);

    let notified = names(&log);
    assert_eq!(notified, vec!["X", "Y", "Y"]);
    let distinct: BTreeSet<_> = notified.iter().map(String::as_str).collect();
    assert_eq!(distinct, BTreeSet::from(["X", "Y"]));
    assert!(!notified.iter().any(|p| p == "Z"));
}

#[test]
fn write_only_auto_property_notifies_once_per_change() {
    struct Sink;
    impl Contract for Sink {
        fn define() -> ContractDef {
            ContractDef::class::<Self>()
                .property(PropertyDef::auto("Secret", ValueType::String).write_only())
                .event(CARRIER)
        }
    }

    let registry = ProxyRegistry::new();
    let mut sink = registry.create::<Sink>().unwrap();
    let log = record(&mut sink);

    sink.set("Secret", "a").unwrap();
    sink.set("Secret", "a").unwrap();

    assert_eq!(names(&log), vec!["Secret"]);
    assert_eq!(sink.base().get("Secret"), Value::from("a"));
}

#[test]
fn foo_write_sequence_notifies_four_times() {
    let registry = ProxyRegistry::new();
    let mut foo = registry.create::<Foo>().unwrap();
    let log = record(&mut foo);

    foo.set("X", "x").unwrap();
    foo.set("X", "x").unwrap();
    foo.set("Y", "y").unwrap();
    foo.set("Y", "y").unwrap();
    foo.set("Z", "z").unwrap();
    foo.set("X", "z").unwrap();

    assert_eq!(names(&log), vec!["X", "Y", "Z", "X"]);
    assert_eq!(foo.get("X").unwrap(), Value::from("z"));
    assert_eq!(foo.get("Y").unwrap(), Value::from("y"));
    assert_eq!(foo.get("Z").unwrap(), Value::from("z"));
}

#[test]
fn initializer_is_the_notification_baseline() {
    let registry = ProxyRegistry::new();
    let mut foo = registry.create::<FooWithInit>().unwrap();
    assert_eq!(foo.get("X").unwrap(), Value::from("x"));
    let log = record(&mut foo);

    foo.set("X", "x").unwrap();
    foo.set("X", "x").unwrap();
    foo.set("Y", "y").unwrap();
    foo.set("Y", "y").unwrap();
    foo.set("Z", "z").unwrap();
    foo.set("X", "z").unwrap();

    assert_eq!(names(&log), vec!["Y", "Z", "X"]);
}

#[test]
fn writes_without_subscribers_still_apply() {
    let registry = ProxyRegistry::new();
    let mut foo = registry.create::<Foo>().unwrap();

    foo.set("X", "x").unwrap();
    foo.set("Y", "y").unwrap();

    assert_eq!(foo.get("X").unwrap(), Value::from("x"));
    assert_eq!(foo.base().get("Y"), Value::from("y"));
}

#[test]
fn storage_policies_follow_member_kind() {
    let registry = ProxyRegistry::new();
    let foo = registry.create::<Foo>().unwrap();

    assert_eq!(foo.storage_policy("X"), Some(StoragePolicy::OwnBackingField));
    assert_eq!(foo.storage_policy("Y"), Some(StoragePolicy::DelegateToBase));
    assert_eq!(foo.storage_policy("Z"), Some(StoragePolicy::DelegateToBase));
}

#[test]
fn inherited_carrier_and_properties() {
    let registry = ProxyRegistry::new();
    let mut customer = registry.create::<Customer>().unwrap();
    assert!(customer.is::<Customer>());
    assert!(customer.is::<Entity>());
    assert!(customer.is::<Observable>());
    assert!(!customer.is::<Foo>());
    assert_eq!(customer.get("Name").unwrap(), Value::from("anonymous"));

    let log = record(&mut customer);
    customer.set("Name", "anonymous").unwrap();
    customer.set("Name", "Grace").unwrap();
    customer.set("Balance", 10.5).unwrap();
    customer.set("Id", 42i64).unwrap();

    assert_eq!(names(&log), vec!["Name", "Balance"]);
    assert_eq!(customer.get("Id").unwrap(), Value::Int(42));
}

#[test]
fn instances_are_independent() {
    let registry = ProxyRegistry::new();
    let mut a = registry.create::<Foo>().unwrap();
    let mut b = registry.create::<Foo>().unwrap();
    let log_a = record(&mut a);
    let log_b = record(&mut b);

    a.set("X", "a").unwrap();

    assert_eq!(names(&log_a), vec!["X"]);
    assert!(names(&log_b).is_empty());
    assert_eq!(b.get("X").unwrap(), Value::Null);
}

//! Interface contracts get every member and the carrier synthesized.

use crate::common::*;

#[test]
fn interface_members_are_backed_and_notify() {
    let registry = ProxyRegistry::new();
    let mut named = registry.create::<INamed>().unwrap();
    assert_eq!(named.storage_policy("Name"), Some(StoragePolicy::OwnBackingField));

    let log = record(&mut named);
    named.set("Name", "Ada").unwrap();
    named.set("Name", "Ada").unwrap();

    assert_eq!(names(&log), vec!["Name"]);
    assert_eq!(named.get("Name").unwrap(), Value::from("Ada"));
}

#[test]
fn diamond_members_appear_once() {
    let registry = ProxyRegistry::new();
    let person = registry.create::<IPerson>().unwrap();

    let mut props: Vec<_> = person.property_names().collect();
    props.sort_unstable();
    assert_eq!(props, vec!["Age", "Name", "Title"]);
    assert!(person.is::<INamed>());
    assert!(person.is::<IAged>());
    assert!(person.is::<ITitled>());
}

#[test]
fn diamond_interface_notifies_for_all_members() {
    let registry = ProxyRegistry::new();
    let mut person = registry.create::<IPerson>().unwrap();
    let log = record(&mut person);

    person.set("Name", "Ada").unwrap();
    person.set("Age", 36i64).unwrap();
    person.set("Title", "Countess").unwrap();

    assert_eq!(names(&log), vec!["Name", "Age", "Title"]);
}

#[test]
fn conflicting_signatures_fail_generation() {
    let registry = ProxyRegistry::new();
    let err = registry.create::<IConflicted>().unwrap_err();

    assert!(matches!(err, ProxyError::Generation { .. }));
    assert!(err.is_generation_time());
    assert_eq!(registry.cached_types(), 0);
}

#[test]
fn interface_carrier_is_synthesized() {
    let registry = ProxyRegistry::new();
    let descriptor = registry.describe::<IAged>().unwrap();
    assert!(descriptor.carrier.is_synthesized());
    assert_eq!(descriptor.carrier.name(), CARRIER);
}

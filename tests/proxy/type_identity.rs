//! One synthesized type per contract per registry.

use crate::common::*;
use std::sync::Arc;

#[test]
fn same_contract_same_type() {
    let registry = ProxyRegistry::new();
    let a = registry.create::<Foo>().unwrap();
    let b = registry.create::<Foo>().unwrap();

    assert!(Arc::ptr_eq(a.synthesized_type(), b.synthesized_type()));
    assert_eq!(registry.syntheses(), 1);
    assert_eq!(registry.cached_types(), 1);
}

#[test]
fn distinct_contracts_distinct_types() {
    let registry = ProxyRegistry::new();
    let foo = registry.create::<Foo>().unwrap();
    let init = registry.create::<FooWithInit>().unwrap();

    assert_ne!(foo.synthesized_type().id(), init.synthesized_type().id());
    assert_eq!(registry.cached_types(), 2);
}

#[test]
fn registries_do_not_share_types() {
    let first = ProxyRegistry::new();
    let second = ProxyRegistry::new();

    let a = first.create::<Foo>().unwrap();
    let b = second.create::<Foo>().unwrap();

    assert!(!Arc::ptr_eq(a.synthesized_type(), b.synthesized_type()));
}

#[test]
fn synthesized_type_names_the_contract() {
    let registry = ProxyRegistry::new();
    let ty = registry.synthesized_type::<Foo>().unwrap();

    assert!(ty.name().starts_with("Foo_Proxy_"));
    assert_eq!(ty.contract_id(), ContractId::of::<Foo>());
    assert_eq!(ty.carrier_name(), CARRIER);
}

#[test]
fn failed_contract_is_not_cached() {
    let registry = ProxyRegistry::new();

    for _ in 0..2 {
        let err = registry.create::<Mute>().unwrap_err();
        assert!(matches!(err, ProxyError::UnsupportedContract { .. }));
    }
    assert_eq!(registry.cached_types(), 0);
    assert_eq!(registry.syntheses(), 0);
}

#[test]
fn describe_reports_flattened_contract() {
    let registry = ProxyRegistry::new();
    let descriptor = registry.describe::<Customer>().unwrap();

    let names: Vec<_> = descriptor.properties.iter().map(|p| p.name.as_str()).collect();
    assert!(names.contains(&"Name"));
    assert!(names.contains(&"Balance"));
    assert!(names.contains(&"Id"));
    assert_eq!(descriptor.property("Name").unwrap().declared_by, ContractId::of::<Customer>());
    assert!(!descriptor.carrier.is_synthesized());
    assert_eq!(registry.syntheses(), 0);
}

#[test]
fn described_contract_serializes_for_inspection() {
    let registry = ProxyRegistry::new();
    let descriptor = registry.describe::<IPerson>().unwrap();

    let json = serde_json::to_value(&descriptor).unwrap();
    assert_eq!(json["carrier"]["origin"], "must_synthesize");
    assert_eq!(json["carrier"]["name"], CARRIER);
    let age = json["properties"]
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["name"] == "Age")
        .unwrap();
    assert_eq!(age["getter"], "abstract");
    assert_eq!(age["setter"], "abstract");
}

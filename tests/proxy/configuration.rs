//! Registries built from configuration.

use crate::common::*;
use observable_proxy::{CONFIG_FILE_NAME, DEFAULT_CARRIER_NAME};
use std::fs;

struct Widget;
impl Contract for Widget {
    fn define() -> ContractDef {
        ContractDef::abstract_class::<Self>()
            .property(PropertyDef::abstract_property("Width", ValueType::Float))
            .event("Changed")
    }
}

#[test]
fn carrier_name_from_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    fs::write(&path, "carrier_name = \"Changed\"\n").unwrap();

    let config = ProxyConfig::load_or_default(&path).unwrap();
    let registry = ProxyRegistry::with_config(config).unwrap();
    let mut widget = registry.create::<Widget>().unwrap();
    let log = record(&mut widget);

    widget.set("Width", 2.0).unwrap();
    assert_eq!(names(&log), vec!["Width"]);
}

#[test]
fn default_carrier_name_rejects_other_events() {
    let registry = ProxyRegistry::new();
    assert_eq!(registry.config().carrier_name, DEFAULT_CARRIER_NAME);

    let err = registry.create::<Widget>().unwrap_err();
    assert!(matches!(err, ProxyError::UnsupportedContract { .. }));
}

#[test]
fn ieee_nan_writes_always_notify() {
    let config = ProxyConfig {
        carrier_name: "Changed".to_string(),
        float_equality: FloatEquality::Ieee,
    };
    let registry = ProxyRegistry::with_config(config).unwrap();
    let mut widget = registry.create::<Widget>().unwrap();
    let log = record(&mut widget);

    widget.set("Width", f64::NAN).unwrap();
    widget.set("Width", f64::NAN).unwrap();
    assert_eq!(names(&log).len(), 2);
}

#[test]
fn bitwise_nan_writes_are_unchanged() {
    let config = ProxyConfig::from_toml_str(
        "carrier_name = \"Changed\"\nfloat_equality = \"bitwise\"\n",
    )
    .unwrap();
    let registry = ProxyRegistry::with_config(config).unwrap();
    let mut widget = registry.create::<Widget>().unwrap();
    let log = record(&mut widget);

    widget.set("Width", f64::NAN).unwrap();
    widget.set("Width", f64::NAN).unwrap();
    assert_eq!(names(&log).len(), 1);
}

#[test]
fn invalid_config_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    fs::write(&path, "carrier_name = 7\n").unwrap();

    let err = ProxyConfig::load_or_default(&path).unwrap_err();
    assert!(matches!(err, ProxyError::Config(_)));
}

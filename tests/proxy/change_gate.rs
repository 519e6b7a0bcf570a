//! Property tests for the change gate: a write notifies iff it changes the
//! stored value.

use crate::common::*;
use proptest::prelude::*;

struct Gauge;
impl Contract for Gauge {
    fn define() -> ContractDef {
        ContractDef::abstract_class::<Self>()
            .property(PropertyDef::abstract_property("Level", ValueType::Int))
            .property(PropertyDef::auto("Label", ValueType::String))
            .event(CARRIER)
    }
}

fn level() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        (-3i64..3).prop_map(Value::Int),
    ]
}

fn label() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        "[ab]{0,2}".prop_map(Value::String),
    ]
}

proptest! {
    #[test]
    fn notifies_iff_value_changed(writes in prop::collection::vec(level(), 0..40)) {
        let registry = ProxyRegistry::new();
        let mut gauge = registry.create::<Gauge>().unwrap();
        let log = record(&mut gauge);

        let mut current = Value::Int(0);
        let mut expected = 0usize;
        for value in writes {
            if value != current {
                expected += 1;
            }
            gauge.set("Level", value.clone()).unwrap();
            current = value;
        }

        prop_assert_eq!(log.lock().len(), expected);
        prop_assert_eq!(gauge.get("Level").unwrap(), current);
    }

    #[test]
    fn base_backed_property_gates_the_same_way(writes in prop::collection::vec(label(), 0..40)) {
        let registry = ProxyRegistry::new();
        let mut gauge = registry.create::<Gauge>().unwrap();
        let log = record(&mut gauge);

        let mut current = Value::Null;
        let mut expected = 0usize;
        for value in writes {
            if value != current {
                expected += 1;
            }
            gauge.set("Label", value.clone()).unwrap();
            current = value;
        }

        prop_assert_eq!(log.lock().len(), expected);
        prop_assert_eq!(gauge.base().get("Label"), current);
    }
}

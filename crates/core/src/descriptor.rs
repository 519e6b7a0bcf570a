//! Introspected contract descriptions
//!
//! A [`ContractDescriptor`] is the flattened, deduplicated view of a contract
//! and its whole ancestry. It is built once per contract by the engine's
//! introspector and never mutated afterwards. Descriptors serialize with
//! serde for inspection; accessor bodies serialize as their slot kind.

use crate::contract::{ContractId, ContractKind, Getter, PropertyDef, PropertySignature, Setter, Slot};
use crate::value::{Value, ValueType};
use serde::Serialize;

/// A property as seen by the synthesizer
#[derive(Debug, Clone, Serialize)]
pub struct PropertyDescriptor {
    /// Property name
    pub name: String,
    /// Declared value type
    pub value_type: ValueType,
    /// Getter slot
    pub getter: Slot<Getter>,
    /// Setter slot
    pub setter: Slot<Setter>,
    /// Whether the accessors can be re-routed
    pub overridable: bool,
    /// Declared initializer (the notification baseline)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initializer: Option<Value>,
    /// Base field of an auto-implemented property
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_field: Option<String>,
    /// Contract that declared the property
    pub declared_by: ContractId,
}

impl PropertyDescriptor {
    /// Describe `def` as declared by `declared_by`
    pub fn from_def(def: &PropertyDef, declared_by: ContractId) -> Self {
        Self {
            name: def.name().to_string(),
            value_type: def.value_type(),
            getter: def.getter().clone(),
            setter: def.setter().clone(),
            overridable: def.is_overridable(),
            initializer: def.initializer().cloned(),
            base_field: def.base_field().map(str::to_string),
            declared_by,
        }
    }

    /// Drop accessor bodies; interfaces carry no code.
    pub fn into_abstract(self) -> Self {
        Self {
            getter: self.getter.into_abstract(),
            setter: self.setter.into_abstract(),
            base_field: None,
            ..self
        }
    }

    /// Structural identity
    pub fn signature(&self) -> PropertySignature {
        PropertySignature {
            name: self.name.clone(),
            value_type: self.value_type,
            gettable: self.getter.is_present(),
            settable: self.setter.is_present(),
        }
    }
}

/// Where the notification carrier comes from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "origin", rename_all = "snake_case")]
pub enum CarrierDescriptor {
    /// Declared by a class in the contract's ancestry
    Declared {
        /// Event name
        name: String,
        /// Declaring contract
        declared_by: ContractId,
    },
    /// Must be synthesized on the proxy (interface contracts)
    MustSynthesize {
        /// Event name
        name: String,
    },
}

impl CarrierDescriptor {
    /// Event name of the carrier
    pub fn name(&self) -> &str {
        match self {
            CarrierDescriptor::Declared { name, .. } | CarrierDescriptor::MustSynthesize { name } => {
                name
            }
        }
    }

    /// True if the proxy has to provide the carrier itself
    pub fn is_synthesized(&self) -> bool {
        matches!(self, CarrierDescriptor::MustSynthesize { .. })
    }
}

/// An event declaration discovered in the ancestry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventDescriptor {
    /// Event name
    pub name: String,
    /// Declaring contract
    pub declared_by: ContractId,
}

/// A base field discovered in a class ancestry
#[derive(Debug, Clone, Serialize)]
pub struct FieldDescriptor {
    /// Field name
    pub name: String,
    /// Initial value
    pub initial: Value,
    /// Declaring contract
    pub declared_by: ContractId,
}

/// Flattened description of a contract
#[derive(Debug, Clone, Serialize)]
pub struct ContractDescriptor {
    /// Contract identity
    pub id: ContractId,
    /// Contract kind
    pub kind: ContractKind,
    /// The contract followed by its ancestors, in discovery order
    pub ancestry: Vec<ContractId>,
    /// Deduplicated properties
    pub properties: Vec<PropertyDescriptor>,
    /// Deduplicated events
    pub events: Vec<EventDescriptor>,
    /// Base fields (class contracts only), root class first
    pub fields: Vec<FieldDescriptor>,
    /// The notification carrier
    pub carrier: CarrierDescriptor,
}

impl ContractDescriptor {
    /// Unqualified contract name
    pub fn name(&self) -> &'static str {
        self.id.name()
    }

    /// Property by name (first match)
    pub fn property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.iter().find(|p| p.name == name)
    }
}

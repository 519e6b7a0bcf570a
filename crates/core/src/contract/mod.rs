//! Contract types
//!
//! A contract is the property/notification surface a synthesized proxy must
//! honor. The hosting application declares one by implementing [`Contract`]
//! on a marker type and returning a [`ContractDef`] from `define()`.
//!
//! ## Contract Kinds
//!
//! | Kind | Accessors | Carrier |
//! |------|-----------|---------|
//! | Class | concrete, forwarded to the base | declared in the class ancestry |
//! | AbstractClass | concrete or abstract | declared in the class ancestry |
//! | Interface | none (always backed by a field) | synthesized |
//!
//! ## Usage
//!
//! ```
//! use observable_proxy_core::contract::{Contract, ContractDef, PropertyDef};
//! use observable_proxy_core::ValueType;
//!
//! struct Person;
//!
//! impl Contract for Person {
//!     fn define() -> ContractDef {
//!         ContractDef::abstract_class::<Self>()
//!             .property(PropertyDef::abstract_property("Name", ValueType::String))
//!             .property(PropertyDef::auto("Age", ValueType::Int))
//!             .event("PropertyChanged")
//!     }
//! }
//! ```

pub mod base_state;
pub mod definition;
pub mod property;

pub use base_state::BaseState;
pub use definition::{ContractDef, FieldDecl, ParentRef};
pub use property::{Getter, PropertyDef, PropertySignature, Setter, Slot, SlotKind};

use serde::{Deserialize, Serialize, Serializer};
use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A contract type the engine can synthesize a proxy for.
///
/// `define()` is called on every introspection; the engine caches the
/// synthesized result, so it normally runs once per registry.
pub trait Contract: 'static {
    /// Describe the contract's properties, events and ancestry.
    fn define() -> ContractDef;
}

/// Identity of a contract type.
///
/// Equality and hashing use the marker's `TypeId` only; the type name is
/// carried for diagnostics.
#[derive(Clone, Copy)]
pub struct ContractId {
    type_id: TypeId,
    type_name: &'static str,
}

impl ContractId {
    /// Identity of the contract marker type `T`
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Fully qualified type name
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Unqualified type name (`my_app::model::Person` -> `Person`)
    pub fn name(&self) -> &'static str {
        let path = self.type_name.split('<').next().unwrap_or(self.type_name);
        path.rsplit("::").next().unwrap_or(path)
    }
}

impl PartialEq for ContractId {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for ContractId {}

impl Hash for ContractId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Debug for ContractId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContractId({})", self.type_name)
    }
}

impl fmt::Display for ContractId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for ContractId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// The three kinds of input contract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractKind {
    /// Concrete class: every accessor has a base implementation
    Class,
    /// Abstract class: accessors may be abstract
    AbstractClass,
    /// Interface: no storage or code, carrier is synthesized
    Interface,
}

impl ContractKind {
    /// True for `Interface`
    pub fn is_interface(self) -> bool {
        matches!(self, ContractKind::Interface)
    }

    /// True for `Class` and `AbstractClass`
    pub fn is_class(self) -> bool {
        !self.is_interface()
    }
}

impl fmt::Display for ContractKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContractKind::Class => f.write_str("class"),
            ContractKind::AbstractClass => f.write_str("abstract class"),
            ContractKind::Interface => f.write_str("interface"),
        }
    }
}

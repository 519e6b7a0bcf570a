//! Contract definitions
//!
//! [`ContractDef`] is the declarative description a [`Contract`] returns.
//! Parents are referenced lazily through [`ParentRef`] so that a definition
//! never has to build its ancestors eagerly.

use super::property::PropertyDef;
use super::{Contract, ContractId, ContractKind};
use crate::value::Value;
use std::fmt;

/// Lazily resolved reference to a parent contract
#[derive(Clone, Copy)]
pub struct ParentRef {
    id: ContractId,
    define: fn() -> ContractDef,
}

impl ParentRef {
    /// Reference to contract `P`
    pub fn of<P: Contract>() -> Self {
        Self {
            id: ContractId::of::<P>(),
            define: P::define,
        }
    }

    /// Identity of the parent
    pub fn id(&self) -> ContractId {
        self.id
    }

    /// Build the parent's definition
    pub fn resolve(&self) -> ContractDef {
        (self.define)()
    }
}

impl fmt::Debug for ParentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ParentRef").field(&self.id).finish()
    }
}

/// A base field declared by a class contract
#[derive(Debug, Clone)]
pub struct FieldDecl {
    /// Field name
    pub name: String,
    /// Value the field holds on construction
    pub initial: Value,
}

/// Declarative description of a contract
#[derive(Debug, Clone)]
pub struct ContractDef {
    id: ContractId,
    kind: ContractKind,
    parents: Vec<ParentRef>,
    properties: Vec<PropertyDef>,
    events: Vec<String>,
    fields: Vec<FieldDecl>,
}

impl ContractDef {
    fn new(id: ContractId, kind: ContractKind) -> Self {
        Self {
            id,
            kind,
            parents: Vec::new(),
            properties: Vec::new(),
            events: Vec::new(),
            fields: Vec::new(),
        }
    }

    /// Concrete class contract for marker `T`
    pub fn class<T: Contract>() -> Self {
        Self::new(ContractId::of::<T>(), ContractKind::Class)
    }

    /// Abstract class contract for marker `T`
    pub fn abstract_class<T: Contract>() -> Self {
        Self::new(ContractId::of::<T>(), ContractKind::AbstractClass)
    }

    /// Interface contract for marker `T`
    pub fn interface<T: Contract>() -> Self {
        Self::new(ContractId::of::<T>(), ContractKind::Interface)
    }

    /// Add a parent: the base class of a class, or an extended interface.
    pub fn extends<P: Contract>(mut self) -> Self {
        self.parents.push(ParentRef::of::<P>());
        self
    }

    /// Declare a property
    pub fn property(mut self, property: PropertyDef) -> Self {
        self.properties.push(property);
        self
    }

    /// Declare an event (a subscriber-list carrier)
    pub fn event(mut self, name: impl Into<String>) -> Self {
        self.events.push(name.into());
        self
    }

    /// Declare a base field with its initial value
    pub fn field(mut self, name: impl Into<String>, initial: impl Into<Value>) -> Self {
        self.fields.push(FieldDecl {
            name: name.into(),
            initial: initial.into(),
        });
        self
    }

    /// Contract identity
    pub fn id(&self) -> ContractId {
        self.id
    }

    /// Contract kind
    pub fn kind(&self) -> ContractKind {
        self.kind
    }

    /// Declared parents, in declaration order
    pub fn parents(&self) -> &[ParentRef] {
        &self.parents
    }

    /// Properties declared directly on this contract
    pub fn properties(&self) -> &[PropertyDef] {
        &self.properties
    }

    /// Events declared directly on this contract
    pub fn events(&self) -> &[String] {
        &self.events
    }

    /// Base fields declared directly on this contract
    pub fn fields(&self) -> &[FieldDecl] {
        &self.fields
    }
}

//! Core types and traits for observable proxies
//!
//! This crate defines the foundational types used throughout the system:
//! - Value / ValueType: property values and declared slot types
//! - Contract: the trait a contract marker type implements
//! - ContractDef / PropertyDef: declarative contract descriptions
//! - BaseState: base-class field storage of a proxy instance
//! - ContractDescriptor: the introspected, flattened view of a contract
//! - ProxyError: Error type hierarchy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod contract;
pub mod descriptor;
pub mod error;
pub mod value;

pub use contract::{
    BaseState, Contract, ContractDef, ContractId, ContractKind, FieldDecl, Getter, ParentRef,
    PropertyDef, PropertySignature, Setter, Slot, SlotKind,
};
pub use descriptor::{
    CarrierDescriptor, ContractDescriptor, EventDescriptor, FieldDescriptor, PropertyDescriptor,
};
pub use error::{HandlerError, HandlerResult, ProxyError, ProxyResult};
pub use value::{FloatEquality, Value, ValueType};

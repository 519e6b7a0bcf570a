//! Observable proxies for declared property contracts
//!
//! A contract declares properties and a change-notification event. The
//! engine synthesizes a proxy type for it whose overridable setters notify
//! subscribers whenever a write changes a value.
//!
//! # Quick Start
//!
//! ```
//! use observable_proxy::{Contract, ContractDef, PropertyDef, ProxyRegistry, Value, ValueType};
//!
//! struct Foo;
//! impl Contract for Foo {
//!     fn define() -> ContractDef {
//!         ContractDef::abstract_class::<Self>()
//!             .property(PropertyDef::abstract_property("X", ValueType::String))
//!             .property(PropertyDef::auto("Y", ValueType::String))
//!             .event("PropertyChanged")
//!     }
//! }
//!
//! let registry = ProxyRegistry::new();
//! let mut foo = registry.create::<Foo>()?;
//! foo.subscribe(|_, property| {
//!     println!("{property} changed");
//!     Ok(())
//! })?;
//!
//! foo.set("X", "x")?;
//! foo.set("X", "x")?; // unchanged, no notification
//! assert_eq!(foo.get("X")?, Value::from("x"));
//! # Ok::<(), observable_proxy::ProxyError>(())
//! ```
//!
//! # Architecture
//!
//! Contract definitions, values and errors live in `observable-proxy-core`.
//! Introspection, synthesis, dispatch and the type cache live in
//! `observable-proxy-engine`. Both are re-exported here.

pub use observable_proxy_core::*;
pub use observable_proxy_engine::*;

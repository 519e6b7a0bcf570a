//! Proxy engine for observable contracts
//!
//! This crate turns contracts into observable proxies:
//! - Introspection: flatten a contract and its ancestry into a descriptor
//! - Synthesis: plan accessors, backing fields and carriers of a proxy type
//! - Interception: route overridable setters through the dispatch hook
//! - Dispatch: change gate and handler invocation (ChangeNotifier)
//! - TypeCache: one synthesized type per contract, shared by all threads
//! - ProxyRegistry: the entry point that ties these together
//!
//! Synthesized types are immutable and `Send + Sync`. Proxy instances are
//! `Send` but confined to one thread at a time.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cache;
pub mod carrier;
pub mod config;
pub mod dispatch;
pub mod instance;
mod interceptor;
pub mod introspect;
pub mod registry;
pub mod synthesizer;

pub use cache::TypeCache;
pub use carrier::{Carrier, Handler, SubscriptionId};
pub use config::{ProxyConfig, CONFIG_FILE_NAME, DEFAULT_CARRIER_NAME};
pub use dispatch::{ChangeNotifier, DispatchHook};
pub use instance::{Proxy, ProxyInstance};
pub use introspect::introspect;
pub use registry::ProxyRegistry;
pub use synthesizer::{
    synthesize, BackingField, CarrierField, CarrierOrigin, StoragePolicy, SynthesizedProperty,
    SynthesizedType, SynthesizedTypeId, TypeLevel,
};

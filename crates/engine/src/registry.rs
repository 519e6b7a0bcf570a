//! Proxy registry
//!
//! The entry point of the engine. A registry owns the configuration, the
//! dispatch hook and the [`TypeCache`]; proxies are created through it.
//! There is no process-wide instance: share a registry by reference or
//! wrap it in an `Arc`.
//!
//! # Example
//!
//! ```
//! use observable_proxy_core::{Contract, ContractDef, PropertyDef, ValueType};
//! use observable_proxy_engine::ProxyRegistry;
//!
//! struct Person;
//! impl Contract for Person {
//!     fn define() -> ContractDef {
//!         ContractDef::abstract_class::<Self>()
//!             .property(PropertyDef::abstract_property("Name", ValueType::String))
//!             .event("PropertyChanged")
//!     }
//! }
//!
//! let registry = ProxyRegistry::new();
//! let mut person = registry.create::<Person>().unwrap();
//! person.subscribe(|_, property| {
//!     println!("{property} changed");
//!     Ok(())
//! }).unwrap();
//! person.set("Name", "Ada").unwrap();
//! ```

use crate::cache::TypeCache;
use crate::config::ProxyConfig;
use crate::dispatch::{ChangeNotifier, DispatchHook};
use crate::instance::Proxy;
use crate::introspect::introspect;
use crate::synthesizer::{synthesize, SynthesizedType};
use observable_proxy_core::{Contract, ContractDescriptor, ContractId, ProxyError, ProxyResult};
use std::fmt;
use std::sync::Arc;

/// Creates proxies and caches their synthesized types
pub struct ProxyRegistry {
    config: ProxyConfig,
    hook: Arc<dyn DispatchHook>,
    types: TypeCache,
}

impl ProxyRegistry {
    /// Registry with the default configuration
    pub fn new() -> Self {
        let config = ProxyConfig::default();
        let hook = Arc::new(ChangeNotifier::from_config(&config));
        Self {
            config,
            hook,
            types: TypeCache::new(),
        }
    }

    /// Registry with a custom configuration and the default notifier
    pub fn with_config(config: ProxyConfig) -> ProxyResult<Self> {
        let hook = Arc::new(ChangeNotifier::from_config(&config));
        Self::with_hook(config, hook)
    }

    /// Registry dispatching through a custom hook
    pub fn with_hook(config: ProxyConfig, hook: Arc<dyn DispatchHook>) -> ProxyResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            hook,
            types: TypeCache::new(),
        })
    }

    /// Create a default-initialized proxy for contract `T`.
    ///
    /// The first call for `T` introspects and synthesizes its type; later
    /// calls reuse it.
    pub fn create<T: Contract>(&self) -> ProxyResult<Proxy<T>> {
        let ty = self.synthesized_type::<T>()?;
        Ok(Proxy::new(ty.instantiate()))
    }

    /// The synthesized type of `T`, synthesizing it on first use
    pub fn synthesized_type<T: Contract>(&self) -> ProxyResult<Arc<SynthesizedType>> {
        let contract = ContractId::of::<T>();
        self.types.get_or_synthesize(contract, || {
            let def = T::define();
            if def.id() != contract {
                return Err(ProxyError::unsupported(
                    contract.name(),
                    format!("define() describes {} instead", def.id()),
                ));
            }
            let descriptor = introspect(def, &self.config.carrier_name)?;
            synthesize(descriptor, Arc::clone(&self.hook))
        })
    }

    /// Introspect `T` without synthesizing it
    pub fn describe<T: Contract>(&self) -> ProxyResult<ContractDescriptor> {
        if let Some(ty) = self.types.get(&ContractId::of::<T>()) {
            return Ok(ty.contract().clone());
        }
        introspect(T::define(), &self.config.carrier_name)
    }

    /// Whether `T` already has a synthesized type
    pub fn is_synthesized<T: Contract>(&self) -> bool {
        self.types.get(&ContractId::of::<T>()).is_some()
    }

    /// Number of cached synthesized types
    pub fn cached_types(&self) -> usize {
        self.types.len()
    }

    /// Total syntheses performed
    pub fn syntheses(&self) -> u64 {
        self.types.syntheses()
    }

    /// Active configuration
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }
}

impl Default for ProxyRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ProxyRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyRegistry")
            .field("config", &self.config)
            .field("types", &self.types)
            .finish()
    }
}

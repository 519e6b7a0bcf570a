//! Change dispatch
//!
//! Every intercepted setter ends in a call to [`DispatchHook::on_set`]. The
//! default hook, [`ChangeNotifier`], applies the change gate and then invokes
//! the handlers subscribed to the instance's notification carrier.
//!
//! The carrier's location is a property of the synthesized type, not of the
//! instance, so the notifier resolves it once per type and memoizes the
//! result.

use crate::config::ProxyConfig;
use crate::instance::ProxyInstance;
use crate::synthesizer::{SynthesizedType, SynthesizedTypeId};
use dashmap::DashMap;
use observable_proxy_core::{FloatEquality, ProxyError, ProxyResult, Value};
use tracing::{debug, trace, warn};

/// Receives every intercepted write after it has been committed.
pub trait DispatchHook: Send + Sync {
    /// Called with the value before and after the write.
    fn on_set(
        &self,
        instance: &ProxyInstance,
        property: &str,
        previous: &Value,
        current: &Value,
    ) -> ProxyResult<()>;

    /// Carrier field index of the notification carrier of `ty`.
    ///
    /// The default walks the type's ancestry on every call.
    fn carrier_slot(&self, ty: &SynthesizedType) -> Option<usize> {
        ty.locate_carrier(ty.carrier_name())
    }
}

/// Default dispatch hook: notify subscribers when a value actually changed.
pub struct ChangeNotifier {
    floats: FloatEquality,
    locators: DashMap<SynthesizedTypeId, Option<usize>>,
}

impl ChangeNotifier {
    /// Notifier comparing floats with `floats`
    pub fn new(floats: FloatEquality) -> Self {
        Self {
            floats,
            locators: DashMap::new(),
        }
    }

    /// Notifier configured from `config`
    pub fn from_config(config: &ProxyConfig) -> Self {
        Self::new(config.float_equality)
    }

    /// Float comparison used by the change gate
    pub fn float_equality(&self) -> FloatEquality {
        self.floats
    }

    /// Number of synthesized types whose carrier has been located
    pub fn located_types(&self) -> usize {
        self.locators.len()
    }
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new(FloatEquality::default())
    }
}

impl DispatchHook for ChangeNotifier {
    fn on_set(
        &self,
        instance: &ProxyInstance,
        property: &str,
        previous: &Value,
        current: &Value,
    ) -> ProxyResult<()> {
        if previous.equals(current, self.floats) {
            trace!(property, "value unchanged, notification suppressed");
            return Ok(());
        }

        let ty = instance.synthesized_type();
        let Some(carrier) = self
            .carrier_slot(ty)
            .and_then(|slot| instance.carrier(slot))
        else {
            return Ok(());
        };
        if carrier.is_empty() {
            return Ok(());
        }

        trace!(
            proxy = ty.name(),
            property,
            handlers = carrier.len(),
            "dispatching change notification"
        );
        for (position, handler) in carrier.handlers().enumerate() {
            if let Err(source) = handler(instance, property) {
                warn!(
                    proxy = ty.name(),
                    property,
                    handler = position,
                    skipped = carrier.len() - position - 1,
                    error = %source,
                    "change handler failed"
                );
                return Err(ProxyError::HandlerInvocation {
                    property: property.to_string(),
                    source,
                });
            }
        }
        Ok(())
    }

    fn carrier_slot(&self, ty: &SynthesizedType) -> Option<usize> {
        if let Some(slot) = self.locators.get(&ty.id()) {
            return *slot;
        }
        let slot = *self.locators.entry(ty.id()).or_insert_with(|| {
            let slot = ty.locate_carrier(ty.carrier_name());
            debug!(proxy = ty.name(), carrier = ty.carrier_name(), ?slot, "carrier located");
            slot
        });
        slot
    }
}

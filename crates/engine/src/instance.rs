//! Proxy instances
//!
//! A [`ProxyInstance`] is one object of a synthesized type: the base-class
//! state, the proxy's backing fields, and one [`Carrier`] per event.
//! [`Proxy<T>`] is the same instance typed by its contract.
//!
//! Instances are `Send` but not `Sync`; each one is confined to one thread
//! at a time.

use crate::carrier::{Carrier, Handler, SubscriptionId};
use crate::interceptor::intercept_write;
use crate::synthesizer::{GetterPlan, SetterPlan, StoragePolicy, SynthesizedType};
use observable_proxy_core::{
    BaseState, Contract, ContractId, HandlerResult, ProxyError, ProxyResult, Value,
};
use std::fmt;
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

/// An instance of a synthesized proxy type
pub struct ProxyInstance {
    ty: Arc<SynthesizedType>,
    base: BaseState,
    backing: Vec<Value>,
    carriers: Vec<Carrier>,
}

impl ProxyInstance {
    pub(crate) fn new(ty: Arc<SynthesizedType>) -> Self {
        let base = BaseState::from_fields(ty.base_fields().iter().cloned());
        let backing = ty
            .backing_fields()
            .iter()
            .map(|field| field.initial.clone())
            .collect();
        let carriers = ty.carrier_fields().iter().map(|_| Carrier::new()).collect();
        Self {
            ty,
            base,
            backing,
            carriers,
        }
    }

    /// The instance's synthesized type
    pub fn synthesized_type(&self) -> &Arc<SynthesizedType> {
        &self.ty
    }

    /// Identity of the contract the instance was created for
    pub fn contract_id(&self) -> ContractId {
        self.ty.contract_id()
    }

    /// Whether the instance is-a `T`
    pub fn is<T: Contract>(&self) -> bool {
        self.ty.is_a(ContractId::of::<T>())
    }

    /// Base-class state, as seen by the contract's own accessors
    pub fn base(&self) -> &BaseState {
        &self.base
    }

    /// Property names in declaration order
    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.ty.properties().iter().map(|p| p.name())
    }

    /// Storage policy of a property
    pub fn storage_policy(&self, property: &str) -> Option<StoragePolicy> {
        self.ty.storage_policy(property)
    }

    /// Read a property. Getters are never intercepted.
    pub fn get(&self, property: &str) -> ProxyResult<Value> {
        let prop = self
            .ty
            .property(property)
            .ok_or_else(|| ProxyError::UnknownProperty(property.to_string()))?;
        match prop.getter_plan() {
            GetterPlan::Missing => Err(ProxyError::NotReadable(property.to_string())),
            GetterPlan::Base(get) => Ok(get(&self.base)),
            GetterPlan::Backing(slot) => Ok(self.backing[*slot].clone()),
        }
    }

    /// Write a property.
    ///
    /// Overridable properties go through the interceptor, which notifies
    /// subscribers when the value changed. A handler error is returned
    /// after the write has already been applied.
    pub fn set(&mut self, property: &str, value: impl Into<Value>) -> ProxyResult<()> {
        let ty = Arc::clone(&self.ty);
        let prop = ty
            .property(property)
            .ok_or_else(|| ProxyError::UnknownProperty(property.to_string()))?;
        match prop.setter_plan() {
            SetterPlan::Missing => Err(ProxyError::NotWritable(property.to_string())),
            SetterPlan::Passthrough(set) => {
                set(&self.base, value.into());
                Ok(())
            }
            SetterPlan::Intercepted { previous, write } => {
                intercept_write(self, prop.name(), previous, write, value.into())
            }
        }
    }

    // ========================================================================
    // Subscriptions
    // ========================================================================

    /// Subscribe to change notifications
    pub fn subscribe<F>(&mut self, handler: F) -> ProxyResult<SubscriptionId>
    where
        F: Fn(&ProxyInstance, &str) -> HandlerResult + Send + Sync + 'static,
    {
        let slot = self.notification_slot()?;
        Ok(self.carrier_mut(slot)?.add(Arc::new(handler) as Handler))
    }

    /// Remove a change-notification handler; false if it was not subscribed
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        match self.notification_slot() {
            Ok(slot) => self.carriers.get_mut(slot).is_some_and(|c| c.remove(id)),
            Err(_) => false,
        }
    }

    /// Subscribe to any event of the instance by name
    pub fn subscribe_event<F>(&mut self, event: &str, handler: F) -> ProxyResult<SubscriptionId>
    where
        F: Fn(&ProxyInstance, &str) -> HandlerResult + Send + Sync + 'static,
    {
        let slot = self.event_slot(event)?;
        Ok(self.carrier_mut(slot)?.add(Arc::new(handler) as Handler))
    }

    /// Remove a handler from a named event
    pub fn unsubscribe_event(&mut self, event: &str, id: SubscriptionId) -> ProxyResult<bool> {
        let slot = self.event_slot(event)?;
        Ok(self.carrier_mut(slot)?.remove(id))
    }

    /// Number of change-notification handlers
    pub fn handler_count(&self) -> usize {
        self.notification_slot()
            .ok()
            .and_then(|slot| self.carriers.get(slot))
            .map_or(0, Carrier::len)
    }

    // ========================================================================
    // Crate internals
    // ========================================================================

    pub(crate) fn carrier(&self, slot: usize) -> Option<&Carrier> {
        self.carriers.get(slot)
    }

    pub(crate) fn backing_value(&self, slot: usize) -> &Value {
        &self.backing[slot]
    }

    pub(crate) fn set_backing_value(&mut self, slot: usize, value: Value) {
        self.backing[slot] = value;
    }

    fn carrier_mut(&mut self, slot: usize) -> ProxyResult<&mut Carrier> {
        let ty = &self.ty;
        self.carriers
            .get_mut(slot)
            .ok_or_else(|| ProxyError::UnknownEvent(ty.carrier_name().to_string()))
    }

    fn notification_slot(&self) -> ProxyResult<usize> {
        self.ty
            .hook()
            .carrier_slot(&self.ty)
            .ok_or_else(|| ProxyError::UnknownEvent(self.ty.carrier_name().to_string()))
    }

    fn event_slot(&self, event: &str) -> ProxyResult<usize> {
        self.ty
            .event_slot(event)
            .ok_or_else(|| ProxyError::UnknownEvent(event.to_string()))
    }
}

impl fmt::Debug for ProxyInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyInstance")
            .field("type", &self.ty.name())
            .field("base", &self.base)
            .field("backing", &self.backing)
            .field("carriers", &self.carriers)
            .finish()
    }
}

// ============================================================================
// Typed handle
// ============================================================================

/// A proxy instance typed by its contract `T`
pub struct Proxy<T: Contract> {
    instance: ProxyInstance,
    _contract: PhantomData<fn() -> T>,
}

impl<T: Contract> Proxy<T> {
    pub(crate) fn new(instance: ProxyInstance) -> Self {
        Self {
            instance,
            _contract: PhantomData,
        }
    }

    /// Drop the contract type
    pub fn into_inner(self) -> ProxyInstance {
        self.instance
    }
}

impl<T: Contract> Deref for Proxy<T> {
    type Target = ProxyInstance;

    fn deref(&self) -> &ProxyInstance {
        &self.instance
    }
}

impl<T: Contract> DerefMut for Proxy<T> {
    fn deref_mut(&mut self) -> &mut ProxyInstance {
        &mut self.instance
    }
}

impl<T: Contract> fmt::Debug for Proxy<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Proxy").field(&self.instance).finish()
    }
}

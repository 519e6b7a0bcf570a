//! Notification carriers
//!
//! A [`Carrier`] is the subscriber list behind one event of a proxy
//! instance. Handlers are kept in registration order and identified by a
//! [`SubscriptionId`] so they can be removed again.

use crate::instance::ProxyInstance;
use observable_proxy_core::HandlerResult;
use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;

/// A change handler: `(instance, property_name) -> HandlerResult`
pub type Handler = Arc<dyn Fn(&ProxyInstance, &str) -> HandlerResult + Send + Sync>;

/// Handle returned by subscribe, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Raw id value
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// Subscriber list of one event
#[derive(Default)]
pub struct Carrier {
    handlers: SmallVec<[(SubscriptionId, Handler); 2]>,
    next_id: u64,
}

impl Carrier {
    /// Empty carrier
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a handler
    pub fn add(&mut self, handler: Handler) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.handlers.push((id, handler));
        id
    }

    /// Remove a handler; returns false if it was not subscribed
    pub fn remove(&mut self, id: SubscriptionId) -> bool {
        match self.handlers.iter().position(|(sub, _)| *sub == id) {
            Some(index) => {
                self.handlers.remove(index);
                true
            }
            None => false,
        }
    }

    /// Handlers in registration order
    pub fn handlers(&self) -> impl Iterator<Item = &Handler> {
        self.handlers.iter().map(|(_, handler)| handler)
    }

    /// Number of subscribed handlers
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// True if nothing is subscribed
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl fmt::Debug for Carrier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Carrier")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

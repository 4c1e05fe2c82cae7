//! The set of modules available to the process and its load notifications.
//!
//! `ModuleHost::load` makes a module available and then notifies every
//! subscriber with it. Notifications are delivered on the loading thread,
//! outside any host lock, so handlers may run concurrently with each other
//! and with ordinary lookups.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;

use crate::module::ModuleRef;

/// Handler invoked with each newly available module.
pub type ModuleLoadHandler = Arc<dyn Fn(&ModuleRef) + Send + Sync>;

/// Identifies a subscription for later removal.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Modules available to the process plus the "module became available"
/// notification stream.
pub struct ModuleHost {
    modules: RwLock<Vec<ModuleRef>>,
    subscribers: RwLock<Vec<(SubscriptionId, ModuleLoadHandler)>>,
    next_subscription: AtomicU64,
}

impl ModuleHost {
    /// Create an isolated host with no modules.
    pub fn new() -> Self {
        ModuleHost {
            modules: RwLock::new(Vec::new()),
            subscribers: RwLock::new(Vec::new()),
            next_subscription: AtomicU64::new(0),
        }
    }

    /// The process-wide host.
    pub fn global() -> &'static Arc<ModuleHost> {
        static GLOBAL: OnceLock<Arc<ModuleHost>> = OnceLock::new();
        GLOBAL.get_or_init(|| Arc::new(ModuleHost::new()))
    }

    /// Make `module` available and notify subscribers.
    pub fn load(&self, module: ModuleRef) {
        self.modules.write().push(Arc::clone(&module));

        // Snapshot so handlers run without holding the subscriber lock.
        let handlers: Vec<ModuleLoadHandler> = self
            .subscribers
            .read()
            .iter()
            .map(|(_, handler)| Arc::clone(handler))
            .collect();

        tracing::debug!(
            module = module.name(),
            subscribers = handlers.len(),
            "module loaded"
        );

        for handler in handlers {
            handler(&module);
        }
    }

    /// Snapshot of the available modules, in load order.
    pub fn modules(&self) -> Vec<ModuleRef> {
        self.modules.read().clone()
    }

    pub fn module_count(&self) -> usize {
        self.modules.read().len()
    }

    /// Register a handler for future loads.
    pub fn subscribe<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&ModuleRef) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::Relaxed));
        self.subscribers.write().push((id, Arc::new(handler)));
        id
    }

    /// Remove a handler. Returns `false` if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.write();
        let before = subscribers.len();
        subscribers.retain(|(existing, _)| *existing != id);
        subscribers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().len()
    }
}

impl Default for ModuleHost {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ModuleHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleHost")
            .field("modules", &self.module_count())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

#[cfg(test)]
mod tests;
